// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed method signatures and handlers.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use uamodel_core::{BoxError, MethodCallError};

use super::argument::ArgumentDefinition;
use super::context::InvocationContext;
use super::marshal::{FromVariants, IntoVariants};

/// Static description of a method: browse name, arguments and their Rust
/// types.
///
/// `Inputs` and `Outputs` are tuples with one slot per declared argument.
pub trait MethodSignature: Send + Sync + 'static {
    /// Namespace URI of the browse name.
    const NAMESPACE_URI: &'static str;
    /// Browse name.
    const BROWSE_NAME: &'static str;
    /// Input argument declarations.
    const INPUT_ARGUMENTS: &'static [ArgumentDefinition];
    /// Output argument declarations.
    const OUTPUT_ARGUMENTS: &'static [ArgumentDefinition];

    /// Typed inputs.
    type Inputs: FromVariants;
    /// Typed outputs.
    type Outputs: IntoVariants;
}

/// Application logic behind a method.
///
/// The handler only sees inputs that passed the count, data type and value
/// rank checks.
#[async_trait]
pub trait MethodHandler<M: MethodSignature>: Send + Sync + 'static {
    /// Checks input values before [`call`](Self::call).
    ///
    /// Return [`MethodCallError::InvalidArguments`] to reject individual
    /// values. Accepts everything by default.
    fn validate(&self, _ctx: &InvocationContext, _inputs: &M::Inputs) -> Result<(), MethodCallError> {
        Ok(())
    }

    /// Runs the method.
    ///
    /// Return a [`UaException`](uamodel_core::UaException) to fail with a
    /// specific status code; any other error is reported as
    /// `Bad_UnexpectedError` but stays available to the caller.
    async fn call(&self, ctx: &InvocationContext, inputs: M::Inputs) -> Result<M::Outputs, BoxError>;
}

/// A closure-backed handler.
pub struct FnHandler<M, F> {
    f: F,
    _signature: PhantomData<fn() -> M>,
}

/// Wraps an async closure as a handler.
///
/// The closure receives an owned copy of the context.
///
/// # Examples
///
/// ```
/// use uamodel_nodes::method::handler_fn;
/// use uamodel_nodes::model::condition::EnableMethod;
///
/// let handler = handler_fn::<EnableMethod, _, _>(|_ctx, ()| async move { Ok::<_, uamodel_core::BoxError>(()) });
/// # let _ = handler;
/// ```
pub fn handler_fn<M, F, Fut>(f: F) -> FnHandler<M, F>
where
    M: MethodSignature,
    F: Fn(InvocationContext, M::Inputs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<M::Outputs, BoxError>> + Send + 'static,
{
    FnHandler {
        f,
        _signature: PhantomData,
    }
}

#[async_trait]
impl<M, F, Fut> MethodHandler<M> for FnHandler<M, F>
where
    M: MethodSignature,
    F: Fn(InvocationContext, M::Inputs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<M::Outputs, BoxError>> + Send + 'static,
{
    async fn call(&self, ctx: &InvocationContext, inputs: M::Inputs) -> Result<M::Outputs, BoxError> {
        (self.f)(ctx.clone(), inputs).await
    }
}

impl<M: MethodSignature, F> fmt::Debug for FnHandler<M, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler")
            .field("method", &M::BROWSE_NAME)
            .finish()
    }
}
