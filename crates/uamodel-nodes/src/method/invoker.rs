// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Binding of a typed handler to the untyped call path.
//!
//! ```text
//!  &[Variant] ──► input_arguments() ── resolve once (OnceCell) ──┐
//!                                                                 │
//!                 check count, data type, value rank  ◄───────────┘
//!                          │
//!                 M::Inputs::from_variants
//!                          │
//!                 handler.validate ─► handler.call (no lock held)
//!                          │
//!  Vec<Variant> ◄── M::Outputs::into_variants
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use uamodel_core::{ArgumentResolutionError, MethodCallError, NamespaceTable, StatusCode, Variant};

use super::argument::{check_input_arguments, resolve_arguments, Argument, ArgumentDefinition};
use super::context::InvocationContext;
use super::handler::{MethodHandler, MethodSignature};
use super::marshal::{FromVariants, IntoVariants};

/// Object-safe entry point the call service dispatches to.
#[async_trait]
pub trait MethodInvocationHandler: Send + Sync {
    /// Returns the browse name of the method.
    fn method_name(&self) -> &str;

    /// Returns the resolved input arguments.
    fn input_arguments(&self) -> Result<&[Argument], ArgumentResolutionError>;

    /// Returns the resolved output arguments.
    fn output_arguments(&self) -> Result<&[Argument], ArgumentResolutionError>;

    /// Checks and converts `inputs`, runs the handler and converts its
    /// outputs.
    ///
    /// # Errors
    ///
    /// Every error except [`MethodCallError::Handler`] is raised before the
    /// handler runs.
    async fn invoke(&self, ctx: &InvocationContext, inputs: &[Variant]) -> Result<Vec<Variant>, MethodCallError>;
}

/// Invokes a [`MethodHandler`] for signature `M`.
///
/// Argument metadata is resolved on first use, once per invoker; input and
/// output lists are cached independently. A failed resolution is not cached,
/// so the method starts serving calls once the missing namespace is
/// registered.
pub struct MethodInvoker<M: MethodSignature, H> {
    namespaces: Arc<NamespaceTable>,
    handler: H,
    inputs: OnceCell<Vec<Argument>>,
    outputs: OnceCell<Vec<Argument>>,
    _signature: PhantomData<fn() -> M>,
}

impl<M, H> MethodInvoker<M, H>
where
    M: MethodSignature,
    H: MethodHandler<M>,
{
    /// Creates an invoker resolving data types against `namespaces`.
    pub fn new(namespaces: Arc<NamespaceTable>, handler: H) -> Self {
        debug_assert_eq!(
            <M::Inputs as FromVariants>::COUNT,
            M::INPUT_ARGUMENTS.len(),
            "input tuple of {} disagrees with its declared arguments",
            M::BROWSE_NAME
        );
        debug_assert_eq!(
            <M::Outputs as IntoVariants>::COUNT,
            M::OUTPUT_ARGUMENTS.len(),
            "output tuple of {} disagrees with its declared arguments",
            M::BROWSE_NAME
        );
        Self {
            namespaces,
            handler,
            inputs: OnceCell::new(),
            outputs: OnceCell::new(),
            _signature: PhantomData,
        }
    }

    /// Returns the handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Returns the resolved input arguments, resolving them on first use.
    pub fn input_arguments(&self) -> Result<&[Argument], ArgumentResolutionError> {
        self.inputs
            .get_or_try_init(|| self.resolve("input", M::INPUT_ARGUMENTS))
            .map(Vec::as_slice)
    }

    /// Returns the resolved output arguments, resolving them on first use.
    pub fn output_arguments(&self) -> Result<&[Argument], ArgumentResolutionError> {
        self.outputs
            .get_or_try_init(|| self.resolve("output", M::OUTPUT_ARGUMENTS))
            .map(Vec::as_slice)
    }

    fn resolve(
        &self,
        direction: &'static str,
        definitions: &[ArgumentDefinition],
    ) -> Result<Vec<Argument>, ArgumentResolutionError> {
        match resolve_arguments(M::BROWSE_NAME, definitions, &self.namespaces) {
            Ok(arguments) => {
                tracing::debug!(
                    method = M::BROWSE_NAME,
                    direction,
                    count = arguments.len(),
                    "Method arguments resolved"
                );
                Ok(arguments)
            }
            Err(e) => {
                tracing::warn!(
                    method = M::BROWSE_NAME,
                    direction,
                    argument = %e.argument,
                    error = %e.source,
                    "Method argument resolution failed"
                );
                Err(e)
            }
        }
    }

    /// Runs a call with typed results.
    pub async fn invoke_typed(
        &self,
        ctx: &InvocationContext,
        inputs: &[Variant],
    ) -> Result<M::Outputs, MethodCallError> {
        let arguments = self.input_arguments()?;
        tracing::debug!(
            method = M::BROWSE_NAME,
            object_id = %ctx.object_id(),
            inputs = inputs.len(),
            "Invoking method"
        );
        check_input_arguments(arguments, inputs)?;

        let typed = M::Inputs::from_variants(inputs.to_vec()).map_err(|(index, error)| {
            tracing::debug!(method = M::BROWSE_NAME, index, error = %error, "Input conversion failed");
            MethodCallError::InvalidArguments {
                results: (0..inputs.len())
                    .map(|i| {
                        if i == index {
                            StatusCode::BAD_TYPE_MISMATCH
                        } else {
                            StatusCode::GOOD
                        }
                    })
                    .collect(),
            }
        })?;

        self.handler.validate(ctx, &typed)?;

        self.handler.call(ctx, typed).await.map_err(|source| {
            let error = MethodCallError::Handler(source);
            error.log(M::BROWSE_NAME);
            error
        })
    }
}

#[async_trait]
impl<M, H> MethodInvocationHandler for MethodInvoker<M, H>
where
    M: MethodSignature,
    H: MethodHandler<M>,
{
    fn method_name(&self) -> &str {
        M::BROWSE_NAME
    }

    fn input_arguments(&self) -> Result<&[Argument], ArgumentResolutionError> {
        Self::input_arguments(self)
    }

    fn output_arguments(&self) -> Result<&[Argument], ArgumentResolutionError> {
        Self::output_arguments(self)
    }

    async fn invoke(&self, ctx: &InvocationContext, inputs: &[Variant]) -> Result<Vec<Variant>, MethodCallError> {
        self.invoke_typed(ctx, inputs).await.map(IntoVariants::into_variants)
    }
}

impl<M: MethodSignature, H> fmt::Debug for MethodInvoker<M, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInvoker")
            .field("method", &M::BROWSE_NAME)
            .field("inputs_resolved", &self.inputs.get().is_some())
            .field("outputs_resolved", &self.outputs.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::handler_fn;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uamodel_core::data_type::value_rank;
    use uamodel_core::{
        BoxError, ByteString, ExpandedNodeId, LocalizedText, NodeId, UaException, UaValue, OPC_UA_NAMESPACE_URI,
    };

    const VENDOR_TYPES: &str = "urn:test:vendor-types";

    struct Comment;

    impl MethodSignature for Comment {
        const NAMESPACE_URI: &'static str = OPC_UA_NAMESPACE_URI;
        const BROWSE_NAME: &'static str = "AddComment";
        const INPUT_ARGUMENTS: &'static [ArgumentDefinition] = &[
            ArgumentDefinition::new("EventId", ExpandedNodeId::ns0(15), value_rank::SCALAR, ""),
            ArgumentDefinition::new("Comment", ExpandedNodeId::ns0(21), value_rank::SCALAR, ""),
        ];
        const OUTPUT_ARGUMENTS: &'static [ArgumentDefinition] = &[];
        type Inputs = (ByteString, LocalizedText);
        type Outputs = ();
    }

    struct Scale;

    impl MethodSignature for Scale {
        const NAMESPACE_URI: &'static str = VENDOR_TYPES;
        const BROWSE_NAME: &'static str = "Scale";
        const INPUT_ARGUMENTS: &'static [ArgumentDefinition] = &[ArgumentDefinition::new(
            "Factor",
            ExpandedNodeId::numeric_uri(VENDOR_TYPES, 3001),
            value_rank::SCALAR,
            "",
        )];
        const OUTPUT_ARGUMENTS: &'static [ArgumentDefinition] =
            &[ArgumentDefinition::new("Result", ExpandedNodeId::ns0(11), value_rank::SCALAR, "")];
        type Inputs = (i32,);
        type Outputs = (f64,);
    }

    #[derive(Default)]
    struct Recorder {
        calls: AtomicUsize,
        last: Mutex<Option<LocalizedText>>,
    }

    #[async_trait]
    impl MethodHandler<Comment> for Arc<Recorder> {
        async fn call(
            &self,
            _ctx: &InvocationContext,
            (_event_id, comment): (ByteString, LocalizedText),
        ) -> Result<(), BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock() = Some(comment);
            Ok(())
        }
    }

    fn ctx() -> InvocationContext {
        InvocationContext::new(NodeId::numeric(1, 1), NodeId::numeric(1, 2))
    }

    fn comment_invoker() -> (MethodInvoker<Comment, Arc<Recorder>>, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        (MethodInvoker::new(Arc::new(NamespaceTable::new()), recorder.clone()), recorder)
    }

    #[tokio::test]
    async fn test_dispatch_with_typed_inputs() {
        let (invoker, recorder) = comment_invoker();
        let inputs = [
            ByteString::from(vec![1u8]).into_variant(),
            LocalizedText::new("en", "hello").into_variant(),
        ];

        let outputs = MethodInvocationHandler::invoke(&invoker, &ctx(), &inputs).await.unwrap();
        assert!(outputs.is_empty());
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*recorder.last.lock(), Some(LocalizedText::new("en", "hello")));
    }

    #[tokio::test]
    async fn test_wrong_arity_does_not_run_handler() {
        let (invoker, recorder) = comment_invoker();
        let hello = LocalizedText::new("en", "hello").into_variant();

        let err = invoker.invoke_typed(&ctx(), &[hello.clone()]).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_ARGUMENTS_MISSING);

        let three = [Variant::Empty, hello.clone(), hello];
        let err = invoker.invoke_typed(&ctx(), &three).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_TOO_MANY_ARGUMENTS);
        assert!(!err.handler_ran());
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_input_fails_conversion() {
        let (invoker, recorder) = comment_invoker();
        let inputs = [Variant::Empty, LocalizedText::new("en", "hello").into_variant()];

        let err = invoker.invoke_typed(&ctx(), &inputs).await.unwrap_err();
        assert_eq!(err.input_argument_results(), &[StatusCode::BAD_TYPE_MISMATCH, StatusCode::GOOD]);
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolution_failure_is_not_cached() {
        let namespaces = Arc::new(NamespaceTable::new());
        let invoker = MethodInvoker::<Scale, _>::new(
            namespaces.clone(),
            handler_fn::<Scale, _, _>(|_, (factor,)| async move { Ok::<_, BoxError>((factor as f64 * 1.5,)) }),
        );

        let err = invoker.invoke_typed(&ctx(), &[Variant::Int32(2)]).await.unwrap_err();
        assert!(matches!(err, MethodCallError::ArgumentResolution(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_INTERNAL_ERROR);

        namespaces.register(VENDOR_TYPES);
        let (result,) = invoker.invoke_typed(&ctx(), &[Variant::Int32(2)]).await.unwrap();
        assert!((result - 3.0).abs() < f64::EPSILON);
        assert_eq!(invoker.input_arguments().unwrap()[0].data_type, NodeId::numeric(1, 3001));
    }

    #[tokio::test]
    async fn test_arguments_resolved_once() {
        let (invoker, _) = comment_invoker();
        let first = invoker.input_arguments().unwrap().to_vec();
        let lookups = invoker.namespaces.statistics().lookups;
        assert_eq!(lookups, 2);

        let second = invoker.input_arguments().unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(invoker.namespaces.statistics().lookups, lookups);
        assert!(invoker.output_arguments().unwrap().is_empty());
    }

    #[test]
    fn test_arguments_resolved_once_under_contention() {
        const THREADS: usize = 16;
        let (invoker, _) = comment_invoker();
        let barrier = std::sync::Barrier::new(THREADS);

        let resolved: Vec<Vec<Argument>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        invoker.input_arguments().unwrap().to_vec()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(invoker.namespaces.statistics().lookups, Comment::INPUT_ARGUMENTS.len() as u64);
        assert!(resolved.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(resolved[0].len(), 2);
    }

    #[tokio::test]
    async fn test_handler_error_is_preserved() {
        let invoker = MethodInvoker::<Comment, _>::new(
            Arc::new(NamespaceTable::new()),
            handler_fn::<Comment, _, _>(|_, _| async move {
                Err::<(), _>(BoxError::from(UaException::new(StatusCode::BAD_INVALID_STATE, "condition disabled")))
            }),
        );
        let inputs = [ByteString::default().into_variant(), LocalizedText::text("x").into_variant()];

        let err = invoker.invoke_typed(&ctx(), &inputs).await.unwrap_err();
        assert!(err.handler_ran());
        assert_eq!(err.status_code(), StatusCode::BAD_INVALID_STATE);
        assert_eq!(err.handler_error::<UaException>().unwrap().message(), "condition disabled");
    }
}
