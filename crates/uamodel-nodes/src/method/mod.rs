// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Method invocation marshalling.
//!
//! A method is described statically by a [`MethodSignature`]: browse name,
//! argument declarations and the tuple types of its inputs and outputs. The
//! application implements [`MethodHandler`] against those tuples and never
//! sees raw variants. [`MethodInvoker`] bridges the two and is what gets
//! installed on a [`MethodNode`](crate::node::MethodNode) as its
//! [`MethodInvocationHandler`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use uamodel_core::{ByteString, LocalizedText, NamespaceTable, NodeId, UaValue};
//! use uamodel_nodes::method::{handler_fn, InvocationContext, MethodInvocationHandler, MethodInvoker};
//! use uamodel_nodes::model::condition::AddCommentMethod;
//!
//! # tokio_test_block(async {
//! let invoker = MethodInvoker::<AddCommentMethod, _>::new(
//!     Arc::new(NamespaceTable::new()),
//!     handler_fn::<AddCommentMethod, _, _>(|_ctx, (_event_id, comment): (ByteString, LocalizedText)| async move {
//!         assert_eq!(comment.text, "hello");
//!         Ok::<_, uamodel_core::BoxError>(())
//!     }),
//! );
//!
//! let ctx = InvocationContext::new(NodeId::numeric(1, 1), NodeId::numeric(1, 2));
//! let inputs = [
//!     ByteString::from(vec![1u8]).into_variant(),
//!     LocalizedText::new("en", "hello").into_variant(),
//! ];
//! assert!(invoker.invoke(&ctx, &inputs).await.unwrap().is_empty());
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod argument;
pub mod context;
pub mod handler;
pub mod invoker;
pub mod marshal;

pub use argument::{check_input_arguments, resolve_arguments, Argument, ArgumentDefinition};
pub use context::{InvocationContext, SessionInfo, UserIdentity};
pub use handler::{handler_fn, FnHandler, MethodHandler, MethodSignature};
pub use invoker::{MethodInvocationHandler, MethodInvoker};
pub use marshal::{FromVariants, IntoVariants};
