// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uamodel-nodes
//!
//! Server-side typed access to OPC UA object and variable nodes.
//!
//! This crate provides:
//!
//! - **Graph**: the [`NodeGraph`] seam and the in-memory [`AddressSpace`]
//! - **Nodes**: object, variable and method nodes with value observers
//! - **Properties**: [`QualifiedProperty`] descriptors with lazy materialization
//! - **Components**: lookups of variable, object and method components by browse name
//! - **Methods**: typed [`MethodHandler`]s behind a marshalling [`MethodInvoker`]
//! - **Call**: the Call service dispatch, [`call_method`]
//! - **Model**: typed wrappers for event, condition, alarm, state machine and file types
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  model::*  (LimitAlarmTypeNode, FileTypeNode, ...)           │
//! │  capability traits with default accessors                    │
//! └───────────────┬──────────────────────────────┬───────────────┘
//!                 │ Binding                      │ MethodSignature
//! ┌───────────────▼──────────────┐  ┌────────────▼───────────────┐
//! │  property / component        │  │  method::MethodInvoker     │
//! │  typed reads and writes      │  │  check, convert, dispatch  │
//! └───────────────┬──────────────┘  └────────────┬───────────────┘
//!                 │                              │ call_method
//! ┌───────────────▼──────────────────────────────▼───────────────┐
//! │                    NodeGraph / AddressSpace                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use uamodel_core::{NodeId, QualifiedName};
//! use uamodel_nodes::model::base_event::{BaseEventType, BaseEventTypeNode};
//! use uamodel_nodes::{AddressSpace, NodeGraph, ObjectNode};
//!
//! let space = Arc::new(AddressSpace::new());
//! let id = NodeId::string(0, "Event");
//! space.add_node(ObjectNode::builder(id.clone(), QualifiedName::new(0, "Event")).build().into()).unwrap();
//!
//! let event = BaseEventTypeNode::from_graph(space, &id).unwrap();
//! event.set_severity(500).unwrap();
//! assert_eq!(event.severity().unwrap(), Some(500));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Graph Modules
// =============================================================================

pub mod graph;
pub mod node;
pub mod observer;
pub mod reference_types;
pub mod settings;

// =============================================================================
// Accessor Modules
// =============================================================================

pub mod binding;
pub mod component;
pub mod property;

// =============================================================================
// Method Modules
// =============================================================================

pub mod call;
pub mod method;

// =============================================================================
// Type Model
// =============================================================================

pub mod model;

// =============================================================================
// Re-exports
// =============================================================================

pub use binding::Binding;
pub use call::{call, call_method, CallMethodRequest, CallMethodResult};
pub use graph::{AddressSpace, GraphStatistics, NodeGraph};
pub use method::{
    handler_fn, Argument, ArgumentDefinition, InvocationContext, MethodHandler, MethodInvocationHandler,
    MethodInvoker, MethodSignature, SessionInfo, UserIdentity,
};
pub use model::TypedNode;
pub use node::{MethodNode, Node, NodeClass, NodeRef, ObjectNode, Reference, VariableNode};
pub use observer::{AttributeObserver, CollectingObserver, TracingObserver, ValueChange};
pub use property::{QualifiedProperty, WriteOutcome};
pub use settings::{ModelSettings, PropertyWritePolicy};
