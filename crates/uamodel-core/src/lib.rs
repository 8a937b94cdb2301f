// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core types of the uamodel OPC UA object model.
//!
//! This crate holds the vocabulary shared by every other uamodel crate:
//!
//! - **Identifiers**: [`NodeId`], [`ExpandedNodeId`], [`QualifiedName`]
//! - **Values**: [`Variant`], [`DataValue`], [`ExtensionObject`]
//! - **Typed conversion**: [`UaValue`], the bridge between `Variant` and Rust types
//! - **Namespaces**: [`NamespaceTable`], resolving URIs to indexes
//! - **Data type checks**: [`data_type`], value rank and assignability rules
//! - **Errors**: the [`UaError`] hierarchy and [`StatusCode`]
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │              uamodel-nodes (typed accessors)              │
//! │   property / component access, method marshalling         │
//! └───────────────────────────┬───────────────────────────────┘
//!                             │
//! ┌───────────────────────────▼───────────────────────────────┐
//! │                      uamodel-core                         │
//! │  ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌───────────┐  │
//! │  │  types   │  │ variant  │  │  value   │  │ namespace │  │
//! │  │ (NodeId) │  │(Variant) │  │(UaValue) │  │  (table)  │  │
//! │  └──────────┘  └──────────┘  └──────────┘  └───────────┘  │
//! │  ┌──────────┐  ┌──────────┐  ┌──────────┐                 │
//! │  │data_type │  │  status  │  │  error   │                 │
//! │  └──────────┘  └──────────┘  └──────────┘                 │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use uamodel_core::{LocalizedText, UaValue, Variant};
//!
//! let comment = LocalizedText::new("en", "hello");
//! let variant = comment.clone().into_variant();
//! assert!(matches!(variant, Variant::LocalizedText(_)));
//! assert_eq!(LocalizedText::from_variant(variant).unwrap(), comment);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod data_type;
pub mod error;
pub mod namespace;
pub mod status;
pub mod types;
pub mod value;
pub mod variant;

// Re-export commonly used types
pub use error::{
    ArgumentResolutionError, BoxError, ConversionError, ErrorCode, ErrorSeverity, GraphError,
    MethodCallError, NamespaceError, PropertyError, UaError, UaException, UaResult,
};
pub use namespace::{NamespaceStatistics, NamespaceTable};
pub use status::StatusCode;
pub use types::{
    ByteString, DateTime, ExpandedNodeId, Identifier, LocalizedText, NamespaceRef, NodeId,
    QualifiedName, OPC_UA_NAMESPACE_URI,
};
pub use value::{Matrix, UaScalar, UaValue, ValueShape};
pub use variant::{Array, BuiltinType, DataValue, ExtensionObject, Variant};

/// Re-exported so that callers can name GUID values without a direct dependency.
pub use uuid::Uuid;
