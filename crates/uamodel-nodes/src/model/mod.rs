// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed wrappers for standard object and variable types.
//!
//! Every type definition contributes three things:
//!
//! - a `properties` module of [`QualifiedProperty`](crate::property::QualifiedProperty)
//!   descriptors,
//! - one [`MethodSignature`](crate::method::MethodSignature) per method it
//!   declares,
//! - a capability trait whose default methods read the descriptors through
//!   the wrapper's [`Binding`].
//!
//! Supertypes are supertraits, so a wrapper implementing
//! [`AlarmConditionType`](alarm_condition::AlarmConditionType) also answers
//! every [`ConditionType`](condition::ConditionType) and
//! [`BaseEventType`](base_event::BaseEventType) accessor.
//!
//! ```text
//! BaseEventType
//!   └─ ConditionType
//!        └─ AcknowledgeableConditionType
//!             └─ AlarmConditionType
//!                  └─ LimitAlarmType
//! ShelvedStateMachineType
//! FileType
//! BaseVariableType
//!   ├─ TwoStateVariableType
//!   └─ ConditionVariableType
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use uamodel_core::{NodeId, QualifiedName};
//! use uamodel_nodes::graph::{AddressSpace, NodeGraph};
//! use uamodel_nodes::model::limit_alarm::{LimitAlarmType, LimitAlarmTypeNode};
//! use uamodel_nodes::node::ObjectNode;
//!
//! let space = Arc::new(AddressSpace::new());
//! let id = NodeId::string(0, "TankLevelAlarm");
//! space.add_node(ObjectNode::builder(id.clone(), QualifiedName::new(0, "TankLevelAlarm")).build().into()).unwrap();
//!
//! let alarm = LimitAlarmTypeNode::from_graph(space, &id).unwrap();
//! assert_eq!(alarm.high_limit().unwrap(), None);
//!
//! alarm.set_high_limit(10.0).unwrap();
//! assert_eq!(alarm.high_limit().unwrap(), Some(10.0));
//! ```

use std::sync::Arc;

use uamodel_core::{GraphError, NodeId};

use crate::binding::Binding;
use crate::graph::NodeGraph;
use crate::node::{Node, ObjectNode, VariableNode};

/// Declares getter, setter and node accessors for properties.
///
/// Expands to default trait methods, so it is only used inside capability
/// traits whose `Self: TypedNode`.
macro_rules! property_accessors {
    ($( $browse_name:literal => $descriptor:path : $ty:ty { $getter:ident, $setter:ident, $node:ident } )*) => {
        $(
            #[doc = concat!("Reads the `", $browse_name, "` property.")]
            fn $getter(&self) -> ::std::result::Result<Option<$ty>, ::uamodel_core::ConversionError> {
                $crate::model::TypedNode::binding(self).property(&$descriptor)
            }

            #[doc = concat!("Writes the `", $browse_name, "` property.")]
            fn $setter(
                &self,
                value: $ty,
            ) -> ::std::result::Result<$crate::property::WriteOutcome, ::uamodel_core::PropertyError> {
                $crate::model::TypedNode::binding(self).set_property(&$descriptor, value)
            }

            #[doc = concat!("Returns the `", $browse_name, "` property node.")]
            fn $node(&self) -> Option<::std::sync::Arc<$crate::node::VariableNode>> {
                $crate::model::TypedNode::binding(self).property_node(&$descriptor)
            }
        )*
    };
}

/// Declares a method signature in namespace 0.
macro_rules! method_signature {
    (
        $(#[$meta:meta])*
        $name:ident = $browse_name:literal;
        inputs [ $( $in_name:literal : $in_ty:ty = ($in_type:expr, $in_rank:expr, $in_desc:literal) ),* $(,)? ]
        outputs [ $( $out_name:literal : $out_ty:ty = ($out_type:expr, $out_rank:expr, $out_desc:literal) ),* $(,)? ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl $crate::method::MethodSignature for $name {
            const NAMESPACE_URI: &'static str = ::uamodel_core::OPC_UA_NAMESPACE_URI;
            const BROWSE_NAME: &'static str = $browse_name;
            const INPUT_ARGUMENTS: &'static [$crate::method::ArgumentDefinition] = &[
                $( $crate::method::ArgumentDefinition::new($in_name, $in_type, $in_rank, $in_desc) ),*
            ];
            const OUTPUT_ARGUMENTS: &'static [$crate::method::ArgumentDefinition] = &[
                $( $crate::method::ArgumentDefinition::new($out_name, $out_type, $out_rank, $out_desc) ),*
            ];

            type Inputs = ( $( $in_ty, )* );
            type Outputs = ( $( $out_ty, )* );
        }
    };
}

/// Implements the constructors and [`TypedNode`] for an object wrapper.
macro_rules! object_wrapper {
    ($(#[$meta:meta])* $name:ident, $type_definition:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            binding: $crate::binding::Binding<$crate::node::ObjectNode>,
        }

        impl $name {
            /// Type definition node id.
            pub const TYPE_DEFINITION: ::uamodel_core::NodeId = $type_definition;

            /// Wraps a bound object node.
            pub fn new(binding: $crate::binding::Binding<$crate::node::ObjectNode>) -> Self {
                Self { binding }
            }

            /// Binds the object `node_id` of `graph`.
            ///
            /// # Errors
            ///
            /// Fails if the node does not exist or is not an object.
            pub fn from_graph(
                graph: ::std::sync::Arc<dyn $crate::graph::NodeGraph>,
                node_id: &::uamodel_core::NodeId,
            ) -> ::std::result::Result<Self, ::uamodel_core::GraphError> {
                $crate::model::bind_object(graph, node_id).map(Self::new)
            }
        }

        impl $crate::model::TypedNode for $name {
            type Node = $crate::node::ObjectNode;

            fn binding(&self) -> &$crate::binding::Binding<$crate::node::ObjectNode> {
                &self.binding
            }
        }
    };
}

pub mod acknowledgeable_condition;
pub mod alarm_condition;
pub mod base_event;
pub mod condition;
pub mod file;
pub mod limit_alarm;
pub mod shelved_state_machine;
pub mod variables;

// =============================================================================
// TypedNode
// =============================================================================

/// A typed wrapper over a bound node.
pub trait TypedNode: Send + Sync {
    /// Kind of the wrapped node.
    type Node: Node;

    /// Returns the binding every accessor goes through.
    fn binding(&self) -> &Binding<Self::Node>;

    /// Returns the node id.
    fn node_id(&self) -> &NodeId {
        self.binding().node_id()
    }
}

/// Looks up an object node and binds it to `graph`.
pub(crate) fn bind_object(graph: Arc<dyn NodeGraph>, node_id: &NodeId) -> Result<Binding<ObjectNode>, GraphError> {
    let object = graph
        .node(node_id)
        .ok_or_else(|| GraphError::node_not_found(node_id))?
        .try_into_object()?;
    Ok(Binding::new(graph, object))
}

/// Looks up a variable node and binds it to `graph`.
pub(crate) fn bind_variable(
    graph: Arc<dyn NodeGraph>,
    node_id: &NodeId,
) -> Result<Binding<VariableNode>, GraphError> {
    let variable = graph
        .node(node_id)
        .ok_or_else(|| GraphError::node_not_found(node_id))?
        .try_into_variable()?;
    Ok(Binding::new(graph, variable))
}
