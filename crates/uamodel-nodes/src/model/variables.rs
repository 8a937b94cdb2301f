// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Variable types: `BaseVariableType`, `TwoStateVariableType` (i=8995) and
//! `ConditionVariableType` (i=9002).

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use uamodel_core::{
    ConversionError, DataValue, DateTime, GraphError, LocalizedText, NodeId, PropertyError, UaValue, Variant,
};

use super::TypedNode;
use crate::binding::Binding;
use crate::component::check_against_node;
use crate::graph::NodeGraph;
use crate::node::VariableNode;

/// Property descriptors.
pub mod properties {
    use uamodel_core::data_type::value_rank::SCALAR;
    use uamodel_core::{DateTime, ExpandedNodeId, LocalizedText, OPC_UA_NAMESPACE_URI as UA};

    use crate::property::QualifiedProperty;

    /// `TwoStateVariableType.Id`: Boolean.
    pub const ID: QualifiedProperty<bool> = QualifiedProperty::new(UA, "Id", ExpandedNodeId::ns0(1), SCALAR);
    /// `TwoStateVariableType.TransitionTime`: UtcTime.
    pub const TRANSITION_TIME: QualifiedProperty<DateTime> =
        QualifiedProperty::new(UA, "TransitionTime", ExpandedNodeId::ns0(294), SCALAR);
    /// `TwoStateVariableType.EffectiveTransitionTime`: UtcTime.
    pub const EFFECTIVE_TRANSITION_TIME: QualifiedProperty<DateTime> =
        QualifiedProperty::new(UA, "EffectiveTransitionTime", ExpandedNodeId::ns0(294), SCALAR);
    /// `TwoStateVariableType.TrueState`: LocalizedText.
    pub const TRUE_STATE: QualifiedProperty<LocalizedText> =
        QualifiedProperty::new(UA, "TrueState", ExpandedNodeId::ns0(21), SCALAR);
    /// `TwoStateVariableType.FalseState`: LocalizedText.
    pub const FALSE_STATE: QualifiedProperty<LocalizedText> =
        QualifiedProperty::new(UA, "FalseState", ExpandedNodeId::ns0(21), SCALAR);
    /// `ConditionVariableType.SourceTimestamp`: UtcTime.
    pub const SOURCE_TIMESTAMP: QualifiedProperty<DateTime> =
        QualifiedProperty::new(UA, "SourceTimestamp", ExpandedNodeId::ns0(294), SCALAR);
}

// =============================================================================
// BaseVariableType
// =============================================================================

/// Typed value access of a variable.
pub trait BaseVariableType: TypedNode<Node = VariableNode> {
    /// Rust type of the value.
    type Value: UaValue;

    /// Reads the value; `Ok(None)` if it is empty.
    fn value(&self) -> Result<Option<Self::Value>, ConversionError> {
        match self.binding().node().value() {
            Variant::Empty => Ok(None),
            value => Self::Value::from_variant(value).map(Some),
        }
    }

    /// Writes the value.
    ///
    /// # Errors
    ///
    /// Fails if the value disagrees with the variable's data type or value
    /// rank.
    fn set_value(&self, value: Self::Value) -> Result<(), PropertyError> {
        let variable = self.binding().node();
        let value = value.into_variant();
        check_against_node(variable, &value)?;
        variable.set_value(DataValue::new(value));
        Ok(())
    }

    /// Returns the full data value.
    fn data_value(&self) -> DataValue {
        self.binding().node().data_value()
    }
}

// =============================================================================
// TwoStateVariableType
// =============================================================================

/// Accessors of `TwoStateVariableType`.
pub trait TwoStateVariableType: BaseVariableType<Value = LocalizedText> {
    property_accessors! {
        "Id" => properties::ID: bool { id, set_id, id_node }
        "TransitionTime" => properties::TRANSITION_TIME: DateTime {
            transition_time, set_transition_time, transition_time_node
        }
        "EffectiveTransitionTime" => properties::EFFECTIVE_TRANSITION_TIME: DateTime {
            effective_transition_time, set_effective_transition_time, effective_transition_time_node
        }
        "TrueState" => properties::TRUE_STATE: LocalizedText { true_state, set_true_state, true_state_node }
        "FalseState" => properties::FALSE_STATE: LocalizedText { false_state, set_false_state, false_state_node }
    }

    /// Sets `Id` and the matching display text, and stamps the transition.
    ///
    /// The text comes from `TrueState` / `FalseState` when present, else
    /// `"True"` / `"False"`.
    fn set_state(&self, state: bool) -> Result<(), PropertyError> {
        let text = (if state { self.true_state() } else { self.false_state() })
            .ok()
            .flatten()
            .unwrap_or_else(|| LocalizedText::new("en", if state { "True" } else { "False" }));
        self.set_id(state)?;
        self.set_transition_time(chrono::Utc::now())?;
        self.set_value(text)
    }
}

/// A `TwoStateVariableType` instance.
#[derive(Debug, Clone)]
pub struct TwoStateVariableTypeNode {
    binding: Binding<VariableNode>,
}

impl TwoStateVariableTypeNode {
    /// Type definition node id.
    pub const TYPE_DEFINITION: NodeId = NodeId::numeric(0, 8995);

    /// Wraps a bound variable node.
    pub fn new(binding: Binding<VariableNode>) -> Self {
        Self { binding }
    }

    /// Binds the variable `node_id` of `graph`.
    pub fn from_graph(graph: Arc<dyn NodeGraph>, node_id: &NodeId) -> Result<Self, GraphError> {
        super::bind_variable(graph, node_id).map(Self::new)
    }
}

impl TypedNode for TwoStateVariableTypeNode {
    type Node = VariableNode;

    fn binding(&self) -> &Binding<VariableNode> {
        &self.binding
    }
}

impl BaseVariableType for TwoStateVariableTypeNode {
    type Value = LocalizedText;
}

impl TwoStateVariableType for TwoStateVariableTypeNode {}

// =============================================================================
// ConditionVariableType
// =============================================================================

/// Accessors of `ConditionVariableType`.
pub trait ConditionVariableType: BaseVariableType {
    property_accessors! {
        "SourceTimestamp" => properties::SOURCE_TIMESTAMP: DateTime {
            source_timestamp, set_source_timestamp, source_timestamp_node
        }
    }
}

/// A `ConditionVariableType` instance holding values of type `T`.
pub struct ConditionVariableTypeNode<T> {
    binding: Binding<VariableNode>,
    _value: PhantomData<fn() -> T>,
}

impl<T: UaValue> ConditionVariableTypeNode<T> {
    /// Type definition node id.
    pub const TYPE_DEFINITION: NodeId = NodeId::numeric(0, 9002);

    /// Wraps a bound variable node.
    pub fn new(binding: Binding<VariableNode>) -> Self {
        Self {
            binding,
            _value: PhantomData,
        }
    }

    /// Binds the variable `node_id` of `graph`.
    pub fn from_graph(graph: Arc<dyn NodeGraph>, node_id: &NodeId) -> Result<Self, GraphError> {
        super::bind_variable(graph, node_id).map(Self::new)
    }
}

impl<T> Clone for ConditionVariableTypeNode<T> {
    fn clone(&self) -> Self {
        Self {
            binding: self.binding.clone(),
            _value: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ConditionVariableTypeNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionVariableTypeNode")
            .field("binding", &self.binding)
            .field("value", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: UaValue> TypedNode for ConditionVariableTypeNode<T> {
    type Node = VariableNode;

    fn binding(&self) -> &Binding<VariableNode> {
        &self.binding
    }
}

impl<T: UaValue> BaseVariableType for ConditionVariableTypeNode<T> {
    type Value = T;
}

impl<T: UaValue> ConditionVariableType for ConditionVariableTypeNode<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AddressSpace;
    use crate::property::WriteOutcome;
    use uamodel_core::{QualifiedName, StatusCode};

    fn variable(space: &Arc<AddressSpace>, id: u32, data_type: u32) -> NodeId {
        let node_id = NodeId::numeric(0, id);
        let variable = VariableNode::builder(node_id.clone(), QualifiedName::new(0, "State"))
            .data_type(NodeId::numeric(0, data_type))
            .build();
        space.add_node(variable.into()).unwrap();
        node_id
    }

    #[test]
    fn test_two_state_set_state() {
        let space = Arc::new(AddressSpace::new());
        let id = variable(&space, 100, 21);
        let state = TwoStateVariableTypeNode::from_graph(space, &id).unwrap();

        assert_eq!(state.value().unwrap(), None);
        state.set_true_state(LocalizedText::new("en", "Enabled")).unwrap();

        state.set_state(true).unwrap();
        assert_eq!(state.id().unwrap(), Some(true));
        assert_eq!(state.value().unwrap().unwrap().text, "Enabled");
        assert!(state.transition_time().unwrap().is_some());

        state.set_state(false).unwrap();
        assert_eq!(state.id().unwrap(), Some(false));
        assert_eq!(state.value().unwrap().unwrap().text, "False");
    }

    #[test]
    fn test_condition_variable_value_checked_against_data_type() {
        let space = Arc::new(AddressSpace::new());
        let id = variable(&space, 200, 19);
        let quality = ConditionVariableTypeNode::<StatusCode>::from_graph(space.clone(), &id).unwrap();

        quality.set_value(StatusCode::GOOD).unwrap();
        assert_eq!(quality.value().unwrap(), Some(StatusCode::GOOD));
        assert_eq!(
            quality.set_source_timestamp(chrono::Utc::now()).unwrap(),
            WriteOutcome::Materialized
        );

        let wrong = ConditionVariableTypeNode::<u16>::from_graph(space, &id).unwrap();
        assert!(matches!(wrong.set_value(3), Err(PropertyError::TypeMismatch { .. })));
        assert!(wrong.value().is_err());
    }
}
