// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `AcknowledgeableConditionType` (i=2881).

use std::sync::Arc;

use uamodel_core::{ConversionError, LocalizedText, NodeId, PropertyError, OPC_UA_NAMESPACE_URI};

use super::base_event::BaseEventType;
use super::condition::ConditionType;
use super::variables::{BaseVariableType, TwoStateVariableTypeNode};
use super::TypedNode;
use crate::node::{MethodNode, ObjectNode};
use crate::property::WriteOutcome;

method_signature! {
    /// `Acknowledge(EventId, Comment)`.
    AcknowledgeMethod = "Acknowledge";
    inputs [
        "EventId": uamodel_core::ByteString = (
            uamodel_core::ExpandedNodeId::ns0(15),
            uamodel_core::data_type::value_rank::SCALAR,
            "The identifier for the event to comment."
        ),
        "Comment": LocalizedText = (
            uamodel_core::ExpandedNodeId::ns0(21),
            uamodel_core::data_type::value_rank::SCALAR,
            "The comment to add to the condition."
        ),
    ]
    outputs []
}

method_signature! {
    /// `Confirm(EventId, Comment)`.
    ConfirmMethod = "Confirm";
    inputs [
        "EventId": uamodel_core::ByteString = (
            uamodel_core::ExpandedNodeId::ns0(15),
            uamodel_core::data_type::value_rank::SCALAR,
            "The identifier for the event to comment."
        ),
        "Comment": LocalizedText = (
            uamodel_core::ExpandedNodeId::ns0(21),
            uamodel_core::data_type::value_rank::SCALAR,
            "The comment to add to the condition."
        ),
    ]
    outputs []
}

/// Returns a `TwoStateVariableType` component of `node`.
pub(crate) fn two_state<N>(node: &N, browse_name: &str) -> Option<TwoStateVariableTypeNode>
where
    N: TypedNode<Node = ObjectNode> + ?Sized,
{
    let binding = node.binding();
    let variable = binding.variable_component(OPC_UA_NAMESPACE_URI, browse_name)?;
    Some(TwoStateVariableTypeNode::new(binding.bind(variable)))
}

/// Accessors of `AcknowledgeableConditionType`.
pub trait AcknowledgeableConditionType: ConditionType {
    /// Returns the `AckedState` component.
    fn acked_state_node(&self) -> Option<TwoStateVariableTypeNode> {
        two_state(self, "AckedState")
    }

    /// Reads `AckedState`.
    fn acked_state(&self) -> Result<Option<LocalizedText>, ConversionError> {
        self.acked_state_node().map_or(Ok(None), |n| n.value())
    }

    /// Writes `AckedState`; [`WriteOutcome::Absent`] if the component is absent.
    fn set_acked_state(&self, value: LocalizedText) -> Result<WriteOutcome, PropertyError> {
        self.binding().set_component_value(OPC_UA_NAMESPACE_URI, "AckedState", value)
    }

    /// Returns the `ConfirmedState` component.
    fn confirmed_state_node(&self) -> Option<TwoStateVariableTypeNode> {
        two_state(self, "ConfirmedState")
    }

    /// Reads `ConfirmedState`.
    fn confirmed_state(&self) -> Result<Option<LocalizedText>, ConversionError> {
        self.confirmed_state_node().map_or(Ok(None), |n| n.value())
    }

    /// Writes `ConfirmedState`; [`WriteOutcome::Absent`] if the component is absent.
    fn set_confirmed_state(&self, value: LocalizedText) -> Result<WriteOutcome, PropertyError> {
        self.binding().set_component_value(OPC_UA_NAMESPACE_URI, "ConfirmedState", value)
    }

    /// Returns the `Acknowledge` method.
    fn acknowledge_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<AcknowledgeMethod>()
    }

    /// Returns the `Confirm` method.
    fn confirm_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<ConfirmMethod>()
    }
}

object_wrapper! {
    /// An `AcknowledgeableConditionType` instance.
    AcknowledgeableConditionTypeNode, NodeId::numeric(0, 2881)
}

impl BaseEventType for AcknowledgeableConditionTypeNode {}
impl ConditionType for AcknowledgeableConditionTypeNode {}
impl AcknowledgeableConditionType for AcknowledgeableConditionTypeNode {}
