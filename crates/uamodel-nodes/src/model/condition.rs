// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `ConditionType` (i=2782).

use std::sync::Arc;

use uamodel_core::{ConversionError, LocalizedText, NodeId, PropertyError, StatusCode, OPC_UA_NAMESPACE_URI};

use super::base_event::BaseEventType;
use super::variables::{BaseVariableType, ConditionVariableTypeNode, TwoStateVariableTypeNode};
use super::TypedNode;
use crate::node::{MethodNode, ObjectNode};
use crate::property::WriteOutcome;

/// Property descriptors.
pub mod properties {
    use uamodel_core::data_type::value_rank::{ONE_DIMENSION, SCALAR};
    use uamodel_core::{ExpandedNodeId, LocalizedText, NodeId, OPC_UA_NAMESPACE_URI as UA};

    use crate::property::QualifiedProperty;

    /// `ConditionClassId`: NodeId.
    pub const CONDITION_CLASS_ID: QualifiedProperty<NodeId> =
        QualifiedProperty::new(UA, "ConditionClassId", ExpandedNodeId::ns0(17), SCALAR);
    /// `ConditionClassName`: LocalizedText.
    pub const CONDITION_CLASS_NAME: QualifiedProperty<LocalizedText> =
        QualifiedProperty::new(UA, "ConditionClassName", ExpandedNodeId::ns0(21), SCALAR);
    /// `ConditionSubClassId`: NodeId[].
    pub const CONDITION_SUB_CLASS_ID: QualifiedProperty<Vec<NodeId>> =
        QualifiedProperty::new(UA, "ConditionSubClassId", ExpandedNodeId::ns0(17), ONE_DIMENSION);
    /// `ConditionSubClassName`: LocalizedText[].
    pub const CONDITION_SUB_CLASS_NAME: QualifiedProperty<Vec<LocalizedText>> =
        QualifiedProperty::new(UA, "ConditionSubClassName", ExpandedNodeId::ns0(21), ONE_DIMENSION);
    /// `ConditionName`: String.
    pub const CONDITION_NAME: QualifiedProperty<String> =
        QualifiedProperty::new(UA, "ConditionName", ExpandedNodeId::ns0(12), SCALAR);
    /// `BranchId`: NodeId.
    pub const BRANCH_ID: QualifiedProperty<NodeId> =
        QualifiedProperty::new(UA, "BranchId", ExpandedNodeId::ns0(17), SCALAR);
    /// `Retain`: Boolean.
    pub const RETAIN: QualifiedProperty<bool> = QualifiedProperty::new(UA, "Retain", ExpandedNodeId::ns0(1), SCALAR);
    /// `ClientUserId`: String.
    pub const CLIENT_USER_ID: QualifiedProperty<String> =
        QualifiedProperty::new(UA, "ClientUserId", ExpandedNodeId::ns0(12), SCALAR);
}

// =============================================================================
// Methods
// =============================================================================

method_signature! {
    /// `Disable`: no arguments.
    DisableMethod = "Disable";
    inputs []
    outputs []
}

method_signature! {
    /// `Enable`: no arguments.
    EnableMethod = "Enable";
    inputs []
    outputs []
}

method_signature! {
    /// `AddComment(EventId, Comment)`.
    AddCommentMethod = "AddComment";
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
    /// `ConditionRefresh(SubscriptionId)`.
    ConditionRefreshMethod = "ConditionRefresh";
    inputs [
        "SubscriptionId": u32 = (
            uamodel_core::ExpandedNodeId::ns0(288),
            uamodel_core::data_type::value_rank::SCALAR,
            "The identifier for the subscription to refresh."
        ),
    ]
    outputs []
}

method_signature! {
    /// `ConditionRefresh2(SubscriptionId, MonitoredItemId)`.
    ConditionRefresh2Method = "ConditionRefresh2";
    inputs [
        "SubscriptionId": u32 = (
            uamodel_core::ExpandedNodeId::ns0(288),
            uamodel_core::data_type::value_rank::SCALAR,
            "The identifier for the subscription to refresh."
        ),
        "MonitoredItemId": u32 = (
            uamodel_core::ExpandedNodeId::ns0(288),
            uamodel_core::data_type::value_rank::SCALAR,
            "The identifier for the monitored item to refresh."
        ),
    ]
    outputs []
}

// =============================================================================
// ConditionType
// =============================================================================

/// Accessors of `ConditionType`.
pub trait ConditionType: BaseEventType {
    property_accessors! {
        "ConditionClassId" => properties::CONDITION_CLASS_ID: NodeId {
            condition_class_id, set_condition_class_id, condition_class_id_node
        }
        "ConditionClassName" => properties::CONDITION_CLASS_NAME: LocalizedText {
            condition_class_name, set_condition_class_name, condition_class_name_node
        }
        "ConditionSubClassId" => properties::CONDITION_SUB_CLASS_ID: Vec<NodeId> {
            condition_sub_class_id, set_condition_sub_class_id, condition_sub_class_id_node
        }
        "ConditionSubClassName" => properties::CONDITION_SUB_CLASS_NAME: Vec<LocalizedText> {
            condition_sub_class_name, set_condition_sub_class_name, condition_sub_class_name_node
        }
        "ConditionName" => properties::CONDITION_NAME: String {
            condition_name, set_condition_name, condition_name_node
        }
        "BranchId" => properties::BRANCH_ID: NodeId { branch_id, set_branch_id, branch_id_node }
        "Retain" => properties::RETAIN: bool { retain, set_retain, retain_node }
        "ClientUserId" => properties::CLIENT_USER_ID: String { client_user_id, set_client_user_id, client_user_id_node }
    }

    /// Returns the `EnabledState` component.
    fn enabled_state_node(&self) -> Option<TwoStateVariableTypeNode> {
        let binding = self.binding();
        let variable = binding.variable_component(OPC_UA_NAMESPACE_URI, "EnabledState")?;
        Some(TwoStateVariableTypeNode::new(binding.bind(variable)))
    }

    /// Reads `EnabledState`.
    fn enabled_state(&self) -> Result<Option<LocalizedText>, ConversionError> {
        self.enabled_state_node().map_or(Ok(None), |n| n.value())
    }

    /// Writes `EnabledState`; [`WriteOutcome::Absent`] if the component is absent.
    fn set_enabled_state(&self, value: LocalizedText) -> Result<WriteOutcome, PropertyError> {
        self.binding().set_component_value(OPC_UA_NAMESPACE_URI, "EnabledState", value)
    }

    /// Returns the `Quality` component.
    fn quality_node(&self) -> Option<ConditionVariableTypeNode<StatusCode>> {
        condition_variable(self, "Quality")
    }

    /// Reads `Quality`.
    fn quality(&self) -> Result<Option<StatusCode>, ConversionError> {
        self.quality_node().map_or(Ok(None), |n| n.value())
    }

    /// Writes `Quality`; [`WriteOutcome::Absent`] if the component is absent.
    fn set_quality(&self, value: StatusCode) -> Result<WriteOutcome, PropertyError> {
        self.binding().set_component_value(OPC_UA_NAMESPACE_URI, "Quality", value)
    }

    /// Returns the `LastSeverity` component.
    fn last_severity_node(&self) -> Option<ConditionVariableTypeNode<u16>> {
        condition_variable(self, "LastSeverity")
    }

    /// Reads `LastSeverity`.
    fn last_severity(&self) -> Result<Option<u16>, ConversionError> {
        self.last_severity_node().map_or(Ok(None), |n| n.value())
    }

    /// Writes `LastSeverity`; [`WriteOutcome::Absent`] if the component is absent.
    fn set_last_severity(&self, value: u16) -> Result<WriteOutcome, PropertyError> {
        self.binding().set_component_value(OPC_UA_NAMESPACE_URI, "LastSeverity", value)
    }

    /// Returns the `Comment` component.
    fn comment_node(&self) -> Option<ConditionVariableTypeNode<LocalizedText>> {
        condition_variable(self, "Comment")
    }

    /// Reads `Comment`.
    fn comment(&self) -> Result<Option<LocalizedText>, ConversionError> {
        self.comment_node().map_or(Ok(None), |n| n.value())
    }

    /// Writes `Comment`; [`WriteOutcome::Absent`] if the component is absent.
    fn set_comment(&self, value: LocalizedText) -> Result<WriteOutcome, PropertyError> {
        self.binding().set_component_value(OPC_UA_NAMESPACE_URI, "Comment", value)
    }

    /// Returns the `Disable` method.
    fn disable_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<DisableMethod>()
    }

    /// Returns the `Enable` method.
    fn enable_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<EnableMethod>()
    }

    /// Returns the `AddComment` method.
    fn add_comment_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<AddCommentMethod>()
    }

    /// Returns the `ConditionRefresh` method.
    fn condition_refresh_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<ConditionRefreshMethod>()
    }

    /// Returns the `ConditionRefresh2` method.
    fn condition_refresh2_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<ConditionRefresh2Method>()
    }
}

/// Wraps a `ConditionVariableType` component of `node`.
pub(crate) fn condition_variable<N, T>(node: &N, browse_name: &str) -> Option<ConditionVariableTypeNode<T>>
where
    N: TypedNode<Node = ObjectNode> + ?Sized,
    T: uamodel_core::UaValue,
{
    let binding = node.binding();
    let variable = binding.variable_component(OPC_UA_NAMESPACE_URI, browse_name)?;
    Some(ConditionVariableTypeNode::new(binding.bind(variable)))
}

object_wrapper! {
    /// A `ConditionType` instance.
    ConditionTypeNode, NodeId::numeric(0, 2782)
}

impl BaseEventType for ConditionTypeNode {}
impl ConditionType for ConditionTypeNode {}
