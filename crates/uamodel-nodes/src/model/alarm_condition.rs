// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `AlarmConditionType` (i=2915).

use std::sync::Arc;

use uamodel_core::{ConversionError, LocalizedText, NodeId, PropertyError, OPC_UA_NAMESPACE_URI};

use super::acknowledgeable_condition::{two_state, AcknowledgeableConditionType};
use super::base_event::BaseEventType;
use super::condition::ConditionType;
use super::shelved_state_machine::ShelvedStateMachineTypeNode;
use super::variables::{BaseVariableType, TwoStateVariableTypeNode};
use super::TypedNode;
use crate::node::MethodNode;
use crate::property::WriteOutcome;

/// Property descriptors.
pub mod properties {
    use uamodel_core::data_type::value_rank::SCALAR;
    use uamodel_core::{ExpandedNodeId, NodeId, OPC_UA_NAMESPACE_URI as UA};

    use crate::property::QualifiedProperty;

    /// `InputNode`: NodeId.
    pub const INPUT_NODE: QualifiedProperty<NodeId> =
        QualifiedProperty::new(UA, "InputNode", ExpandedNodeId::ns0(17), SCALAR);
    /// `SuppressedOrShelved`: Boolean.
    pub const SUPPRESSED_OR_SHELVED: QualifiedProperty<bool> =
        QualifiedProperty::new(UA, "SuppressedOrShelved", ExpandedNodeId::ns0(1), SCALAR);
    /// `MaxTimeShelved`: Duration.
    pub const MAX_TIME_SHELVED: QualifiedProperty<f64> =
        QualifiedProperty::new(UA, "MaxTimeShelved", ExpandedNodeId::ns0(290), SCALAR);
    /// `AudibleEnabled`: Boolean.
    pub const AUDIBLE_ENABLED: QualifiedProperty<bool> =
        QualifiedProperty::new(UA, "AudibleEnabled", ExpandedNodeId::ns0(1), SCALAR);
    /// `OnDelay`: Duration.
    pub const ON_DELAY: QualifiedProperty<f64> =
        QualifiedProperty::new(UA, "OnDelay", ExpandedNodeId::ns0(290), SCALAR);
    /// `OffDelay`: Duration.
    pub const OFF_DELAY: QualifiedProperty<f64> =
        QualifiedProperty::new(UA, "OffDelay", ExpandedNodeId::ns0(290), SCALAR);
    /// `ReAlarmTime`: Duration.
    pub const RE_ALARM_TIME: QualifiedProperty<f64> =
        QualifiedProperty::new(UA, "ReAlarmTime", ExpandedNodeId::ns0(290), SCALAR);
}

method_signature! {
    /// `Silence`: no arguments.
    SilenceMethod = "Silence";
    inputs []
    outputs []
}

method_signature! {
    /// `Suppress`: no arguments.
    SuppressMethod = "Suppress";
    inputs []
    outputs []
}

method_signature! {
    /// `Unsuppress`: no arguments.
    UnsuppressMethod = "Unsuppress";
    inputs []
    outputs []
}

method_signature! {
    /// `RemoveFromService`: no arguments.
    RemoveFromServiceMethod = "RemoveFromService";
    inputs []
    outputs []
}

method_signature! {
    /// `PlaceInService`: no arguments.
    PlaceInServiceMethod = "PlaceInService";
    inputs []
    outputs []
}

method_signature! {
    /// `Reset`: no arguments.
    ResetMethod = "Reset";
    inputs []
    outputs []
}

/// Accessors of `AlarmConditionType`.
pub trait AlarmConditionType: AcknowledgeableConditionType {
    property_accessors! {
        "InputNode" => properties::INPUT_NODE: NodeId { input_node, set_input_node, input_node_node }
        "SuppressedOrShelved" => properties::SUPPRESSED_OR_SHELVED: bool {
            suppressed_or_shelved, set_suppressed_or_shelved, suppressed_or_shelved_node
        }
        "MaxTimeShelved" => properties::MAX_TIME_SHELVED: f64 {
            max_time_shelved, set_max_time_shelved, max_time_shelved_node
        }
        "AudibleEnabled" => properties::AUDIBLE_ENABLED: bool {
            audible_enabled, set_audible_enabled, audible_enabled_node
        }
        "OnDelay" => properties::ON_DELAY: f64 { on_delay, set_on_delay, on_delay_node }
        "OffDelay" => properties::OFF_DELAY: f64 { off_delay, set_off_delay, off_delay_node }
        "ReAlarmTime" => properties::RE_ALARM_TIME: f64 { re_alarm_time, set_re_alarm_time, re_alarm_time_node }
    }

    /// Returns the `ActiveState` component.
    fn active_state_node(&self) -> Option<TwoStateVariableTypeNode> {
        two_state(self, "ActiveState")
    }

    /// Reads `ActiveState`.
    fn active_state(&self) -> Result<Option<LocalizedText>, ConversionError> {
        self.active_state_node().map_or(Ok(None), |n| n.value())
    }

    /// Writes `ActiveState`; [`WriteOutcome::Absent`] if the component is absent.
    fn set_active_state(&self, value: LocalizedText) -> Result<WriteOutcome, PropertyError> {
        self.binding().set_component_value(OPC_UA_NAMESPACE_URI, "ActiveState", value)
    }

    /// Returns the `SuppressedState` component.
    fn suppressed_state_node(&self) -> Option<TwoStateVariableTypeNode> {
        two_state(self, "SuppressedState")
    }

    /// Returns the `OutOfServiceState` component.
    fn out_of_service_state_node(&self) -> Option<TwoStateVariableTypeNode> {
        two_state(self, "OutOfServiceState")
    }

    /// Returns the `LatchedState` component.
    fn latched_state_node(&self) -> Option<TwoStateVariableTypeNode> {
        two_state(self, "LatchedState")
    }

    /// Returns the `SilenceState` component.
    fn silence_state_node(&self) -> Option<TwoStateVariableTypeNode> {
        two_state(self, "SilenceState")
    }

    /// Reads `ReAlarmRepeatCount`.
    fn re_alarm_repeat_count(&self) -> Result<Option<i16>, ConversionError> {
        self.binding().component_value(OPC_UA_NAMESPACE_URI, "ReAlarmRepeatCount")
    }

    /// Writes `ReAlarmRepeatCount`.
    fn set_re_alarm_repeat_count(&self, value: i16) -> Result<WriteOutcome, PropertyError> {
        self.binding()
            .set_component_value(OPC_UA_NAMESPACE_URI, "ReAlarmRepeatCount", value)
    }

    /// Reads `FirstInGroupFlag`.
    fn first_in_group_flag(&self) -> Result<Option<bool>, ConversionError> {
        self.binding().component_value(OPC_UA_NAMESPACE_URI, "FirstInGroupFlag")
    }

    /// Writes `FirstInGroupFlag`.
    fn set_first_in_group_flag(&self, value: bool) -> Result<WriteOutcome, PropertyError> {
        self.binding()
            .set_component_value(OPC_UA_NAMESPACE_URI, "FirstInGroupFlag", value)
    }

    /// Returns the `ShelvingState` object component.
    fn shelving_state_node(&self) -> Option<ShelvedStateMachineTypeNode> {
        let binding = self.binding();
        let object = binding.object_component(OPC_UA_NAMESPACE_URI, "ShelvingState")?;
        Some(ShelvedStateMachineTypeNode::new(binding.bind(object)))
    }

    /// Returns the `Silence` method.
    fn silence_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<SilenceMethod>()
    }

    /// Returns the `Suppress` method.
    fn suppress_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<SuppressMethod>()
    }

    /// Returns the `Unsuppress` method.
    fn unsuppress_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<UnsuppressMethod>()
    }

    /// Returns the `RemoveFromService` method.
    fn remove_from_service_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<RemoveFromServiceMethod>()
    }

    /// Returns the `PlaceInService` method.
    fn place_in_service_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<PlaceInServiceMethod>()
    }

    /// Returns the `Reset` method.
    fn reset_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<ResetMethod>()
    }
}

object_wrapper! {
    /// An `AlarmConditionType` instance.
    AlarmConditionTypeNode, NodeId::numeric(0, 2915)
}

impl BaseEventType for AlarmConditionTypeNode {}
impl ConditionType for AlarmConditionTypeNode {}
impl AcknowledgeableConditionType for AlarmConditionTypeNode {}
impl AlarmConditionType for AlarmConditionTypeNode {}
