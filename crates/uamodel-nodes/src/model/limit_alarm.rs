// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `LimitAlarmType` (i=2955).

use uamodel_core::NodeId;

use super::acknowledgeable_condition::AcknowledgeableConditionType;
use super::alarm_condition::AlarmConditionType;
use super::base_event::BaseEventType;
use super::condition::ConditionType;

/// Property descriptors.
pub mod properties {
    use uamodel_core::data_type::value_rank::SCALAR;
    use uamodel_core::{ExpandedNodeId, OPC_UA_NAMESPACE_URI as UA};

    use crate::property::QualifiedProperty;

    const DOUBLE: ExpandedNodeId = ExpandedNodeId::ns0(11);
    const UINT16: ExpandedNodeId = ExpandedNodeId::ns0(5);

    /// `HighHighLimit`: Double.
    pub const HIGH_HIGH_LIMIT: QualifiedProperty<f64> = QualifiedProperty::new(UA, "HighHighLimit", DOUBLE, SCALAR);
    /// `HighLimit`: Double.
    pub const HIGH_LIMIT: QualifiedProperty<f64> = QualifiedProperty::new(UA, "HighLimit", DOUBLE, SCALAR);
    /// `LowLimit`: Double.
    pub const LOW_LIMIT: QualifiedProperty<f64> = QualifiedProperty::new(UA, "LowLimit", DOUBLE, SCALAR);
    /// `LowLowLimit`: Double.
    pub const LOW_LOW_LIMIT: QualifiedProperty<f64> = QualifiedProperty::new(UA, "LowLowLimit", DOUBLE, SCALAR);
    /// `BaseHighHighLimit`: Double.
    pub const BASE_HIGH_HIGH_LIMIT: QualifiedProperty<f64> =
        QualifiedProperty::new(UA, "BaseHighHighLimit", DOUBLE, SCALAR);
    /// `BaseHighLimit`: Double.
    pub const BASE_HIGH_LIMIT: QualifiedProperty<f64> = QualifiedProperty::new(UA, "BaseHighLimit", DOUBLE, SCALAR);
    /// `BaseLowLimit`: Double.
    pub const BASE_LOW_LIMIT: QualifiedProperty<f64> = QualifiedProperty::new(UA, "BaseLowLimit", DOUBLE, SCALAR);
    /// `BaseLowLowLimit`: Double.
    pub const BASE_LOW_LOW_LIMIT: QualifiedProperty<f64> =
        QualifiedProperty::new(UA, "BaseLowLowLimit", DOUBLE, SCALAR);
    /// `SeverityHighHigh`: UInt16.
    pub const SEVERITY_HIGH_HIGH: QualifiedProperty<u16> =
        QualifiedProperty::new(UA, "SeverityHighHigh", UINT16, SCALAR);
    /// `SeverityHigh`: UInt16.
    pub const SEVERITY_HIGH: QualifiedProperty<u16> = QualifiedProperty::new(UA, "SeverityHigh", UINT16, SCALAR);
    /// `SeverityLow`: UInt16.
    pub const SEVERITY_LOW: QualifiedProperty<u16> = QualifiedProperty::new(UA, "SeverityLow", UINT16, SCALAR);
    /// `SeverityLowLow`: UInt16.
    pub const SEVERITY_LOW_LOW: QualifiedProperty<u16> = QualifiedProperty::new(UA, "SeverityLowLow", UINT16, SCALAR);
}

/// Accessors of `LimitAlarmType`.
pub trait LimitAlarmType: AlarmConditionType {
    property_accessors! {
        "HighHighLimit" => properties::HIGH_HIGH_LIMIT: f64 {
            high_high_limit, set_high_high_limit, high_high_limit_node
        }
        "HighLimit" => properties::HIGH_LIMIT: f64 { high_limit, set_high_limit, high_limit_node }
        "LowLimit" => properties::LOW_LIMIT: f64 { low_limit, set_low_limit, low_limit_node }
        "LowLowLimit" => properties::LOW_LOW_LIMIT: f64 { low_low_limit, set_low_low_limit, low_low_limit_node }
        "BaseHighHighLimit" => properties::BASE_HIGH_HIGH_LIMIT: f64 {
            base_high_high_limit, set_base_high_high_limit, base_high_high_limit_node
        }
        "BaseHighLimit" => properties::BASE_HIGH_LIMIT: f64 {
            base_high_limit, set_base_high_limit, base_high_limit_node
        }
        "BaseLowLimit" => properties::BASE_LOW_LIMIT: f64 { base_low_limit, set_base_low_limit, base_low_limit_node }
        "BaseLowLowLimit" => properties::BASE_LOW_LOW_LIMIT: f64 {
            base_low_low_limit, set_base_low_low_limit, base_low_low_limit_node
        }
        "SeverityHighHigh" => properties::SEVERITY_HIGH_HIGH: u16 {
            severity_high_high, set_severity_high_high, severity_high_high_node
        }
        "SeverityHigh" => properties::SEVERITY_HIGH: u16 { severity_high, set_severity_high, severity_high_node }
        "SeverityLow" => properties::SEVERITY_LOW: u16 { severity_low, set_severity_low, severity_low_node }
        "SeverityLowLow" => properties::SEVERITY_LOW_LOW: u16 {
            severity_low_low, set_severity_low_low, severity_low_low_node
        }
    }
}

object_wrapper! {
    /// A `LimitAlarmType` instance.
    LimitAlarmTypeNode, NodeId::numeric(0, 2955)
}

impl BaseEventType for LimitAlarmTypeNode {}
impl ConditionType for LimitAlarmTypeNode {}
impl AcknowledgeableConditionType for LimitAlarmTypeNode {}
impl AlarmConditionType for LimitAlarmTypeNode {}
impl LimitAlarmType for LimitAlarmTypeNode {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AddressSpace, NodeGraph};
    use crate::model::TypedNode;
    use crate::node::{Node, ObjectNode};
    use crate::property::WriteOutcome;
    use crate::settings::{ModelSettings, PropertyWritePolicy};
    use std::sync::Arc;
    use uamodel_core::{QualifiedName, UaValue};

    fn limit_alarm(settings: ModelSettings) -> (Arc<AddressSpace>, LimitAlarmTypeNode) {
        let space = Arc::new(AddressSpace::new().with_settings(settings));
        let id = NodeId::numeric(0, 50_000);
        space
            .add_node(
                ObjectNode::builder(id.clone(), QualifiedName::new(0, "Level"))
                    .type_definition(LimitAlarmTypeNode::TYPE_DEFINITION)
                    .build()
                    .into(),
            )
            .unwrap();
        (space.clone(), LimitAlarmTypeNode::from_graph(space, &id).unwrap())
    }

    #[test]
    fn test_high_limit_materializes() {
        let (space, alarm) = limit_alarm(ModelSettings::default());
        assert_eq!(alarm.high_limit().unwrap(), None);
        assert!(alarm.high_limit_node().is_none());

        assert_eq!(alarm.set_high_limit(10.0).unwrap(), WriteOutcome::Materialized);
        assert_eq!(alarm.high_limit().unwrap(), Some(10.0));

        let node = alarm.high_limit_node().unwrap();
        assert_eq!(node.data_type(), &NodeId::numeric(0, 11));
        assert_eq!(node.value_rank(), -1);
        assert_eq!(node.browse_name(), &QualifiedName::new(0, "HighLimit"));
        assert!(space.contains(&NodeId::string(0, "i=50000.HighLimit")));

        assert_eq!(alarm.set_high_limit(12.5).unwrap(), WriteOutcome::Updated);
        assert_eq!(alarm.high_limit().unwrap(), Some(12.5));
    }

    #[test]
    fn test_high_limit_existing_only() {
        let (_, alarm) = limit_alarm(ModelSettings::default().with_write_policy(PropertyWritePolicy::ExistingOnly));
        assert_eq!(alarm.set_high_limit(10.0).unwrap(), WriteOutcome::Absent);
        assert_eq!(alarm.high_limit().unwrap(), None);
    }

    #[test]
    fn test_rejects_array_for_scalar_limit() {
        let (_, alarm) = limit_alarm(ModelSettings::default());
        let err = alarm
            .binding()
            .set_property_variant(&properties::LOW_LIMIT, vec![1.0f64, 2.0].into_variant())
            .unwrap_err();
        assert_eq!(err.status_code(), uamodel_core::StatusCode::BAD_TYPE_MISMATCH);
        assert!(alarm.low_limit_node().is_none());
    }

    #[test]
    fn test_severities_are_independent() {
        let (_, alarm) = limit_alarm(ModelSettings::default());
        alarm.set_severity_high(700).unwrap();
        alarm.set_severity_high_high(900).unwrap();
        assert_eq!(alarm.severity_high().unwrap(), Some(700));
        assert_eq!(alarm.severity_high_high().unwrap(), Some(900));
        assert_eq!(alarm.severity_low().unwrap(), None);
        assert_eq!(alarm.severity().unwrap(), None);
    }
}
