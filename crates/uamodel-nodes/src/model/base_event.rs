// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `BaseEventType` (i=2041).

use uamodel_core::{ByteString, DateTime, ExtensionObject, LocalizedText, NodeId};

use super::TypedNode;
use crate::node::ObjectNode;

/// Property descriptors.
pub mod properties {
    use uamodel_core::data_type::value_rank::SCALAR;
    use uamodel_core::{
        ByteString, DateTime, ExpandedNodeId, ExtensionObject, LocalizedText, NodeId, OPC_UA_NAMESPACE_URI as UA,
    };

    use crate::property::QualifiedProperty;

    /// `EventId`: ByteString.
    pub const EVENT_ID: QualifiedProperty<ByteString> =
        QualifiedProperty::new(UA, "EventId", ExpandedNodeId::ns0(15), SCALAR);
    /// `EventType`: NodeId.
    pub const EVENT_TYPE: QualifiedProperty<NodeId> =
        QualifiedProperty::new(UA, "EventType", ExpandedNodeId::ns0(17), SCALAR);
    /// `SourceNode`: NodeId.
    pub const SOURCE_NODE: QualifiedProperty<NodeId> =
        QualifiedProperty::new(UA, "SourceNode", ExpandedNodeId::ns0(17), SCALAR);
    /// `SourceName`: String.
    pub const SOURCE_NAME: QualifiedProperty<String> =
        QualifiedProperty::new(UA, "SourceName", ExpandedNodeId::ns0(12), SCALAR);
    /// `Time`: UtcTime.
    pub const TIME: QualifiedProperty<DateTime> = QualifiedProperty::new(UA, "Time", ExpandedNodeId::ns0(294), SCALAR);
    /// `ReceiveTime`: UtcTime.
    pub const RECEIVE_TIME: QualifiedProperty<DateTime> =
        QualifiedProperty::new(UA, "ReceiveTime", ExpandedNodeId::ns0(294), SCALAR);
    /// `LocalTime`: TimeZoneDataType.
    pub const LOCAL_TIME: QualifiedProperty<ExtensionObject> =
        QualifiedProperty::new(UA, "LocalTime", ExpandedNodeId::ns0(8912), SCALAR);
    /// `Message`: LocalizedText.
    pub const MESSAGE: QualifiedProperty<LocalizedText> =
        QualifiedProperty::new(UA, "Message", ExpandedNodeId::ns0(21), SCALAR);
    /// `Severity`: UInt16.
    pub const SEVERITY: QualifiedProperty<u16> = QualifiedProperty::new(UA, "Severity", ExpandedNodeId::ns0(5), SCALAR);
}

/// Accessors of `BaseEventType`.
pub trait BaseEventType: TypedNode<Node = ObjectNode> {
    property_accessors! {
        "EventId" => properties::EVENT_ID: ByteString { event_id, set_event_id, event_id_node }
        "EventType" => properties::EVENT_TYPE: NodeId { event_type, set_event_type, event_type_node }
        "SourceNode" => properties::SOURCE_NODE: NodeId { source_node, set_source_node, source_node_node }
        "SourceName" => properties::SOURCE_NAME: String { source_name, set_source_name, source_name_node }
        "Time" => properties::TIME: DateTime { time, set_time, time_node }
        "ReceiveTime" => properties::RECEIVE_TIME: DateTime { receive_time, set_receive_time, receive_time_node }
        "LocalTime" => properties::LOCAL_TIME: ExtensionObject { local_time, set_local_time, local_time_node }
        "Message" => properties::MESSAGE: LocalizedText { message, set_message, message_node }
        "Severity" => properties::SEVERITY: u16 { severity, set_severity, severity_node }
    }
}

object_wrapper! {
    /// A `BaseEventType` instance.
    BaseEventTypeNode, NodeId::numeric(0, 2041)
}

impl BaseEventType for BaseEventTypeNode {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AddressSpace, NodeGraph};
    use crate::settings::{ModelSettings, PropertyWritePolicy};
    use std::sync::Arc;
    use uamodel_core::{ConversionError, QualifiedName, StatusCode, Variant};

    fn event(settings: ModelSettings) -> (Arc<AddressSpace>, BaseEventTypeNode) {
        let space = Arc::new(AddressSpace::new().with_settings(settings));
        let id = NodeId::string(0, "Event");
        space
            .add_node(
                ObjectNode::builder(id.clone(), QualifiedName::new(0, "Event"))
                    .type_definition(BaseEventTypeNode::TYPE_DEFINITION)
                    .build()
                    .into(),
            )
            .unwrap();
        let node = BaseEventTypeNode::from_graph(space.clone(), &id).unwrap();
        (space, node)
    }

    #[test]
    fn test_absent_properties_read_as_none() {
        let (_, event) = event(ModelSettings::default());
        assert_eq!(event.event_id().unwrap(), None);
        assert_eq!(event.severity().unwrap(), None);
        assert!(event.message_node().is_none());
    }

    #[test]
    fn test_round_trips() {
        let (_, event) = event(ModelSettings::default());
        let now = chrono::Utc::now();

        event.set_event_id(ByteString::from(vec![1u8, 2, 3])).unwrap();
        event.set_source_node(NodeId::numeric(2, 7)).unwrap();
        event.set_time(now).unwrap();
        event.set_message(LocalizedText::new("en", "Level high")).unwrap();
        event.set_severity(800).unwrap();

        assert_eq!(event.event_id().unwrap(), Some(ByteString::from(vec![1u8, 2, 3])));
        assert_eq!(event.source_node().unwrap(), Some(NodeId::numeric(2, 7)));
        assert_eq!(event.time().unwrap(), Some(now));
        assert_eq!(event.message().unwrap().unwrap().text, "Level high");
        assert_eq!(event.severity().unwrap(), Some(800));
    }

    #[test]
    fn test_stored_value_of_wrong_type() {
        let (_, event) = event(ModelSettings::default());
        event.set_severity(100).unwrap();
        event
            .severity_node()
            .unwrap()
            .set_value(uamodel_core::DataValue::new(Variant::from("high")));

        let err = event.severity().unwrap_err();
        assert!(matches!(err, ConversionError::TypeMismatch { .. }));
        assert_eq!(err.status_code(), StatusCode::BAD_TYPE_MISMATCH);
    }

    #[test]
    fn test_existing_only_policy() {
        let (space, event) = event(ModelSettings::default().with_write_policy(PropertyWritePolicy::ExistingOnly));
        let nodes = space.len();

        assert!(!event.set_severity(500).unwrap().is_written());
        assert_eq!(event.severity().unwrap(), None);
        assert_eq!(space.len(), nodes);
        assert!(space.node(event.node_id()).is_some());
    }
}
