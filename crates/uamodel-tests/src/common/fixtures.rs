// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Prebuilt address spaces with typed instances, shared by the integration
//! tests.

use std::sync::Arc;

use uamodel_core::{ByteString, DataValue, LocalizedText, NodeId, StatusCode};
use uamodel_nodes::model::alarm_condition::AlarmConditionTypeNode;
use uamodel_nodes::model::base_event::properties as event_properties;
use uamodel_nodes::model::file::{properties as file_properties, FileTypeNode};
use uamodel_nodes::model::limit_alarm::LimitAlarmTypeNode;
use uamodel_nodes::model::shelved_state_machine::ShelvedStateMachineTypeNode;
use uamodel_nodes::{AddressSpace, ModelSettings, TypedNode};

use super::builders::InstanceBuilder;

/// Namespace URI registered by every fixture, at index 1.
pub const TEST_NAMESPACE: &str = "urn:uamodel:tests";

/// Event id stamped on fixture conditions.
pub const EVENT_ID: [u8; 4] = [0xCA, 0xFE, 0x00, 0x01];

/// Returns the fixture event id as a `ByteString`.
pub fn event_id() -> ByteString {
    ByteString::from(EVENT_ID.to_vec())
}

/// Address space fixtures.
pub struct SpaceFixtures;

impl SpaceFixtures {
    /// An empty address space with the test namespace registered.
    pub fn empty() -> Arc<AddressSpace> {
        Self::with_settings(ModelSettings::default())
    }

    /// An empty address space with the given settings.
    pub fn with_settings(settings: ModelSettings) -> Arc<AddressSpace> {
        let space = AddressSpace::new().with_settings(settings);
        let ns = space
            .register_namespace(TEST_NAMESPACE)
            .expect("test namespace registers");
        assert_eq!(ns, 1);
        Arc::new(space)
    }
}

/// A graph plus a typed instance living in it.
#[derive(Debug, Clone)]
pub struct Fixture<T> {
    /// The graph.
    pub space: Arc<AddressSpace>,
    /// The instance.
    pub node: T,
}

/// Alarm fixtures.
pub struct AlarmFixtures;

impl AlarmFixtures {
    /// The object layout of a `LimitAlarmType` instance named `name`.
    ///
    /// States: enabled, unacknowledged, unconfirmed, inactive. Shelving is
    /// unshelved. Limits and severities are left for tests to materialize.
    pub fn limit_alarm_layout(name: &str) -> InstanceBuilder {
        let shelving = InstanceBuilder::new(1, "ShelvingState")
            .type_definition(ShelvedStateMachineTypeNode::TYPE_DEFINITION)
            .variable(
                "CurrentState",
                21,
                Some(DataValue::new(LocalizedText::new("en", "Unshelved"))),
            )
            .method("Unshelve")
            .method("OneShotShelve")
            .method("TimedShelve");

        InstanceBuilder::new(1, name)
            .type_definition(LimitAlarmTypeNode::TYPE_DEFINITION)
            .property(event_properties::EVENT_ID, event_id())
            .property(event_properties::SOURCE_NAME, name.to_string())
            .two_state("EnabledState", true)
            .two_state("AckedState", false)
            .two_state("ConfirmedState", false)
            .two_state("ActiveState", false)
            .variable("Quality", 19, Some(DataValue::new(StatusCode::GOOD)))
            .variable("LastSeverity", 5, Some(DataValue::new(0u16)))
            .variable("Comment", 21, None)
            .method("Enable")
            .method("Disable")
            .method("AddComment")
            .method("Acknowledge")
            .method("Confirm")
            .object(shelving)
    }

    /// A `LimitAlarmType` instance in a fresh address space.
    pub fn limit_alarm() -> Fixture<LimitAlarmTypeNode> {
        Self::limit_alarm_with(ModelSettings::default())
    }

    /// A `LimitAlarmType` instance in an address space with `settings`.
    pub fn limit_alarm_with(settings: ModelSettings) -> Fixture<LimitAlarmTypeNode> {
        let space = SpaceFixtures::with_settings(settings);
        let id = Self::limit_alarm_layout("TankLevelAlarm")
            .build(&space)
            .expect("alarm layout builds");
        let node = LimitAlarmTypeNode::from_graph(space.clone(), &id).expect("alarm binds");
        Fixture { space, node }
    }

    /// The same layout viewed as an `AlarmConditionType`.
    pub fn alarm_condition() -> Fixture<AlarmConditionTypeNode> {
        let fixture = Self::limit_alarm();
        let node = AlarmConditionTypeNode::from_graph(fixture.space.clone(), fixture.node.node_id())
            .expect("alarm binds");
        Fixture {
            space: fixture.space,
            node,
        }
    }
}

/// File fixtures.
pub struct FileFixtures;

impl FileFixtures {
    /// A `FileType` instance with all six methods.
    pub fn file() -> Fixture<FileTypeNode> {
        let space = SpaceFixtures::empty();
        let id = InstanceBuilder::new(1, "Recipe")
            .type_definition(FileTypeNode::TYPE_DEFINITION)
            .property(file_properties::WRITABLE, true)
            .property(file_properties::USER_WRITABLE, true)
            .property(file_properties::MIME_TYPE, "text/csv".to_string())
            .method("Open")
            .method("Close")
            .method("Read")
            .method("Write")
            .method("GetPosition")
            .method("SetPosition")
            .build(&space)
            .expect("file layout builds");
        let node = FileTypeNode::from_graph(space.clone(), &id).expect("file binds");
        Fixture { space, node }
    }
}

/// Node id of a component or method of a fixture instance.
pub fn child(parent: &NodeId, path: &str) -> NodeId {
    match &parent.identifier {
        uamodel_core::Identifier::String(s) => NodeId::string(parent.namespace_index, format!("{}.{}", s, path)),
        other => panic!("fixture parent has a non-string id: {:?}", other),
    }
}
