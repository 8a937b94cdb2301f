// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `ShelvedStateMachineType` (i=2929).
//!
//! ```text
//!             TimedShelve            OneShotShelve
//!   Unshelved ───────────► TimedShelved ─────────► OneShotShelved
//!      ▲  ▲                    │                        │
//!      │  └──── Unshelve ──────┘                        │
//!      └────────────────── Unshelve ────────────────────┘
//! ```

use std::sync::Arc;

use uamodel_core::{ConversionError, LocalizedText, NodeId, PropertyError, OPC_UA_NAMESPACE_URI};

use super::TypedNode;
use crate::node::{MethodNode, ObjectNode, VariableNode};
use crate::property::WriteOutcome;

/// Property descriptors.
pub mod properties {
    use uamodel_core::data_type::value_rank::SCALAR;
    use uamodel_core::{ExpandedNodeId, NodeId, OPC_UA_NAMESPACE_URI as UA};

    use crate::property::QualifiedProperty;

    /// `UnshelveTime`: Duration.
    pub const UNSHELVE_TIME: QualifiedProperty<f64> =
        QualifiedProperty::new(UA, "UnshelveTime", ExpandedNodeId::ns0(290), SCALAR);
    /// `CurrentState.Id`: NodeId.
    pub const CURRENT_STATE_ID: QualifiedProperty<NodeId> =
        QualifiedProperty::new(UA, "Id", ExpandedNodeId::ns0(17), SCALAR);
}

method_signature! {
    /// `Unshelve`: no arguments.
    UnshelveMethod = "Unshelve";
    inputs []
    outputs []
}

method_signature! {
    /// `OneShotShelve`: no arguments.
    OneShotShelveMethod = "OneShotShelve";
    inputs []
    outputs []
}

method_signature! {
    /// `TimedShelve(ShelvingTime)`.
    TimedShelveMethod = "TimedShelve";
    inputs [
        "ShelvingTime": f64 = (
            uamodel_core::ExpandedNodeId::ns0(290),
            uamodel_core::data_type::value_rank::SCALAR,
            "If not 0, this parameter specifies a fixed time for which the Alarm is to be shelved."
        ),
    ]
    outputs []
}

/// Accessors of `ShelvedStateMachineType`.
pub trait ShelvedStateMachineType: TypedNode<Node = ObjectNode> {
    property_accessors! {
        "UnshelveTime" => properties::UNSHELVE_TIME: f64 { unshelve_time, set_unshelve_time, unshelve_time_node }
    }

    /// Returns the `CurrentState` component.
    fn current_state_node(&self) -> Option<Arc<VariableNode>> {
        self.binding().variable_component(OPC_UA_NAMESPACE_URI, "CurrentState")
    }

    /// Reads `CurrentState`.
    fn current_state(&self) -> Result<Option<LocalizedText>, ConversionError> {
        self.binding().component_value(OPC_UA_NAMESPACE_URI, "CurrentState")
    }

    /// Writes `CurrentState`.
    fn set_current_state(&self, value: LocalizedText) -> Result<WriteOutcome, PropertyError> {
        self.binding()
            .set_component_value(OPC_UA_NAMESPACE_URI, "CurrentState", value)
    }

    /// Reads the `Id` property of `CurrentState`.
    fn current_state_id(&self) -> Result<Option<NodeId>, ConversionError> {
        match self.current_state_node() {
            Some(state) => self.binding().bind(state).property(&properties::CURRENT_STATE_ID),
            None => Ok(None),
        }
    }

    /// Returns the `Unshelved` state object.
    fn unshelved_node(&self) -> Option<Arc<ObjectNode>> {
        self.binding().object_component(OPC_UA_NAMESPACE_URI, "Unshelved")
    }

    /// Returns the `TimedShelved` state object.
    fn timed_shelved_node(&self) -> Option<Arc<ObjectNode>> {
        self.binding().object_component(OPC_UA_NAMESPACE_URI, "TimedShelved")
    }

    /// Returns the `OneShotShelved` state object.
    fn one_shot_shelved_node(&self) -> Option<Arc<ObjectNode>> {
        self.binding().object_component(OPC_UA_NAMESPACE_URI, "OneShotShelved")
    }

    /// Returns the `Unshelve` method.
    fn unshelve_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<UnshelveMethod>()
    }

    /// Returns the `OneShotShelve` method.
    fn one_shot_shelve_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<OneShotShelveMethod>()
    }

    /// Returns the `TimedShelve` method.
    fn timed_shelve_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<TimedShelveMethod>()
    }
}

object_wrapper! {
    /// A `ShelvedStateMachineType` instance.
    ShelvedStateMachineTypeNode, NodeId::numeric(0, 2929)
}

impl ShelvedStateMachineType for ShelvedStateMachineTypeNode {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AddressSpace, NodeGraph};
    use crate::method::{InvocationContext, MethodHandler};
    use crate::reference_types;
    use async_trait::async_trait;
    use uamodel_core::{BoxError, MethodCallError, QualifiedName, StatusCode, UaException, Variant};

    /// Shelves for at most `max_time` milliseconds.
    struct TimedShelving {
        machine: ShelvedStateMachineTypeNode,
        max_time: f64,
    }

    #[async_trait]
    impl MethodHandler<TimedShelveMethod> for TimedShelving {
        fn validate(&self, _ctx: &InvocationContext, (time,): &(f64,)) -> Result<(), MethodCallError> {
            if *time <= 0.0 || *time > self.max_time {
                return Err(MethodCallError::InvalidArguments {
                    results: vec![StatusCode::BAD_SHELVING_TIME_OUT_OF_RANGE],
                });
            }
            Ok(())
        }

        async fn call(&self, _ctx: &InvocationContext, (time,): (f64,)) -> Result<(), BoxError> {
            if self.machine.current_state()?.map(|s| s.text) == Some("TimedShelved".into()) {
                return Err(UaException::from_status(StatusCode::BAD_CONDITION_ALREADY_SHELVED).into());
            }
            self.machine.set_current_state(LocalizedText::new("en", "TimedShelved"))?;
            self.machine.set_unshelve_time(time)?;
            Ok(())
        }
    }

    fn machine() -> (Arc<AddressSpace>, ShelvedStateMachineTypeNode) {
        let space = Arc::new(AddressSpace::new());
        let id = NodeId::string(0, "Shelving");
        space
            .add_node(ObjectNode::builder(id.clone(), QualifiedName::new(0, "ShelvingState")).build().into())
            .unwrap();
        let state = VariableNode::builder(
            NodeId::string(0, "Shelving.CurrentState"),
            QualifiedName::new(0, "CurrentState"),
        )
        .data_type(NodeId::numeric(0, 21))
        .value(uamodel_core::DataValue::new(LocalizedText::new("en", "Unshelved")))
        .build();
        space.add_child(&id, reference_types::HAS_COMPONENT, state).unwrap();
        let method = MethodNode::builder(
            NodeId::string(0, "Shelving.TimedShelve"),
            QualifiedName::new(0, "TimedShelve"),
        )
        .build();
        space.add_child(&id, reference_types::HAS_COMPONENT, method).unwrap();
        (space.clone(), ShelvedStateMachineTypeNode::from_graph(space, &id).unwrap())
    }

    #[tokio::test]
    async fn test_timed_shelve_validation_and_dispatch() {
        let (_, machine) = machine();
        assert!(machine.binding().install_method::<TimedShelveMethod, _>(TimedShelving {
            machine: machine.clone(),
            max_time: 60_000.0,
        }));
        let handler = machine.timed_shelve_method_node().unwrap().handler().unwrap();
        let ctx = InvocationContext::new(machine.node_id().clone(), NodeId::string(0, "Shelving.TimedShelve"));

        let err = handler.invoke(&ctx, &[Variant::Double(120_000.0)]).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_INVALID_ARGUMENT);
        assert_eq!(err.input_argument_results(), &[StatusCode::BAD_SHELVING_TIME_OUT_OF_RANGE]);
        assert!(!err.handler_ran());

        handler.invoke(&ctx, &[Variant::Double(30_000.0)]).await.unwrap();
        assert_eq!(machine.current_state().unwrap().unwrap().text, "TimedShelved");
        assert_eq!(machine.unshelve_time().unwrap(), Some(30_000.0));

        let err = handler.invoke(&ctx, &[Variant::Double(30_000.0)]).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_CONDITION_ALREADY_SHELVED);
    }

    #[test]
    fn test_current_state_id_and_absent_states() {
        let (_, machine) = machine();
        assert_eq!(machine.current_state_id().unwrap(), None);
        let state = machine.binding().bind(machine.current_state_node().unwrap());
        state.set_property(&properties::CURRENT_STATE_ID, NodeId::numeric(0, 2930)).unwrap();

        assert_eq!(machine.current_state_id().unwrap(), Some(NodeId::numeric(0, 2930)));
        assert!(machine.unshelved_node().is_none());
        assert!(machine.one_shot_shelve_method_node().is_none());
    }

    #[test]
    fn test_timed_shelve_arguments() {
        let (space, machine) = machine();
        machine.binding().install_method::<TimedShelveMethod, _>(TimedShelving {
            machine: machine.clone(),
            max_time: 1.0,
        });
        let handler = machine.timed_shelve_method_node().unwrap().handler().unwrap();
        let inputs = handler.input_arguments().unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].data_type, NodeId::numeric(0, 290));
        assert!(handler.output_arguments().unwrap().is_empty());
        assert_eq!(space.namespace_table().statistics().misses, 0);
    }
}
