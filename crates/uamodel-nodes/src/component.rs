// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed component access.
//!
//! Components are the non-property children of a node, reached through
//! `HasComponent` (or a subtype) and named by namespace URI and browse name.
//! A child of the wrong node class counts as absent. Component writes never
//! create nodes.

use std::sync::Arc;

use uamodel_core::data_type;
use uamodel_core::{
    ConversionError, DataValue, NodeId, PropertyError, QualifiedName, UaValue, Variant,
};

use crate::graph::NodeGraph;
use crate::node::{MethodNode, Node, NodeRef, ObjectNode, VariableNode};
use crate::property::WriteOutcome;
use crate::reference_types;

/// Finds a child by browse name with caller-supplied filters.
///
/// Returns `None` if the namespace is not registered or no child passes.
pub fn find_node(
    graph: &dyn NodeGraph,
    node: &NodeId,
    namespace_uri: &str,
    browse_name: &str,
    kind_filter: &dyn Fn(&NodeRef) -> bool,
    reference_filter: &dyn Fn(&NodeId) -> bool,
) -> Option<NodeRef> {
    let namespace_index = graph.namespace_table().index_of(namespace_uri)?;
    let name = QualifiedName::new(namespace_index, browse_name);
    graph.find_child(node, &name, reference_filter, kind_filter)
}

/// Returns a variable component.
pub fn variable_component(
    graph: &dyn NodeGraph,
    node: &NodeId,
    namespace_uri: &str,
    browse_name: &str,
) -> Option<Arc<VariableNode>> {
    find_node(
        graph,
        node,
        namespace_uri,
        browse_name,
        &NodeRef::is_variable,
        &reference_types::is_has_component,
    )?
    .into_variable()
}

/// Returns an object component.
pub fn object_component(
    graph: &dyn NodeGraph,
    node: &NodeId,
    namespace_uri: &str,
    browse_name: &str,
) -> Option<Arc<ObjectNode>> {
    find_node(
        graph,
        node,
        namespace_uri,
        browse_name,
        &NodeRef::is_object,
        &reference_types::is_has_component,
    )?
    .into_object()
}

/// Returns a method component.
pub fn method_component(
    graph: &dyn NodeGraph,
    node: &NodeId,
    namespace_uri: &str,
    browse_name: &str,
) -> Option<Arc<MethodNode>> {
    find_node(
        graph,
        node,
        namespace_uri,
        browse_name,
        &NodeRef::is_method,
        &reference_types::is_has_component,
    )?
    .into_method()
}

/// Reads the value of a variable component.
///
/// Returns `Ok(None)` if the component does not exist or holds no value.
pub fn component_value<T: UaValue>(
    graph: &dyn NodeGraph,
    node: &NodeId,
    namespace_uri: &str,
    browse_name: &str,
) -> Result<Option<T>, ConversionError> {
    let Some(variable) = variable_component(graph, node, namespace_uri, browse_name) else {
        return Ok(None);
    };
    match variable.value() {
        Variant::Empty => Ok(None),
        value => T::from_variant(value).map(Some),
    }
}

/// Writes the value of a variable component.
///
/// An absent component yields [`WriteOutcome::Absent`].
///
/// # Errors
///
/// Fails if the value disagrees with the component's declared data type or
/// value rank.
pub fn set_component_value<T: UaValue>(
    graph: &dyn NodeGraph,
    node: &NodeId,
    namespace_uri: &str,
    browse_name: &str,
    value: T,
) -> Result<WriteOutcome, PropertyError> {
    let Some(variable) = variable_component(graph, node, namespace_uri, browse_name) else {
        tracing::trace!(
            node_id = %node,
            component = browse_name,
            "Component absent, write skipped"
        );
        return Ok(WriteOutcome::Absent);
    };

    let value = value.into_variant();
    check_against_node(&variable, &value)?;
    variable.set_value(DataValue::new(value));
    Ok(WriteOutcome::Updated)
}

/// Checks `value` against a variable's declared data type and value rank.
pub(crate) fn check_against_node(variable: &VariableNode, value: &Variant) -> Result<(), PropertyError> {
    if !data_type::rank_accepts(variable.value_rank(), value) {
        return Err(PropertyError::ShapeMismatch {
            property: variable.browse_name().name.clone(),
            value_rank: variable.value_rank(),
            actual: value.shape_name(),
        });
    }
    if let Some(actual) = value.builtin_type() {
        let structure_ok = data_type::structures_accept(variable.data_type(), value);
        if !data_type::is_assignable(variable.data_type(), actual) || !structure_ok {
            return Err(PropertyError::TypeMismatch {
                property: variable.browse_name().name.clone(),
                data_type: variable.data_type().to_string(),
                actual: actual.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AddressSpace;
    use uamodel_core::{LocalizedText, StatusCode, OPC_UA_NAMESPACE_URI};

    const PLANT: &str = "urn:test:plant";

    fn setup() -> (AddressSpace, NodeId) {
        let space = AddressSpace::new();
        let ns = space.register_namespace(PLANT).unwrap();
        let alarm = NodeId::string(ns, "Alarm");
        space
            .add_node(ObjectNode::builder(alarm.clone(), QualifiedName::new(ns, "Alarm")).build().into())
            .unwrap();

        let enabled = VariableNode::builder(
            NodeId::string(ns, "Alarm.EnabledState"),
            QualifiedName::new(0, "EnabledState"),
        )
        .data_type(NodeId::numeric(0, 21))
        .value(DataValue::new(LocalizedText::new("en", "Enabled")))
        .build();
        space.add_child(&alarm, reference_types::HAS_COMPONENT, enabled).unwrap();

        let shelving = ObjectNode::builder(
            NodeId::string(ns, "Alarm.ShelvingState"),
            QualifiedName::new(0, "ShelvingState"),
        ).build();
        space.add_child(&alarm, reference_types::HAS_COMPONENT, shelving).unwrap();

        let reset = MethodNode::builder(NodeId::string(ns, "Alarm.Reset"), QualifiedName::new(ns, "Reset")).build();
        space.add_child(&alarm, reference_types::HAS_ORDERED_COMPONENT, reset).unwrap();

        (space, alarm)
    }

    #[test]
    fn test_components_by_kind() {
        let (space, alarm) = setup();

        assert!(variable_component(&space, &alarm, OPC_UA_NAMESPACE_URI, "EnabledState").is_some());
        assert!(object_component(&space, &alarm, OPC_UA_NAMESPACE_URI, "ShelvingState").is_some());
        assert!(method_component(&space, &alarm, PLANT, "Reset").is_some());

        // wrong kind is absent, never coerced
        assert!(object_component(&space, &alarm, OPC_UA_NAMESPACE_URI, "EnabledState").is_none());
        assert!(variable_component(&space, &alarm, PLANT, "Reset").is_none());
        // wrong namespace
        assert!(method_component(&space, &alarm, OPC_UA_NAMESPACE_URI, "Reset").is_none());
        assert!(method_component(&space, &alarm, "urn:unknown", "Reset").is_none());
    }

    #[test]
    fn test_find_node_with_custom_filters() {
        let (space, alarm) = setup();
        let any = |_: &NodeRef| true;

        let found = find_node(&space, &alarm, PLANT, "Reset", &any, &reference_types::is_hierarchical);
        assert!(found.is_some_and(|n| n.is_method()));
        assert!(find_node(&space, &alarm, PLANT, "Reset", &any, &reference_types::is_has_property).is_none());
    }

    #[test]
    fn test_component_value_round_trip() {
        let (space, alarm) = setup();
        let disabled = LocalizedText::new("en", "Disabled");

        let outcome =
            set_component_value(&space, &alarm, OPC_UA_NAMESPACE_URI, "EnabledState", disabled.clone()).unwrap();
        assert_eq!(outcome, WriteOutcome::Updated);
        assert_eq!(
            component_value::<LocalizedText>(&space, &alarm, OPC_UA_NAMESPACE_URI, "EnabledState").unwrap(),
            Some(disabled)
        );
    }

    #[test]
    fn test_absent_component_never_materializes() {
        let (space, alarm) = setup();
        let before = space.len();

        let outcome = set_component_value(&space, &alarm, OPC_UA_NAMESPACE_URI, "Quality", StatusCode::GOOD).unwrap();
        assert_eq!(outcome, WriteOutcome::Absent);
        assert_eq!(space.len(), before);
        assert_eq!(
            component_value::<StatusCode>(&space, &alarm, OPC_UA_NAMESPACE_URI, "Quality").unwrap(),
            None
        );
    }

    #[test]
    fn test_component_type_checked_against_node() {
        let (space, alarm) = setup();
        let err = set_component_value(&space, &alarm, OPC_UA_NAMESPACE_URI, "EnabledState", true).unwrap_err();
        assert!(matches!(err, PropertyError::TypeMismatch { .. }));

        let err = component_value::<bool>(&space, &alarm, OPC_UA_NAMESPACE_URI, "EnabledState").unwrap_err();
        assert!(matches!(err, ConversionError::TypeMismatch { .. }));
    }
}
