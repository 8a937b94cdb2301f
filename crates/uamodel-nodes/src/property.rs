// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed property access.
//!
//! A [`QualifiedProperty`] names an optional property child of a node by
//! namespace URI and browse name, and fixes the Rust type its value converts
//! to. Descriptors are declared once as `const` items:
//!
//! ```
//! use uamodel_core::types::{ExpandedNodeId, OPC_UA_NAMESPACE_URI};
//! use uamodel_core::data_type::value_rank;
//! use uamodel_nodes::property::QualifiedProperty;
//!
//! const HIGH_LIMIT: QualifiedProperty<f64> = QualifiedProperty::new(
//!     OPC_UA_NAMESPACE_URI,
//!     "HighLimit",
//!     ExpandedNodeId::ns0(11),
//!     value_rank::SCALAR,
//! );
//! assert_eq!(HIGH_LIMIT.browse_name(), "HighLimit");
//! ```
//!
//! A value rank that disagrees with the declared type does not compile:
//!
//! ```compile_fail
//! use uamodel_core::types::{ExpandedNodeId, OPC_UA_NAMESPACE_URI};
//! use uamodel_nodes::property::QualifiedProperty;
//!
//! const BROKEN: QualifiedProperty<f64> =
//!     QualifiedProperty::new(OPC_UA_NAMESPACE_URI, "HighLimit", ExpandedNodeId::ns0(11), 1);
//! let _ = BROKEN;
//! ```
//!
//! # Lookup and writes
//!
//! ```text
//! property(node, d)      forward HasProperty refs of node
//!                        └─ browse name == (index_of(d.uri), d.name)
//!                           ├─ absent            -> Ok(None)
//!                           ├─ Empty value       -> Ok(None)
//!                           └─ value             -> T::from_variant
//!
//! set_property(node, d)  check rank and data type
//!                        ├─ present             -> set_value       Updated
//!                        └─ absent
//!                           ├─ Materialize       -> create node     Materialized
//!                           └─ ExistingOnly      -> untouched       Absent
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use uamodel_core::data_type;
use uamodel_core::{
    ConversionError, DataValue, ExpandedNodeId, GraphError, Identifier, NamespaceError, NamespaceTable, NodeId,
    PropertyError, QualifiedName, UaValue, Variant,
};

use crate::graph::NodeGraph;
use crate::node::{NodeRef, VariableNode};
use crate::reference_types;
use crate::settings::PropertyWritePolicy;

// =============================================================================
// QualifiedProperty
// =============================================================================

/// Static key of an optional, typed property.
///
/// Equality and hashing use `(namespace_uri, browse_name)` only.
pub struct QualifiedProperty<T> {
    namespace_uri: &'static str,
    browse_name: &'static str,
    data_type: ExpandedNodeId,
    value_rank: i32,
    _type: PhantomData<fn() -> T>,
}

impl<T: UaValue> QualifiedProperty<T> {
    /// Creates a descriptor.
    ///
    /// # Panics
    ///
    /// Panics if `value_rank` does not admit the shape of `T`. In a `const`
    /// item this is a compile error.
    pub const fn new(
        namespace_uri: &'static str,
        browse_name: &'static str,
        data_type: ExpandedNodeId,
        value_rank: i32,
    ) -> Self {
        assert!(
            T::SHAPE.accepts_rank(value_rank),
            "value rank does not admit the shape of the declared type"
        );
        Self {
            namespace_uri,
            browse_name,
            data_type,
            value_rank,
            _type: PhantomData,
        }
    }
}

impl<T> QualifiedProperty<T> {
    /// Returns the namespace URI of the browse name.
    pub const fn namespace_uri(&self) -> &'static str {
        self.namespace_uri
    }

    /// Returns the browse name.
    pub const fn browse_name(&self) -> &'static str {
        self.browse_name
    }

    /// Returns the declared data type.
    pub const fn data_type(&self) -> &ExpandedNodeId {
        &self.data_type
    }

    /// Returns the declared value rank.
    pub const fn value_rank(&self) -> i32 {
        self.value_rank
    }

    /// Returns the array dimensions implied by the value rank.
    pub fn array_dimensions(&self) -> Option<Vec<u32>> {
        (self.value_rank > 0).then(|| vec![0; self.value_rank as usize])
    }

    /// Resolves the browse name, `None` if the namespace is not registered.
    pub fn qualified_name(&self, namespaces: &NamespaceTable) -> Option<QualifiedName> {
        namespaces
            .index_of(self.namespace_uri)
            .map(|index| QualifiedName::new(index, self.browse_name))
    }
}

impl<T> Clone for QualifiedProperty<T> {
    fn clone(&self) -> Self {
        Self {
            namespace_uri: self.namespace_uri,
            browse_name: self.browse_name,
            data_type: self.data_type.clone(),
            value_rank: self.value_rank,
            _type: PhantomData,
        }
    }
}

impl<T> PartialEq for QualifiedProperty<T> {
    fn eq(&self, other: &Self) -> bool {
        self.namespace_uri == other.namespace_uri && self.browse_name == other.browse_name
    }
}

impl<T> Eq for QualifiedProperty<T> {}

impl<T> Hash for QualifiedProperty<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace_uri.hash(state);
        self.browse_name.hash(state);
    }
}

impl<T> fmt::Debug for QualifiedProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QualifiedProperty")
            .field("namespace_uri", &self.namespace_uri)
            .field("browse_name", &self.browse_name)
            .field("data_type", &self.data_type)
            .field("value_rank", &self.value_rank)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

// =============================================================================
// WriteOutcome
// =============================================================================

/// Result of a successful property or component write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOutcome {
    /// An existing node was written.
    Updated,
    /// The property node was created with the value.
    Materialized,
    /// No node exists and none was created; nothing was written.
    Absent,
}

impl WriteOutcome {
    /// Returns `true` if the value was stored.
    pub fn is_written(self) -> bool {
        !matches!(self, Self::Absent)
    }
}

// =============================================================================
// Access
// =============================================================================

/// Returns the property node of `node` named by `descriptor`.
pub fn property_node<T>(
    graph: &dyn NodeGraph,
    node: &NodeId,
    descriptor: &QualifiedProperty<T>,
) -> Option<Arc<VariableNode>> {
    let browse_name = descriptor.qualified_name(graph.namespace_table())?;
    graph
        .find_child(node, &browse_name, &reference_types::is_has_property, &NodeRef::is_variable)?
        .into_variable()
}

/// Reads a property.
///
/// Returns `Ok(None)` if the property does not exist or holds no value.
///
/// # Errors
///
/// Fails if the stored value's type or shape disagrees with `T`.
pub fn property<T: UaValue>(
    graph: &dyn NodeGraph,
    node: &NodeId,
    descriptor: &QualifiedProperty<T>,
) -> Result<Option<T>, ConversionError> {
    let Some(variable) = property_node(graph, node, descriptor) else {
        return Ok(None);
    };
    match variable.value() {
        Variant::Empty => Ok(None),
        value => T::from_variant(value).map(Some),
    }
}

/// Writes a property, materializing it if absent and the graph's policy
/// allows.
pub fn set_property<T: UaValue>(
    graph: &dyn NodeGraph,
    node: &NodeId,
    descriptor: &QualifiedProperty<T>,
    value: T,
) -> Result<WriteOutcome, PropertyError> {
    set_property_variant(graph, node, descriptor, value.into_variant())
}

/// Writes a raw variant to a property.
///
/// # Errors
///
/// Fails with [`PropertyError::ShapeMismatch`] or
/// [`PropertyError::TypeMismatch`] if the value disagrees with the
/// descriptor; nothing is written then.
pub fn set_property_variant<T>(
    graph: &dyn NodeGraph,
    node: &NodeId,
    descriptor: &QualifiedProperty<T>,
    value: Variant,
) -> Result<WriteOutcome, PropertyError> {
    let data_type = check_value(graph, descriptor, &value)?;

    if let Some(variable) = property_node(graph, node, descriptor) {
        variable.set_value(DataValue::new(value));
        return Ok(WriteOutcome::Updated);
    }

    match graph.settings().write_policy {
        PropertyWritePolicy::ExistingOnly => {
            tracing::trace!(
                node_id = %node,
                property = descriptor.browse_name,
                "Property absent, write skipped"
            );
            Ok(WriteOutcome::Absent)
        }
        PropertyWritePolicy::Materialize => {
            match create_property_node(graph, node, descriptor, data_type, value.clone()) {
                Ok(_) => Ok(WriteOutcome::Materialized),
                // Another writer may have created the property between lookup
                // and insert. Only a HasProperty child of `node` is written.
                Err(PropertyError::Graph(GraphError::NodeExists { .. })) => {
                    let variable = property_node(graph, node, descriptor)
                        .ok_or_else(|| GraphError::node_exists(&property_node_id(node, descriptor)))?;
                    variable.set_value(DataValue::new(value));
                    Ok(WriteOutcome::Updated)
                }
                Err(e) => Err(e),
            }
        }
    }
}

/// Creates a property node holding `value` under `parent`.
pub(crate) fn materialize<T>(
    graph: &dyn NodeGraph,
    parent: &NodeId,
    descriptor: &QualifiedProperty<T>,
    value: Variant,
) -> Result<Arc<VariableNode>, PropertyError> {
    let data_type = check_value(graph, descriptor, &value)?;
    create_property_node(graph, parent, descriptor, data_type, value)
}

/// Returns the id a materialized property receives, a string id in the
/// parent's namespace.
///
/// String parents give `<parent>.<name>`. Other identifier types keep their
/// prefix, so `i=7` gives `i=7.<name>` and cannot meet the children of `s=7`.
pub fn property_node_id<T>(parent: &NodeId, descriptor: &QualifiedProperty<T>) -> NodeId {
    let prefix = match &parent.identifier {
        Identifier::String(s) => s.clone(),
        other => other.to_string(),
    };
    NodeId::string(parent.namespace_index, format!("{}.{}", prefix, descriptor.browse_name))
}

fn check_value<T>(
    graph: &dyn NodeGraph,
    descriptor: &QualifiedProperty<T>,
    value: &Variant,
) -> Result<NodeId, PropertyError> {
    if !data_type::rank_accepts(descriptor.value_rank, value) {
        return Err(PropertyError::ShapeMismatch {
            property: descriptor.browse_name.to_string(),
            value_rank: descriptor.value_rank,
            actual: value.shape_name(),
        });
    }

    let data_type = descriptor.data_type.to_node_id(graph.namespace_table())?;
    if let Some(actual) = value.builtin_type() {
        if !data_type::is_assignable(&data_type, actual) || !data_type::structures_accept(&data_type, value) {
            return Err(PropertyError::TypeMismatch {
                property: descriptor.browse_name.to_string(),
                data_type: data_type.to_string(),
                actual: actual.to_string(),
            });
        }
    }
    Ok(data_type)
}

fn create_property_node<T>(
    graph: &dyn NodeGraph,
    parent: &NodeId,
    descriptor: &QualifiedProperty<T>,
    data_type: NodeId,
    value: Variant,
) -> Result<Arc<VariableNode>, PropertyError> {
    if graph.node(parent).is_none() {
        return Err(GraphError::node_not_found(parent).into());
    }
    let namespace_index = graph
        .namespace_table()
        .index_of(descriptor.namespace_uri)
        .ok_or_else(|| NamespaceError::unknown_uri(descriptor.namespace_uri))?;

    let node_id = property_node_id(parent, descriptor);
    let variable = VariableNode::builder(
        node_id.clone(),
        QualifiedName::new(namespace_index, descriptor.browse_name),
    )
    .type_definition(NodeId::PROPERTY_TYPE)
    .data_type(data_type)
    .value_rank(descriptor.value_rank)
    .array_dimensions(descriptor.array_dimensions())
    .value(DataValue::new(value))
    .build();

    graph.insert_child(parent, reference_types::HAS_PROPERTY, NodeRef::Variable(variable.clone()))?;

    tracing::debug!(
        parent = %parent,
        property = descriptor.browse_name,
        node_id = %node_id,
        "Property materialized"
    );
    Ok(variable)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AddressSpace;
    use crate::node::{Node, ObjectNode};
    use crate::settings::ModelSettings;
    use std::collections::HashSet;
    use uamodel_core::data_type::value_rank;
    use uamodel_core::{LocalizedText, OPC_UA_NAMESPACE_URI};

    const HIGH_LIMIT: QualifiedProperty<f64> = QualifiedProperty::new(
        OPC_UA_NAMESPACE_URI,
        "HighLimit",
        ExpandedNodeId::ns0(11),
        value_rank::SCALAR,
    );

    const SUB_CLASSES: QualifiedProperty<Vec<LocalizedText>> = QualifiedProperty::new(
        OPC_UA_NAMESPACE_URI,
        "ConditionSubClassName",
        ExpandedNodeId::ns0(21),
        value_rank::ONE_DIMENSION,
    );

    const VENDOR: QualifiedProperty<String> = QualifiedProperty::new(
        "urn:vendor:not-registered",
        "Serial",
        ExpandedNodeId::ns0(12),
        value_rank::SCALAR,
    );

    fn setup(settings: ModelSettings) -> (AddressSpace, NodeId) {
        let space = AddressSpace::new().with_settings(settings);
        let ns = space.register_namespace("urn:test:plant").unwrap();
        let alarm_id = NodeId::string(ns, "Boiler.Alarm");
        space
            .add_node(ObjectNode::builder(alarm_id.clone(), QualifiedName::new(ns, "Alarm")).build().into())
            .unwrap();
        (space, alarm_id)
    }

    // =========================================================================
    // Descriptor
    // =========================================================================

    #[test]
    fn test_descriptor_identity() {
        let same_key: QualifiedProperty<f64> = QualifiedProperty::new(
            OPC_UA_NAMESPACE_URI,
            "HighLimit",
            ExpandedNodeId::ns0(290),
            value_rank::ANY,
        );
        assert_eq!(HIGH_LIMIT, same_key);

        let mut set = HashSet::new();
        set.insert(HIGH_LIMIT.clone());
        assert!(set.contains(&same_key));
        assert_eq!(SUB_CLASSES.array_dimensions(), Some(vec![0]));
        assert_eq!(HIGH_LIMIT.array_dimensions(), None);
    }

    #[test]
    #[should_panic(expected = "value rank")]
    fn test_descriptor_rank_disagreement_panics_at_runtime() {
        let _ = QualifiedProperty::<Vec<f64>>::new(
            OPC_UA_NAMESPACE_URI,
            "Limits",
            ExpandedNodeId::ns0(11),
            value_rank::SCALAR,
        );
    }

    // =========================================================================
    // Read
    // =========================================================================

    #[test]
    fn test_absent_property() {
        let (space, alarm) = setup(ModelSettings::default());
        assert_eq!(property(&space, &alarm, &HIGH_LIMIT).unwrap(), None);
        assert!(property_node(&space, &alarm, &HIGH_LIMIT).is_none());
    }

    #[test]
    fn test_unregistered_namespace_is_absent() {
        let (space, alarm) = setup(ModelSettings::default());
        assert_eq!(property(&space, &alarm, &VENDOR).unwrap(), None);
    }

    #[test]
    fn test_empty_value_reads_as_none() {
        let (space, alarm) = setup(ModelSettings::default());
        set_property_variant(&space, &alarm, &HIGH_LIMIT, Variant::Empty).unwrap();
        assert!(property_node(&space, &alarm, &HIGH_LIMIT).is_some());
        assert_eq!(property(&space, &alarm, &HIGH_LIMIT).unwrap(), None);
    }

    #[test]
    fn test_wrong_stored_type_is_conversion_error() {
        let (space, alarm) = setup(ModelSettings::default());
        set_property(&space, &alarm, &HIGH_LIMIT, 1.0).unwrap();
        property_node(&space, &alarm, &HIGH_LIMIT)
            .unwrap()
            .set_value(DataValue::new("high"));

        let err = property(&space, &alarm, &HIGH_LIMIT).unwrap_err();
        assert!(matches!(err, ConversionError::TypeMismatch { .. }));
    }

    // =========================================================================
    // Write
    // =========================================================================

    #[test]
    fn test_materialize_then_update() {
        let (space, alarm) = setup(ModelSettings::default());

        assert_eq!(set_property(&space, &alarm, &HIGH_LIMIT, 10.0).unwrap(), WriteOutcome::Materialized);
        assert_eq!(property(&space, &alarm, &HIGH_LIMIT).unwrap(), Some(10.0));
        assert_eq!(set_property(&space, &alarm, &HIGH_LIMIT, 12.5).unwrap(), WriteOutcome::Updated);
        assert_eq!(property(&space, &alarm, &HIGH_LIMIT).unwrap(), Some(12.5));

        let node = property_node(&space, &alarm, &HIGH_LIMIT).unwrap();
        assert_eq!(node.node_id(), &NodeId::string(alarm.namespace_index, "Boiler.Alarm.HighLimit"));
        assert_eq!(node.browse_name(), &QualifiedName::new(0, "HighLimit"));
        assert_eq!(node.type_definition(), &NodeId::PROPERTY_TYPE);
        assert_eq!(node.data_type(), &NodeId::numeric(0, 11));
    }

    #[test]
    fn test_existing_only_leaves_graph_untouched() {
        let (space, alarm) = setup(ModelSettings::default().with_write_policy(PropertyWritePolicy::ExistingOnly));
        let before = space.len();

        assert_eq!(set_property(&space, &alarm, &HIGH_LIMIT, 10.0).unwrap(), WriteOutcome::Absent);
        assert_eq!(property(&space, &alarm, &HIGH_LIMIT).unwrap(), None);
        assert_eq!(space.len(), before);
    }

    #[test]
    fn test_array_round_trip() {
        let (space, alarm) = setup(ModelSettings::default());
        let names = vec![LocalizedText::new("en", "Low"), LocalizedText::new("en", "High")];

        set_property(&space, &alarm, &SUB_CLASSES, names.clone()).unwrap();
        assert_eq!(property(&space, &alarm, &SUB_CLASSES).unwrap(), Some(names));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let (space, alarm) = setup(ModelSettings::default());
        let array = vec![1.0f64, 2.0].into_variant();

        let err = set_property_variant(&space, &alarm, &HIGH_LIMIT, array).unwrap_err();
        assert!(matches!(err, PropertyError::ShapeMismatch { value_rank: -1, .. }));
        assert!(property_node(&space, &alarm, &HIGH_LIMIT).is_none());
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let (space, alarm) = setup(ModelSettings::default());
        let err = set_property_variant(&space, &alarm, &HIGH_LIMIT, Variant::from("ten")).unwrap_err();
        assert!(matches!(err, PropertyError::TypeMismatch { .. }));
        assert_eq!(err.status_code(), uamodel_core::StatusCode::BAD_TYPE_MISMATCH);
    }

    #[test]
    fn test_materialize_needs_registered_namespace() {
        let (space, alarm) = setup(ModelSettings::default());
        let err = set_property(&space, &alarm, &VENDOR, "SN-1".to_string()).unwrap_err();
        assert!(matches!(err, PropertyError::Namespace(NamespaceError::UnknownUri { .. })));
    }

    #[test]
    fn test_materialize_on_missing_parent() {
        let (space, _) = setup(ModelSettings::default());
        let err = set_property(&space, &NodeId::numeric(1, 404), &HIGH_LIMIT, 1.0).unwrap_err();
        assert!(matches!(err, PropertyError::Graph(GraphError::NodeNotFound { .. })));
    }

    #[test]
    fn test_parents_with_different_identifier_types_stay_apart() {
        let (space, _) = setup(ModelSettings::default());
        let numeric = NodeId::numeric(1, 7);
        let string = NodeId::string(1, "7");
        for id in [&numeric, &string] {
            let object = ObjectNode::builder(id.clone(), QualifiedName::new(1, "Pump")).build();
            space.add_node(object.into()).unwrap();
        }

        assert_eq!(set_property(&space, &numeric, &HIGH_LIMIT, 1.0).unwrap(), WriteOutcome::Materialized);
        assert_eq!(set_property(&space, &string, &HIGH_LIMIT, 99.0).unwrap(), WriteOutcome::Materialized);

        assert_eq!(property(&space, &numeric, &HIGH_LIMIT).unwrap(), Some(1.0));
        assert_eq!(property(&space, &string, &HIGH_LIMIT).unwrap(), Some(99.0));
        assert_eq!(property_node_id(&numeric, &HIGH_LIMIT), NodeId::string(1, "i=7.HighLimit"));
        assert_eq!(property_node_id(&string, &HIGH_LIMIT), NodeId::string(1, "7.HighLimit"));
    }

    #[test]
    fn test_materialize_never_writes_a_foreign_node() {
        let (space, alarm) = setup(ModelSettings::default());
        let taken = property_node_id(&alarm, &HIGH_LIMIT);
        let foreign = VariableNode::builder(taken.clone(), QualifiedName::new(1, "Unrelated"))
            .value(DataValue::new(5.0))
            .build();
        space.add_node(foreign.clone().into()).unwrap();

        let err = set_property(&space, &alarm, &HIGH_LIMIT, 10.0).unwrap_err();
        assert!(matches!(err, PropertyError::Graph(GraphError::NodeExists { .. })));
        assert_eq!(foreign.value(), Variant::Double(5.0));
        assert_eq!(property(&space, &alarm, &HIGH_LIMIT).unwrap(), None);
    }

    #[test]
    fn test_concurrent_materialization() {
        let (space, alarm) = setup(ModelSettings::default());
        let space = Arc::new(space);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let space = space.clone();
                let alarm = alarm.clone();
                std::thread::spawn(move || set_property(&*space, &alarm, &HIGH_LIMIT, i as f64).unwrap())
            })
            .collect();
        let outcomes: Vec<WriteOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(outcomes.iter().filter(|o| **o == WriteOutcome::Materialized).count(), 1);
        assert_eq!(space.references(&alarm).len(), 1);
        assert!(property(&*space, &alarm, &HIGH_LIMIT).unwrap().is_some());
    }
}
