// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The node graph seam and its in-memory implementation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      NodeGraph (trait)                          │
//! │     node / find_child / add_node / add_reference / namespaces   │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        AddressSpace                             │
//! │       HashMap<NodeId, NodeRef> + NamespaceTable + settings      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Property, component and method access only go through [`NodeGraph`],
//! so a server may plug in its own node storage.
//!
//! # Examples
//!
//! ```
//! use uamodel_core::{NodeId, QualifiedName};
//! use uamodel_nodes::graph::{AddressSpace, NodeGraph};
//! use uamodel_nodes::node::{NodeRef, ObjectNode, VariableNode};
//! use uamodel_nodes::reference_types;
//!
//! let space = AddressSpace::new();
//! let ns = space.register_namespace("urn:example:plant").unwrap();
//!
//! let tank = ObjectNode::builder(NodeId::string(ns, "Tank"), QualifiedName::new(ns, "Tank")).build();
//! let level = VariableNode::builder(NodeId::string(ns, "Tank.Level"), QualifiedName::new(ns, "Level")).build();
//! space.add_node(tank.into()).unwrap();
//! space.add_child(&NodeId::string(ns, "Tank"), reference_types::HAS_COMPONENT, level).unwrap();
//!
//! let found = space.find_child(
//!     &NodeId::string(ns, "Tank"),
//!     &QualifiedName::new(ns, "Level"),
//!     &reference_types::is_has_component,
//!     &NodeRef::is_variable,
//! );
//! assert!(found.is_some());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use uamodel_core::{GraphError, NamespaceError, NamespaceTable, NodeId, PropertyError, QualifiedName, UaValue};

use crate::node::{NodeRef, Reference, VariableNode};
use crate::property::{self, QualifiedProperty};
use crate::settings::ModelSettings;

// =============================================================================
// NodeGraph
// =============================================================================

/// Access to a node graph.
///
/// Implementations must be safe to share between threads; every method is an
/// independent, atomic operation.
pub trait NodeGraph: Send + Sync {
    /// Returns the node with the given id.
    fn node(&self, node_id: &NodeId) -> Option<NodeRef>;

    /// Returns the server's namespace table.
    fn namespace_table(&self) -> &Arc<NamespaceTable>;

    /// Adds a node.
    ///
    /// # Errors
    ///
    /// Fails with [`GraphError::NodeExists`] if the id is taken.
    fn add_node(&self, node: NodeRef) -> Result<(), GraphError>;

    /// Adds a reference from `source`, plus its inverse on the target.
    ///
    /// # Errors
    ///
    /// Fails with [`GraphError::NodeNotFound`] if either end is missing.
    fn add_reference(&self, source: &NodeId, reference: Reference) -> Result<(), GraphError>;

    /// Adds `child` and a forward `reference_type` reference from `parent`
    /// to it.
    ///
    /// The default runs [`add_node`](Self::add_node) then
    /// [`add_reference`](Self::add_reference). Implementations that can
    /// should make the pair atomic, so the child is never visible without
    /// its parent link.
    ///
    /// # Errors
    ///
    /// Fails with [`GraphError::NodeNotFound`] if `parent` is missing and
    /// with [`GraphError::NodeExists`] if the child id is taken.
    fn insert_child(&self, parent: &NodeId, reference_type: NodeId, child: NodeRef) -> Result<(), GraphError> {
        if self.node(parent).is_none() {
            return Err(GraphError::node_not_found(parent));
        }
        let child_id = child.node_id().clone();
        self.add_node(child)?;
        self.add_reference(parent, Reference::forward(reference_type, child_id))
    }

    /// Returns the accessor settings of this graph.
    fn settings(&self) -> ModelSettings {
        ModelSettings::default()
    }

    /// Returns the references of a node, empty if the node does not exist.
    fn references(&self, node_id: &NodeId) -> Vec<Reference> {
        self.node(node_id)
            .map(|n| n.base().references())
            .unwrap_or_default()
    }

    /// Finds a child of `parent` by browse name.
    ///
    /// Only forward references whose type passes `reference_filter` are
    /// followed, and the first target with a matching browse name that
    /// passes `kind_filter` is returned.
    fn find_child(
        &self,
        parent: &NodeId,
        browse_name: &QualifiedName,
        reference_filter: &dyn Fn(&NodeId) -> bool,
        kind_filter: &dyn Fn(&NodeRef) -> bool,
    ) -> Option<NodeRef> {
        let parent = self.node(parent)?;
        parent
            .base()
            .forward_targets(reference_filter)
            .iter()
            .filter_map(|target| self.node(target))
            .find(|child| child.browse_name() == browse_name && kind_filter(child))
    }
}

// =============================================================================
// GraphStatistics
// =============================================================================

/// Counters of an [`AddressSpace`].
#[derive(Debug, Default)]
pub struct GraphStatistics {
    /// Node lookups.
    pub lookups: AtomicU64,
    /// Lookups of ids with no node.
    pub misses: AtomicU64,
    /// Nodes added.
    pub nodes_added: AtomicU64,
    /// Nodes removed.
    pub nodes_removed: AtomicU64,
    /// Forward references added.
    pub references_added: AtomicU64,
}

impl GraphStatistics {
    /// Creates zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    fn record_lookup(&self, hit: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if !hit {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_node_added(&self) {
        self.nodes_added.fetch_add(1, Ordering::Relaxed);
    }

    fn record_node_removed(&self) {
        self.nodes_removed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_reference_added(&self) {
        self.references_added.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the fraction of lookups that found a node.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.lookups.load(Ordering::Relaxed);
        if lookups == 0 {
            return 0.0;
        }
        let misses = self.misses.load(Ordering::Relaxed);
        (lookups - misses) as f64 / lookups as f64
    }
}

// =============================================================================
// AddressSpace
// =============================================================================

/// In-memory [`NodeGraph`].
pub struct AddressSpace {
    nodes: RwLock<HashMap<NodeId, NodeRef>>,
    namespaces: Arc<NamespaceTable>,
    settings: ModelSettings,
    stats: GraphStatistics,
}

impl AddressSpace {
    /// Creates an empty address space with only the standard namespace.
    pub fn new() -> Self {
        Self::with_namespaces(Arc::new(NamespaceTable::new()))
    }

    /// Creates an empty address space over an existing namespace table.
    pub fn with_namespaces(namespaces: Arc<NamespaceTable>) -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            namespaces,
            settings: ModelSettings::default(),
            stats: GraphStatistics::new(),
        }
    }

    /// Sets the accessor settings.
    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Registers a namespace URI and returns its index.
    pub fn register_namespace(&self, uri: impl Into<String>) -> Result<u16, NamespaceError> {
        self.namespaces.try_register(uri)
    }

    /// Adds `child` and a `reference_type` reference from `parent` to it.
    pub fn add_child(
        &self,
        parent: &NodeId,
        reference_type: NodeId,
        child: impl Into<NodeRef>,
    ) -> Result<(), GraphError> {
        self.insert_child(parent, reference_type, child.into())
    }

    /// Adds a property with an initial value, named after its descriptor.
    pub fn add_property<T: UaValue>(
        &self,
        parent: &NodeId,
        descriptor: &QualifiedProperty<T>,
        value: T,
    ) -> Result<Arc<VariableNode>, PropertyError> {
        property::materialize(self, parent, descriptor, value.into_variant())
    }

    /// Removes a node and the inverse references other nodes hold to it.
    pub fn remove_node(&self, node_id: &NodeId) -> Option<NodeRef> {
        let removed = self.nodes.write().remove(node_id)?;
        for reference in removed.base().references() {
            if let Some(target) = self.nodes.read().get(&reference.target) {
                target.base().remove_reference(&reference.reversed(node_id));
            }
        }
        self.stats.record_node_removed();
        tracing::debug!(node_id = %node_id, "Node removed");
        Some(removed)
    }

    /// Returns `true` if a node with the id exists.
    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.nodes.read().contains_key(node_id)
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// Returns `true` if the address space holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    /// Returns the statistics.
    pub fn stats(&self) -> &GraphStatistics {
        &self.stats
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressSpace")
            .field("node_count", &self.len())
            .field("namespaces", &self.namespaces.uris())
            .field("settings", &self.settings)
            .finish()
    }
}

impl NodeGraph for AddressSpace {
    fn node(&self, node_id: &NodeId) -> Option<NodeRef> {
        let node = self.nodes.read().get(node_id).cloned();
        self.stats.record_lookup(node.is_some());
        node
    }

    fn namespace_table(&self) -> &Arc<NamespaceTable> {
        &self.namespaces
    }

    fn add_node(&self, node: NodeRef) -> Result<(), GraphError> {
        let mut nodes = self.nodes.write();
        let node_id = node.node_id().clone();
        if nodes.contains_key(&node_id) {
            return Err(GraphError::node_exists(&node_id));
        }
        tracing::trace!(node_id = %node_id, class = %node.node_class(), "Node added");
        nodes.insert(node_id, node);
        self.stats.record_node_added();
        Ok(())
    }

    fn add_reference(&self, source: &NodeId, reference: Reference) -> Result<(), GraphError> {
        let nodes = self.nodes.read();
        let source_node = nodes.get(source).ok_or_else(|| GraphError::node_not_found(source))?;
        let target_node = nodes
            .get(&reference.target)
            .ok_or_else(|| GraphError::node_not_found(&reference.target))?;

        target_node.base().add_reference(reference.reversed(source));
        if source_node.base().add_reference(reference) {
            self.stats.record_reference_added();
        }
        Ok(())
    }

    fn insert_child(&self, parent: &NodeId, reference_type: NodeId, child: NodeRef) -> Result<(), GraphError> {
        let mut nodes = self.nodes.write();
        let parent_node = nodes.get(parent).ok_or_else(|| GraphError::node_not_found(parent))?.clone();
        let child_id = child.node_id().clone();
        if nodes.contains_key(&child_id) {
            return Err(GraphError::node_exists(&child_id));
        }

        let reference = Reference::forward(reference_type, child_id.clone());
        child.base().add_reference(reference.reversed(parent));
        parent_node.base().add_reference(reference);
        tracing::trace!(parent = %parent, node_id = %child_id, class = %child.node_class(), "Child added");
        nodes.insert(child_id, child);

        self.stats.record_node_added();
        self.stats.record_reference_added();
        Ok(())
    }

    fn settings(&self) -> ModelSettings {
        self.settings
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{MethodNode, ObjectNode};
    use crate::reference_types;

    fn space_with_tank() -> (AddressSpace, u16, NodeId) {
        let space = AddressSpace::new();
        let ns = space.register_namespace("urn:test").unwrap();
        let tank_id = NodeId::string(ns, "Tank");
        space
            .add_node(ObjectNode::builder(tank_id.clone(), QualifiedName::new(ns, "Tank")).build().into())
            .unwrap();
        (space, ns, tank_id)
    }

    #[test]
    fn test_add_node_rejects_duplicates() {
        let (space, ns, tank_id) = space_with_tank();
        let again = ObjectNode::builder(tank_id, QualifiedName::new(ns, "Tank")).build();
        let err = space.add_node(again.into()).unwrap_err();
        assert!(matches!(err, GraphError::NodeExists { .. }));
        assert_eq!(space.len(), 1);
    }

    #[test]
    fn test_add_reference_adds_inverse() {
        let (space, ns, tank_id) = space_with_tank();
        let reset_id = NodeId::string(ns, "Tank.Reset");
        let reset = MethodNode::builder(reset_id.clone(), QualifiedName::new(ns, "Reset")).build();
        space.add_child(&tank_id, reference_types::HAS_COMPONENT, reset).unwrap();

        let inverse = space.references(&reset_id);
        assert_eq!(inverse.len(), 1);
        assert!(!inverse[0].is_forward);
        assert_eq!(inverse[0].target, tank_id);
    }

    #[test]
    fn test_add_reference_to_missing_target() {
        let (space, ns, tank_id) = space_with_tank();
        let err = space
            .add_reference(&tank_id, Reference::forward(reference_types::ORGANIZES, NodeId::numeric(ns, 99)))
            .unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound { .. }));
    }

    #[test]
    fn test_insert_child_is_all_or_nothing() {
        let (space, ns, tank_id) = space_with_tank();
        let reset = |name: &str| MethodNode::builder(NodeId::string(ns, name), QualifiedName::new(ns, "Reset")).build();

        let err = space
            .insert_child(&NodeId::numeric(ns, 404), reference_types::HAS_COMPONENT, reset("Orphan").into())
            .unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound { .. }));
        assert_eq!(space.len(), 1);

        space
            .insert_child(&tank_id, reference_types::HAS_COMPONENT, reset("Tank.Reset").into())
            .unwrap();
        let err = space
            .insert_child(&tank_id, reference_types::HAS_PROPERTY, reset("Tank.Reset").into())
            .unwrap_err();
        assert!(matches!(err, GraphError::NodeExists { .. }));
        assert_eq!(space.references(&tank_id).len(), 1);
        assert_eq!(space.stats().references_added.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_find_child_filters() {
        let (space, ns, tank_id) = space_with_tank();
        let reset = MethodNode::builder(NodeId::string(ns, "Tank.Reset"), QualifiedName::new(ns, "Reset")).build();
        space.add_child(&tank_id, reference_types::HAS_COMPONENT, reset).unwrap();
        let name = QualifiedName::new(ns, "Reset");

        let any = |_: &NodeRef| true;
        assert!(space
            .find_child(&tank_id, &name, &reference_types::is_has_component, &NodeRef::is_method)
            .is_some());
        assert!(space
            .find_child(&tank_id, &name, &reference_types::is_has_component, &NodeRef::is_variable)
            .is_none());
        assert!(space
            .find_child(&tank_id, &name, &reference_types::is_has_property, &any)
            .is_none());
        assert!(space
            .find_child(&tank_id, &QualifiedName::new(0, "Reset"), &reference_types::is_has_component, &any)
            .is_none());
    }

    #[test]
    fn test_remove_node_cleans_inverse_references() {
        let (space, ns, tank_id) = space_with_tank();
        let reset_id = NodeId::string(ns, "Tank.Reset");
        let reset = MethodNode::builder(reset_id.clone(), QualifiedName::new(ns, "Reset")).build();
        space.add_child(&tank_id, reference_types::HAS_COMPONENT, reset).unwrap();

        assert!(space.remove_node(&reset_id).is_some());
        assert!(space.references(&tank_id).is_empty());
        assert!(space.remove_node(&reset_id).is_none());
    }

    #[test]
    fn test_statistics() {
        let (space, ns, tank_id) = space_with_tank();
        space.node(&tank_id);
        space.node(&NodeId::numeric(ns, 404));

        assert_eq!(space.stats().lookups.load(Ordering::Relaxed), 2);
        assert_eq!(space.stats().misses.load(Ordering::Relaxed), 1);
        assert!((space.stats().hit_rate() - 0.5).abs() < f64::EPSILON);
        assert_eq!(space.stats().nodes_added.load(Ordering::Relaxed), 1);
    }
}
