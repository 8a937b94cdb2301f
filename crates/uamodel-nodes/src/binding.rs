// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! A node handle paired with the graph it lives in.
//!
//! Typed wrappers hold a [`Binding`] and route every accessor through it.
//! The binding owns neither the node set nor the node; it shares both.

use std::fmt;
use std::sync::Arc;

use uamodel_core::{ConversionError, NodeId, PropertyError, UaValue, Variant};

use crate::component;
use crate::graph::NodeGraph;
use crate::method::{MethodHandler, MethodInvoker, MethodSignature};
use crate::node::{MethodNode, Node, ObjectNode, VariableNode};
use crate::property::{self, QualifiedProperty, WriteOutcome};

/// Shared handle to a node of kind `N` and its graph.
pub struct Binding<N: Node> {
    graph: Arc<dyn NodeGraph>,
    node: Arc<N>,
}

impl<N: Node> Binding<N> {
    /// Binds `node` to `graph`.
    pub fn new(graph: Arc<dyn NodeGraph>, node: Arc<N>) -> Self {
        Self { graph, node }
    }

    /// Returns the graph.
    pub fn graph(&self) -> &Arc<dyn NodeGraph> {
        &self.graph
    }

    /// Returns the node.
    pub fn node(&self) -> &Arc<N> {
        &self.node
    }

    /// Returns the node id.
    pub fn node_id(&self) -> &NodeId {
        self.node.node_id()
    }

    /// Binds another node to the same graph.
    pub fn bind<M: Node>(&self, node: Arc<M>) -> Binding<M> {
        Binding::new(self.graph.clone(), node)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Reads a property. See [`property::property`].
    pub fn property<T: UaValue>(&self, descriptor: &QualifiedProperty<T>) -> Result<Option<T>, ConversionError> {
        property::property(&*self.graph, self.node_id(), descriptor)
    }

    /// Writes a property. See [`property::set_property`].
    pub fn set_property<T: UaValue>(
        &self,
        descriptor: &QualifiedProperty<T>,
        value: T,
    ) -> Result<WriteOutcome, PropertyError> {
        property::set_property(&*self.graph, self.node_id(), descriptor, value)
    }

    /// Writes a raw variant to a property.
    pub fn set_property_variant<T>(
        &self,
        descriptor: &QualifiedProperty<T>,
        value: Variant,
    ) -> Result<WriteOutcome, PropertyError> {
        property::set_property_variant(&*self.graph, self.node_id(), descriptor, value)
    }

    /// Returns a property node.
    pub fn property_node<T>(&self, descriptor: &QualifiedProperty<T>) -> Option<Arc<VariableNode>> {
        property::property_node(&*self.graph, self.node_id(), descriptor)
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Returns a variable component.
    pub fn variable_component(&self, namespace_uri: &str, browse_name: &str) -> Option<Arc<VariableNode>> {
        component::variable_component(&*self.graph, self.node_id(), namespace_uri, browse_name)
    }

    /// Returns an object component.
    pub fn object_component(&self, namespace_uri: &str, browse_name: &str) -> Option<Arc<ObjectNode>> {
        component::object_component(&*self.graph, self.node_id(), namespace_uri, browse_name)
    }

    /// Returns a method component.
    pub fn method_component(&self, namespace_uri: &str, browse_name: &str) -> Option<Arc<MethodNode>> {
        component::method_component(&*self.graph, self.node_id(), namespace_uri, browse_name)
    }

    /// Reads a variable component's value.
    pub fn component_value<T: UaValue>(
        &self,
        namespace_uri: &str,
        browse_name: &str,
    ) -> Result<Option<T>, ConversionError> {
        component::component_value(&*self.graph, self.node_id(), namespace_uri, browse_name)
    }

    /// Writes a variable component's value; never materializes.
    pub fn set_component_value<T: UaValue>(
        &self,
        namespace_uri: &str,
        browse_name: &str,
        value: T,
    ) -> Result<WriteOutcome, PropertyError> {
        component::set_component_value(&*self.graph, self.node_id(), namespace_uri, browse_name, value)
    }

    // =========================================================================
    // Methods
    // =========================================================================

    /// Returns the method component declared by `M`.
    pub fn method_node<M: MethodSignature>(&self) -> Option<Arc<MethodNode>> {
        self.method_component(M::NAMESPACE_URI, M::BROWSE_NAME)
    }

    /// Installs `handler` on the method component declared by `M`.
    ///
    /// Returns `false` if the node has no such method.
    pub fn install_method<M, H>(&self, handler: H) -> bool
    where
        M: MethodSignature,
        H: MethodHandler<M>,
    {
        let Some(method) = self.method_node::<M>() else {
            tracing::debug!(
                node_id = %self.node_id(),
                method = M::BROWSE_NAME,
                "Method component absent, handler not installed"
            );
            return false;
        };
        let invoker = MethodInvoker::<M, H>::new(self.graph.namespace_table().clone(), handler);
        method.set_handler(Arc::new(invoker));
        true
    }
}

impl<N: Node> Clone for Binding<N> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            node: self.node.clone(),
        }
    }
}

impl<N: Node> fmt::Debug for Binding<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("node_id", self.node_id())
            .field("node_class", &self.node.node_class())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AddressSpace;
    use crate::method::handler_fn;
    use crate::model::condition::EnableMethod;
    use crate::reference_types;
    use uamodel_core::data_type::value_rank;
    use uamodel_core::{BoxError, ExpandedNodeId, QualifiedName, OPC_UA_NAMESPACE_URI};

    const SEVERITY: QualifiedProperty<u16> =
        QualifiedProperty::new(OPC_UA_NAMESPACE_URI, "Severity", ExpandedNodeId::ns0(5), value_rank::SCALAR);

    fn bound_object() -> (Arc<AddressSpace>, Binding<ObjectNode>) {
        let space = Arc::new(AddressSpace::new());
        let object = ObjectNode::builder(NodeId::numeric(0, 9000), QualifiedName::new(0, "Condition")).build();
        space.add_node(object.clone().into()).unwrap();
        let graph: Arc<dyn NodeGraph> = space.clone();
        (space, Binding::new(graph, object))
    }

    #[test]
    fn test_property_access_through_binding() {
        let (_, binding) = bound_object();
        assert_eq!(binding.property(&SEVERITY).unwrap(), None);

        assert_eq!(binding.set_property(&SEVERITY, 500).unwrap(), WriteOutcome::Materialized);
        assert_eq!(binding.property(&SEVERITY).unwrap(), Some(500));
        assert!(binding.property_node(&SEVERITY).is_some());
    }

    #[test]
    fn test_install_method() {
        let (space, binding) = bound_object();
        let handler = || handler_fn::<EnableMethod, _, _>(|_, ()| async move { Ok::<_, BoxError>(()) });
        assert!(!binding.install_method::<EnableMethod, _>(handler()));

        let method = MethodNode::builder(NodeId::numeric(0, 9001), QualifiedName::new(0, "Enable")).build();
        space
            .add_child(binding.node_id(), reference_types::HAS_COMPONENT, method.clone())
            .unwrap();

        assert!(binding.install_method::<EnableMethod, _>(handler()));
        assert_eq!(method.handler().unwrap().method_name(), "Enable");
        assert!(Arc::ptr_eq(&binding.method_node::<EnableMethod>().unwrap(), &method));
    }

    #[test]
    fn test_bind_shares_graph() {
        let (space, binding) = bound_object();
        let variable = VariableNode::builder(NodeId::numeric(0, 9002), QualifiedName::new(0, "Quality")).build();
        space
            .add_child(binding.node_id(), reference_types::HAS_COMPONENT, variable.clone())
            .unwrap();

        let child = binding.bind(binding.variable_component(OPC_UA_NAMESPACE_URI, "Quality").unwrap());
        assert!(Arc::ptr_eq(child.graph(), binding.graph()));
        assert_eq!(child.node_id(), variable.node_id());
    }
}
