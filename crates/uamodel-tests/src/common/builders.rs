// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! Builders for object instances with their components, so tests can lay
//! out the part of a type they exercise and nothing more.
//!
//! Child node ids are derived from the parent path: a component `AckedState`
//! of `Tank` gets `ns=<ns>;s=Tank.AckedState`. Component browse names are in
//! the standard namespace, as for instances of standard types.

use std::fmt;

use uamodel_core::{BoxError, DataValue, NodeId, QualifiedName, UaValue};
use uamodel_nodes::model::variables::properties as variable_properties;
use uamodel_nodes::{reference_types, AddressSpace, MethodNode, NodeGraph, ObjectNode, QualifiedProperty, VariableNode};

type ChildFn = Box<dyn FnOnce(&AddressSpace, &NodeId, &str) -> Result<(), BoxError> + Send>;

// =============================================================================
// InstanceBuilder
// =============================================================================

/// Builds an object node and its children in an [`AddressSpace`].
pub struct InstanceBuilder {
    namespace: u16,
    name: String,
    type_definition: NodeId,
    children: Vec<ChildFn>,
}

impl InstanceBuilder {
    /// Starts an object named `name` in namespace `namespace`.
    pub fn new(namespace: u16, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
            type_definition: NodeId::numeric(0, 58),
            children: Vec::new(),
        }
    }

    /// Sets the type definition.
    pub fn type_definition(mut self, type_definition: NodeId) -> Self {
        self.type_definition = type_definition;
        self
    }

    /// Adds a HasProperty child with an initial value.
    pub fn property<T: UaValue + Send + 'static>(mut self, descriptor: QualifiedProperty<T>, value: T) -> Self {
        self.children.push(Box::new(move |space, parent, _| {
            space.add_property(parent, &descriptor, value)?;
            Ok(())
        }));
        self
    }

    /// Adds a variable component.
    pub fn variable(mut self, name: &str, data_type: u32, value: Option<DataValue>) -> Self {
        let name = name.to_string();
        let ns = self.namespace;
        self.children.push(Box::new(move |space, parent, path| {
            let mut builder = VariableNode::builder(child_id(ns, path, &name), QualifiedName::new(0, name.as_str()))
                .data_type(NodeId::numeric(0, data_type));
            if let Some(value) = value {
                builder = builder.value(value);
            }
            space.add_child(parent, reference_types::HAS_COMPONENT, builder.build())?;
            Ok(())
        }));
        self
    }

    /// Adds a `TwoStateVariableType` component with its `Id` property.
    pub fn two_state(mut self, name: &str, state: bool) -> Self {
        let name = name.to_string();
        let ns = self.namespace;
        self.children.push(Box::new(move |space, parent, path| {
            let id = child_id(ns, path, &name);
            let text = uamodel_core::LocalizedText::new("en", if state { "True" } else { "False" });
            let variable = VariableNode::builder(id.clone(), QualifiedName::new(0, name.as_str()))
                .type_definition(NodeId::numeric(0, 8995))
                .data_type(NodeId::numeric(0, 21))
                .value(DataValue::new(text))
                .build();
            space.add_child(parent, reference_types::HAS_COMPONENT, variable)?;
            space.add_property(&id, &variable_properties::ID, state)?;
            Ok(())
        }));
        self
    }

    /// Adds an executable method component.
    pub fn method(self, name: &str) -> Self {
        self.method_with(name, |builder| builder)
    }

    /// Adds a method component, letting the caller adjust its attributes.
    pub fn method_with<F>(mut self, name: &str, configure: F) -> Self
    where
        F: FnOnce(uamodel_nodes::node::MethodNodeBuilder) -> uamodel_nodes::node::MethodNodeBuilder + Send + 'static,
    {
        let name = name.to_string();
        let ns = self.namespace;
        self.children.push(Box::new(move |space, parent, path| {
            let builder = MethodNode::builder(child_id(ns, path, &name), QualifiedName::new(0, name.as_str()));
            space.add_child(parent, reference_types::HAS_COMPONENT, configure(builder).build())?;
            Ok(())
        }));
        self
    }

    /// Adds an object component built by `child`.
    pub fn object(mut self, child: InstanceBuilder) -> Self {
        self.children.push(Box::new(move |space, parent, path| {
            child.build_under(space, Some(parent), path)?;
            Ok(())
        }));
        self
    }

    /// Adds the object and its children as a root node.
    pub fn build(self, space: &AddressSpace) -> Result<NodeId, BoxError> {
        self.build_under(space, None, "")
    }

    fn build_under(self, space: &AddressSpace, parent: Option<&NodeId>, parent_path: &str) -> Result<NodeId, BoxError> {
        let path = if parent_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", parent_path, self.name)
        };
        let node_id = NodeId::string(self.namespace, path.as_str());
        let browse_namespace = if parent.is_some() { 0 } else { self.namespace };
        let object = ObjectNode::builder(node_id.clone(), QualifiedName::new(browse_namespace, self.name.as_str()))
            .type_definition(self.type_definition)
            .build();

        match parent {
            Some(parent) => space.add_child(parent, reference_types::HAS_COMPONENT, object)?,
            None => space.add_node(object.into())?,
        }
        for child in self.children {
            child(space, &node_id, &path)?;
        }
        Ok(node_id)
    }
}

impl fmt::Debug for InstanceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceBuilder")
            .field("name", &self.name)
            .field("type_definition", &self.type_definition)
            .field("children", &self.children.len())
            .finish()
    }
}

fn child_id(namespace: u16, parent_path: &str, name: &str) -> NodeId {
    NodeId::string(namespace, format!("{}.{}", parent_path, name))
}
