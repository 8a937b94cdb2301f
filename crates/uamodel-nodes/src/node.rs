// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Address space nodes.
//!
//! Nodes are shared through `Arc` handles. The graph owns the node set;
//! accessors and typed wrappers only hold handles. Every mutable attribute
//! sits behind its own lock, so each read or write is independently atomic.
//!
//! ```text
//!                 NodeRef (closed union)
//!     ┌─────────────┬──────┴───────┬─────────────┐
//!     ▼             ▼              ▼             ▼
//! ObjectNode   VariableNode    MethodNode     ViewNode
//!     │             │              │             │
//!     └─────────────┴── NodeBase ──┴─────────────┘
//!             (ids, names, references)
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use uamodel_core::data_type::value_rank;
use uamodel_core::{DataValue, GraphError, LocalizedText, NodeId, QualifiedName, Variant};

use crate::method::MethodInvocationHandler;
use crate::observer::{AttributeObserver, ObserverList, ValueChange};

// =============================================================================
// NodeClass & Reference
// =============================================================================

/// Node classes served by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    /// Object.
    Object,
    /// Variable.
    Variable,
    /// Method.
    Method,
    /// View.
    View,
}

impl NodeClass {
    /// Returns the OPC UA node class mask bit.
    pub const fn mask(self) -> u32 {
        match self {
            Self::Object => 1,
            Self::Variable => 2,
            Self::Method => 4,
            Self::View => 128,
        }
    }

    /// Returns the node class name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Variable => "Variable",
            Self::Method => "Method",
            Self::View => "View",
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed reference held by its source node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// The reference type.
    pub reference_type: NodeId,
    /// The node on the other end.
    pub target: NodeId,
    /// `true` for source-to-target, `false` for the inverse direction.
    pub is_forward: bool,
}

impl Reference {
    /// Creates a forward reference.
    pub fn forward(reference_type: NodeId, target: NodeId) -> Self {
        Self {
            reference_type,
            target,
            is_forward: true,
        }
    }

    /// Creates an inverse reference.
    pub fn inverse(reference_type: NodeId, target: NodeId) -> Self {
        Self {
            reference_type,
            target,
            is_forward: false,
        }
    }

    /// Returns the same reference seen from the target.
    pub fn reversed(&self, source: &NodeId) -> Self {
        Self {
            reference_type: self.reference_type.clone(),
            target: source.clone(),
            is_forward: !self.is_forward,
        }
    }
}

// =============================================================================
// NodeBase
// =============================================================================

/// Attributes shared by every node class.
pub struct NodeBase {
    node_id: NodeId,
    browse_name: QualifiedName,
    display_name: LocalizedText,
    description: Option<LocalizedText>,
    references: RwLock<Vec<Reference>>,
}

impl NodeBase {
    fn new(
        node_id: NodeId,
        browse_name: QualifiedName,
        display_name: Option<LocalizedText>,
        description: Option<LocalizedText>,
    ) -> Self {
        let display_name = display_name.unwrap_or_else(|| LocalizedText::text(browse_name.name.clone()));
        Self {
            node_id,
            browse_name,
            display_name,
            description,
            references: RwLock::new(Vec::new()),
        }
    }

    /// Returns the node id.
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Returns the browse name.
    pub fn browse_name(&self) -> &QualifiedName {
        &self.browse_name
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &LocalizedText {
        &self.display_name
    }

    /// Returns the description.
    pub fn description(&self) -> Option<&LocalizedText> {
        self.description.as_ref()
    }

    /// Returns a snapshot of the references in insertion order.
    pub fn references(&self) -> Vec<Reference> {
        self.references.read().clone()
    }

    /// Returns the targets of forward references matching `reference_filter`.
    pub fn forward_targets(&self, reference_filter: &dyn Fn(&NodeId) -> bool) -> Vec<NodeId> {
        self.references
            .read()
            .iter()
            .filter(|r| r.is_forward && reference_filter(&r.reference_type))
            .map(|r| r.target.clone())
            .collect()
    }

    /// Adds a reference. Returns `false` if an equal reference exists.
    pub fn add_reference(&self, reference: Reference) -> bool {
        let mut references = self.references.write();
        if references.contains(&reference) {
            return false;
        }
        references.push(reference);
        true
    }

    /// Removes a reference. Returns `true` if it existed.
    pub fn remove_reference(&self, reference: &Reference) -> bool {
        let mut references = self.references.write();
        let before = references.len();
        references.retain(|r| r != reference);
        before != references.len()
    }
}

impl fmt::Debug for NodeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeBase")
            .field("node_id", &self.node_id)
            .field("browse_name", &self.browse_name)
            .field("reference_count", &self.references.read().len())
            .finish()
    }
}

/// Common read access to every node class.
pub trait Node: Send + Sync + 'static {
    /// Returns the shared attributes.
    fn base(&self) -> &NodeBase;

    /// Returns the node class.
    fn node_class(&self) -> NodeClass;

    /// Returns the node id.
    fn node_id(&self) -> &NodeId {
        self.base().node_id()
    }

    /// Returns the browse name.
    fn browse_name(&self) -> &QualifiedName {
        self.base().browse_name()
    }

    /// Returns the display name.
    fn display_name(&self) -> &LocalizedText {
        self.base().display_name()
    }
}

// =============================================================================
// ObjectNode
// =============================================================================

/// An object node.
#[derive(Debug)]
pub struct ObjectNode {
    base: NodeBase,
    type_definition: NodeId,
    event_notifier: u8,
}

impl ObjectNode {
    /// Starts building an object node.
    pub fn builder(node_id: NodeId, browse_name: QualifiedName) -> ObjectNodeBuilder {
        ObjectNodeBuilder {
            node_id,
            browse_name,
            display_name: None,
            description: None,
            type_definition: NodeId::BASE_OBJECT_TYPE,
            event_notifier: 0,
        }
    }

    /// Returns the type definition.
    pub fn type_definition(&self) -> &NodeId {
        &self.type_definition
    }

    /// Returns the EventNotifier attribute.
    pub fn event_notifier(&self) -> u8 {
        self.event_notifier
    }
}

impl Node for ObjectNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn node_class(&self) -> NodeClass {
        NodeClass::Object
    }
}

/// Builder for [`ObjectNode`].
#[derive(Debug)]
pub struct ObjectNodeBuilder {
    node_id: NodeId,
    browse_name: QualifiedName,
    display_name: Option<LocalizedText>,
    description: Option<LocalizedText>,
    type_definition: NodeId,
    event_notifier: u8,
}

impl ObjectNodeBuilder {
    /// Sets the display name. Defaults to the browse name.
    pub fn display_name(mut self, display_name: impl Into<LocalizedText>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<LocalizedText>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the type definition. Defaults to BaseObjectType.
    pub fn type_definition(mut self, type_definition: NodeId) -> Self {
        self.type_definition = type_definition;
        self
    }

    /// Sets the EventNotifier attribute.
    pub fn event_notifier(mut self, event_notifier: u8) -> Self {
        self.event_notifier = event_notifier;
        self
    }

    /// Builds the node.
    pub fn build(self) -> Arc<ObjectNode> {
        Arc::new(ObjectNode {
            base: NodeBase::new(self.node_id, self.browse_name, self.display_name, self.description),
            type_definition: self.type_definition,
            event_notifier: self.event_notifier,
        })
    }
}

// =============================================================================
// VariableNode
// =============================================================================

/// A variable node holding a current [`DataValue`].
pub struct VariableNode {
    base: NodeBase,
    type_definition: NodeId,
    data_type: NodeId,
    value_rank: i32,
    array_dimensions: Option<Vec<u32>>,
    value: RwLock<DataValue>,
    /// Serializes writers; holds the last write sequence number.
    write_order: Mutex<u64>,
    observers: ObserverList,
}

impl VariableNode {
    /// Starts building a variable node.
    pub fn builder(node_id: NodeId, browse_name: QualifiedName) -> VariableNodeBuilder {
        VariableNodeBuilder {
            node_id,
            browse_name,
            display_name: None,
            description: None,
            type_definition: NodeId::BASE_DATA_VARIABLE_TYPE,
            data_type: NodeId::numeric(0, 24),
            value_rank: value_rank::SCALAR,
            array_dimensions: None,
            value: DataValue::default(),
        }
    }

    /// Returns the type definition.
    pub fn type_definition(&self) -> &NodeId {
        &self.type_definition
    }

    /// Returns the declared data type.
    pub fn data_type(&self) -> &NodeId {
        &self.data_type
    }

    /// Returns the declared value rank.
    pub fn value_rank(&self) -> i32 {
        self.value_rank
    }

    /// Returns the declared array dimensions.
    pub fn array_dimensions(&self) -> Option<&[u32]> {
        self.array_dimensions.as_deref()
    }

    /// Returns a snapshot of the current value.
    pub fn data_value(&self) -> DataValue {
        self.value.read().clone()
    }

    /// Returns a snapshot of the current variant.
    pub fn value(&self) -> Variant {
        self.value.read().value.clone()
    }

    /// Stores a new value and notifies observers.
    ///
    /// This is the only write path. Concurrent writers are serialized, and
    /// each writer's notification completes before the next writer stores,
    /// so observers see changes in write order.
    pub fn set_value(&self, value: DataValue) {
        let mut sequence = self.write_order.lock();
        *sequence += 1;

        let previous = std::mem::replace(&mut *self.value.write(), value.clone());
        self.observers.notify(&ValueChange {
            node_id: self.base.node_id.clone(),
            previous,
            value,
            sequence: *sequence,
        });
    }

    /// Returns the number of writes so far.
    pub fn write_count(&self) -> u64 {
        *self.write_order.lock()
    }

    /// Registers an observer. The node keeps only a weak handle.
    pub fn add_observer(&self, observer: &Arc<dyn AttributeObserver>) {
        self.observers.add(observer);
    }

    /// Unregisters an observer. Returns `true` if it was registered.
    pub fn remove_observer(&self, observer: &Arc<dyn AttributeObserver>) -> bool {
        self.observers.remove(observer)
    }

    /// Returns the number of live observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl Node for VariableNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn node_class(&self) -> NodeClass {
        NodeClass::Variable
    }
}

impl fmt::Debug for VariableNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableNode")
            .field("node_id", &self.base.node_id)
            .field("browse_name", &self.base.browse_name)
            .field("data_type", &self.data_type)
            .field("value_rank", &self.value_rank)
            .field("value", &*self.value.read())
            .finish()
    }
}

/// Builder for [`VariableNode`].
#[derive(Debug)]
pub struct VariableNodeBuilder {
    node_id: NodeId,
    browse_name: QualifiedName,
    display_name: Option<LocalizedText>,
    description: Option<LocalizedText>,
    type_definition: NodeId,
    data_type: NodeId,
    value_rank: i32,
    array_dimensions: Option<Vec<u32>>,
    value: DataValue,
}

impl VariableNodeBuilder {
    /// Sets the display name. Defaults to the browse name.
    pub fn display_name(mut self, display_name: impl Into<LocalizedText>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<LocalizedText>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the type definition. Defaults to BaseDataVariableType.
    pub fn type_definition(mut self, type_definition: NodeId) -> Self {
        self.type_definition = type_definition;
        self
    }

    /// Sets the data type. Defaults to BaseDataType.
    pub fn data_type(mut self, data_type: NodeId) -> Self {
        self.data_type = data_type;
        self
    }

    /// Sets the value rank. Defaults to scalar.
    pub fn value_rank(mut self, value_rank: i32) -> Self {
        self.value_rank = value_rank;
        self
    }

    /// Sets the array dimensions.
    pub fn array_dimensions(mut self, array_dimensions: Option<Vec<u32>>) -> Self {
        self.array_dimensions = array_dimensions;
        self
    }

    /// Sets the initial value.
    pub fn value(mut self, value: DataValue) -> Self {
        self.value = value;
        self
    }

    /// Builds the node.
    pub fn build(self) -> Arc<VariableNode> {
        Arc::new(VariableNode {
            base: NodeBase::new(self.node_id, self.browse_name, self.display_name, self.description),
            type_definition: self.type_definition,
            data_type: self.data_type,
            value_rank: self.value_rank,
            array_dimensions: self.array_dimensions,
            value: RwLock::new(self.value),
            write_order: Mutex::new(0),
            observers: ObserverList::default(),
        })
    }
}

// =============================================================================
// MethodNode
// =============================================================================

/// A method node, optionally bound to an invocation handler.
pub struct MethodNode {
    base: NodeBase,
    executable: AtomicBool,
    user_executable: AtomicBool,
    call_roles: RwLock<Option<Vec<NodeId>>>,
    handler: RwLock<Option<Arc<dyn MethodInvocationHandler>>>,
}

impl MethodNode {
    /// Starts building a method node.
    pub fn builder(node_id: NodeId, browse_name: QualifiedName) -> MethodNodeBuilder {
        MethodNodeBuilder {
            node_id,
            browse_name,
            display_name: None,
            description: None,
            executable: true,
            user_executable: true,
            call_roles: None,
        }
    }

    /// Returns the Executable attribute.
    pub fn executable(&self) -> bool {
        self.executable.load(Ordering::Acquire)
    }

    /// Sets the Executable attribute.
    pub fn set_executable(&self, executable: bool) {
        self.executable.store(executable, Ordering::Release);
    }

    /// Returns the UserExecutable attribute.
    pub fn user_executable(&self) -> bool {
        self.user_executable.load(Ordering::Acquire)
    }

    /// Sets the UserExecutable attribute.
    pub fn set_user_executable(&self, user_executable: bool) {
        self.user_executable.store(user_executable, Ordering::Release);
    }

    /// Returns the roles allowed to call the method, `None` meaning any.
    pub fn call_roles(&self) -> Option<Vec<NodeId>> {
        self.call_roles.read().clone()
    }

    /// Restricts calls to the given roles; `None` lifts the restriction.
    pub fn set_call_roles(&self, roles: Option<Vec<NodeId>>) {
        *self.call_roles.write() = roles;
    }

    /// Returns the installed handler.
    pub fn handler(&self) -> Option<Arc<dyn MethodInvocationHandler>> {
        self.handler.read().clone()
    }

    /// Installs a handler, replacing any previous one.
    pub fn set_handler(&self, handler: Arc<dyn MethodInvocationHandler>) {
        tracing::debug!(method = %self.base.node_id, "Method handler installed");
        *self.handler.write() = Some(handler);
    }

    /// Removes the installed handler.
    pub fn clear_handler(&self) -> Option<Arc<dyn MethodInvocationHandler>> {
        self.handler.write().take()
    }
}

impl Node for MethodNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn node_class(&self) -> NodeClass {
        NodeClass::Method
    }
}

impl fmt::Debug for MethodNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodNode")
            .field("node_id", &self.base.node_id)
            .field("browse_name", &self.base.browse_name)
            .field("executable", &self.executable())
            .field("user_executable", &self.user_executable())
            .field("has_handler", &self.handler.read().is_some())
            .finish()
    }
}

/// Builder for [`MethodNode`].
#[derive(Debug)]
pub struct MethodNodeBuilder {
    node_id: NodeId,
    browse_name: QualifiedName,
    display_name: Option<LocalizedText>,
    description: Option<LocalizedText>,
    executable: bool,
    user_executable: bool,
    call_roles: Option<Vec<NodeId>>,
}

impl MethodNodeBuilder {
    /// Sets the display name. Defaults to the browse name.
    pub fn display_name(mut self, display_name: impl Into<LocalizedText>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<LocalizedText>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the Executable attribute. Defaults to `true`.
    pub fn executable(mut self, executable: bool) -> Self {
        self.executable = executable;
        self
    }

    /// Sets the UserExecutable attribute. Defaults to `true`.
    pub fn user_executable(mut self, user_executable: bool) -> Self {
        self.user_executable = user_executable;
        self
    }

    /// Restricts calls to the given roles.
    pub fn call_roles(mut self, roles: Vec<NodeId>) -> Self {
        self.call_roles = Some(roles);
        self
    }

    /// Builds the node.
    pub fn build(self) -> Arc<MethodNode> {
        Arc::new(MethodNode {
            base: NodeBase::new(self.node_id, self.browse_name, self.display_name, self.description),
            executable: AtomicBool::new(self.executable),
            user_executable: AtomicBool::new(self.user_executable),
            call_roles: RwLock::new(self.call_roles),
            handler: RwLock::new(None),
        })
    }
}

// =============================================================================
// ViewNode
// =============================================================================

/// A view node.
#[derive(Debug)]
pub struct ViewNode {
    base: NodeBase,
    contains_no_loops: bool,
}

impl ViewNode {
    /// Creates a view node.
    pub fn new(node_id: NodeId, browse_name: QualifiedName, contains_no_loops: bool) -> Arc<Self> {
        Arc::new(Self {
            base: NodeBase::new(node_id, browse_name, None, None),
            contains_no_loops,
        })
    }

    /// Returns the ContainsNoLoops attribute.
    pub fn contains_no_loops(&self) -> bool {
        self.contains_no_loops
    }
}

impl Node for ViewNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn node_class(&self) -> NodeClass {
        NodeClass::View
    }
}

// =============================================================================
// NodeRef
// =============================================================================

/// A shared handle to a node of any class.
#[derive(Debug, Clone)]
pub enum NodeRef {
    /// Object node.
    Object(Arc<ObjectNode>),
    /// Variable node.
    Variable(Arc<VariableNode>),
    /// Method node.
    Method(Arc<MethodNode>),
    /// View node.
    View(Arc<ViewNode>),
}

impl NodeRef {
    /// Returns the shared attributes.
    pub fn base(&self) -> &NodeBase {
        match self {
            Self::Object(n) => n.base(),
            Self::Variable(n) => n.base(),
            Self::Method(n) => n.base(),
            Self::View(n) => n.base(),
        }
    }

    /// Returns the node class.
    pub fn node_class(&self) -> NodeClass {
        match self {
            Self::Object(_) => NodeClass::Object,
            Self::Variable(_) => NodeClass::Variable,
            Self::Method(_) => NodeClass::Method,
            Self::View(_) => NodeClass::View,
        }
    }

    /// Returns the node id.
    pub fn node_id(&self) -> &NodeId {
        self.base().node_id()
    }

    /// Returns the browse name.
    pub fn browse_name(&self) -> &QualifiedName {
        self.base().browse_name()
    }

    /// Returns `true` for object nodes.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns `true` for variable nodes.
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Returns `true` for method nodes.
    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method(_))
    }

    /// Returns the object node, if this is one.
    pub fn into_object(self) -> Option<Arc<ObjectNode>> {
        match self {
            Self::Object(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the variable node, if this is one.
    pub fn into_variable(self) -> Option<Arc<VariableNode>> {
        match self {
            Self::Variable(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the method node, if this is one.
    pub fn into_method(self) -> Option<Arc<MethodNode>> {
        match self {
            Self::Method(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the method node or a wrong class error.
    pub fn try_into_method(self) -> Result<Arc<MethodNode>, GraphError> {
        match self {
            Self::Method(n) => Ok(n),
            other => Err(other.wrong_class(NodeClass::Method)),
        }
    }

    /// Returns the object node or a wrong class error.
    pub fn try_into_object(self) -> Result<Arc<ObjectNode>, GraphError> {
        match self {
            Self::Object(n) => Ok(n),
            other => Err(other.wrong_class(NodeClass::Object)),
        }
    }

    /// Returns the variable node or a wrong class error.
    pub fn try_into_variable(self) -> Result<Arc<VariableNode>, GraphError> {
        match self {
            Self::Variable(n) => Ok(n),
            other => Err(other.wrong_class(NodeClass::Variable)),
        }
    }

    fn wrong_class(&self, expected: NodeClass) -> GraphError {
        GraphError::WrongNodeClass {
            node_id: self.node_id().to_string(),
            expected: expected.as_str(),
            actual: self.node_class().as_str(),
        }
    }
}

impl From<Arc<ObjectNode>> for NodeRef {
    fn from(node: Arc<ObjectNode>) -> Self {
        Self::Object(node)
    }
}

impl From<Arc<VariableNode>> for NodeRef {
    fn from(node: Arc<VariableNode>) -> Self {
        Self::Variable(node)
    }
}

impl From<Arc<MethodNode>> for NodeRef {
    fn from(node: Arc<MethodNode>) -> Self {
        Self::Method(node)
    }
}

impl From<Arc<ViewNode>> for NodeRef {
    fn from(node: Arc<ViewNode>) -> Self {
        Self::View(node)
    }
}

// =============================================================================
// Tests
// =============================================================================
