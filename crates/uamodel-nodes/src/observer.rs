// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Value-change observation for variable nodes.
//!
//! Observers are registered on a [`VariableNode`](crate::node::VariableNode)
//! and held weakly: dropping the last strong handle unregisters the observer
//! on the next write. Notifications are delivered synchronously from
//! [`VariableNode::set_value`](crate::node::VariableNode::set_value), in write
//! order.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use uamodel_core::{DataValue, NodeId, QualifiedName};
//! use uamodel_nodes::node::VariableNode;
//! use uamodel_nodes::observer::{AttributeObserver, CollectingObserver};
//!
//! let node = VariableNode::builder(NodeId::numeric(1, 10), QualifiedName::new(1, "Level")).build();
//! let collector = Arc::new(CollectingObserver::new());
//! let observer: Arc<dyn AttributeObserver> = collector.clone();
//! node.add_observer(&observer);
//!
//! node.set_value(DataValue::new(1.5f64));
//! assert_eq!(collector.len(), 1);
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use uamodel_core::{DataValue, NodeId};

// =============================================================================
// Change record
// =============================================================================

/// A value written to a variable node.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    /// The node that changed.
    pub node_id: NodeId,
    /// Value before the write.
    pub previous: DataValue,
    /// Value after the write.
    pub value: DataValue,
    /// Per-node write sequence number, starting at 1.
    pub sequence: u64,
}

// =============================================================================
// Observer trait
// =============================================================================

/// Receives value changes of the variables it is registered on.
///
/// Implementations run on the writing thread while the node's write order
/// is held, so they must return quickly and must not write to the same node.
pub trait AttributeObserver: Send + Sync {
    /// Returns the observer name for logging.
    fn name(&self) -> &str {
        "anonymous"
    }

    /// Called after each write.
    fn value_changed(&self, change: &ValueChange);
}

// =============================================================================
// Built-in observers
// =============================================================================

/// Records every change it sees. Intended for tests.
pub struct CollectingObserver {
    changes: RwLock<Vec<ValueChange>>,
    max_changes: usize,
}

impl CollectingObserver {
    /// Creates a collector keeping up to 10 000 changes.
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Creates a collector keeping up to `max_changes` changes.
    pub fn with_capacity(max_changes: usize) -> Self {
        Self {
            changes: RwLock::new(Vec::new()),
            max_changes,
        }
    }

    /// Returns a copy of the recorded changes.
    pub fn changes(&self) -> Vec<ValueChange> {
        self.changes.read().clone()
    }

    /// Returns the number of recorded changes.
    pub fn len(&self) -> usize {
        self.changes.read().len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.changes.read().is_empty()
    }

    /// Forgets all recorded changes.
    pub fn clear(&self) {
        self.changes.write().clear();
    }
}

impl Default for CollectingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeObserver for CollectingObserver {
    fn name(&self) -> &str {
        "collector"
    }

    fn value_changed(&self, change: &ValueChange) {
        let mut changes = self.changes.write();
        if changes.len() >= self.max_changes {
            changes.remove(0);
        }
        changes.push(change.clone());
    }
}

/// Logs every change at `trace` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AttributeObserver for TracingObserver {
    fn name(&self) -> &str {
        "tracing"
    }

    fn value_changed(&self, change: &ValueChange) {
        tracing::trace!(
            node_id = %change.node_id,
            sequence = change.sequence,
            value = %change.value.value,
            status = %change.value.status,
            "Value changed"
        );
    }
}

/// Adapts a closure into an observer.
pub struct FnObserver<F> {
    name: String,
    f: F,
}

impl<F> FnObserver<F>
where
    F: Fn(&ValueChange) + Send + Sync,
{
    /// Creates a named closure observer.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> AttributeObserver for FnObserver<F>
where
    F: Fn(&ValueChange) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn value_changed(&self, change: &ValueChange) {
        (self.f)(change)
    }
}

// =============================================================================
// Observer list
// =============================================================================

/// Weakly held observers of one node.
#[derive(Default)]
pub(crate) struct ObserverList {
    observers: RwLock<Vec<Weak<dyn AttributeObserver>>>,
}

impl ObserverList {
    pub(crate) fn add(&self, observer: &Arc<dyn AttributeObserver>) {
        tracing::trace!(observer = observer.name(), "Observer added");
        self.observers.write().push(Arc::downgrade(observer));
    }

    /// Removes an observer by identity. Returns `true` if it was registered.
    pub(crate) fn remove(&self, observer: &Arc<dyn AttributeObserver>) -> bool {
        let target = Arc::downgrade(observer);
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|o| !Weak::ptr_eq(o, &target));
        before != observers.len()
    }

    /// Returns the number of live observers.
    pub(crate) fn len(&self) -> usize {
        self.observers
            .read()
            .iter()
            .filter(|o| o.strong_count() > 0)
            .count()
    }

    /// Notifies live observers and drops the dead ones.
    pub(crate) fn notify(&self, change: &ValueChange) {
        let live: Vec<Arc<dyn AttributeObserver>> = {
            let mut observers = self.observers.write();
            observers.retain(|o| o.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for observer in live {
            observer.value_changed(change);
        }
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("observer_count", &self.len())
            .finish()
    }
}
