// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Method handlers and a node graph wrapper for exercising the accessor layer
//! end to end.
//!
//! - [`InMemoryFile`]: the six `FileType` methods over a byte buffer
//! - [`ConditionLogic`]: Enable, Disable, AddComment, Acknowledge and Confirm
//!   over a condition instance, with a call log
//! - [`CountingGraph`]: a [`NodeGraph`] that counts node lookups

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use uamodel_core::{BoxError, ByteString, GraphError, LocalizedText, NamespaceTable, NodeId, StatusCode, UaException};
use uamodel_nodes::model::acknowledgeable_condition::{AcknowledgeMethod, AcknowledgeableConditionType, ConfirmMethod};
use uamodel_nodes::model::base_event::BaseEventType;
use uamodel_nodes::model::condition::{AddCommentMethod, ConditionType, DisableMethod, EnableMethod};
use uamodel_nodes::model::file::{
    open_mode, CloseMethod, FileType, FileTypeNode, GetPositionMethod, OpenMethod, ReadMethod, SetPositionMethod,
    WriteMethod,
};
use uamodel_nodes::model::variables::TwoStateVariableType;
use uamodel_nodes::model::TypedNode;
use uamodel_nodes::{InvocationContext, MethodHandler, ModelSettings, NodeGraph, NodeRef, Reference};

fn fail(status: StatusCode) -> BoxError {
    UaException::from_status(status).into()
}

// =============================================================================
// In-memory File
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct OpenHandle {
    mode: u8,
    position: u64,
}

#[derive(Debug, Default)]
struct FileState {
    contents: Vec<u8>,
    handles: HashMap<u32, OpenHandle>,
    next_handle: u32,
}

/// A `FileType` backed by a byte buffer.
///
/// Keeps `Size` and `OpenCount` on the file object up to date.
#[derive(Debug, Clone)]
pub struct InMemoryFile {
    node: FileTypeNode,
    state: Arc<Mutex<FileState>>,
}

impl InMemoryFile {
    /// Creates a file with initial contents.
    pub fn new(node: FileTypeNode, contents: Vec<u8>) -> Self {
        Self {
            node,
            state: Arc::new(Mutex::new(FileState {
                contents,
                handles: HashMap::new(),
                next_handle: 1,
            })),
        }
    }

    /// Installs all six methods on the file's method nodes.
    ///
    /// Returns the number of method nodes found.
    pub fn install(&self) -> Result<usize, BoxError> {
        let binding = self.node.binding();
        let installed = [
            binding.install_method::<OpenMethod, _>(self.clone()),
            binding.install_method::<CloseMethod, _>(self.clone()),
            binding.install_method::<ReadMethod, _>(self.clone()),
            binding.install_method::<WriteMethod, _>(self.clone()),
            binding.install_method::<GetPositionMethod, _>(self.clone()),
            binding.install_method::<SetPositionMethod, _>(self.clone()),
        ];
        self.publish()?;
        Ok(installed.iter().filter(|i| **i).count())
    }

    /// Returns the current contents.
    pub fn contents(&self) -> Vec<u8> {
        self.state.lock().contents.clone()
    }

    /// Returns the number of open handles.
    pub fn open_count(&self) -> usize {
        self.state.lock().handles.len()
    }

    fn publish(&self) -> Result<(), BoxError> {
        let (size, open) = {
            let state = self.state.lock();
            (state.contents.len() as u64, state.handles.len() as u16)
        };
        self.node.set_size(size)?;
        self.node.set_open_count(open)?;
        Ok(())
    }

    fn with_handle<R>(
        &self,
        handle: u32,
        f: impl FnOnce(&mut Vec<u8>, &mut OpenHandle) -> Result<R, BoxError>,
    ) -> Result<R, BoxError> {
        let mut state = self.state.lock();
        let FileState { contents, handles, .. } = &mut *state;
        let open = handles
            .get_mut(&handle)
            .ok_or_else(|| fail(StatusCode::BAD_INVALID_ARGUMENT))?;
        f(contents, open)
    }
}

#[async_trait]
impl MethodHandler<OpenMethod> for InMemoryFile {
    async fn call(&self, _ctx: &InvocationContext, (mode,): (u8,)) -> Result<(u32,), BoxError> {
        let writes = mode & open_mode::WRITE != 0;
        if mode & (open_mode::READ | open_mode::WRITE) == 0
            || (mode & (open_mode::ERASE_EXISTING | open_mode::APPEND) != 0 && !writes)
        {
            return Err(fail(StatusCode::BAD_INVALID_ARGUMENT));
        }
        let handle = {
            let mut state = self.state.lock();
            if writes && !state.handles.is_empty() {
                return Err(fail(StatusCode::BAD_NOT_WRITABLE));
            }
            if mode & open_mode::ERASE_EXISTING != 0 {
                state.contents.clear();
            }
            let position = if mode & open_mode::APPEND != 0 {
                state.contents.len() as u64
            } else {
                0
            };
            let handle = state.next_handle;
            state.next_handle += 1;
            state.handles.insert(handle, OpenHandle { mode, position });
            handle
        };
        self.publish()?;
        Ok((handle,))
    }
}

#[async_trait]
impl MethodHandler<CloseMethod> for InMemoryFile {
    async fn call(&self, _ctx: &InvocationContext, (handle,): (u32,)) -> Result<(), BoxError> {
        if self.state.lock().handles.remove(&handle).is_none() {
            return Err(fail(StatusCode::BAD_INVALID_ARGUMENT));
        }
        self.publish()
    }
}

#[async_trait]
impl MethodHandler<ReadMethod> for InMemoryFile {
    async fn call(&self, _ctx: &InvocationContext, (handle, length): (u32, i32)) -> Result<(ByteString,), BoxError> {
        if length < 0 {
            return Err(fail(StatusCode::BAD_INVALID_ARGUMENT));
        }
        self.with_handle(handle, |contents, open| {
            if open.mode & open_mode::READ == 0 {
                return Err(fail(StatusCode::BAD_INVALID_STATE));
            }
            let start = (open.position as usize).min(contents.len());
            let end = start.saturating_add(length as usize).min(contents.len());
            open.position = end as u64;
            Ok((ByteString::from(contents[start..end].to_vec()),))
        })
    }
}

#[async_trait]
impl MethodHandler<WriteMethod> for InMemoryFile {
    async fn call(&self, _ctx: &InvocationContext, (handle, data): (u32, ByteString)) -> Result<(), BoxError> {
        self.with_handle(handle, |contents, open| {
            if open.mode & open_mode::WRITE == 0 {
                return Err(fail(StatusCode::BAD_INVALID_STATE));
            }
            let start = open.position as usize;
            let end = start + data.0.len();
            if contents.len() < end {
                contents.resize(end, 0);
            }
            contents[start..end].copy_from_slice(&data.0);
            open.position = end as u64;
            Ok(())
        })?;
        self.publish()
    }
}

#[async_trait]
impl MethodHandler<GetPositionMethod> for InMemoryFile {
    async fn call(&self, _ctx: &InvocationContext, (handle,): (u32,)) -> Result<(u64,), BoxError> {
        self.with_handle(handle, |_, open| Ok((open.position,)))
    }
}

#[async_trait]
impl MethodHandler<SetPositionMethod> for InMemoryFile {
    async fn call(&self, _ctx: &InvocationContext, (handle, position): (u32, u64)) -> Result<(), BoxError> {
        self.with_handle(handle, |contents, open| {
            open.position = position.min(contents.len() as u64);
            Ok(())
        })
    }
}

// =============================================================================
// Condition logic
// =============================================================================

/// A method call seen by [`ConditionLogic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Browse name of the method.
    pub method: &'static str,
    /// Calling identity, `None` without a session.
    pub user: Option<String>,
}

/// Enable, Disable, AddComment, Acknowledge and Confirm state transitions.
///
/// Event ids are checked against the condition's current `EventId`.
#[derive(Debug, Clone)]
pub struct ConditionLogic<N> {
    condition: N,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl<N> ConditionLogic<N>
where
    N: AcknowledgeableConditionType + Clone + 'static,
{
    /// Wraps a condition instance.
    pub fn new(condition: N) -> Self {
        Self {
            condition,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Installs the five handlers. Returns the number of method nodes found.
    pub fn install(&self) -> usize {
        let binding = self.condition.binding();
        [
            binding.install_method::<EnableMethod, _>(self.clone()),
            binding.install_method::<DisableMethod, _>(self.clone()),
            binding.install_method::<AddCommentMethod, _>(self.clone()),
            binding.install_method::<AcknowledgeMethod, _>(self.clone()),
            binding.install_method::<ConfirmMethod, _>(self.clone()),
        ]
        .iter()
        .filter(|i| **i)
        .count()
    }

    /// Returns the calls seen so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    fn record(&self, method: &'static str, ctx: &InvocationContext) {
        self.calls.lock().push(RecordedCall {
            method,
            user: ctx.session().map(|s| s.identity.to_string()),
        });
    }

    fn set_enabled(&self, enabled: bool) -> Result<(), BoxError> {
        let state = self
            .condition
            .enabled_state_node()
            .ok_or_else(|| fail(StatusCode::BAD_INVALID_STATE))?;
        if state.id()? == Some(enabled) {
            return Err(fail(if enabled {
                StatusCode::BAD_CONDITION_ALREADY_ENABLED
            } else {
                StatusCode::BAD_CONDITION_ALREADY_DISABLED
            }));
        }
        state.set_state(enabled)?;
        self.condition.set_retain(enabled)?;
        Ok(())
    }

    fn check_event(&self, event_id: &ByteString) -> Result<(), BoxError> {
        if let Some(state) = self.condition.enabled_state_node() {
            if state.id()? == Some(false) {
                return Err(fail(StatusCode::BAD_CONDITION_DISABLED));
            }
        }
        if self.condition.event_id()?.as_ref() != Some(event_id) {
            return Err(fail(StatusCode::BAD_EVENT_ID_UNKNOWN));
        }
        Ok(())
    }

    fn comment(&self, ctx: &InvocationContext, comment: LocalizedText) -> Result<(), BoxError> {
        self.condition.set_comment(comment)?;
        if let Some(session) = ctx.session() {
            self.condition.set_client_user_id(session.identity.to_string())?;
        }
        Ok(())
    }
}

#[async_trait]
impl<N> MethodHandler<EnableMethod> for ConditionLogic<N>
where
    N: AcknowledgeableConditionType + Clone + 'static,
{
    async fn call(&self, ctx: &InvocationContext, _inputs: ()) -> Result<(), BoxError> {
        self.record("Enable", ctx);
        self.set_enabled(true)
    }
}

#[async_trait]
impl<N> MethodHandler<DisableMethod> for ConditionLogic<N>
where
    N: AcknowledgeableConditionType + Clone + 'static,
{
    async fn call(&self, ctx: &InvocationContext, _inputs: ()) -> Result<(), BoxError> {
        self.record("Disable", ctx);
        self.set_enabled(false)
    }
}

#[async_trait]
impl<N> MethodHandler<AddCommentMethod> for ConditionLogic<N>
where
    N: AcknowledgeableConditionType + Clone + 'static,
{
    async fn call(
        &self,
        ctx: &InvocationContext,
        (event_id, comment): (ByteString, LocalizedText),
    ) -> Result<(), BoxError> {
        self.record("AddComment", ctx);
        self.check_event(&event_id)?;
        self.comment(ctx, comment)
    }
}

#[async_trait]
impl<N> MethodHandler<AcknowledgeMethod> for ConditionLogic<N>
where
    N: AcknowledgeableConditionType + Clone + 'static,
{
    async fn call(
        &self,
        ctx: &InvocationContext,
        (event_id, comment): (ByteString, LocalizedText),
    ) -> Result<(), BoxError> {
        self.record("Acknowledge", ctx);
        self.check_event(&event_id)?;
        let acked = self
            .condition
            .acked_state_node()
            .ok_or_else(|| fail(StatusCode::BAD_INVALID_STATE))?;
        if acked.id()? == Some(true) {
            return Err(fail(StatusCode::BAD_CONDITION_BRANCH_ALREADY_ACKED));
        }
        acked.set_state(true)?;
        self.comment(ctx, comment)
    }
}

#[async_trait]
impl<N> MethodHandler<ConfirmMethod> for ConditionLogic<N>
where
    N: AcknowledgeableConditionType + Clone + 'static,
{
    async fn call(
        &self,
        ctx: &InvocationContext,
        (event_id, comment): (ByteString, LocalizedText),
    ) -> Result<(), BoxError> {
        self.record("Confirm", ctx);
        self.check_event(&event_id)?;
        let confirmed = self
            .condition
            .confirmed_state_node()
            .ok_or_else(|| fail(StatusCode::BAD_INVALID_STATE))?;
        if confirmed.id()? == Some(true) {
            return Err(fail(StatusCode::BAD_CONDITION_BRANCH_ALREADY_CONFIRMED));
        }
        confirmed.set_state(true)?;
        self.comment(ctx, comment)
    }
}

// =============================================================================
// Counting graph
// =============================================================================

/// A [`NodeGraph`] delegating to another graph and counting node lookups.
pub struct CountingGraph<G> {
    inner: G,
    lookups: AtomicU64,
}

impl<G: NodeGraph> CountingGraph<G> {
    /// Wraps `inner`.
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            lookups: AtomicU64::new(0),
        }
    }

    /// Returns the wrapped graph.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Returns the number of `node` calls so far.
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl<G: NodeGraph> NodeGraph for CountingGraph<G> {
    fn node(&self, node_id: &NodeId) -> Option<NodeRef> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.inner.node(node_id)
    }

    fn namespace_table(&self) -> &Arc<NamespaceTable> {
        self.inner.namespace_table()
    }

    fn add_node(&self, node: NodeRef) -> Result<(), GraphError> {
        self.inner.add_node(node)
    }

    fn add_reference(&self, source: &NodeId, reference: Reference) -> Result<(), GraphError> {
        self.inner.add_reference(source, reference)
    }

    fn insert_child(&self, parent: &NodeId, reference_type: NodeId, child: NodeRef) -> Result<(), GraphError> {
        self.inner.insert_child(parent, reference_type, child)
    }

    fn settings(&self) -> ModelSettings {
        self.inner.settings()
    }
}
