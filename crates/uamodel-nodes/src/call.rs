// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Call service adapter.
//!
//! Turns a protocol-level call request into a dispatch on the method node's
//! installed handler and maps every failure to a status code.
//!
//! | Failure                                   | Status                   |
//! |-------------------------------------------|--------------------------|
//! | object id unknown                         | `Bad_NodeIdUnknown`      |
//! | object id is not an object                | `Bad_NodeIdInvalid`      |
//! | method unknown, not a method, or not a component of the object | `Bad_MethodInvalid` |
//! | Executable is false                       | `Bad_NotExecutable`      |
//! | UserExecutable false or role not granted  | `Bad_UserAccessDenied`   |
//! | no handler installed                      | `Bad_NotImplemented`     |
//! | too few / too many inputs                 | `Bad_ArgumentsMissing` / `Bad_TooManyArguments` |
//! | wrong input data type or value rank       | `Bad_InvalidArgument`, per argument `Bad_TypeMismatch` |
//! | handler returned a `UaException`          | its status               |
//! | handler returned any other error          | `Bad_UnexpectedError`    |
//!
//! Call roles, when set on a method, are always enforced. A call without a
//! session, or from a session holding no roles, is denied.

use std::sync::Arc;

use uamodel_core::{MethodCallError, NodeId, StatusCode, Variant};

use crate::graph::NodeGraph;
use crate::method::{InvocationContext, MethodInvocationHandler, SessionInfo};
use crate::node::{MethodNode, NodeRef};
use crate::reference_types;

/// One method call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallMethodRequest {
    /// Object or object type the method is called on.
    pub object_id: NodeId,
    /// The method.
    pub method_id: NodeId,
    /// Input values.
    pub input_arguments: Vec<Variant>,
}

impl CallMethodRequest {
    /// Creates a request.
    pub fn new(object_id: NodeId, method_id: NodeId, input_arguments: Vec<Variant>) -> Self {
        Self {
            object_id,
            method_id,
            input_arguments,
        }
    }
}

/// Outcome of one method call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallMethodResult {
    /// Overall status.
    pub status_code: StatusCode,
    /// Per-input results; only filled for `Bad_InvalidArgument`.
    pub input_argument_results: Vec<StatusCode>,
    /// Output values; empty unless the call succeeded.
    pub output_arguments: Vec<Variant>,
}

impl CallMethodResult {
    /// A successful result.
    pub fn good(output_arguments: Vec<Variant>) -> Self {
        Self {
            status_code: StatusCode::GOOD,
            input_argument_results: Vec::new(),
            output_arguments,
        }
    }

    /// A failed result without per-argument detail.
    pub fn bad(status_code: StatusCode) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }

    /// A failed result built from an invocation error.
    pub fn from_error(error: &MethodCallError) -> Self {
        Self {
            status_code: error.status_code(),
            input_argument_results: error.input_argument_results().to_vec(),
            output_arguments: Vec::new(),
        }
    }
}

/// Executes one method call.
pub async fn call_method(
    graph: &dyn NodeGraph,
    request: CallMethodRequest,
    session: Option<&SessionInfo>,
) -> CallMethodResult {
    let handler = match resolve(graph, &request, session) {
        Ok(handler) => handler,
        Err(status_code) => {
            tracing::debug!(
                object_id = %request.object_id,
                method_id = %request.method_id,
                status = %status_code,
                "Call rejected"
            );
            return CallMethodResult::bad(status_code);
        }
    };

    let mut ctx = InvocationContext::new(request.object_id, request.method_id);
    if let Some(session) = session {
        ctx = ctx.with_session(session.clone());
    }

    match handler.invoke(&ctx, &request.input_arguments).await {
        Ok(outputs) => CallMethodResult::good(outputs),
        Err(error) => {
            if !error.handler_ran() {
                error.log(handler.method_name());
            }
            CallMethodResult::from_error(&error)
        }
    }
}

/// Executes calls in order.
pub async fn call(
    graph: &dyn NodeGraph,
    requests: Vec<CallMethodRequest>,
    session: Option<&SessionInfo>,
) -> Vec<CallMethodResult> {
    let mut results = Vec::with_capacity(requests.len());
    for request in requests {
        results.push(call_method(graph, request, session).await);
    }
    results
}

fn resolve(
    graph: &dyn NodeGraph,
    request: &CallMethodRequest,
    session: Option<&SessionInfo>,
) -> Result<Arc<dyn MethodInvocationHandler>, StatusCode> {
    match graph.node(&request.object_id) {
        None => return Err(StatusCode::BAD_NODE_ID_UNKNOWN),
        Some(NodeRef::Object(_)) => {}
        Some(NodeRef::Variable(_) | NodeRef::Method(_) | NodeRef::View(_)) => {
            return Err(StatusCode::BAD_NODE_ID_INVALID)
        }
    }

    let method = graph
        .node(&request.method_id)
        .ok_or(StatusCode::BAD_METHOD_INVALID)?
        .try_into_method()
        .map_err(|e| e.status_code())?;

    let is_component = graph
        .references(&request.object_id)
        .iter()
        .any(|r| r.is_forward && r.target == request.method_id && reference_types::is_has_component(&r.reference_type));
    if !is_component {
        return Err(StatusCode::BAD_METHOD_INVALID);
    }

    if graph.settings().check_executable {
        check_executable(&method, session).map_err(|e| {
            e.log(&request.method_id.to_string());
            e.status_code()
        })?;
    }

    method.handler().ok_or(StatusCode::BAD_NOT_IMPLEMENTED)
}

fn check_executable(method: &MethodNode, session: Option<&SessionInfo>) -> Result<(), MethodCallError> {
    if !method.executable() {
        return Err(MethodCallError::NotExecutable {
            status: StatusCode::BAD_NOT_EXECUTABLE,
        });
    }
    if !method.user_executable() {
        return Err(MethodCallError::NotExecutable {
            status: StatusCode::BAD_USER_ACCESS_DENIED,
        });
    }
    if let Some(roles) = method.call_roles() {
        if !session.is_some_and(|s| s.has_any_role(&roles)) {
            return Err(MethodCallError::NotExecutable {
                status: StatusCode::BAD_USER_ACCESS_DENIED,
            });
        }
    }
    Ok(())
}
