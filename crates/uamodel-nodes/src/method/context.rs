// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Invocation context handed to method handlers.

use std::fmt;

use uamodel_core::NodeId;

/// Identity a session authenticated with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UserIdentity {
    /// Anonymous user.
    #[default]
    Anonymous,
    /// User name token.
    UserName(String),
    /// X.509 certificate, by thumbprint.
    Certificate(String),
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::UserName(name) => write!(f, "user:{}", name),
            Self::Certificate(thumbprint) => write!(f, "cert:{}", thumbprint),
        }
    }
}

/// The calling session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// Session id.
    pub session_id: NodeId,
    /// Authenticated identity.
    pub identity: UserIdentity,
    /// Roles granted to the identity.
    pub roles: Vec<NodeId>,
}

impl SessionInfo {
    /// Creates an anonymous session without roles.
    pub fn anonymous(session_id: NodeId) -> Self {
        Self {
            session_id,
            identity: UserIdentity::Anonymous,
            roles: Vec::new(),
        }
    }

    /// Sets the identity.
    pub fn with_identity(mut self, identity: UserIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Sets the roles.
    pub fn with_roles(mut self, roles: Vec<NodeId>) -> Self {
        self.roles = roles;
        self
    }

    /// Returns `true` if the session holds any of `roles`.
    pub fn has_any_role(&self, roles: &[NodeId]) -> bool {
        self.roles.iter().any(|r| roles.contains(r))
    }
}

/// Where and by whom a method is being called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    object_id: NodeId,
    method_id: NodeId,
    session: Option<SessionInfo>,
}

impl InvocationContext {
    /// Creates a context without a session.
    pub fn new(object_id: NodeId, method_id: NodeId) -> Self {
        Self {
            object_id,
            method_id,
            session: None,
        }
    }

    /// Attaches the calling session.
    pub fn with_session(mut self, session: SessionInfo) -> Self {
        self.session = Some(session);
        self
    }

    /// Returns the object the method was called on.
    pub fn object_id(&self) -> &NodeId {
        &self.object_id
    }

    /// Returns the method node id.
    pub fn method_id(&self) -> &NodeId {
        &self.method_id
    }

    /// Returns the calling session.
    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }
}
