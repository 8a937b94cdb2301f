// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Common Test Utilities
//!
//! - `fixtures`: prebuilt address spaces with typed instances
//! - `builders`: object instance layout builder
//! - `assertions`: call result and property node assertions
//! - `mocks`: method handlers and a lookup-counting graph

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod mocks;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use mocks::*;

use std::sync::Once;

use tracing_subscriber::EnvFilter;
use uamodel_core::NodeId;
use uamodel_nodes::{SessionInfo, UserIdentity};

static INIT: Once = Once::new();

/// Initialize test logging. Call this at the start of each test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("warn,uamodel_nodes=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// A session for user `name` holding `roles`.
pub fn user_session(name: &str, roles: Vec<NodeId>) -> SessionInfo {
    SessionInfo::anonymous(NodeId::string(1, format!("Session.{}", name)))
        .with_identity(UserIdentity::UserName(name.to_string()))
        .with_roles(roles)
}
