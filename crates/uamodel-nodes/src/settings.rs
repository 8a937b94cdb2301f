// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Behaviour switches of the accessor layer.

use serde::{Deserialize, Serialize};

/// What a property write does when the property node does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyWritePolicy {
    /// Create the property node, then write it.
    #[default]
    Materialize,
    /// Leave the node graph untouched and report the property absent.
    ExistingOnly,
}

impl PropertyWritePolicy {
    /// Returns the policy name as written in configuration files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Materialize => "materialize",
            Self::ExistingOnly => "existing_only",
        }
    }
}

impl std::fmt::Display for PropertyWritePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings a node graph exposes to the accessors running over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Property write policy.
    pub write_policy: PropertyWritePolicy,
    /// Whether the call service checks Executable, UserExecutable and roles.
    pub check_executable: bool,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            write_policy: PropertyWritePolicy::Materialize,
            check_executable: true,
        }
    }
}

impl ModelSettings {
    /// Sets the property write policy.
    pub fn with_write_policy(mut self, write_policy: PropertyWritePolicy) -> Self {
        self.write_policy = write_policy;
        self
    }

    /// Enables or disables executable checks.
    pub fn with_check_executable(mut self, check_executable: bool) -> Self {
        self.check_executable = check_executable;
        self
    }
}
