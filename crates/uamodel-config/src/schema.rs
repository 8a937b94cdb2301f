// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema.
//!
//! ```text
//! ModelConfig
//! ├── namespaces: Vec<String>
//! ├── properties: PropertyConfig
//! │   └── write_policy: materialize | existing_only
//! ├── methods: MethodConfig
//! │   └── check_executable: bool
//! └── logging: LoggingConfig
//!     ├── level: trace | debug | info | warn | error
//!     └── format: text | json | compact
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uamodel_core::OPC_UA_NAMESPACE_URI;
use uamodel_nodes::{AddressSpace, ModelSettings, PropertyWritePolicy};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// ModelConfig
// =============================================================================

/// Root configuration of the accessor layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Namespace URIs registered after the standard namespace, in index order.
    #[serde(default)]
    pub namespaces: Vec<String>,

    /// Property access settings.
    #[serde(default)]
    pub properties: PropertyConfig,

    /// Method call settings.
    #[serde(default)]
    pub methods: MethodConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ModelConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for (i, uri) in self.namespaces.iter().enumerate() {
            let field = format!("namespaces[{}]", i);
            if uri.trim().is_empty() {
                return Err(ConfigError::validation(field, "cannot be empty"));
            }
            if uri == OPC_UA_NAMESPACE_URI {
                return Err(ConfigError::validation(field, "the standard namespace is always index 0"));
            }
            if !seen.insert(uri.as_str()) {
                return Err(ConfigError::validation(field, format!("duplicate namespace '{}'", uri)));
            }
        }
        Ok(())
    }

    /// Returns the settings handed to a node graph.
    pub fn settings(&self) -> ModelSettings {
        ModelSettings::default()
            .with_write_policy(self.properties.write_policy)
            .with_check_executable(self.methods.check_executable)
    }

    /// Creates an empty address space with these settings and namespaces.
    pub fn address_space(&self) -> ConfigResult<AddressSpace> {
        self.validate()?;
        let space = AddressSpace::new().with_settings(self.settings());
        for (i, uri) in self.namespaces.iter().enumerate() {
            space
                .register_namespace(uri.clone())
                .map_err(|e| ConfigError::validation(format!("namespaces[{}]", i), e.to_string()))?;
        }
        Ok(space)
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Property access settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyConfig {
    /// What a write to an absent property does.
    #[serde(default)]
    pub write_policy: PropertyWritePolicy,
}

/// Method call settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodConfig {
    /// Check Executable, UserExecutable and call roles before invoking.
    #[serde(default = "default_enabled")]
    pub check_executable: bool,
}

impl Default for MethodConfig {
    fn default() -> Self {
        Self {
            check_executable: true,
        }
    }
}

fn default_enabled() -> bool {
    true
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the filter directive for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
    /// Minimal single-line output.
    Compact,
}
