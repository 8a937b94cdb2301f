// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uamodel-config
//!
//! Configuration and logging setup for uamodel.
//!
//! ## Features
//!
//! - **Schema**: [`ModelConfig`] with property, method and logging sections
//! - **Multi-Format Support**: YAML, TOML and JSON files
//! - **Environment Overrides**: `UAMODEL_*` variables and `${VAR:default}` placeholders
//! - **Logging**: `tracing-subscriber` setup in text, JSON or compact format
//!
//! ## Quick Start
//!
//! ```
//! use uamodel_config::{load_config_str, ConfigFormat};
//! use uamodel_nodes::PropertyWritePolicy;
//!
//! let config = load_config_str(
//!     "namespaces: [\"urn:example:plant\"]\nproperties:\n  write_policy: existing_only\n",
//!     ConfigFormat::Yaml,
//! )
//! .unwrap();
//! assert_eq!(config.settings().write_policy, PropertyWritePolicy::ExistingOnly);
//!
//! let space = config.address_space().unwrap();
//! # let _ = space;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod logging;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use logging::init_logging;
pub use schema::{LogFormat, LogLevel, LoggingConfig, MethodConfig, ModelConfig, PropertyConfig};
