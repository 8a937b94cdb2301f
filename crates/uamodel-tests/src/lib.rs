// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uamodel Integration Tests
//!
//! Shared test utilities and the integration suites for the uamodel crates.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p uamodel-tests
//! cargo test -p uamodel-tests --test integration_model
//! cargo test -p uamodel-tests --test integration_methods
//! cargo test -p uamodel-tests --test integration_config
//! ```
//!
//! ## Test Categories
//!
//! ### Model Tests (`integration_model.rs`)
//! - Inherited accessors across the condition hierarchy
//! - Property materialization and write policies
//! - Components, state variables and value observers
//!
//! ### Method Tests (`integration_methods.rs`)
//! - Call service status mapping
//! - Condition state transitions through method calls
//! - `FileType` methods over an in-memory file
//!
//! ### Config Tests (`integration_config.rs`)
//! - Loading files into address space settings
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use uamodel_tests::common::fixtures::AlarmFixtures;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let fixture = AlarmFixtures::limit_alarm();
//!     fixture.node.set_high_limit(90.0).unwrap();
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::mocks::*;
    pub use crate::common::{init_test_logging, user_session};
}
