// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Assertion helpers with failure messages that name the status or node
//! involved.

use uamodel_core::{NodeId, StatusCode, Variant};
use uamodel_nodes::{CallMethodResult, Node, VariableNode};

// =============================================================================
// Call result assertions
// =============================================================================

/// Assertion extensions for [`CallMethodResult`].
pub trait CallResultAssertions {
    /// Asserts a `Good` status and returns the outputs.
    fn assert_good(&self) -> &[Variant];

    /// Asserts the overall status.
    fn assert_status(&self, expected: StatusCode);

    /// Asserts `Bad_InvalidArgument` with the given per-argument results.
    fn assert_invalid_arguments(&self, expected: &[StatusCode]);
}

impl CallResultAssertions for CallMethodResult {
    fn assert_good(&self) -> &[Variant] {
        assert!(
            self.status_code.is_good(),
            "Expected Good, got {} (input results {:?})",
            self.status_code,
            self.input_argument_results
        );
        &self.output_arguments
    }

    fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status_code, expected,
            "Expected {}, got {}",
            expected, self.status_code
        );
        if !expected.is_good() {
            assert!(
                self.output_arguments.is_empty(),
                "A failed call returned outputs: {:?}",
                self.output_arguments
            );
        }
    }

    fn assert_invalid_arguments(&self, expected: &[StatusCode]) {
        self.assert_status(StatusCode::BAD_INVALID_ARGUMENT);
        assert_eq!(
            self.input_argument_results, expected,
            "Unexpected per-argument results"
        );
    }
}

// =============================================================================
// Property node assertions
// =============================================================================

/// Asserts the shape of a materialized property node.
pub fn assert_property_node(node: &VariableNode, browse_name: &str, data_type: NodeId, value_rank: i32) {
    assert_eq!(node.browse_name().name, browse_name, "browse name of {}", node.node_id());
    assert_eq!(node.data_type(), &data_type, "data type of {}", node.node_id());
    assert_eq!(node.value_rank(), value_rank, "value rank of {}", node.node_id());
    assert_eq!(
        node.type_definition(),
        &NodeId::PROPERTY_TYPE,
        "{} is not a PropertyType instance",
        node.node_id()
    );
}
