// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Method argument metadata.

use uamodel_core::data_type;
use uamodel_core::{
    ArgumentResolutionError, ExpandedNodeId, LocalizedText, MethodCallError, NamespaceError,
    NamespaceTable, NodeId, StatusCode, Variant,
};

/// Statically declared argument, data type named by namespace URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDefinition {
    /// Argument name.
    pub name: &'static str,
    /// Declared data type.
    pub data_type: ExpandedNodeId,
    /// Declared value rank.
    pub value_rank: i32,
    /// Description text, may be empty.
    pub description: &'static str,
}

impl ArgumentDefinition {
    /// Creates a definition.
    pub const fn new(
        name: &'static str,
        data_type: ExpandedNodeId,
        value_rank: i32,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            data_type,
            value_rank,
            description,
        }
    }

    /// Resolves the data type against the live namespace table.
    pub fn resolve(&self, namespaces: &NamespaceTable) -> Result<Argument, NamespaceError> {
        Ok(Argument {
            name: self.name.to_string(),
            data_type: self.data_type.to_node_id(namespaces)?,
            value_rank: self.value_rank,
            array_dimensions: (self.value_rank > 0).then(|| vec![0; self.value_rank as usize]),
            description: if self.description.is_empty() {
                LocalizedText::default()
            } else {
                LocalizedText::text(self.description)
            },
        })
    }
}

/// A resolved method argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Argument name.
    pub name: String,
    /// Server-local data type.
    pub data_type: NodeId,
    /// Value rank.
    pub value_rank: i32,
    /// Array dimensions, `0` meaning unknown length.
    pub array_dimensions: Option<Vec<u32>>,
    /// Description.
    pub description: LocalizedText,
}

impl Argument {
    /// Returns `true` if `value` matches the data type and value rank.
    /// `Empty` always matches.
    pub fn accepts(&self, value: &Variant) -> bool {
        data_type::value_accepts(&self.data_type, self.value_rank, value)
    }
}

/// Resolves every definition of a method, failing on the first unknown
/// namespace.
pub fn resolve_arguments(
    method: &str,
    definitions: &[ArgumentDefinition],
    namespaces: &NamespaceTable,
) -> Result<Vec<Argument>, ArgumentResolutionError> {
    definitions
        .iter()
        .map(|definition| {
            definition
                .resolve(namespaces)
                .map_err(|source| ArgumentResolutionError::new(method, definition.name, source))
        })
        .collect()
}

/// Checks input values against resolved arguments.
///
/// # Errors
///
/// - [`MethodCallError::ArgumentsMissing`] for too few values
/// - [`MethodCallError::TooManyArguments`] for too many
/// - [`MethodCallError::InvalidArguments`] with one status per argument if
///   any value has the wrong data type or value rank
pub fn check_input_arguments(arguments: &[Argument], inputs: &[Variant]) -> Result<(), MethodCallError> {
    if inputs.len() < arguments.len() {
        return Err(MethodCallError::arguments_missing(arguments.len(), inputs.len()));
    }
    if inputs.len() > arguments.len() {
        return Err(MethodCallError::too_many_arguments(arguments.len(), inputs.len()));
    }

    let results: Vec<StatusCode> = arguments
        .iter()
        .zip(inputs)
        .map(|(argument, value)| {
            if argument.accepts(value) {
                StatusCode::GOOD
            } else {
                StatusCode::BAD_TYPE_MISMATCH
            }
        })
        .collect();

    if results.iter().any(|s| s.is_bad()) {
        return Err(MethodCallError::InvalidArguments { results });
    }
    Ok(())
}
