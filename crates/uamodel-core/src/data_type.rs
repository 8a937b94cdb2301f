// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Data type and value rank checks for runtime values.
//!
//! Used wherever a dynamically typed [`Variant`] must be checked against a
//! declared data type and value rank: method input arguments and raw
//! property writes.
//!
//! Namespace-0 data types fall into three groups:
//!
//! ```text
//! builtin (i=1..25)        exact builtin match
//! simple subtypes          Duration -> Double, UtcTime -> DateTime, ...
//! abstract                 BaseDataType, Number, Integer, UInteger,
//!                          Structure, Enumeration
//! ```
//!
//! Data types outside namespace 0 are either structures (carried as
//! `ExtensionObject`) or enumerations (carried as `Int32`).
//!
//! Extension objects declared with one of the namespace-0 structures below
//! must carry one of that structure's encoding ids.

use crate::types::{ExpandedNodeId, Identifier, NamespaceRef, NodeId, OPC_UA_NAMESPACE_URI};
use crate::variant::{BuiltinType, ExtensionObject, Variant};

// =============================================================================
// Value ranks
// =============================================================================

/// Well-known value rank values.
pub mod value_rank {
    /// Scalar or one-dimensional array.
    pub const SCALAR_OR_ONE_DIMENSION: i32 = -3;
    /// Any shape.
    pub const ANY: i32 = -2;
    /// Scalar.
    pub const SCALAR: i32 = -1;
    /// Array of one or more dimensions.
    pub const ONE_OR_MORE_DIMENSIONS: i32 = 0;
    /// One-dimensional array.
    pub const ONE_DIMENSION: i32 = 1;
    /// Two-dimensional array.
    pub const TWO_DIMENSIONS: i32 = 2;
}

/// Returns `true` if the runtime shape of `value` satisfies `rank`.
///
/// `Empty` satisfies every rank.
pub fn rank_accepts(rank: i32, value: &Variant) -> bool {
    let array = match value {
        Variant::Empty => return true,
        Variant::Array(array) => Some(array),
        _ => None,
    };

    match (rank, array) {
        (value_rank::ANY, _) => true,
        (value_rank::SCALAR_OR_ONE_DIMENSION, None) => true,
        (value_rank::SCALAR_OR_ONE_DIMENSION, Some(a)) => !a.is_matrix(),
        (value_rank::SCALAR, array) => array.is_none(),
        (value_rank::ONE_OR_MORE_DIMENSIONS, array) => array.is_some(),
        (value_rank::ONE_DIMENSION, Some(a)) => !a.is_matrix(),
        (n, Some(a)) if n > 1 => a.value_rank() == n,
        _ => false,
    }
}

// =============================================================================
// Data types
// =============================================================================

/// Abstract namespace-0 data types.
mod abstract_type {
    pub const STRUCTURE: u32 = 22;
    pub const BASE_DATA_TYPE: u32 = 24;
    pub const NUMBER: u32 = 26;
    pub const INTEGER: u32 = 27;
    pub const UINTEGER: u32 = 28;
    pub const ENUMERATION: u32 = 29;
}

/// Simple namespace-0 subtypes of builtin types.
const SIMPLE_SUBTYPES: &[(u32, BuiltinType)] = &[
    (30, BuiltinType::ByteString),     // Image
    (288, BuiltinType::UInt32),        // IntegerId
    (289, BuiltinType::UInt32),        // Counter
    (290, BuiltinType::Double),        // Duration
    (291, BuiltinType::String),        // NumericRange
    (292, BuiltinType::String),        // Time
    (293, BuiltinType::DateTime),      // Date
    (294, BuiltinType::DateTime),      // UtcTime
    (295, BuiltinType::String),        // LocaleId
    (311, BuiltinType::ByteString),    // ApplicationInstanceCertificate
    (2000, BuiltinType::ByteString),   // ImageBMP
    (2001, BuiltinType::ByteString),   // ImageGIF
    (2002, BuiltinType::ByteString),   // ImageJPG
    (2003, BuiltinType::ByteString),   // ImagePNG
    (12877, BuiltinType::String),      // NormalizedString
    (12878, BuiltinType::String),      // DecimalString
    (12879, BuiltinType::String),      // DurationString
    (12880, BuiltinType::String),      // TimeString
    (12881, BuiltinType::String),      // DateString
    (16307, BuiltinType::ByteString),  // AudioDataType
    (17588, BuiltinType::UInt32),      // Index
    (20998, BuiltinType::UInt32),      // VersionTime
];

/// Well-known namespace-0 structure types: `(data type, binary encoding, XML encoding)`.
const STRUCTURES: &[(u32, u32, u32)] = &[
    (296, 298, 297),    // Argument
    (884, 886, 885),    // Range
    (887, 889, 888),    // EUInformation
    (7594, 8251, 7616), // EnumValueType
    (8912, 8917, 8913), // TimeZoneDataType
];

/// Well-known namespace-0 enumeration types.
const ENUMERATIONS: &[u32] = &[
    256, // IdType
    257, // NodeClass
    851, // RedundancySupport
    852, // ServerState
];

/// Returns the builtin type that carries values of a namespace-0 data type,
/// or `None` for abstract and unknown types.
pub fn builtin_of(data_type: &NodeId) -> Option<BuiltinType> {
    let id = data_type.ns0_numeric()?;
    if let Some(builtin) = BuiltinType::from_id(id) {
        return match builtin {
            BuiltinType::Variant => None,
            other => Some(other),
        };
    }
    if STRUCTURES.iter().any(|(structure, ..)| *structure == id) {
        return Some(BuiltinType::ExtensionObject);
    }
    if ENUMERATIONS.contains(&id) {
        return Some(BuiltinType::Int32);
    }
    SIMPLE_SUBTYPES
        .iter()
        .find(|(subtype, _)| *subtype == id)
        .map(|(_, builtin)| *builtin)
}

/// Returns `true` if a value of builtin type `actual` may be assigned to a
/// variable or argument declared with `data_type`.
///
/// Only the builtin type is checked. A data type outside namespace 0 takes
/// any `ExtensionObject` or `Int32`, since telling a vendor structure from a
/// vendor enumeration needs the server's type tree. See
/// [`structure_accepts`] for the encoding check on extension objects.
pub fn is_assignable(data_type: &NodeId, actual: BuiltinType) -> bool {
    let Some(id) = data_type.ns0_numeric() else {
        return matches!(actual, BuiltinType::ExtensionObject | BuiltinType::Int32);
    };

    match id {
        abstract_type::BASE_DATA_TYPE => true,
        abstract_type::NUMBER => actual.is_numeric(),
        abstract_type::INTEGER => actual.is_integer() && !actual.is_unsigned(),
        abstract_type::UINTEGER => actual.is_unsigned(),
        abstract_type::STRUCTURE => actual == BuiltinType::ExtensionObject,
        abstract_type::ENUMERATION => actual == BuiltinType::Int32,
        _ => builtin_of(data_type) == Some(actual),
    }
}

/// Returns `true` if `object` may carry a value of `data_type`.
///
/// For the namespace-0 structures listed above the encoding id must be the
/// structure's binary or XML encoding. Every other data type accepts any
/// encoding id.
pub fn structure_accepts(data_type: &NodeId, object: &ExtensionObject) -> bool {
    let Some(id) = data_type.ns0_numeric() else {
        return true;
    };
    let Some((_, binary, xml)) = STRUCTURES.iter().find(|(structure, ..)| *structure == id) else {
        return true;
    };
    matches!(ns0_encoding(&object.encoding_id), Some(encoding) if encoding == *binary || encoding == *xml)
}

/// Returns `true` if every extension object in `value` passes
/// [`structure_accepts`]. Values without extension objects always pass.
pub fn structures_accept(data_type: &NodeId, value: &Variant) -> bool {
    match value {
        Variant::ExtensionObject(object) => structure_accepts(data_type, object),
        Variant::Array(array) => array.values().iter().all(|v| structures_accept(data_type, v)),
        _ => true,
    }
}

fn ns0_encoding(id: &ExpandedNodeId) -> Option<u32> {
    let ns0 = match &id.namespace {
        NamespaceRef::Index(index) => *index == 0,
        NamespaceRef::Uri(uri) => &**uri == OPC_UA_NAMESPACE_URI,
    };
    match (&id.identifier, ns0 && id.server_index == 0) {
        (Identifier::Numeric(value), true) => Some(*value),
        _ => None,
    }
}

/// Checks `value` against a declared data type and value rank.
///
/// `Empty` passes every check.
pub fn value_accepts(data_type: &NodeId, rank: i32, value: &Variant) -> bool {
    let type_ok = match value.builtin_type() {
        Some(actual) => is_assignable(data_type, actual),
        None => true,
    };
    type_ok && structures_accept(data_type, value) && rank_accepts(rank, value)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocalizedText;
    use crate::value::{Matrix, UaValue};

    #[test]
    fn test_rank_accepts() {
        let scalar = Variant::Double(1.0);
        let array = vec![1.0f64].into_variant();
        let matrix = Matrix::new(vec![1, 1], vec![1.0f64]).unwrap().into_variant();

        assert!(rank_accepts(value_rank::SCALAR, &scalar));
        assert!(!rank_accepts(value_rank::SCALAR, &array));
        assert!(rank_accepts(value_rank::ONE_DIMENSION, &array));
        assert!(!rank_accepts(value_rank::ONE_DIMENSION, &matrix));
        assert!(rank_accepts(value_rank::ONE_OR_MORE_DIMENSIONS, &matrix));
        assert!(!rank_accepts(value_rank::ONE_OR_MORE_DIMENSIONS, &scalar));
        assert!(rank_accepts(value_rank::TWO_DIMENSIONS, &matrix));
        assert!(rank_accepts(value_rank::SCALAR_OR_ONE_DIMENSION, &array));
        assert!(!rank_accepts(value_rank::SCALAR_OR_ONE_DIMENSION, &matrix));
        assert!(rank_accepts(value_rank::ANY, &matrix));
        assert!(rank_accepts(value_rank::ONE_DIMENSION, &Variant::Empty));
    }

    #[test]
    fn test_simple_subtypes() {
        assert_eq!(builtin_of(&NodeId::numeric(0, 290)), Some(BuiltinType::Double));
        assert_eq!(builtin_of(&NodeId::numeric(0, 294)), Some(BuiltinType::DateTime));
        assert_eq!(builtin_of(&NodeId::numeric(0, 288)), Some(BuiltinType::UInt32));
        assert_eq!(builtin_of(&NodeId::numeric(0, 24)), None);
        assert_eq!(builtin_of(&NodeId::numeric(2, 290)), None);
    }

    #[test]
    fn test_is_assignable() {
        let integer_id = NodeId::numeric(0, 288);
        assert!(is_assignable(&integer_id, BuiltinType::UInt32));
        assert!(!is_assignable(&integer_id, BuiltinType::Int32));

        assert!(is_assignable(&NodeId::numeric(0, 24), BuiltinType::Guid));
        assert!(is_assignable(&NodeId::numeric(0, 26), BuiltinType::Float));
        assert!(is_assignable(&NodeId::numeric(0, 27), BuiltinType::Int64));
        assert!(!is_assignable(&NodeId::numeric(0, 27), BuiltinType::UInt64));
        assert!(is_assignable(&NodeId::numeric(3, 5001), BuiltinType::ExtensionObject));
    }

    #[test]
    fn test_value_accepts() {
        let lt = NodeId::numeric(0, 21);
        let hello = Variant::from(LocalizedText::new("en", "hello"));

        assert!(value_accepts(&lt, value_rank::SCALAR, &hello));
        assert!(!value_accepts(&lt, value_rank::SCALAR, &Variant::from("hello")));
        assert!(!value_accepts(&lt, value_rank::ONE_DIMENSION, &hello));
        assert!(value_accepts(&lt, value_rank::SCALAR, &Variant::Empty));
    }

    #[test]
    fn test_structure_encodings() {
        let range = NodeId::numeric(0, 884);
        let range_value = Variant::ExtensionObject(Box::new(ExtensionObject::binary(
            ExpandedNodeId::ns0(886),
            vec![0u8; 16],
        )));
        let eu_value = Variant::ExtensionObject(Box::new(ExtensionObject::binary(
            ExpandedNodeId::ns0(889),
            vec![0u8; 4],
        )));

        assert!(value_accepts(&range, value_rank::SCALAR, &range_value));
        assert!(!value_accepts(&range, value_rank::SCALAR, &eu_value));
        assert!(structure_accepts(&range, &ExtensionObject::null(ExpandedNodeId::ns0(885))));
        assert!(!structure_accepts(&range, &ExtensionObject::null(ExpandedNodeId::numeric_uri("urn:vendor", 886))));

        // Abstract and vendor structures do not constrain the encoding.
        assert!(value_accepts(&NodeId::numeric(0, 22), value_rank::SCALAR, &eu_value));
        assert!(value_accepts(&NodeId::numeric(3, 5001), value_rank::SCALAR, &eu_value));
    }
}
