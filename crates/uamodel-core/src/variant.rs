// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The generic value representation of the address space.
//!
//! A [`Variant`] holds one builtin-typed scalar, an [`Array`] of scalars of a
//! single builtin type (optionally with matrix dimensions), or nothing at all
//! ([`Variant::Empty`]). Variables store their current value as a
//! [`DataValue`], which adds a status and timestamps.
//!
//! ```text
//! Variant
//! ├── Empty
//! ├── Boolean .. Double      numeric and boolean scalars
//! ├── String, DateTime, Guid, ByteString
//! ├── NodeId, ExpandedNodeId, StatusCode, QualifiedName, LocalizedText
//! ├── ExtensionObject        encoded structure
//! └── Array                  1-D array or matrix of one builtin type
//! ```
//!
//! # Examples
//!
//! ```
//! use uamodel_core::variant::{BuiltinType, Variant};
//!
//! let scalar = Variant::from(42.5f64);
//! assert_eq!(scalar.builtin_type(), Some(BuiltinType::Double));
//! assert_eq!(scalar.value_rank(), -1);
//!
//! let array = Variant::array(BuiltinType::Int32, vec![1i32.into(), 2i32.into()]).unwrap();
//! assert_eq!(array.value_rank(), 1);
//! ```

use std::fmt;

use uuid::Uuid;

use crate::error::ConversionError;
use crate::status::StatusCode;
use crate::types::{ByteString, DateTime, ExpandedNodeId, LocalizedText, NodeId, QualifiedName};

// =============================================================================
// BuiltinType
// =============================================================================

/// The 25 builtin data types, numbered as their ids in namespace 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum BuiltinType {
    /// Boolean (i=1).
    Boolean = 1,
    /// SByte (i=2).
    SByte = 2,
    /// Byte (i=3).
    Byte = 3,
    /// Int16 (i=4).
    Int16 = 4,
    /// UInt16 (i=5).
    UInt16 = 5,
    /// Int32 (i=6).
    Int32 = 6,
    /// UInt32 (i=7).
    UInt32 = 7,
    /// Int64 (i=8).
    Int64 = 8,
    /// UInt64 (i=9).
    UInt64 = 9,
    /// Float (i=10).
    Float = 10,
    /// Double (i=11).
    Double = 11,
    /// String (i=12).
    String = 12,
    /// DateTime (i=13).
    DateTime = 13,
    /// Guid (i=14).
    Guid = 14,
    /// ByteString (i=15).
    ByteString = 15,
    /// XmlElement (i=16).
    XmlElement = 16,
    /// NodeId (i=17).
    NodeId = 17,
    /// ExpandedNodeId (i=18).
    ExpandedNodeId = 18,
    /// StatusCode (i=19).
    StatusCode = 19,
    /// QualifiedName (i=20).
    QualifiedName = 20,
    /// LocalizedText (i=21).
    LocalizedText = 21,
    /// ExtensionObject, i.e. Structure (i=22).
    ExtensionObject = 22,
    /// DataValue (i=23).
    DataValue = 23,
    /// Variant, i.e. BaseDataType (i=24).
    Variant = 24,
    /// DiagnosticInfo (i=25).
    DiagnosticInfo = 25,
}

impl BuiltinType {
    /// Returns the builtin type with the given namespace-0 id.
    pub const fn from_id(id: u32) -> Option<Self> {
        Some(match id {
            1 => Self::Boolean,
            2 => Self::SByte,
            3 => Self::Byte,
            4 => Self::Int16,
            5 => Self::UInt16,
            6 => Self::Int32,
            7 => Self::UInt32,
            8 => Self::Int64,
            9 => Self::UInt64,
            10 => Self::Float,
            11 => Self::Double,
            12 => Self::String,
            13 => Self::DateTime,
            14 => Self::Guid,
            15 => Self::ByteString,
            16 => Self::XmlElement,
            17 => Self::NodeId,
            18 => Self::ExpandedNodeId,
            19 => Self::StatusCode,
            20 => Self::QualifiedName,
            21 => Self::LocalizedText,
            22 => Self::ExtensionObject,
            23 => Self::DataValue,
            24 => Self::Variant,
            25 => Self::DiagnosticInfo,
            _ => return None,
        })
    }

    /// Returns the namespace-0 id of this type.
    #[inline]
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Returns the data type node id of this type.
    #[inline]
    pub const fn node_id(self) -> NodeId {
        NodeId::numeric(0, self as u32)
    }

    /// Returns `true` for the signed and unsigned integer types.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::SByte
                | Self::Byte
                | Self::Int16
                | Self::UInt16
                | Self::Int32
                | Self::UInt32
                | Self::Int64
                | Self::UInt64
        )
    }

    /// Returns `true` for the unsigned integer types.
    pub const fn is_unsigned(self) -> bool {
        matches!(self, Self::Byte | Self::UInt16 | Self::UInt32 | Self::UInt64)
    }

    /// Returns `true` for integer and floating point types.
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || matches!(self, Self::Float | Self::Double)
    }

    /// Returns the type name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::SByte => "SByte",
            Self::Byte => "Byte",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Guid => "Guid",
            Self::ByteString => "ByteString",
            Self::XmlElement => "XmlElement",
            Self::NodeId => "NodeId",
            Self::ExpandedNodeId => "ExpandedNodeId",
            Self::StatusCode => "StatusCode",
            Self::QualifiedName => "QualifiedName",
            Self::LocalizedText => "LocalizedText",
            Self::ExtensionObject => "ExtensionObject",
            Self::DataValue => "DataValue",
            Self::Variant => "Variant",
            Self::DiagnosticInfo => "DiagnosticInfo",
        }
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ExtensionObject
// =============================================================================

/// An encoded structure value.
///
/// The body is kept opaque; decoding into a concrete structure is left to
/// the codec layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionObject {
    /// Encoding node id of the body.
    pub encoding_id: ExpandedNodeId,
    /// Encoded body, `None` for a null structure.
    pub body: Option<ByteString>,
}

impl ExtensionObject {
    /// Creates a binary-encoded extension object.
    pub fn binary(encoding_id: impl Into<ExpandedNodeId>, body: impl Into<ByteString>) -> Self {
        Self {
            encoding_id: encoding_id.into(),
            body: Some(body.into()),
        }
    }

    /// Creates an extension object without a body.
    pub fn null(encoding_id: impl Into<ExpandedNodeId>) -> Self {
        Self {
            encoding_id: encoding_id.into(),
            body: None,
        }
    }
}

// =============================================================================
// Variant
// =============================================================================

/// A builtin-typed scalar, an array of scalars, or nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    /// No value (a null variant).
    #[default]
    Empty,
    /// Boolean.
    Boolean(bool),
    /// SByte.
    SByte(i8),
    /// Byte.
    Byte(u8),
    /// Int16.
    Int16(i16),
    /// UInt16.
    UInt16(u16),
    /// Int32.
    Int32(i32),
    /// UInt32.
    UInt32(u32),
    /// Int64.
    Int64(i64),
    /// UInt64.
    UInt64(u64),
    /// Float.
    Float(f32),
    /// Double.
    Double(f64),
    /// String.
    String(String),
    /// DateTime.
    DateTime(DateTime),
    /// Guid.
    Guid(Uuid),
    /// ByteString.
    ByteString(ByteString),
    /// NodeId.
    NodeId(Box<NodeId>),
    /// ExpandedNodeId.
    ExpandedNodeId(Box<ExpandedNodeId>),
    /// StatusCode.
    StatusCode(StatusCode),
    /// QualifiedName.
    QualifiedName(Box<QualifiedName>),
    /// LocalizedText.
    LocalizedText(Box<LocalizedText>),
    /// Encoded structure.
    ExtensionObject(Box<ExtensionObject>),
    /// Array or matrix.
    Array(Box<Array>),
}

impl Variant {
    /// Creates a one-dimensional array variant.
    ///
    /// # Errors
    ///
    /// Fails if an element is not a scalar of `element_type`.
    pub fn array(element_type: BuiltinType, values: Vec<Variant>) -> Result<Self, ConversionError> {
        Array::new(element_type, values).map(|a| Self::Array(Box::new(a)))
    }

    /// Returns `true` for [`Variant::Empty`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` for arrays and matrices.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns the array if this is an array or matrix.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Returns the builtin type of the scalar or of the array elements.
    ///
    /// `None` for [`Variant::Empty`].
    pub fn builtin_type(&self) -> Option<BuiltinType> {
        Some(match self {
            Self::Empty => return None,
            Self::Boolean(_) => BuiltinType::Boolean,
            Self::SByte(_) => BuiltinType::SByte,
            Self::Byte(_) => BuiltinType::Byte,
            Self::Int16(_) => BuiltinType::Int16,
            Self::UInt16(_) => BuiltinType::UInt16,
            Self::Int32(_) => BuiltinType::Int32,
            Self::UInt32(_) => BuiltinType::UInt32,
            Self::Int64(_) => BuiltinType::Int64,
            Self::UInt64(_) => BuiltinType::UInt64,
            Self::Float(_) => BuiltinType::Float,
            Self::Double(_) => BuiltinType::Double,
            Self::String(_) => BuiltinType::String,
            Self::DateTime(_) => BuiltinType::DateTime,
            Self::Guid(_) => BuiltinType::Guid,
            Self::ByteString(_) => BuiltinType::ByteString,
            Self::NodeId(_) => BuiltinType::NodeId,
            Self::ExpandedNodeId(_) => BuiltinType::ExpandedNodeId,
            Self::StatusCode(_) => BuiltinType::StatusCode,
            Self::QualifiedName(_) => BuiltinType::QualifiedName,
            Self::LocalizedText(_) => BuiltinType::LocalizedText,
            Self::ExtensionObject(_) => BuiltinType::ExtensionObject,
            Self::Array(array) => array.element_type(),
        })
    }

    /// Returns the value rank of the runtime shape.
    ///
    /// `-1` for scalars (and `Empty`), `1` for one-dimensional arrays and the
    /// number of dimensions for matrices.
    pub fn value_rank(&self) -> i32 {
        match self {
            Self::Array(array) => array.value_rank(),
            _ => -1,
        }
    }

    /// Returns the namespace-0 data type id of the value.
    pub fn data_type_id(&self) -> Option<NodeId> {
        self.builtin_type().map(BuiltinType::node_id)
    }

    /// Short description of the runtime shape for error messages.
    pub fn shape_name(&self) -> String {
        match self {
            Self::Empty => "Empty".to_string(),
            Self::Array(array) if array.is_matrix() => {
                format!("{}[matrix {:?}]", array.element_type(), array.dimensions())
            }
            Self::Array(array) => format!("{}[]", array.element_type()),
            other => other
                .builtin_type()
                .map(|t| t.name().to_string())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("null"),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::SByte(v) => write!(f, "{}", v),
            Self::Byte(v) => write!(f, "{}", v),
            Self::Int16(v) => write!(f, "{}", v),
            Self::UInt16(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::UInt32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::UInt64(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Guid(v) => write!(f, "{}", v),
            Self::ByteString(v) => write!(f, "{}", v),
            Self::NodeId(v) => write!(f, "{}", v),
            Self::ExpandedNodeId(v) => write!(f, "{}", v),
            Self::StatusCode(v) => write!(f, "{}", v),
            Self::QualifiedName(v) => write!(f, "{}", v),
            Self::LocalizedText(v) => write!(f, "{}", v),
            Self::ExtensionObject(v) => write!(f, "ExtensionObject({})", v.encoding_id),
            Self::Array(array) => {
                f.write_str("[")?;
                for (i, value) in array.values().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! variant_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

macro_rules! variant_from_boxed {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Self::$variant(Box::new(value))
                }
            }
        )+
    };
}

variant_from! {
    bool => Boolean,
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    DateTime => DateTime,
    Uuid => Guid,
    ByteString => ByteString,
    StatusCode => StatusCode,
}

variant_from_boxed! {
    NodeId => NodeId,
    ExpandedNodeId => ExpandedNodeId,
    QualifiedName => QualifiedName,
    LocalizedText => LocalizedText,
    ExtensionObject => ExtensionObject,
    Array => Array,
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

// =============================================================================
// Array
// =============================================================================

/// Array of scalars of one builtin type, optionally shaped as a matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    element_type: BuiltinType,
    values: Vec<Variant>,
    dimensions: Option<Vec<u32>>,
}

impl Array {
    /// Creates a one-dimensional array.
    ///
    /// # Errors
    ///
    /// Fails if an element is `Empty`, an array, or of another builtin type.
    pub fn new(element_type: BuiltinType, values: Vec<Variant>) -> Result<Self, ConversionError> {
        for value in &values {
            Self::check_element(element_type, value)?;
        }
        Ok(Self {
            element_type,
            values,
            dimensions: None,
        })
    }

    /// Creates a matrix with the given dimensions, elements in row-major order.
    ///
    /// # Errors
    ///
    /// Fails on an element type mismatch, on fewer than two dimensions, or
    /// when the product of the dimensions differs from the element count.
    pub fn matrix(
        element_type: BuiltinType,
        values: Vec<Variant>,
        dimensions: Vec<u32>,
    ) -> Result<Self, ConversionError> {
        if dimensions.len() < 2 {
            return Err(ConversionError::invalid_array(format!(
                "a matrix needs at least two dimensions, got {}",
                dimensions.len()
            )));
        }
        let expected: u64 = dimensions.iter().map(|d| u64::from(*d)).product();
        if expected != values.len() as u64 {
            return Err(ConversionError::invalid_array(format!(
                "dimensions {:?} describe {} elements but {} were given",
                dimensions,
                expected,
                values.len()
            )));
        }

        let mut array = Self::new(element_type, values)?;
        array.dimensions = Some(dimensions);
        Ok(array)
    }

    /// Builds an array from elements already known to be `element_type` scalars.
    pub(crate) fn from_parts(
        element_type: BuiltinType,
        values: Vec<Variant>,
        dimensions: Option<Vec<u32>>,
    ) -> Self {
        Self {
            element_type,
            values,
            dimensions,
        }
    }

    fn check_element(element_type: BuiltinType, value: &Variant) -> Result<(), ConversionError> {
        match value {
            Variant::Array(_) => Err(ConversionError::invalid_array("arrays cannot be nested")),
            other if other.builtin_type() == Some(element_type) => Ok(()),
            other => Err(ConversionError::invalid_array(format!(
                "element of type {} in {} array",
                other.shape_name(),
                element_type
            ))),
        }
    }

    /// Returns the element type.
    #[inline]
    pub fn element_type(&self) -> BuiltinType {
        self.element_type
    }

    /// Returns the elements in row-major order.
    #[inline]
    pub fn values(&self) -> &[Variant] {
        &self.values
    }

    /// Consumes the array, returning its elements.
    #[inline]
    pub fn into_values(self) -> Vec<Variant> {
        self.values
    }

    /// Returns the matrix dimensions, `None` for one-dimensional arrays.
    #[inline]
    pub fn dimensions(&self) -> Option<&[u32]> {
        self.dimensions.as_deref()
    }

    /// Returns `true` if this array has two or more dimensions.
    #[inline]
    pub fn is_matrix(&self) -> bool {
        self.dimensions.is_some()
    }

    /// Returns the number of dimensions.
    pub fn value_rank(&self) -> i32 {
        self.dimensions.as_ref().map_or(1, |d| d.len() as i32)
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// =============================================================================
// DataValue
// =============================================================================

/// A value together with its quality and timestamps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataValue {
    /// The value.
    pub value: Variant,
    /// Quality of the value.
    pub status: StatusCode,
    /// When the source produced the value.
    pub source_timestamp: Option<DateTime>,
    /// When the server received the value.
    pub server_timestamp: Option<DateTime>,
}

impl DataValue {
    /// Creates a good value stamped with the current time.
    pub fn new(value: impl Into<Variant>) -> Self {
        let now = chrono::Utc::now();
        Self {
            value: value.into(),
            status: StatusCode::GOOD,
            source_timestamp: Some(now),
            server_timestamp: Some(now),
        }
    }

    /// Creates a good value without timestamps.
    pub fn value_only(value: impl Into<Variant>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Sets the source timestamp.
    pub fn with_source_timestamp(mut self, timestamp: DateTime) -> Self {
        self.source_timestamp = Some(timestamp);
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
