// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed conversion to and from [`Variant`].
//!
//! [`UaValue`] ties a Rust type to a builtin type and a shape. Conversions
//! are strict: a `Double` variant converts to `f64` and nothing else, an
//! array never converts to a scalar, and [`Variant::Empty`] converts to no
//! type at all. Absence is modeled one level up, as `Option<T>`, so that a
//! missing value and a malformed value stay distinguishable.
//!
//! | Rust type          | Builtin type    | Shape  |
//! |--------------------|-----------------|--------|
//! | `bool`             | Boolean         | scalar |
//! | `i8` .. `u64`      | SByte .. UInt64 | scalar |
//! | `f32`, `f64`       | Float, Double   | scalar |
//! | `String`           | String          | scalar |
//! | `DateTime`         | DateTime        | scalar |
//! | `Uuid`             | Guid            | scalar |
//! | `ByteString`       | ByteString      | scalar |
//! | `NodeId`, ...      | NodeId, ...     | scalar |
//! | `Vec<T>`           | as `T`          | array  |
//! | `Matrix<T>`        | as `T`          | matrix |
//!
//! # Examples
//!
//! ```
//! use uamodel_core::{UaValue, Variant};
//!
//! let v = vec![1.0f64, 2.0].into_variant();
//! assert_eq!(Vec::<f64>::from_variant(v).unwrap(), vec![1.0, 2.0]);
//!
//! assert!(f64::from_variant(Variant::Float(1.0)).is_err());
//! ```

use uuid::Uuid;

use crate::error::ConversionError;
use crate::status::StatusCode;
use crate::types::{ByteString, DateTime, ExpandedNodeId, LocalizedText, NodeId, QualifiedName};
use crate::variant::{Array, BuiltinType, ExtensionObject, Variant};

// =============================================================================
// ValueShape
// =============================================================================

/// Static shape of a [`UaValue`] type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueShape {
    /// A single value.
    Scalar,
    /// A one-dimensional array.
    Array,
    /// An array of two or more dimensions.
    Matrix,
}

impl ValueShape {
    /// Returns `true` if a declared value rank admits this shape.
    ///
    /// `-1` admits scalars, `1` arrays, `n > 1` matrices, `0` arrays and
    /// matrices, `-2` anything and `-3` scalars and arrays.
    pub const fn accepts_rank(self, value_rank: i32) -> bool {
        match self {
            Self::Scalar => matches!(value_rank, -3 | -2 | -1),
            Self::Array => matches!(value_rank, -3 | -2 | 0 | 1),
            Self::Matrix => value_rank == -2 || value_rank == 0 || value_rank > 1,
        }
    }

    /// Returns the shape name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Array => "array",
            Self::Matrix => "matrix",
        }
    }
}

// =============================================================================
// UaValue
// =============================================================================

/// A Rust type with a fixed builtin type and shape.
pub trait UaValue: Sized + Send + Sync + 'static {
    /// Shape of the type.
    const SHAPE: ValueShape;

    /// Builtin type of the scalar or of the elements.
    const BUILTIN: BuiltinType;

    /// Converts a variant into this type.
    ///
    /// # Errors
    ///
    /// Fails if the variant is `Empty`, or its builtin type or shape differ
    /// from this type's.
    fn from_variant(value: Variant) -> Result<Self, ConversionError>;

    /// Converts this value into a variant.
    fn into_variant(self) -> Variant;
}

/// Marker for scalar [`UaValue`] types usable as array elements.
pub trait UaScalar: UaValue {}

/// Builds the error describing why `actual` cannot become a `T`.
pub fn mismatch<T: UaValue>(actual: &Variant) -> ConversionError {
    if actual.is_empty() {
        return ConversionError::Empty {
            expected: T::BUILTIN,
        };
    }

    let actual_shape = match actual {
        Variant::Array(array) if array.is_matrix() => ValueShape::Matrix,
        Variant::Array(_) => ValueShape::Array,
        _ => ValueShape::Scalar,
    };

    if actual_shape != T::SHAPE {
        ConversionError::ShapeMismatch {
            expected: T::SHAPE.name(),
            actual: actual.shape_name(),
        }
    } else {
        ConversionError::TypeMismatch {
            expected: T::BUILTIN,
            actual: actual.shape_name(),
        }
    }
}

macro_rules! scalar_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl UaValue for $ty {
                const SHAPE: ValueShape = ValueShape::Scalar;
                const BUILTIN: BuiltinType = BuiltinType::$variant;

                fn from_variant(value: Variant) -> Result<Self, ConversionError> {
                    match value {
                        Variant::$variant(v) => Ok(v),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }

                fn into_variant(self) -> Variant {
                    Variant::$variant(self)
                }
            }

            impl UaScalar for $ty {}
        )+
    };
}

macro_rules! boxed_scalar_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl UaValue for $ty {
                const SHAPE: ValueShape = ValueShape::Scalar;
                const BUILTIN: BuiltinType = BuiltinType::$variant;

                fn from_variant(value: Variant) -> Result<Self, ConversionError> {
                    match value {
                        Variant::$variant(v) => Ok(*v),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }

                fn into_variant(self) -> Variant {
                    Variant::$variant(Box::new(self))
                }
            }

            impl UaScalar for $ty {}
        )+
    };
}

scalar_value! {
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

boxed_scalar_value! {
    NodeId => NodeId,
    ExpandedNodeId => ExpandedNodeId,
    QualifiedName => QualifiedName,
    LocalizedText => LocalizedText,
    ExtensionObject => ExtensionObject,
}

// =============================================================================
// Arrays
// =============================================================================

impl<T: UaScalar> UaValue for Vec<T> {
    const SHAPE: ValueShape = ValueShape::Array;
    const BUILTIN: BuiltinType = T::BUILTIN;

    fn from_variant(value: Variant) -> Result<Self, ConversionError> {
        match value {
            Variant::Array(array) if !array.is_matrix() && array.element_type() == T::BUILTIN => {
                array.into_values().into_iter().map(T::from_variant).collect()
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }

    fn into_variant(self) -> Variant {
        let values = self.into_iter().map(UaValue::into_variant).collect();
        Variant::Array(Box::new(Array::from_parts(T::BUILTIN, values, None)))
    }
}

/// A typed multi-dimensional array, elements in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    dimensions: Vec<u32>,
    values: Vec<T>,
}

impl<T> Matrix<T> {
    /// Creates a matrix.
    ///
    /// # Errors
    ///
    /// Fails on fewer than two dimensions or when the product of the
    /// dimensions differs from the element count.
    pub fn new(dimensions: Vec<u32>, values: Vec<T>) -> Result<Self, ConversionError> {
        let expected: u64 = dimensions.iter().map(|d| u64::from(*d)).product();
        if dimensions.len() < 2 || expected != values.len() as u64 {
            return Err(ConversionError::invalid_array(format!(
                "dimensions {:?} do not fit {} elements",
                dimensions,
                values.len()
            )));
        }
        Ok(Self { dimensions, values })
    }

    /// Returns the dimensions.
    pub fn dimensions(&self) -> &[u32] {
        &self.dimensions
    }

    /// Returns the elements in row-major order.
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T: UaScalar> UaValue for Matrix<T> {
    const SHAPE: ValueShape = ValueShape::Matrix;
    const BUILTIN: BuiltinType = T::BUILTIN;

    fn from_variant(value: Variant) -> Result<Self, ConversionError> {
        match value {
            Variant::Array(array) if array.is_matrix() && array.element_type() == T::BUILTIN => {
                let dimensions = array.dimensions().map(<[u32]>::to_vec).unwrap_or_default();
                let values = array
                    .into_values()
                    .into_iter()
                    .map(T::from_variant)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self { dimensions, values })
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }

    fn into_variant(self) -> Variant {
        let values = self.values.into_iter().map(UaValue::into_variant).collect();
        Variant::Array(Box::new(Array::from_parts(
            T::BUILTIN,
            values,
            Some(self.dimensions),
        )))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_acceptance() {
        assert!(ValueShape::Scalar.accepts_rank(-1));
        assert!(!ValueShape::Scalar.accepts_rank(1));
        assert!(ValueShape::Array.accepts_rank(1));
        assert!(ValueShape::Array.accepts_rank(0));
        assert!(!ValueShape::Array.accepts_rank(-1));
        assert!(ValueShape::Matrix.accepts_rank(2));
        assert!(!ValueShape::Matrix.accepts_rank(1));
    }

    #[test]
    fn test_scalar_round_trip() {
        let text = LocalizedText::new("en", "hello");
        let back = LocalizedText::from_variant(text.clone().into_variant()).unwrap();
        assert_eq!(back, text);

        assert_eq!(u16::from_variant(Variant::UInt16(7)).unwrap(), 7);
    }

    #[test]
    fn test_strict_conversion() {
        let err = f64::from_variant(Variant::Float(1.0)).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::TypeMismatch {
                expected: BuiltinType::Double,
                ..
            }
        ));

        let err = i32::from_variant(Variant::Empty).unwrap_err();
        assert!(matches!(err, ConversionError::Empty { .. }));
    }

    #[test]
    fn test_shape_mismatch() {
        let array = vec![1.0f64, 2.0].into_variant();
        let err = f64::from_variant(array).unwrap_err();
        assert!(matches!(err, ConversionError::ShapeMismatch { expected: "scalar", .. }));

        let err = Vec::<f64>::from_variant(Variant::Double(1.0)).unwrap_err();
        assert!(matches!(err, ConversionError::ShapeMismatch { expected: "array", .. }));
    }

    #[test]
    fn test_array_element_type_checked() {
        let ints = vec![1i32, 2].into_variant();
        assert!(Vec::<u32>::from_variant(ints).is_err());
    }

    #[test]
    fn test_matrix_round_trip() {
        let matrix = Matrix::new(vec![2, 2], vec![1i16, 2, 3, 4]).unwrap();
        let variant = matrix.clone().into_variant();
        assert_eq!(variant.value_rank(), 2);
        assert_eq!(Matrix::<i16>::from_variant(variant).unwrap(), matrix);

        assert!(Matrix::new(vec![3], vec![1i16, 2, 3]).is_err());
    }
}
