// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Conversion between variant lists and typed argument tuples.
//!
//! Inputs and outputs of a method are tuples with one [`UaValue`] slot per
//! argument, in declared order. `()` stands for no arguments.

use uamodel_core::{ConversionError, UaValue, Variant};

/// A tuple built from a list of variants.
pub trait FromVariants: Sized + Send + 'static {
    /// Number of slots.
    const COUNT: usize;

    /// Converts `values` slot by slot.
    ///
    /// # Errors
    ///
    /// Returns the index of the first slot that failed to convert, with the
    /// reason. A missing value is converted from `Empty`.
    fn from_variants(values: Vec<Variant>) -> Result<Self, (usize, ConversionError)>;
}

/// A tuple flattened into a list of variants.
pub trait IntoVariants: Send + 'static {
    /// Number of slots.
    const COUNT: usize;

    /// Converts every slot, in order.
    fn into_variants(self) -> Vec<Variant>;
}

macro_rules! tuple_marshal {
    ($count:expr; $($name:ident : $index:tt),*) => {
        impl<$($name: UaValue),*> FromVariants for ($($name,)*) {
            const COUNT: usize = $count;

            #[allow(unused_mut, unused_variables)]
            fn from_variants(values: Vec<Variant>) -> Result<Self, (usize, ConversionError)> {
                let mut values = values.into_iter();
                Ok(($(
                    $name::from_variant(values.next().unwrap_or_default())
                        .map_err(|e| ($index, e))?,
                )*))
            }
        }

        impl<$($name: UaValue),*> IntoVariants for ($($name,)*) {
            const COUNT: usize = $count;

            fn into_variants(self) -> Vec<Variant> {
                vec![$(self.$index.into_variant()),*]
            }
        }
    };
}

tuple_marshal!(0;);
tuple_marshal!(1; A: 0);
tuple_marshal!(2; A: 0, B: 1);
tuple_marshal!(3; A: 0, B: 1, C: 2);
tuple_marshal!(4; A: 0, B: 1, C: 2, D: 3);
tuple_marshal!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
tuple_marshal!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
tuple_marshal!(7; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
tuple_marshal!(8; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

#[cfg(test)]
mod tests {
    use super::*;
    use uamodel_core::{ByteString, LocalizedText};

    #[test]
    fn test_unit() {
        assert_eq!(<() as FromVariants>::COUNT, 0);
        assert!(<()>::from_variants(Vec::new()).is_ok());
        assert!(().into_variants().is_empty());
    }

    #[test]
    fn test_pair_in_declared_order() {
        let inputs = vec![
            ByteString::from(vec![7u8]).into_variant(),
            LocalizedText::new("en", "hello").into_variant(),
        ];
        let (event_id, comment) = <(ByteString, LocalizedText)>::from_variants(inputs).unwrap();
        assert_eq!(event_id.as_bytes(), &[7]);
        assert_eq!(comment, LocalizedText::new("en", "hello"));
    }

    #[test]
    fn test_failing_slot_is_reported() {
        let inputs = vec![Variant::UInt32(1), Variant::Int32(-1)];
        let (index, error) = <(u32, u64)>::from_variants(inputs).unwrap_err();
        assert_eq!(index, 1);
        assert!(matches!(error, ConversionError::TypeMismatch { .. }));

        let (index, error) = <(u32,)>::from_variants(vec![Variant::Empty]).unwrap_err();
        assert_eq!(index, 0);
        assert!(matches!(error, ConversionError::Empty { .. }));
    }

    #[test]
    fn test_outputs() {
        let outputs = (42u32, ByteString::from(vec![1u8, 2, 3])).into_variants();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0], Variant::UInt32(42));
    }
}
