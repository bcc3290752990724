//! The scalar bound shared by coordinates and weights, and the errors raised
//! when validating or converting them.
//!
//! Floats are not reflexive under `==`. [`CoordinateScalar`] adds a
//! NaN-reflexive comparison and a matching hash so points and weighted
//! points can implement `Eq` and `Hash`.
//!
//! ```rust
//! use cached_simplex::geometry::traits::coordinate::CoordinateScalar;
//!
//! assert!(f64::NAN.ordered_eq(&f64::NAN));
//! assert!(!f32::INFINITY.is_finite_generic());
//! ```

use num_traits::Float;
use ordered_float::OrderedFloat;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    fmt::Debug,
    hash::{Hash, Hasher},
};

/// Errors raised when a coordinate cannot be moved between scalar types.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoordinateConversionError {
    /// The numeric cast itself failed.
    #[error(
        "Failed to convert coordinate at index {coordinate_index} from {from_type} to {to_type}: {coordinate_value}"
    )]
    ConversionFailed {
        /// Position of the coordinate.
        coordinate_index: usize,
        /// Debug rendering of the value.
        coordinate_value: String,
        /// Source type name.
        from_type: &'static str,
        /// Target type name.
        to_type: &'static str,
    },
    /// The value (before or after the cast) is NaN or infinite.
    #[error(
        "Non-finite value (NaN or infinity) at coordinate index {coordinate_index}: {coordinate_value}"
    )]
    NonFiniteValue {
        /// Position of the coordinate.
        coordinate_index: usize,
        /// Debug rendering of the value.
        coordinate_value: String,
    },
}

/// Errors raised by [`Point::validate`](crate::geometry::point::Point::validate)
/// and [`WeightedPoint::validate`](crate::geometry::weighted_point::WeightedPoint::validate).
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoordinateValidationError {
    /// A coordinate is NaN or infinite.
    #[error(
        "Invalid coordinate at index {coordinate_index} in dimension {dimension}: {coordinate_value}"
    )]
    InvalidCoordinate {
        /// Position of the coordinate.
        coordinate_index: usize,
        /// Debug rendering of the value.
        coordinate_value: String,
        /// Dimension of the point.
        dimension: usize,
    },
    /// The weight of a weighted point is NaN or infinite.
    #[error("Invalid weight: {weight_value}")]
    InvalidWeight {
        /// Debug rendering of the weight.
        weight_value: String,
    },
}

/// Floating-point scalar usable as a coordinate or weight (`f32`, `f64`).
///
/// ```rust
/// use cached_simplex::geometry::traits::coordinate::CoordinateScalar;
///
/// fn same_site<T: CoordinateScalar>(a: &[T], b: &[T]) -> bool {
///     a.iter().zip(b).all(|(x, y)| x.ordered_eq(y))
/// }
///
/// assert!(same_site(&[1.0, f64::NAN], &[1.0, f64::NAN]));
/// ```
pub trait CoordinateScalar: Float + Default + Debug + Serialize + DeserializeOwned {
    /// Equality with NaN equal to itself; `0.0` and `-0.0` compare equal.
    fn ordered_eq(&self, other: &Self) -> bool;

    /// Feed the value to `state`, consistently with [`Self::ordered_eq`].
    fn hash_scalar<H: Hasher>(&self, state: &mut H);

    /// `true` unless the value is NaN or infinite.
    #[inline]
    fn is_finite_generic(&self) -> bool {
        Float::is_finite(*self)
    }
}

macro_rules! impl_coordinate_scalar {
    ($($t:ty),*) => {
        $(
            impl CoordinateScalar for $t {
                #[inline]
                fn ordered_eq(&self, other: &Self) -> bool {
                    OrderedFloat(*self) == OrderedFloat(*other)
                }

                #[inline]
                fn hash_scalar<H: Hasher>(&self, state: &mut H) {
                    OrderedFloat(*self).hash(state);
                }
            }
        )*
    };
}

impl_coordinate_scalar!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: CoordinateScalar>(value: T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash_scalar(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn ordered_eq_matches_hash_for_special_values() {
        for (a, b) in [
            (f64::NAN, f64::NAN),
            (f64::INFINITY, f64::INFINITY),
            (0.0, -0.0),
            (1.5, 1.5),
        ] {
            assert!(a.ordered_eq(&b));
            assert_eq!(hash_of(a), hash_of(b));
        }
        assert!(!f64::INFINITY.ordered_eq(&f64::NEG_INFINITY));
        assert!(!1.0f32.ordered_eq(&2.0));
    }

    #[test]
    fn finite_check_rejects_nan_and_infinity() {
        assert!(0.0f32.is_finite_generic());
        assert!(f64::MAX.is_finite_generic());
        assert!(!f32::NAN.is_finite_generic());
        assert!(!f64::NEG_INFINITY.is_finite_generic());
    }

    #[test]
    fn error_messages() {
        let err = CoordinateConversionError::NonFiniteValue {
            coordinate_index: 2,
            coordinate_value: "NaN".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Non-finite value (NaN or infinity) at coordinate index 2: NaN"
        );

        let err = CoordinateValidationError::InvalidWeight {
            weight_value: "inf".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid weight: inf");
    }
}
