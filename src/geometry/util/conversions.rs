//! Checked conversions between coordinate scalars and `f64`.
//!
//! The linear solves behind the circumcenter constructions run in `f64`.
//! Values crossing that boundary must stay finite both before and after the
//! cast; a narrowing cast that overflows to infinity is an error, not a value.

use std::any::type_name;
use std::fmt::Debug;

use num_traits::{Float, NumCast, cast};

use crate::geometry::traits::coordinate::{CoordinateConversionError, CoordinateScalar};

fn checked_cast<S, U>(value: S, coordinate_index: usize) -> Result<U, CoordinateConversionError>
where
    S: Float + Debug,
    U: Float + NumCast,
{
    let non_finite = || CoordinateConversionError::NonFiniteValue {
        coordinate_index,
        coordinate_value: format!("{value:?}"),
    };
    if !value.is_finite() {
        return Err(non_finite());
    }
    let converted: U = cast(value).ok_or_else(|| CoordinateConversionError::ConversionFailed {
        coordinate_index,
        coordinate_value: format!("{value:?}"),
        from_type: type_name::<S>(),
        to_type: type_name::<U>(),
    })?;
    if converted.is_finite() {
        Ok(converted)
    } else {
        Err(non_finite())
    }
}

/// Convert every coordinate of a point to `f64`.
///
/// # Errors
///
/// Returns [`CoordinateConversionError::NonFiniteValue`] naming the first NaN
/// or infinite coordinate, or [`CoordinateConversionError::ConversionFailed`]
/// if a cast fails.
///
/// # Examples
///
/// ```
/// use cached_simplex::geometry::util::safe_coords_to_f64;
///
/// assert_eq!(safe_coords_to_f64([1.5f32, 2.5, 3.5]).unwrap(), [1.5, 2.5, 3.5]);
/// assert!(safe_coords_to_f64([0.0, f64::NAN]).is_err());
/// ```
pub fn safe_coords_to_f64<T: CoordinateScalar, const D: usize>(
    coords: [T; D],
) -> Result<[f64; D], CoordinateConversionError> {
    let mut out = [0.0_f64; D];
    for (index, (slot, coord)) in out.iter_mut().zip(coords).enumerate() {
        *slot = checked_cast(coord, index)?;
    }
    Ok(out)
}

/// Convert one scalar (a weight, say) to `f64`.
///
/// # Errors
///
/// See [`safe_coords_to_f64`]; the reported index is 0.
pub fn safe_scalar_to_f64<T: CoordinateScalar>(value: T) -> Result<f64, CoordinateConversionError> {
    checked_cast(value, 0)
}

/// Convert one `f64` back to the coordinate scalar.
///
/// # Errors
///
/// Returns [`CoordinateConversionError::NonFiniteValue`] for non-finite input
/// and for values that overflow the target type.
///
/// # Examples
///
/// ```
/// use cached_simplex::geometry::util::safe_scalar_from_f64;
///
/// let value: f32 = safe_scalar_from_f64(0.25).unwrap();
/// assert_eq!(value, 0.25);
/// assert!(safe_scalar_from_f64::<f32>(1e300).is_err());
/// ```
pub fn safe_scalar_from_f64<T: CoordinateScalar>(
    value: f64,
) -> Result<T, CoordinateConversionError> {
    checked_cast(value, 0)
}
