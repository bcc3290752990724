//! Geometric utility functions: circumcenter constructions and safe numeric
//! conversions.

use thiserror::Error;

use crate::geometry::traits::coordinate::CoordinateConversionError;

pub mod circumsphere;
pub mod conversions;

pub use circumsphere::*;
pub use conversions::*;

/// Errors raised when a circumcenter (weighted or not) cannot be constructed.
///
/// # Examples
///
/// ```rust
/// use cached_simplex::geometry::util::CircumcenterError;
///
/// let err = CircumcenterError::EmptyPointSet;
/// assert_eq!(err.to_string(), "Empty point set");
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CircumcenterError {
    /// No points were supplied.
    #[error("Empty point set")]
    EmptyPointSet,

    /// The number of points does not match a D-simplex.
    #[error(
        "Points do not form a valid simplex: expected {expected} points for dimension {dimension}, got {actual}"
    )]
    InvalidSimplex {
        /// Number of points supplied.
        actual: usize,
        /// Number of points required (D+1).
        expected: usize,
        /// The dimension D.
        dimension: usize,
    },

    /// The linear system is singular: the points are affinely dependent
    /// (coincident, collinear, coplanar, ...).
    #[error("Matrix inversion failed: {details}")]
    MatrixInversionFailed {
        /// Description of the failure.
        details: String,
    },

    /// A coordinate or weight could not be converted, or the solution was not finite.
    #[error("Coordinate conversion error: {source}")]
    CoordinateConversion {
        /// The underlying conversion error.
        #[from]
        source: CoordinateConversionError,
    },
}
