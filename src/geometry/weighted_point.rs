//! Weighted points for regular (power) triangulations.
//!
//! A weighted point `(p, w)` represents a sphere centred at `p` with squared
//! radius `w`. The **power distance** from a bare point `x` to `(p, w)` is
//! `|x - p|² - w`; the weighted circumcenter of a simplex is the unique point
//! with equal power distance to all of its weighted vertices.

use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::{CoordinateScalar, CoordinateValidationError};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A point in D-dimensional space carrying a scalar weight.
///
/// # Examples
///
/// ```rust
/// use cached_simplex::geometry::point::Point;
/// use cached_simplex::geometry::weighted_point::WeightedPoint;
///
/// let wp = WeightedPoint::new(Point::new([1.0, 0.0, 0.0]), 0.25);
/// assert_eq!(wp.weight(), 0.25);
/// assert_eq!(wp.power_distance(&Point::new([0.0, 0.0, 0.0])), 0.75);
/// ```
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct WeightedPoint<T, const D: usize>
where
    T: CoordinateScalar,
{
    point: Point<T, D>,
    weight: T,
}

// NaN-aware, consistent with `Point`.
impl<T, const D: usize> PartialEq for WeightedPoint<T, D>
where
    T: CoordinateScalar,
{
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point && self.weight.ordered_eq(&other.weight)
    }
}

impl<T, const D: usize> Eq for WeightedPoint<T, D> where T: CoordinateScalar {}

impl<T, const D: usize> Hash for WeightedPoint<T, D>
where
    T: CoordinateScalar,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.point.hash(state);
        self.weight.hash_scalar(state);
    }
}

impl<T, const D: usize> WeightedPoint<T, D>
where
    T: CoordinateScalar,
{
    /// Create a weighted point.
    #[inline]
    #[must_use]
    pub const fn new(point: Point<T, D>, weight: T) -> Self {
        Self { point, weight }
    }

    /// A weighted point with zero weight; its power distance is the squared
    /// Euclidean distance.
    #[inline]
    #[must_use]
    pub fn unweighted(point: Point<T, D>) -> Self {
        Self::new(point, T::zero())
    }

    /// The bare point.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> &Point<T, D> {
        &self.point
    }

    /// The weight (squared radius of the associated sphere).
    #[inline]
    #[must_use]
    pub const fn weight(&self) -> T {
        self.weight
    }

    /// Power distance `|x - p|² - w` from a bare point to this weighted point.
    #[inline]
    #[must_use]
    pub fn power_distance(&self, x: &Point<T, D>) -> T {
        self.point.squared_distance(x) - self.weight
    }

    /// Validates the coordinates and the weight.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateValidationError::InvalidCoordinate`] for a
    /// non-finite coordinate and [`CoordinateValidationError::InvalidWeight`]
    /// for a non-finite weight.
    pub fn validate(&self) -> Result<(), CoordinateValidationError> {
        self.point.validate()?;
        if !self.weight.is_finite_generic() {
            return Err(CoordinateValidationError::InvalidWeight {
                weight_value: format!("{:?}", self.weight),
            });
        }
        Ok(())
    }
}

impl<T, const D: usize> From<Point<T, D>> for WeightedPoint<T, D>
where
    T: CoordinateScalar,
{
    fn from(point: Point<T, D>) -> Self {
        Self::unweighted(point)
    }
}
