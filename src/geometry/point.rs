//! Fixed-dimension points: the vertex positions kernels consume and the
//! derived points cells cache.
//!
//! # Equality
//!
//! `Point` equality treats `NaN` as equal to itself so that points satisfy
//! `Eq` and can be used as hash keys. Compare the coordinates directly if
//! IEEE 754 semantics are needed.

#![forbid(unsafe_code)]

use crate::geometry::traits::coordinate::{CoordinateScalar, CoordinateValidationError};
use serde::de::{Error, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

// =============================================================================
// POINT STRUCT DEFINITION
// =============================================================================

#[derive(Clone, Copy, Debug)]
/// A point in `D`-dimensional space with scalar coordinates `T`.
///
/// Points are plain `Copy` values; a cached derived point is handed out by
/// reference and copied by callers that keep it.
///
/// # Example
///
/// ```rust
/// use cached_simplex::geometry::point::Point;
///
/// let apex = Point::new([0.5, 0.5, 0.5]);
/// assert_eq!(apex.coords(), &[0.5, 0.5, 0.5]);
/// assert_eq!(apex.dim(), 3);
/// ```
pub struct Point<T, const D: usize>
where
    T: CoordinateScalar,
{
    coords: [T; D],
}

// =============================================================================
// PUBLIC API
// =============================================================================

impl<T, const D: usize> Point<T, D>
where
    T: CoordinateScalar,
{
    /// Create a new point from an array of coordinates.
    #[inline]
    #[must_use]
    pub const fn new(coords: [T; D]) -> Self {
        Self { coords }
    }

    /// The origin of the coordinate system.
    ///
    /// ```rust
    /// use cached_simplex::geometry::point::Point;
    ///
    /// let origin: Point<f64, 3> = Point::origin();
    /// assert_eq!(origin.to_array(), [0.0, 0.0, 0.0]);
    /// ```
    #[inline]
    #[must_use]
    pub fn origin() -> Self {
        Self {
            coords: [T::zero(); D],
        }
    }

    /// Returns a reference to the point's coordinates.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> &[T; D] {
        &self.coords
    }

    /// Returns the coordinates by value.
    #[inline]
    #[must_use]
    pub const fn to_array(&self) -> [T; D] {
        self.coords
    }

    /// Returns the coordinate at `index`, or `None` if out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.coords.get(index).copied()
    }

    /// The dimension `D` of the point.
    #[inline]
    #[must_use]
    pub const fn dim(&self) -> usize {
        D
    }

    /// Validates that all coordinates are finite.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateValidationError::InvalidCoordinate`] for the first
    /// NaN or infinite coordinate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cached_simplex::geometry::point::Point;
    ///
    /// assert!(Point::new([1.0, 2.0]).validate().is_ok());
    /// assert!(Point::new([f64::NAN, 2.0]).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), CoordinateValidationError> {
        for (index, &coord) in self.coords.iter().enumerate() {
            if !coord.is_finite_generic() {
                return Err(CoordinateValidationError::InvalidCoordinate {
                    coordinate_index: index,
                    coordinate_value: format!("{coord:?}"),
                    dimension: D,
                });
            }
        }
        Ok(())
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn squared_distance(&self, other: &Self) -> T {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .fold(T::zero(), |acc, (&a, &b)| {
                let d = a - b;
                acc + d * d
            })
    }

    /// Check coordinate-wise equality with NaN equal to itself.
    #[must_use]
    pub fn ordered_equals(&self, other: &Self) -> bool {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .all(|(a, b)| a.ordered_eq(b))
    }
}

// =============================================================================
// STANDARD TRAIT IMPLEMENTATIONS
// =============================================================================

impl<T, const D: usize> Hash for Point<T, D>
where
    T: CoordinateScalar,
{
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        for &coord in &self.coords {
            coord.hash_scalar(state);
        }
    }
}

impl<T, const D: usize> PartialEq for Point<T, D>
where
    T: CoordinateScalar,
{
    fn eq(&self, other: &Self) -> bool {
        self.ordered_equals(other)
    }
}

impl<T, const D: usize> Eq for Point<T, D> where T: CoordinateScalar {}

impl<T, const D: usize> Default for Point<T, D>
where
    T: CoordinateScalar,
{
    fn default() -> Self {
        Self::origin()
    }
}

impl<T, const D: usize> From<[T; D]> for Point<T, D>
where
    T: CoordinateScalar,
{
    #[inline]
    fn from(coords: [T; D]) -> Self {
        Self::new(coords)
    }
}

impl<T, const D: usize> From<Point<T, D>> for [T; D]
where
    T: CoordinateScalar,
{
    #[inline]
    fn from(point: Point<T, D>) -> [T; D] {
        point.to_array()
    }
}

// =============================================================================
// SERIALIZATION
// =============================================================================

// `[T; D]` has no serde impls for a generic `D`, so points go through a tuple
// of exactly `D` scalars.
impl<T, const D: usize> Serialize for Point<T, D>
where
    T: CoordinateScalar,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut tuple = serializer.serialize_tuple(D)?;
        for coord in &self.coords {
            tuple.serialize_element(coord)?;
        }
        tuple.end()
    }
}

struct CoordsVisitor<T, const D: usize>(PhantomData<T>);

impl<'de, T, const D: usize> Visitor<'de> for CoordsVisitor<T, D>
where
    T: CoordinateScalar,
{
    type Value = Point<T, D>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{D} coordinates")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut coords = [T::zero(); D];
        for (read, slot) in coords.iter_mut().enumerate() {
            *slot = seq
                .next_element()?
                .ok_or_else(|| A::Error::invalid_length(read, &self))?;
        }
        Ok(Point::new(coords))
    }
}

impl<'de, T, const D: usize> Deserialize<'de> for Point<T, D>
where
    T: CoordinateScalar,
{
    fn deserialize<DE>(deserializer: DE) -> Result<Self, DE::Error>
    where
        DE: serde::Deserializer<'de>,
    {
        deserializer.deserialize_tuple(D, CoordsVisitor(PhantomData))
    }
}
