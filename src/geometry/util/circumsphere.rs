//! Circumsphere constructions for simplices.
//!
//! The circumcenter `C` of a simplex `x_0 .. x_D` solves the linear system
//!
//! ```text
//! 2 (x_i - x_0) · (C - x_0) = |x_i - x_0|²            i = 1..D
//! ```
//!
//! obtained by subtracting the sphere equation at `x_0` from the one at `x_i`.
//! The weighted circumcenter (orthocenter) of weighted points `(x_i, w_i)` is
//! the point with equal power distance `|C - x_i|² - w_i` to every vertex; it
//! solves the same system with right-hand side `|x_i - x_0|² - (w_i - w_0)`.
//! With all weights equal the two coincide.

use num_traits::Float;

use crate::geometry::matrix::{DEFAULT_PIVOT_TOLERANCE, Matrix, lu_solve, matrix_set};
use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;
use crate::geometry::weighted_point::WeightedPoint;

use super::CircumcenterError;
use super::conversions::{safe_coords_to_f64, safe_scalar_from_f64, safe_scalar_to_f64};

fn check_simplex_len<const D: usize>(len: usize) -> Result<(), CircumcenterError> {
    if len == 0 {
        return Err(CircumcenterError::EmptyPointSet);
    }
    if len != D + 1 {
        return Err(CircumcenterError::InvalidSimplex {
            actual: len,
            expected: D + 1,
            dimension: D,
        });
    }
    Ok(())
}

/// Shared solver: `points` are the simplex vertices, `weights` their weights
/// (all zero for the unweighted construction).
fn solve_center<T, const D: usize>(
    points: &[&Point<T, D>],
    weights: &[T],
    pivot_tolerance: f64,
) -> Result<Point<T, D>, CircumcenterError>
where
    T: CoordinateScalar,
{
    check_simplex_len::<D>(points.len())?;

    let coords_0 = points[0].coords();
    let coords_0_f64 = safe_coords_to_f64(*coords_0)?;
    let w_0 = safe_scalar_to_f64(weights[0])?;

    let mut a = Matrix::<D>::zero();
    let mut b = [0.0f64; D];

    for i in 0..D {
        let coords_i_f64 = safe_coords_to_f64(*points[i + 1].coords())?;
        let w_i = safe_scalar_to_f64(weights[i + 1])?;

        let mut squared_distance = 0.0f64;
        for j in 0..D {
            let diff = coords_i_f64[j] - coords_0_f64[j];
            matrix_set(&mut a, i, j, diff);
            squared_distance = diff.mul_add(diff, squared_distance);
        }
        b[i] = squared_distance - (w_i - w_0);
    }

    let x = lu_solve(&a, b, pivot_tolerance).map_err(|e| {
        CircumcenterError::MatrixInversionFailed {
            details: format!("LU solve failed: {e}"),
        }
    })?;

    // C = x_0 + x / 2
    let mut center = [T::zero(); D];
    for i in 0..D {
        let relative: T = safe_scalar_from_f64(0.5 * x[i])?;
        center[i] = coords_0[i] + relative;
    }
    let center = Point::new(center);
    center
        .validate()
        .map_err(|e| CircumcenterError::MatrixInversionFailed {
            details: format!("non-finite circumcenter: {e}"),
        })?;
    Ok(center)
}

/// Calculate the circumcenter of a set of points forming a simplex.
///
/// # Errors
///
/// Returns an error if the number of points is not D+1, if the points are
/// affinely dependent, or if a coordinate is not finite.
///
/// # Example
///
/// ```
/// use cached_simplex::geometry::point::Point;
/// use cached_simplex::geometry::util::circumcenter;
///
/// let points = [
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ];
/// assert_eq!(circumcenter(&points).unwrap(), Point::new([0.5, 0.5, 0.5]));
/// ```
pub fn circumcenter<T, const D: usize>(
    points: &[Point<T, D>],
) -> Result<Point<T, D>, CircumcenterError>
where
    T: CoordinateScalar,
{
    circumcenter_with_tolerance(points, DEFAULT_PIVOT_TOLERANCE)
}

/// [`circumcenter`] with an explicit LU pivot tolerance.
///
/// # Errors
///
/// See [`circumcenter`].
pub fn circumcenter_with_tolerance<T, const D: usize>(
    points: &[Point<T, D>],
    pivot_tolerance: f64,
) -> Result<Point<T, D>, CircumcenterError>
where
    T: CoordinateScalar,
{
    let refs: Vec<&Point<T, D>> = points.iter().collect();
    let weights = vec![T::zero(); points.len()];
    solve_center(&refs, &weights, pivot_tolerance)
}

/// Calculate the weighted circumcenter of weighted points forming a simplex.
///
/// The result has equal power distance to every weighted vertex.
///
/// # Errors
///
/// Returns an error if the number of points is not D+1, if the points are
/// affinely dependent, or if a coordinate or weight is not finite.
///
/// # Example
///
/// ```
/// use cached_simplex::geometry::point::Point;
/// use cached_simplex::geometry::weighted_point::WeightedPoint;
/// use cached_simplex::geometry::util::weighted_circumcenter;
///
/// let sites = [
///     WeightedPoint::new(Point::new([0.0, 0.0, 0.0]), 1.0),
///     WeightedPoint::new(Point::new([1.0, 0.0, 0.0]), 0.0),
///     WeightedPoint::new(Point::new([0.0, 1.0, 0.0]), 0.0),
///     WeightedPoint::new(Point::new([0.0, 0.0, 1.0]), 0.0),
/// ];
/// assert_eq!(weighted_circumcenter(&sites).unwrap(), Point::new([1.0, 1.0, 1.0]));
/// ```
pub fn weighted_circumcenter<T, const D: usize>(
    sites: &[WeightedPoint<T, D>],
) -> Result<Point<T, D>, CircumcenterError>
where
    T: CoordinateScalar,
{
    weighted_circumcenter_with_tolerance(sites, DEFAULT_PIVOT_TOLERANCE)
}

/// [`weighted_circumcenter`] with an explicit LU pivot tolerance.
///
/// # Errors
///
/// See [`weighted_circumcenter`].
pub fn weighted_circumcenter_with_tolerance<T, const D: usize>(
    sites: &[WeightedPoint<T, D>],
    pivot_tolerance: f64,
) -> Result<Point<T, D>, CircumcenterError>
where
    T: CoordinateScalar,
{
    let points: Vec<&Point<T, D>> = sites.iter().map(WeightedPoint::point).collect();
    let weights: Vec<T> = sites.iter().map(WeightedPoint::weight).collect();
    solve_center(&points, &weights, pivot_tolerance)
}

/// Calculate the circumradius of a simplex.
///
/// # Errors
///
/// See [`circumcenter`].
pub fn circumradius<T, const D: usize>(points: &[Point<T, D>]) -> Result<T, CircumcenterError>
where
    T: CoordinateScalar,
{
    let center = circumcenter(points)?;
    Ok(Float::sqrt(center.squared_distance(&points[0])))
}

/// Squared radius of the orthogonal sphere of a weighted simplex, i.e. the
/// common power distance from the weighted circumcenter to every vertex.
///
/// Negative values are meaningful: the orthogonal sphere is imaginary.
///
/// # Errors
///
/// See [`weighted_circumcenter`].
pub fn weighted_circumradius_squared<T, const D: usize>(
    sites: &[WeightedPoint<T, D>],
) -> Result<T, CircumcenterError>
where
    T: CoordinateScalar,
{
    let center = weighted_circumcenter(sites)?;
    Ok(sites[0].power_distance(&center))
}
