//! Geometric kernels, in the CGAL sense: the constructions cells cache.
//!
//! A kernel maps the D+1 vertex sites of a simplex to one derived point. Cells
//! stay purely combinatorial: they only know how to gather their sites and
//! hand them to the kernel, so the same cell type can cache a circumcenter, a
//! weighted circumcenter, or any other per-cell construction.

use core::fmt::Debug;
use core::marker::PhantomData;

use crate::geometry::matrix::DEFAULT_PIVOT_TOLERANCE;
use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;
use crate::geometry::util::{
    CircumcenterError, circumcenter_with_tolerance, weighted_circumcenter_with_tolerance,
};
use crate::geometry::weighted_point::WeightedPoint;

/// Geometric kernel trait: the construction a cell caches.
///
/// Kernels must be pure. A cell may construct a fresh kernel with
/// [`Default`] for every query, so implementations must not rely on hidden
/// mutable state for correctness.
///
/// # Examples
///
/// ```
/// use cached_simplex::geometry::kernel::{FastKernel, Kernel};
/// use cached_simplex::geometry::point::Point;
///
/// let kernel = FastKernel::<f64>::new();
/// let triangle = [
///     Point::new([0.0, 0.0]),
///     Point::new([2.0, 0.0]),
///     Point::new([0.0, 2.0]),
/// ];
/// let center = kernel.construct_circumcenter(&triangle).unwrap();
/// assert_eq!(center, Point::new([1.0, 1.0]));
/// ```
pub trait Kernel<const D: usize>: Clone + Default {
    /// The scalar type used for coordinates.
    type Scalar: CoordinateScalar;

    /// Per-vertex input of the construction (a bare point, a weighted point, ...).
    type Site: Clone + Debug;

    /// Construct the derived point of a simplex.
    ///
    /// # Arguments
    ///
    /// * `sites` - Slice of exactly D+1 sites forming the simplex
    ///
    /// # Errors
    ///
    /// Returns an error if the number of sites is not D+1 or the simplex is
    /// degenerate (coincident or affinely dependent vertices).
    fn construct_circumcenter(
        &self,
        sites: &[Self::Site],
    ) -> Result<Point<Self::Scalar, D>, CircumcenterError>;
}

/// Fast floating-point kernel computing the ordinary circumcenter.
///
/// # Examples
///
/// ```
/// use cached_simplex::geometry::kernel::{FastKernel, Kernel};
/// use cached_simplex::geometry::point::Point;
///
/// let kernel = FastKernel::<f64>::new();
/// let tetrahedron = [
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ];
/// let center = kernel.construct_circumcenter(&tetrahedron).unwrap();
/// assert_eq!(center, Point::new([0.5, 0.5, 0.5]));
/// ```
#[derive(Clone, Debug)]
pub struct FastKernel<T: CoordinateScalar> {
    pivot_tolerance: f64,
    _phantom: PhantomData<T>,
}

impl<T: CoordinateScalar> FastKernel<T> {
    /// Create a new fast kernel.
    ///
    /// # Examples
    ///
    /// ```
    /// use cached_simplex::geometry::kernel::FastKernel;
    ///
    /// let kernel = FastKernel::<f64>::new();
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::with_pivot_tolerance(DEFAULT_PIVOT_TOLERANCE)
    }

    /// Create a fast kernel with a custom LU pivot tolerance.
    #[must_use]
    pub const fn with_pivot_tolerance(pivot_tolerance: f64) -> Self {
        Self {
            pivot_tolerance,
            _phantom: PhantomData,
        }
    }

    /// The LU pivot tolerance used by this kernel.
    #[must_use]
    pub const fn pivot_tolerance(&self) -> f64 {
        self.pivot_tolerance
    }
}

impl<T: CoordinateScalar> Default for FastKernel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const D: usize> Kernel<D> for FastKernel<T>
where
    T: CoordinateScalar,
{
    type Scalar = T;
    type Site = Point<T, D>;

    fn construct_circumcenter(
        &self,
        sites: &[Self::Site],
    ) -> Result<Point<T, D>, CircumcenterError> {
        circumcenter_with_tolerance(sites, self.pivot_tolerance)
    }
}

/// Kernel for regular (weighted Delaunay) triangulations computing the
/// weighted circumcenter of weighted points.
///
/// # Examples
///
/// ```
/// use cached_simplex::geometry::kernel::{Kernel, RegularKernel};
/// use cached_simplex::geometry::point::Point;
/// use cached_simplex::geometry::weighted_point::WeightedPoint;
///
/// let kernel = RegularKernel::<f64>::new();
/// let sites = [
///     WeightedPoint::new(Point::new([0.0, 0.0, 0.0]), 1.0),
///     WeightedPoint::new(Point::new([1.0, 0.0, 0.0]), 0.0),
///     WeightedPoint::new(Point::new([0.0, 1.0, 0.0]), 0.0),
///     WeightedPoint::new(Point::new([0.0, 0.0, 1.0]), 0.0),
/// ];
/// let center = kernel.construct_circumcenter(&sites).unwrap();
/// assert_eq!(center, Point::new([1.0, 1.0, 1.0]));
/// ```
#[derive(Clone, Debug)]
pub struct RegularKernel<T: CoordinateScalar> {
    pivot_tolerance: f64,
    _phantom: PhantomData<T>,
}

impl<T: CoordinateScalar> RegularKernel<T> {
    /// Create a new regular kernel.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_pivot_tolerance(DEFAULT_PIVOT_TOLERANCE)
    }

    /// Create a regular kernel with a custom LU pivot tolerance.
    ///
    /// # Examples
    ///
    /// ```
    /// use cached_simplex::geometry::kernel::RegularKernel;
    ///
    /// let strict = RegularKernel::<f64>::with_pivot_tolerance(1e-6);
    /// assert_eq!(strict.pivot_tolerance(), 1e-6);
    /// ```
    #[must_use]
    pub const fn with_pivot_tolerance(pivot_tolerance: f64) -> Self {
        Self {
            pivot_tolerance,
            _phantom: PhantomData,
        }
    }

    /// The LU pivot tolerance used by this kernel.
    #[must_use]
    pub const fn pivot_tolerance(&self) -> f64 {
        self.pivot_tolerance
    }
}

impl<T: CoordinateScalar> Default for RegularKernel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const D: usize> Kernel<D> for RegularKernel<T>
where
    T: CoordinateScalar,
{
    type Scalar = T;
    type Site = WeightedPoint<T, D>;

    fn construct_circumcenter(
        &self,
        sites: &[Self::Site],
    ) -> Result<Point<T, D>, CircumcenterError> {
        weighted_circumcenter_with_tolerance(sites, self.pivot_tolerance)
    }
}
