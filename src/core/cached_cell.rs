//! Cells decorated with a lazily computed, cached derived point.
//!
//! [`CachedCell`] wraps any [`CellBase`] and adds one derived geometric
//! attribute: the point a [`Kernel`] constructs from the cell's vertex sites
//! (the circumcenter, the weighted circumcenter, ...). The point is computed on
//! first query and memoized until the vertex set changes.
//!
//! # Cache discipline
//!
//! - The cache is empty after construction.
//! - Every vertex mutator ([`CellBase::set_vertex`], [`CellBase::set_vertices`],
//!   [`CellBase::clear_vertices`]) empties the cache before delegating.
//!   Mutators take `&mut self`, so no reference returned by a query can
//!   outlive the state it was computed from.
//! - Neighbor mutators leave the cache alone.
//! - A host that moves a vertex in place (same handle, new site) must call
//!   [`CachedCell::invalidate`] or [`CellBase::invalidate_caches`].
//! - A failed computation stores nothing; the next query retries.
//! - Clones own an independent copy of the cache, in the source's exact state.
//!
//! The cache slot is a single-threaded [`OnceCell`]: a `CachedCell` can be
//! sent to another thread but not shared between threads without external
//! synchronization.
//!
//! # Examples
//!
//! ```rust
//! use cached_simplex::prelude::*;
//!
//! let sites = vec![
//!     WeightedPoint::new(Point::new([0.0, 0.0, 0.0]), 1.0),
//!     WeightedPoint::new(Point::new([1.0, 0.0, 0.0]), 0.0),
//!     WeightedPoint::new(Point::new([0.0, 1.0, 0.0]), 0.0),
//!     WeightedPoint::new(Point::new([0.0, 0.0, 1.0]), 0.0),
//!     WeightedPoint::new(Point::new([0.0, 2.0, 0.0]), 0.0),
//! ];
//!
//! let mut cell = RegularCell3::<f64>::from_vertices(&[0, 1, 2, 3]).unwrap();
//! assert!(!cell.is_cached());
//! assert_eq!(*cell.derived_point(&sites).unwrap(), Point::new([1.0, 1.0, 1.0]));
//! assert!(cell.is_cached());
//!
//! cell.set_vertex(2, 4);
//! assert!(!cell.is_cached());
//! assert_eq!(*cell.derived_point(&sites).unwrap(), Point::new([1.0, 1.25, 1.0]));
//! ```

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use once_cell::unsync::OnceCell;
use thiserror::Error;

use crate::core::cell::{
    CellBase, CellBase2, CellBase3, CellValidationError, RebindTds, Rebound, TdsHandles, Unbound,
};
use crate::core::collections::SimplexBuffer;
use crate::core::traits::VertexSites;
use crate::geometry::kernel::{FastKernel, Kernel, RegularKernel};
use crate::geometry::point::Point;
use crate::geometry::util::CircumcenterError;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised while computing or verifying a cached derived point.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CachedCellError {
    /// The kernel could not construct the point (degenerate simplex, ...).
    #[error("Kernel failed to construct the derived point: {source}")]
    Kernel {
        /// The underlying kernel error.
        #[from]
        source: CircumcenterError,
    },
    /// A vertex slot of the cell is empty.
    #[error("Vertex slot {index} is empty")]
    MissingVertex {
        /// The empty slot.
        index: usize,
    },
    /// The site lookup does not know the handle stored in a slot.
    #[error("Vertex {handle} in slot {index} has no site")]
    VertexNotFound {
        /// The slot holding the handle.
        index: usize,
        /// Debug rendering of the handle.
        handle: String,
    },
    /// A cached value differs from a fresh recomputation: some vertex change
    /// bypassed invalidation.
    #[error("Stale derived point: cached {cached}, recomputed {recomputed}")]
    StaleDerivedPoint {
        /// Debug rendering of the cached point.
        cached: String,
        /// Debug rendering of the recomputed point.
        recomputed: String,
    },
}

// =============================================================================
// CACHED CELL
// =============================================================================

/// A cell decorated with a lazily computed, cached derived point.
///
/// `K` is the kernel performing the construction, `Cb` the wrapped base cell
/// and `D` the dimension of the derived point.
pub struct CachedCell<K, Cb, const D: usize>
where
    K: Kernel<D>,
    Cb: CellBase,
{
    base: Cb,
    cache: OnceCell<Point<K::Scalar, D>>,
    _kernel: PhantomData<fn() -> K>,
}

/// Cell caching the weighted circumcenter of a tetrahedron.
pub type RegularCell3<T> = CachedCell<RegularKernel<T>, CellBase3<Unbound>, 3>;

/// Cell caching the weighted circumcenter of a triangle.
pub type RegularCell2<T> = CachedCell<RegularKernel<T>, CellBase2<Unbound>, 2>;

/// Cell caching the circumcenter of a tetrahedron.
pub type DelaunayCell3<T> = CachedCell<FastKernel<T>, CellBase3<Unbound>, 3>;

/// Cell caching the circumcenter of a triangle.
pub type DelaunayCell2<T> = CachedCell<FastKernel<T>, CellBase2<Unbound>, 2>;

impl<K, Cb, const D: usize> CachedCell<K, Cb, D>
where
    K: Kernel<D>,
    Cb: CellBase,
{
    /// Wrap a base cell. The cache starts empty.
    #[must_use]
    pub const fn new(base: Cb) -> Self {
        Self {
            base,
            cache: OnceCell::new(),
            _kernel: PhantomData,
        }
    }

    /// The wrapped base cell.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> &Cb {
        &self.base
    }

    /// Unwrap into the base cell, dropping the cache.
    #[must_use]
    pub fn into_base(self) -> Cb {
        self.base
    }

    /// Whether a derived point is currently cached.
    #[inline]
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    /// The cached derived point, without computing it.
    #[inline]
    #[must_use]
    pub fn cached_derived_point(&self) -> Option<&Point<K::Scalar, D>> {
        self.cache.get()
    }

    /// Discard the cached derived point; the next query recomputes it.
    pub fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            tracing::trace!(cell = ?self.base, "invalidated cached derived point");
        }
    }

    /// The derived point, computed with a default-constructed kernel on a
    /// cache miss.
    ///
    /// # Errors
    ///
    /// See [`Self::derived_point_with`].
    pub fn derived_point<V>(&self, sites: &V) -> Result<&Point<K::Scalar, D>, CachedCellError>
    where
        V: VertexSites<Cb::VertexHandle, Site = K::Site> + ?Sized,
    {
        self.derived_point_with(&K::default(), sites)
    }

    /// The derived point, computed with `kernel` on a cache miss.
    ///
    /// The returned reference lives until the next mutation of this cell;
    /// copy the point to keep it longer. On failure the cache stays empty.
    ///
    /// With the `expensive-checks` feature, a cache hit is recomputed and
    /// compared against the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`CachedCellError::MissingVertex`] or
    /// [`CachedCellError::VertexNotFound`] if a site cannot be gathered,
    /// [`CachedCellError::Kernel`] if the kernel fails, and (with
    /// `expensive-checks`) [`CachedCellError::StaleDerivedPoint`].
    pub fn derived_point_with<V>(
        &self,
        kernel: &K,
        sites: &V,
    ) -> Result<&Point<K::Scalar, D>, CachedCellError>
    where
        V: VertexSites<Cb::VertexHandle, Site = K::Site> + ?Sized,
    {
        if let Some(cached) = self.cache.get() {
            if cfg!(feature = "expensive-checks") {
                self.check_cached(cached, kernel, sites)?;
            }
            return Ok(cached);
        }

        self.cache.get_or_try_init(|| {
            let point = self.compute_derived_point(kernel, sites)?;
            tracing::trace!(cell = ?self.base, ?point, "cached derived point");
            Ok(point)
        })
    }

    /// Compute the derived point from the current vertex sites, bypassing
    /// and leaving untouched the cache.
    ///
    /// # Errors
    ///
    /// See [`Self::derived_point_with`].
    pub fn compute_derived_point<V>(
        &self,
        kernel: &K,
        sites: &V,
    ) -> Result<Point<K::Scalar, D>, CachedCellError>
    where
        V: VertexSites<Cb::VertexHandle, Site = K::Site> + ?Sized,
    {
        let mut gathered: SimplexBuffer<K::Site> = SimplexBuffer::new();
        for (index, slot) in self.base.vertices().iter().enumerate() {
            let handle = slot.ok_or(CachedCellError::MissingVertex { index })?;
            let site = sites
                .site(handle)
                .ok_or_else(|| CachedCellError::VertexNotFound {
                    index,
                    handle: format!("{handle:?}"),
                })?;
            gathered.push(site.clone());
        }
        Ok(kernel.construct_circumcenter(&gathered)?)
    }

    /// Recompute the derived point and compare it with the cached value.
    ///
    /// An empty cache verifies trivially and stays empty. This is an opt-in
    /// consistency check: it costs a full kernel evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`CachedCellError::StaleDerivedPoint`] on a mismatch, or any
    /// error of the recomputation.
    pub fn verify_derived_point<V>(&self, kernel: &K, sites: &V) -> Result<(), CachedCellError>
    where
        V: VertexSites<Cb::VertexHandle, Site = K::Site> + ?Sized,
    {
        match self.cache.get() {
            Some(cached) => self.check_cached(cached, kernel, sites),
            None => Ok(()),
        }
    }

    fn check_cached<V>(
        &self,
        cached: &Point<K::Scalar, D>,
        kernel: &K,
        sites: &V,
    ) -> Result<(), CachedCellError>
    where
        V: VertexSites<Cb::VertexHandle, Site = K::Site> + ?Sized,
    {
        let recomputed = self.compute_derived_point(kernel, sites)?;
        if recomputed == *cached {
            return Ok(());
        }
        tracing::warn!(
            cell = ?self.base,
            ?cached,
            ?recomputed,
            "cached derived point is stale"
        );
        Err(CachedCellError::StaleDerivedPoint {
            cached: format!("{cached:?}"),
            recomputed: format!("{recomputed:?}"),
        })
    }
}

impl<K, Cb, const D: usize> Clone for CachedCell<K, Cb, D>
where
    K: Kernel<D>,
    Cb: CellBase,
{
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            cache: self.cache.clone(),
            _kernel: PhantomData,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.base.clone_from(&source.base);
        self.cache.clone_from(&source.cache);
    }
}

impl<K, Cb, const D: usize> Debug for CachedCell<K, Cb, D>
where
    K: Kernel<D>,
    Cb: CellBase,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedCell")
            .field("base", &self.base)
            .field("cached_point", &self.cache.get())
            .finish()
    }
}

impl<K, Cb, const D: usize> Default for CachedCell<K, Cb, D>
where
    K: Kernel<D>,
    Cb: CellBase + Default,
{
    fn default() -> Self {
        Self::new(Cb::default())
    }
}

/// Equality is topological: two cells are equal when their base cells are,
/// whatever their cache state.
impl<K, Cb, const D: usize> PartialEq for CachedCell<K, Cb, D>
where
    K: Kernel<D>,
    Cb: CellBase + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<K, Cb, const D: usize> Eq for CachedCell<K, Cb, D>
where
    K: Kernel<D>,
    Cb: CellBase + Eq,
{
}

impl<K, Cb, const D: usize> From<Cb> for CachedCell<K, Cb, D>
where
    K: Kernel<D>,
    Cb: CellBase,
{
    fn from(base: Cb) -> Self {
        Self::new(base)
    }
}

impl<K, Cb, const D: usize> CellBase for CachedCell<K, Cb, D>
where
    K: Kernel<D>,
    Cb: CellBase,
{
    type VertexHandle = Cb::VertexHandle;
    type CellHandle = Cb::CellHandle;

    const ARITY: usize = Cb::ARITY;

    fn from_vertices(vertices: &[Self::VertexHandle]) -> Result<Self, CellValidationError> {
        Cb::from_vertices(vertices).map(Self::new)
    }

    fn from_vertices_and_neighbors(
        vertices: &[Self::VertexHandle],
        neighbors: &[Option<Self::CellHandle>],
    ) -> Result<Self, CellValidationError> {
        Cb::from_vertices_and_neighbors(vertices, neighbors).map(Self::new)
    }

    #[inline]
    fn vertex(&self, index: usize) -> Option<Self::VertexHandle> {
        self.base.vertex(index)
    }

    #[inline]
    fn vertices(&self) -> &[Option<Self::VertexHandle>] {
        self.base.vertices()
    }

    fn set_vertex(&mut self, index: usize, vertex: Self::VertexHandle) {
        self.invalidate();
        self.base.set_vertex(index, vertex);
    }

    fn set_vertices(&mut self, vertices: &[Self::VertexHandle]) -> Result<(), CellValidationError> {
        self.invalidate();
        self.base.set_vertices(vertices)
    }

    fn clear_vertices(&mut self) {
        self.invalidate();
        self.base.clear_vertices();
    }

    #[inline]
    fn neighbor(&self, index: usize) -> Option<Self::CellHandle> {
        self.base.neighbor(index)
    }

    #[inline]
    fn neighbors(&self) -> &[Option<Self::CellHandle>] {
        self.base.neighbors()
    }

    #[inline]
    fn set_neighbor(&mut self, index: usize, neighbor: Option<Self::CellHandle>) {
        self.base.set_neighbor(index, neighbor);
    }

    fn set_neighbors(
        &mut self,
        neighbors: &[Option<Self::CellHandle>],
    ) -> Result<(), CellValidationError> {
        self.base.set_neighbors(neighbors)
    }

    fn invalidate_caches(&mut self) {
        self.invalidate();
        self.base.invalidate_caches();
    }
}

impl<K, Cb, H, const D: usize> RebindTds<H> for CachedCell<K, Cb, D>
where
    K: Kernel<D>,
    Cb: CellBase + RebindTds<H>,
    H: TdsHandles,
{
    type Other = CachedCell<K, Rebound<Cb, H>, D>;
}
