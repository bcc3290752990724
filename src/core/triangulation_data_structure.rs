//! A minimal triangulation data structure hosting cached cells.
//!
//! `Tds<S, Cb>` stores vertex sites of type `S` and cells derived from a
//! user-chosen cell type `Cb`. The stored cell type is obtained with the
//! rebind mechanism: `Cb` is written against any handle family (usually
//! [`Unbound`](crate::core::cell::Unbound)) and the structure stores
//! `Rebound<Cb, TdsKeys>`, the same cell bound to slotmap keys.
//!
//! The structure is purely combinatorial. It does not build triangulations;
//! it provides the storage and mutation entry points a construction algorithm
//! needs, and it keeps cached cell data fresh:
//!
//! - every vertex change of a cell goes through the cell's own mutators;
//! - [`Tds::move_vertex`] changes a site in place and invalidates every
//!   incident cell, since those cells keep the same handle.
//!
//! # Examples
//!
//! ```rust
//! use cached_simplex::prelude::*;
//!
//! let mut tds: Tds<WeightedPoint<f64, 3>, RegularCell3<f64>> = Tds::new();
//! let v: Vec<VertexKey> = [
//!     ([0.0, 0.0, 0.0], 1.0),
//!     ([1.0, 0.0, 0.0], 0.0),
//!     ([0.0, 1.0, 0.0], 0.0),
//!     ([0.0, 0.0, 1.0], 0.0),
//! ]
//! .into_iter()
//! .map(|(p, w)| tds.insert_vertex(WeightedPoint::new(Point::new(p), w)))
//! .collect();
//!
//! let cell = tds.insert_cell(&v).unwrap();
//! assert_eq!(*tds.derived_point(cell).unwrap(), Point::new([1.0, 1.0, 1.0]));
//!
//! // Moving a vertex invalidates the cells around it.
//! tds.move_vertex(v[2], WeightedPoint::new(Point::new([0.0, 2.0, 0.0]), 0.0))
//!     .unwrap();
//! assert_eq!(*tds.derived_point(cell).unwrap(), Point::new([1.0, 1.25, 1.0]));
//! ```

use std::fmt::{self, Debug};

use slotmap::new_key_type;
use thiserror::Error;

use crate::core::cached_cell::{CachedCell, CachedCellError};
use crate::core::cell::{CellBase, CellValidationError, RebindTds, Rebound, TdsHandles};
use crate::core::collections::StorageMap;
use crate::core::traits::VertexSites;
use crate::geometry::kernel::Kernel;
use crate::geometry::point::Point;

// =============================================================================
// KEYS AND HANDLE FAMILY
// =============================================================================

new_key_type! {
    /// Key type for accessing vertices in the storage map.
    ///
    /// Keys are stable: removing other vertices never invalidates them.
    pub struct VertexKey;
}

new_key_type! {
    /// Key type for accessing cells in the storage map.
    pub struct CellKey;
}

/// Handle family of [`Tds`]: vertices and cells are addressed by slotmap keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TdsKeys;

impl TdsHandles for TdsKeys {
    type VertexHandle = VertexKey;
    type CellHandle = CellKey;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors reported by [`Tds`] operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TdsError {
    /// A vertex key does not refer to a stored vertex.
    #[error("Vertex key {key:?} not found")]
    VertexNotFound {
        /// The unknown key.
        key: VertexKey,
    },
    /// A cell key does not refer to a stored cell.
    #[error("Cell key {key:?} not found")]
    CellNotFound {
        /// The unknown key.
        key: CellKey,
    },
    /// A cell is structurally invalid.
    #[error("Invalid cell: {source}")]
    InvalidCell {
        /// The underlying cell validation error.
        #[from]
        source: CellValidationError,
    },
    /// A vertex cannot be removed while cells still reference it.
    #[error("Vertex {key:?} is still used by {cells} cell(s)")]
    VertexInUse {
        /// The vertex.
        key: VertexKey,
        /// Number of cells referencing it.
        cells: usize,
    },
    /// A slot index is outside `0..arity`.
    #[error("Slot index {index} out of range for a cell with {arity} slots")]
    SlotOutOfRange {
        /// The requested slot.
        index: usize,
        /// Number of slots of the cell.
        arity: usize,
    },
    /// Computing or verifying the derived point of a cell failed.
    #[error("Derived point of cell {cell:?}: {source}")]
    DerivedPoint {
        /// The cell.
        cell: CellKey,
        /// The underlying error.
        source: CachedCellError,
    },
}

// =============================================================================
// TDS
// =============================================================================

/// Triangulation data structure storing sites `S` and cells `Rebound<Cb, TdsKeys>`.
///
/// `S` is whatever the cells' kernel consumes per vertex: a
/// [`Point`](crate::geometry::point::Point) for circumcenters, a
/// [`WeightedPoint`](crate::geometry::weighted_point::WeightedPoint) for
/// weighted circumcenters.
pub struct Tds<S, Cb>
where
    Cb: RebindTds<TdsKeys>,
{
    vertices: StorageMap<VertexKey, S>,
    cells: StorageMap<CellKey, Rebound<Cb, TdsKeys>>,
    /// Incremented on every structural or geometric modification.
    generation: u64,
}

/// The cell type stored by a `Tds<S, Cb>`.
pub type TdsCell<Cb> = Rebound<Cb, TdsKeys>;

impl<S, Cb> Clone for Tds<S, Cb>
where
    S: Clone,
    Cb: RebindTds<TdsKeys>,
{
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            cells: self.cells.clone(),
            generation: self.generation,
        }
    }
}

impl<S, Cb> Debug for Tds<S, Cb>
where
    S: Debug,
    Cb: RebindTds<TdsKeys>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tds")
            .field("vertices", &self.vertices)
            .field("cells", &self.cells)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<S, Cb> Default for Tds<S, Cb>
where
    Cb: RebindTds<TdsKeys>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, Cb> Tds<S, Cb>
where
    Cb: RebindTds<TdsKeys>,
{
    /// Create an empty structure.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertices: StorageMap::with_key(),
            cells: StorageMap::with_key(),
            generation: 0,
        }
    }

    /// Modification counter; changes whenever vertices or cells change.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Number of stored vertices.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of stored cells.
    #[must_use]
    pub fn number_of_cells(&self) -> usize {
        self.cells.len()
    }

    /// Iterate over `(VertexKey, &S)` pairs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexKey, &S)> {
        self.vertices.iter()
    }

    /// Iterate over `(CellKey, &cell)` pairs.
    pub fn cells(&self) -> impl Iterator<Item = (CellKey, &TdsCell<Cb>)> {
        self.cells.iter()
    }

    /// The site of a vertex.
    #[must_use]
    pub fn vertex_site(&self, key: VertexKey) -> Option<&S> {
        self.vertices.get(key)
    }

    /// The cell stored under `key`.
    #[must_use]
    pub fn cell(&self, key: CellKey) -> Option<&TdsCell<Cb>> {
        self.cells.get(key)
    }

    /// Keys of every cell containing `vertex`.
    pub fn incident_cells(&self, vertex: VertexKey) -> impl Iterator<Item = CellKey> + '_ {
        self.cells
            .iter()
            .filter(move |(_, cell)| cell.contains_vertex(vertex))
            .map(|(key, _)| key)
    }

    /// Insert a vertex site.
    pub fn insert_vertex(&mut self, site: S) -> VertexKey {
        self.bump_generation();
        self.vertices.insert(site)
    }

    /// Replace the site of a vertex in place and invalidate every incident
    /// cell. Returns the previous site.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::VertexNotFound`] for an unknown key.
    pub fn move_vertex(&mut self, key: VertexKey, site: S) -> Result<S, TdsError> {
        let slot = self
            .vertices
            .get_mut(key)
            .ok_or(TdsError::VertexNotFound { key })?;
        let previous = std::mem::replace(slot, site);

        let mut invalidated = 0usize;
        for cell in self.cells.values_mut() {
            if cell.contains_vertex(key) {
                cell.invalidate_caches();
                invalidated += 1;
            }
        }
        self.bump_generation();
        tracing::debug!(?key, invalidated, "moved vertex");
        Ok(previous)
    }

    /// Remove a vertex that no cell references.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::VertexNotFound`] for an unknown key and
    /// [`TdsError::VertexInUse`] if cells still reference the vertex.
    pub fn remove_vertex(&mut self, key: VertexKey) -> Result<S, TdsError> {
        if !self.vertices.contains_key(key) {
            return Err(TdsError::VertexNotFound { key });
        }
        let cells = self.incident_cells(key).count();
        if cells > 0 {
            return Err(TdsError::VertexInUse { key, cells });
        }
        self.bump_generation();
        self.vertices
            .remove(key)
            .ok_or(TdsError::VertexNotFound { key })
    }

    fn check_vertices(&self, vertices: &[VertexKey]) -> Result<(), TdsError> {
        vertices.iter().try_for_each(|&key| {
            if self.vertices.contains_key(key) {
                Ok(())
            } else {
                Err(TdsError::VertexNotFound { key })
            }
        })
    }

    fn check_neighbors(&self, neighbors: &[Option<CellKey>]) -> Result<(), TdsError> {
        neighbors.iter().flatten().try_for_each(|&key| {
            if self.cells.contains_key(key) {
                Ok(())
            } else {
                Err(TdsError::CellNotFound { key })
            }
        })
    }

    fn check_slot(index: usize) -> Result<(), TdsError> {
        let arity = <TdsCell<Cb> as CellBase>::ARITY;
        if index < arity {
            Ok(())
        } else {
            Err(TdsError::SlotOutOfRange { index, arity })
        }
    }

    /// Insert a cell over existing vertices, with no neighbors.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::VertexNotFound`] for an unknown vertex and
    /// [`TdsError::InvalidCell`] for a wrong vertex count or duplicate vertices.
    pub fn insert_cell(&mut self, vertices: &[VertexKey]) -> Result<CellKey, TdsError> {
        self.check_vertices(vertices)?;
        let cell = TdsCell::<Cb>::from_vertices(vertices)?;
        cell.is_valid()?;
        self.bump_generation();
        Ok(self.cells.insert(cell))
    }

    /// Insert a cell over existing vertices with the given neighbor slots.
    ///
    /// # Errors
    ///
    /// As [`Self::insert_cell`], plus [`TdsError::CellNotFound`] for an
    /// unknown neighbor.
    pub fn insert_cell_with_neighbors(
        &mut self,
        vertices: &[VertexKey],
        neighbors: &[Option<CellKey>],
    ) -> Result<CellKey, TdsError> {
        self.check_vertices(vertices)?;
        self.check_neighbors(neighbors)?;
        let cell = TdsCell::<Cb>::from_vertices_and_neighbors(vertices, neighbors)?;
        cell.is_valid()?;
        self.bump_generation();
        Ok(self.cells.insert(cell))
    }

    /// Remove a cell and clear every neighbor slot that referred to it.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::CellNotFound`] for an unknown key.
    pub fn remove_cell(&mut self, key: CellKey) -> Result<TdsCell<Cb>, TdsError> {
        let removed = self
            .cells
            .remove(key)
            .ok_or(TdsError::CellNotFound { key })?;

        for cell in self.cells.values_mut() {
            for index in 0..<TdsCell<Cb> as CellBase>::ARITY {
                if cell.neighbor(index) == Some(key) {
                    cell.set_neighbor(index, None);
                }
            }
        }
        self.bump_generation();
        tracing::debug!(?key, "removed cell");
        Ok(removed)
    }

    /// Replace one vertex of a cell.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::CellNotFound`], [`TdsError::VertexNotFound`] or
    /// [`TdsError::SlotOutOfRange`].
    pub fn set_cell_vertex(
        &mut self,
        cell: CellKey,
        index: usize,
        vertex: VertexKey,
    ) -> Result<(), TdsError> {
        Self::check_slot(index)?;
        self.check_vertices(&[vertex])?;
        let target = self
            .cells
            .get_mut(cell)
            .ok_or(TdsError::CellNotFound { key: cell })?;
        target.set_vertex(index, vertex);
        self.bump_generation();
        Ok(())
    }

    /// Replace every vertex of a cell at once.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::CellNotFound`], [`TdsError::VertexNotFound`] or
    /// [`TdsError::InvalidCell`] on a wrong vertex count.
    pub fn set_cell_vertices(
        &mut self,
        cell: CellKey,
        vertices: &[VertexKey],
    ) -> Result<(), TdsError> {
        self.check_vertices(vertices)?;
        let target = self
            .cells
            .get_mut(cell)
            .ok_or(TdsError::CellNotFound { key: cell })?;
        target.set_vertices(vertices)?;
        self.bump_generation();
        Ok(())
    }

    /// Set the neighbor opposite vertex slot `index` of a cell.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::CellNotFound`] for an unknown cell or neighbor and
    /// [`TdsError::SlotOutOfRange`].
    pub fn set_neighbor(
        &mut self,
        cell: CellKey,
        index: usize,
        neighbor: Option<CellKey>,
    ) -> Result<(), TdsError> {
        Self::check_slot(index)?;
        self.check_neighbors(&[neighbor])?;
        let target = self
            .cells
            .get_mut(cell)
            .ok_or(TdsError::CellNotFound { key: cell })?;
        target.set_neighbor(index, neighbor);
        self.bump_generation();
        Ok(())
    }

    /// Structural validation: every cell is valid, and every vertex and
    /// neighbor key it stores resolves.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn is_valid(&self) -> Result<(), TdsError> {
        for (_, cell) in &self.cells {
            cell.is_valid()?;
            let vertices: Vec<VertexKey> = cell.vertices().iter().flatten().copied().collect();
            self.check_vertices(&vertices)?;
            self.check_neighbors(cell.neighbors())?;
        }
        Ok(())
    }
}

impl<S, Cb> VertexSites<VertexKey> for Tds<S, Cb>
where
    Cb: RebindTds<TdsKeys>,
{
    type Site = S;

    #[inline]
    fn site(&self, handle: VertexKey) -> Option<&S> {
        self.vertices.get(handle)
    }
}

/// Derived-point queries, available when the cell type is a [`CachedCell`].
impl<S, K, B, const D: usize> Tds<S, CachedCell<K, B, D>>
where
    K: Kernel<D, Site = S>,
    B: CellBase + RebindTds<TdsKeys>,
{
    /// The derived point of a cell, computed with a default kernel on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::CellNotFound`] or [`TdsError::DerivedPoint`].
    pub fn derived_point(&self, cell: CellKey) -> Result<&Point<K::Scalar, D>, TdsError> {
        self.derived_point_with(cell, &K::default())
    }

    /// The derived point of a cell, computed with `kernel` on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::CellNotFound`] or [`TdsError::DerivedPoint`].
    pub fn derived_point_with(
        &self,
        cell: CellKey,
        kernel: &K,
    ) -> Result<&Point<K::Scalar, D>, TdsError> {
        let target = self
            .cells
            .get(cell)
            .ok_or(TdsError::CellNotFound { key: cell })?;
        target
            .derived_point_with(kernel, self)
            .map_err(|source| TdsError::DerivedPoint { cell, source })
    }

    /// Re-verify every cached derived point against a fresh computation.
    ///
    /// Returns the number of cached values checked. Cells without a cached
    /// value are skipped and stay uncached.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::DerivedPoint`] for the first stale or failing cell.
    pub fn verify_derived_points(&self, kernel: &K) -> Result<usize, TdsError> {
        let mut checked = 0usize;
        for (cell, target) in &self.cells {
            if !target.is_cached() {
                continue;
            }
            target
                .verify_derived_point(kernel, self)
                .map_err(|source| TdsError::DerivedPoint { cell, source })?;
            checked += 1;
        }
        tracing::debug!(checked, "verified cached derived points");
        Ok(checked)
    }
}
