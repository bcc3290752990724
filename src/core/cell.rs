//! Combinatorial cells and the type-level rebind mechanism.
//!
//! A cell is a D-simplex holding D+1 vertex handles and D+1 neighbor handles.
//! The concrete handle types belong to the host triangulation, so cells are
//! parameterized over a *handle family* ([`TdsHandles`]). A host obtains its
//! own cell type from any user-supplied cell type through [`RebindTds`]:
//!
//! ```rust
//! use cached_simplex::core::cell::{CellBase, CellBase3, Rebound, TdsHandles, Unbound};
//!
//! #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
//! struct MyHost;
//! impl TdsHandles for MyHost {
//!     type VertexHandle = u32;
//!     type CellHandle = u32;
//! }
//!
//! // The same cell description, bound to the host's handles.
//! type HostCell = Rebound<CellBase3<Unbound>, MyHost>;
//! let cell = HostCell::from_vertices(&[10, 11, 12, 13]).unwrap();
//! assert!(cell.contains_vertex(12));
//! ```
//!
//! Every vertex-set mutation of a cell goes through [`CellBase`]'s mutators.
//! Decorators that cache data derived from the vertex set override
//! [`CellBase::invalidate_caches`] and clear their caches in every mutator.

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use thiserror::Error;

use crate::core::collections::FastHashSet;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during cell construction and validation.
///
/// # Examples
///
/// ```rust
/// use cached_simplex::core::cell::CellValidationError;
///
/// let err = CellValidationError::DuplicateVertices;
/// assert!(matches!(err, CellValidationError::DuplicateVertices));
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CellValidationError {
    /// The cell contains duplicate vertices.
    #[error("Duplicate vertices: cell contains non-unique vertices which is not allowed")]
    DuplicateVertices,
    /// The number of vertices does not match the cell's arity.
    #[error(
        "Invalid vertex count: got {actual} vertices; expected exactly {expected} for a {dimension}D simplex"
    )]
    InvalidVertexCount {
        /// The number of vertices supplied.
        actual: usize,
        /// The expected number of vertices (D+1).
        expected: usize,
        /// The dimension D.
        dimension: usize,
    },
    /// The neighbors slice length is inconsistent with the number of vertices (D+1).
    #[error(
        "Invalid neighbors length: got {actual}, expected {expected} (D+1) for a {dimension}D simplex"
    )]
    InvalidNeighborsLength {
        /// The actual neighbors length.
        actual: usize,
        /// The expected neighbors length (= D+1).
        expected: usize,
        /// The dimension D.
        dimension: usize,
    },
    /// A vertex slot is empty.
    #[error("Missing vertex: slot {index} is empty")]
    MissingVertex {
        /// The empty slot.
        index: usize,
    },
}

// =============================================================================
// HANDLE FAMILIES AND REBIND
// =============================================================================

/// The vertex and cell handle types of a host triangulation.
///
/// Implementors are zero-sized markers; they carry no runtime state.
pub trait TdsHandles: Copy + Debug + Default + Eq + Hash + 'static {
    /// Handle referring to a vertex of the host.
    type VertexHandle: Copy + Eq + Hash + Debug;
    /// Handle referring to a cell of the host.
    type CellHandle: Copy + Eq + Hash + Debug;
}

/// Handle family of cells that are not (yet) bound to a host: plain indices.
///
/// An unbound cell's vertex handles index directly into a slice of sites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Unbound;

impl TdsHandles for Unbound {
    type VertexHandle = usize;
    type CellHandle = usize;
}

/// Type-level mapping of a cell type onto another host's handle family.
///
/// `Other` keeps every behavior of `Self` and only changes the handle types.
/// This is a pure type computation with no runtime cost.
pub trait RebindTds<H: TdsHandles> {
    /// The same cell type, bound to the handles of `H`.
    type Other: CellBase<VertexHandle = H::VertexHandle, CellHandle = H::CellHandle>;
}

/// Shorthand for `<Cb as RebindTds<H>>::Other`.
pub type Rebound<Cb, H> = <Cb as RebindTds<H>>::Other;

// =============================================================================
// CELL BASE TRAIT
// =============================================================================

/// Combinatorial interface of a cell: vertex and neighbor slots.
///
/// Slot indices run over `0..Self::ARITY`. Out-of-range indices are
/// programmer errors and panic in the single-slot accessors; slice-based
/// mutators report length mismatches as [`CellValidationError`].
pub trait CellBase: Clone + Debug {
    /// Handle type of the vertices.
    type VertexHandle: Copy + Eq + Hash + Debug;
    /// Handle type of the neighboring cells.
    type CellHandle: Copy + Eq + Hash + Debug;

    /// Number of vertex (and neighbor) slots: D+1.
    const ARITY: usize;

    /// Create a cell from exactly `ARITY` vertex handles, with no neighbors.
    ///
    /// # Errors
    ///
    /// Returns [`CellValidationError::InvalidVertexCount`] on a length mismatch.
    fn from_vertices(vertices: &[Self::VertexHandle]) -> Result<Self, CellValidationError>;

    /// Create a cell from `ARITY` vertex handles and `ARITY` neighbor slots.
    ///
    /// # Errors
    ///
    /// Returns [`CellValidationError::InvalidVertexCount`] or
    /// [`CellValidationError::InvalidNeighborsLength`] on a length mismatch.
    fn from_vertices_and_neighbors(
        vertices: &[Self::VertexHandle],
        neighbors: &[Option<Self::CellHandle>],
    ) -> Result<Self, CellValidationError>;

    /// The vertex in slot `index`, if set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= Self::ARITY`.
    fn vertex(&self, index: usize) -> Option<Self::VertexHandle>;

    /// All vertex slots in order.
    fn vertices(&self) -> &[Option<Self::VertexHandle>];

    /// Replace the vertex in slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= Self::ARITY`.
    fn set_vertex(&mut self, index: usize, vertex: Self::VertexHandle);

    /// Replace all vertex slots at once.
    ///
    /// # Errors
    ///
    /// Returns [`CellValidationError::InvalidVertexCount`] on a length
    /// mismatch; the cell is left unchanged.
    fn set_vertices(&mut self, vertices: &[Self::VertexHandle]) -> Result<(), CellValidationError>;

    /// Empty every vertex slot.
    fn clear_vertices(&mut self);

    /// The neighbor opposite vertex slot `index`, if set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= Self::ARITY`.
    fn neighbor(&self, index: usize) -> Option<Self::CellHandle>;

    /// All neighbor slots in order.
    fn neighbors(&self) -> &[Option<Self::CellHandle>];

    /// Replace the neighbor opposite vertex slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= Self::ARITY`.
    fn set_neighbor(&mut self, index: usize, neighbor: Option<Self::CellHandle>);

    /// Replace all neighbor slots at once.
    ///
    /// # Errors
    ///
    /// Returns [`CellValidationError::InvalidNeighborsLength`] on a length mismatch.
    fn set_neighbors(
        &mut self,
        neighbors: &[Option<Self::CellHandle>],
    ) -> Result<(), CellValidationError>;

    /// Drop any value derived from the vertex set.
    ///
    /// Hosts call this when they change a vertex's site in place, which a
    /// cell cannot observe through its unchanged handle. Plain cells cache
    /// nothing.
    fn invalidate_caches(&mut self) {}

    /// Dimension D of the simplex.
    #[inline]
    #[must_use]
    fn dim(&self) -> usize {
        Self::ARITY.saturating_sub(1)
    }

    /// Number of occupied vertex slots.
    #[must_use]
    fn number_of_vertices(&self) -> usize {
        self.vertices().iter().filter(|v| v.is_some()).count()
    }

    /// Slot index of `vertex`, if this cell contains it.
    #[must_use]
    fn index_of(&self, vertex: Self::VertexHandle) -> Option<usize> {
        self.vertices().iter().position(|v| *v == Some(vertex))
    }

    /// Checks if this cell contains the given vertex handle.
    #[must_use]
    fn contains_vertex(&self, vertex: Self::VertexHandle) -> bool {
        self.index_of(vertex).is_some()
    }

    /// Checks if this cell has any vertex in common with another cell.
    ///
    /// This is a cheap operation that only compares handles.
    #[must_use]
    fn has_vertex_in_common(&self, other: &Self) -> bool {
        self.vertices()
            .iter()
            .flatten()
            .any(|&v| other.contains_vertex(v))
    }

    /// Structural validation: every slot filled and all vertices distinct.
    ///
    /// # Errors
    ///
    /// Returns [`CellValidationError::MissingVertex`] for the first empty
    /// slot, or [`CellValidationError::DuplicateVertices`].
    fn is_valid(&self) -> Result<(), CellValidationError> {
        let mut seen: FastHashSet<Self::VertexHandle> = FastHashSet::default();
        for (index, slot) in self.vertices().iter().enumerate() {
            let vertex = slot.ok_or(CellValidationError::MissingVertex { index })?;
            if !seen.insert(vertex) {
                return Err(CellValidationError::DuplicateVertices);
            }
        }
        Ok(())
    }
}

// =============================================================================
// TRIANGULATION CELL BASE
// =============================================================================

/// Fixed-arity cell storing `N` vertex slots and `N` neighbor slots inline.
///
/// This is the default base cell; `N` is the arity D+1.
pub struct TriangulationCellBase<H: TdsHandles, const N: usize> {
    vertices: [Option<H::VertexHandle>; N],
    neighbors: [Option<H::CellHandle>; N],
    _handles: PhantomData<H>,
}

/// Base cell of a 2D triangulation (triangle).
pub type CellBase2<H> = TriangulationCellBase<H, 3>;

/// Base cell of a 3D triangulation (tetrahedron).
pub type CellBase3<H> = TriangulationCellBase<H, 4>;

const fn check_len(actual: usize, expected: usize) -> Result<(), CellValidationError> {
    if actual == expected {
        Ok(())
    } else {
        Err(CellValidationError::InvalidVertexCount {
            actual,
            expected,
            dimension: expected.saturating_sub(1),
        })
    }
}

impl<H: TdsHandles, const N: usize> TriangulationCellBase<H, N> {
    /// A cell with every slot empty.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            vertices: [None; N],
            neighbors: [None; N],
            _handles: PhantomData,
        }
    }
}

impl<H: TdsHandles, const N: usize> Default for TriangulationCellBase<H, N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<H: TdsHandles, const N: usize> Clone for TriangulationCellBase<H, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: TdsHandles, const N: usize> Copy for TriangulationCellBase<H, N> {}

impl<H: TdsHandles, const N: usize> Debug for TriangulationCellBase<H, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriangulationCellBase")
            .field("vertices", &self.vertices)
            .field("neighbors", &self.neighbors)
            .finish()
    }
}

impl<H: TdsHandles, const N: usize> PartialEq for TriangulationCellBase<H, N> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices && self.neighbors == other.neighbors
    }
}

impl<H: TdsHandles, const N: usize> Eq for TriangulationCellBase<H, N> {}

impl<H: TdsHandles, const N: usize> Hash for TriangulationCellBase<H, N> {
    fn hash<S: std::hash::Hasher>(&self, state: &mut S) {
        self.vertices.hash(state);
        self.neighbors.hash(state);
    }
}

impl<H: TdsHandles, const N: usize> CellBase for TriangulationCellBase<H, N> {
    type VertexHandle = H::VertexHandle;
    type CellHandle = H::CellHandle;

    const ARITY: usize = N;

    fn from_vertices(vertices: &[Self::VertexHandle]) -> Result<Self, CellValidationError> {
        let mut cell = Self::empty();
        cell.set_vertices(vertices)?;
        Ok(cell)
    }

    fn from_vertices_and_neighbors(
        vertices: &[Self::VertexHandle],
        neighbors: &[Option<Self::CellHandle>],
    ) -> Result<Self, CellValidationError> {
        let mut cell = Self::from_vertices(vertices)?;
        cell.set_neighbors(neighbors)?;
        Ok(cell)
    }

    #[inline]
    fn vertex(&self, index: usize) -> Option<Self::VertexHandle> {
        self.vertices[index]
    }

    #[inline]
    fn vertices(&self) -> &[Option<Self::VertexHandle>] {
        &self.vertices
    }

    #[inline]
    fn set_vertex(&mut self, index: usize, vertex: Self::VertexHandle) {
        self.vertices[index] = Some(vertex);
    }

    fn set_vertices(&mut self, vertices: &[Self::VertexHandle]) -> Result<(), CellValidationError> {
        check_len(vertices.len(), N)?;
        for (slot, &vertex) in self.vertices.iter_mut().zip(vertices) {
            *slot = Some(vertex);
        }
        Ok(())
    }

    fn clear_vertices(&mut self) {
        self.vertices = [None; N];
    }

    #[inline]
    fn neighbor(&self, index: usize) -> Option<Self::CellHandle> {
        self.neighbors[index]
    }

    #[inline]
    fn neighbors(&self) -> &[Option<Self::CellHandle>] {
        &self.neighbors
    }

    #[inline]
    fn set_neighbor(&mut self, index: usize, neighbor: Option<Self::CellHandle>) {
        self.neighbors[index] = neighbor;
    }

    fn set_neighbors(
        &mut self,
        neighbors: &[Option<Self::CellHandle>],
    ) -> Result<(), CellValidationError> {
        if neighbors.len() != N {
            return Err(CellValidationError::InvalidNeighborsLength {
                actual: neighbors.len(),
                expected: N,
                dimension: N.saturating_sub(1),
            });
        }
        self.neighbors.copy_from_slice(neighbors);
        Ok(())
    }
}

impl<H, H2, const N: usize> RebindTds<H2> for TriangulationCellBase<H, N>
where
    H: TdsHandles,
    H2: TdsHandles,
{
    type Other = TriangulationCellBase<H2, N>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::TypeId;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    struct U32Handles;

    impl TdsHandles for U32Handles {
        type VertexHandle = u32;
        type CellHandle = u16;
    }

    #[test]
    fn from_vertices_fills_slots_in_order() {
        let cell = CellBase3::<Unbound>::from_vertices(&[4, 5, 6, 7]).unwrap();
        assert_eq!(cell.vertices(), &[Some(4), Some(5), Some(6), Some(7)]);
        assert_eq!(cell.neighbors(), &[None; 4]);
        assert_eq!(cell.dim(), 3);
        assert_eq!(cell.number_of_vertices(), 4);
        assert_eq!(cell.index_of(6), Some(2));
        assert!(cell.is_valid().is_ok());
    }

    #[test]
    fn from_vertices_rejects_wrong_arity() {
        assert_eq!(
            CellBase2::<Unbound>::from_vertices(&[0, 1]).unwrap_err(),
            CellValidationError::InvalidVertexCount {
                actual: 2,
                expected: 3,
                dimension: 2,
            }
        );
        assert!(matches!(
            CellBase2::<Unbound>::from_vertices_and_neighbors(&[0, 1, 2], &[None]),
            Err(CellValidationError::InvalidNeighborsLength { actual: 1, .. })
        ));
    }

    #[test]
    fn zero_arity_cell_reports_dimension_zero() {
        type Degenerate = TriangulationCellBase<Unbound, 0>;
        let cell = Degenerate::empty();
        assert_eq!(cell.dim(), 0);
        assert_eq!(
            Degenerate::from_vertices(&[0]).unwrap_err(),
            CellValidationError::InvalidVertexCount {
                actual: 1,
                expected: 0,
                dimension: 0,
            }
        );
        assert_eq!(
            Degenerate::empty().set_neighbors(&[None]),
            Err(CellValidationError::InvalidNeighborsLength {
                actual: 1,
                expected: 0,
                dimension: 0,
            })
        );
    }

    #[test]
    fn set_vertices_failure_leaves_cell_unchanged() {
        let mut cell = CellBase2::<Unbound>::from_vertices(&[0, 1, 2]).unwrap();
        assert!(cell.set_vertices(&[3, 4]).is_err());
        assert_eq!(cell.vertices(), &[Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn is_valid_detects_duplicates_and_holes() {
        let dup = CellBase2::<Unbound>::from_vertices(&[0, 1, 1]).unwrap();
        assert_eq!(dup.is_valid(), Err(CellValidationError::DuplicateVertices));

        let mut hole = CellBase2::<Unbound>::from_vertices(&[0, 1, 2]).unwrap();
        hole.clear_vertices();
        assert_eq!(
            hole.is_valid(),
            Err(CellValidationError::MissingVertex { index: 0 })
        );
        assert_eq!(hole.number_of_vertices(), 0);
    }

    #[test]
    fn neighbors_and_shared_vertices() {
        let mut a = CellBase2::<Unbound>::from_vertices(&[0, 1, 2]).unwrap();
        let b = CellBase2::<Unbound>::from_vertices(&[2, 3, 4]).unwrap();
        let c = CellBase2::<Unbound>::from_vertices(&[5, 6, 7]).unwrap();
        a.set_neighbor(0, Some(1));
        assert_eq!(a.neighbor(0), Some(1));
        assert!(a.has_vertex_in_common(&b));
        assert!(!a.has_vertex_in_common(&c));
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn set_vertex_out_of_range_panics() {
        let mut cell = CellBase2::<Unbound>::empty();
        cell.set_vertex(3, 0);
    }

    #[test]
    fn rebind_changes_only_handles() {
        type Bound = Rebound<CellBase3<Unbound>, U32Handles>;
        assert_eq!(
            TypeId::of::<Bound>(),
            TypeId::of::<TriangulationCellBase<U32Handles, 4>>()
        );
        assert_eq!(<Bound as CellBase>::ARITY, 4);

        let cell = Bound::from_vertices_and_neighbors(&[1, 2, 3, 4], &[Some(9), None, None, None])
            .unwrap();
        assert_eq!(cell.neighbor(0), Some(9u16));

        // Rebinding back yields the original type.
        assert_eq!(
            TypeId::of::<Rebound<Bound, Unbound>>(),
            TypeId::of::<CellBase3<Unbound>>()
        );
    }
}
