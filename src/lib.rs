//! # cached-simplex
//!
//! Simplicial cells that carry a lazily computed, cached geometric attribute,
//! such as the circumcenter of a Delaunay cell or the weighted circumcenter of a
//! regular-triangulation cell, inspired by [CGAL](https://www.cgal.org)'s
//! cell-base decorators.
//!
//! # Features
//!
//! - [`CachedCell`](core::cached_cell::CachedCell): decorates any base cell with one
//!   derived point, computed on first query and invalidated by every vertex mutation
//! - Pluggable geometric [`Kernel`](geometry::kernel::Kernel)s: circumcenter
//!   ([`FastKernel`](geometry::kernel::FastKernel)) and weighted circumcenter
//!   ([`RegularKernel`](geometry::kernel::RegularKernel))
//! - Type-level [rebind](core::cell::RebindTds): one cell description, bound to the
//!   handle types of any host triangulation
//! - A slotmap-backed reference host, [`Tds`](core::triangulation_data_structure::Tds),
//!   that routes every mutation through the cells and invalidates cells around moved vertices
//! - Generic floating-point coordinate types (`f32`, `f64`)
//! - Serialization of points and weighted points with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use cached_simplex::prelude::*;
//!
//! let sites = vec![
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//!     Point::new([0.0, 0.0, 1.0]),
//! ];
//!
//! let cell = DelaunayCell3::<f64>::from_vertices(&[0, 1, 2, 3]).unwrap();
//! let center = *cell.derived_point(&sites).unwrap();
//! assert_eq!(center, Point::new([0.5, 0.5, 0.5]));
//!
//! // Repeated queries are served from the cache.
//! assert!(cell.is_cached());
//! assert!(std::ptr::eq(
//!     cell.derived_point(&sites).unwrap(),
//!     cell.cached_derived_point().unwrap(),
//! ));
//! ```
//!
//! # Cache invariants
//!
//! - A cached value always equals what the kernel computes from the cell's
//!   current vertices. Vertex mutators invalidate first; a host moving a vertex
//!   in place invalidates the incident cells.
//! - A value is computed at most once between invalidations.
//! - A failed computation caches nothing.
//! - Clones own independent caches.
//!
//! Cached cells are `Send` but not `Sync`: the cache slot uses no locking, so
//! sharing a cell across threads requires external synchronization.
//!
//! # Feature flags
//!
//! - `dense-slotmap` (default): `DenseSlotMap` storage in [`Tds`](core::triangulation_data_structure::Tds)
//! - `expensive-checks`: recompute and compare the derived point on every cache hit

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

/// The `core` module contains cells, the caching decorator and the reference
/// triangulation data structure.
pub mod core {
    pub mod cached_cell;
    pub mod cell;
    /// Collection aliases and storage backends.
    pub mod collections;
    pub mod triangulation_data_structure;
    /// Traits describing what cells need from their host.
    pub mod traits {
        pub mod vertex_sites;
        pub use vertex_sites::*;
    }
    pub use cached_cell::*;
    pub use cell::*;
    pub use traits::*;
    pub use triangulation_data_structure::*;
}

/// Contains geometric types and the kernels computing derived points.
pub mod geometry {
    pub mod kernel;
    pub mod matrix;
    pub mod point;
    /// Circumcenter constructions and safe numeric conversions.
    pub mod util;
    pub mod weighted_point;
    /// Traits for coordinate scalars.
    pub mod traits {
        pub mod coordinate;
        pub use coordinate::*;
    }
    pub use kernel::*;
    pub use point::*;
    pub use traits::*;
    pub use util::*;
    pub use weighted_point::*;
}

/// A prelude module that re-exports commonly used types.
pub mod prelude {
    pub use crate::core::{
        cached_cell::*, cell::*, traits::vertex_sites::*, triangulation_data_structure::*,
    };

    pub use crate::core::collections::{FastHashMap, FastHashSet, SmallBuffer};

    pub use crate::geometry::{
        kernel::*, point::*, traits::coordinate::*, util::*, weighted_point::*,
    };
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

/// Like [`is_normal`], without `Sync`: cached cells are movable between
/// threads but not shareable.
#[must_use]
pub const fn is_sendable<T: Sized + Send + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
