//! Collection aliases used throughout the crate.
//!
//! Hashing uses `rustc-hash` (`FxHash`), a fast non-cryptographic hasher for
//! the small internal keys stored here. Per-simplex buffers use
//! `SmallVec` so that gathering the D+1 sites of a cell stays on the stack for
//! every practical dimension.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

#[cfg(not(feature = "dense-slotmap"))]
use slotmap::SlotMap;

#[cfg(feature = "dense-slotmap")]
use slotmap::DenseSlotMap;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Storage backend for the reference triangulation data structure.
///
/// # Feature Flags
///
/// - **default**: `DenseSlotMap` (via the default `dense-slotmap` feature),
///   which favours iteration speed.
/// - **--no-default-features**: `SlotMap`, which favours insertion and
///   removal speed.
#[cfg(not(feature = "dense-slotmap"))]
pub type StorageMap<K, V> = SlotMap<K, V>;

/// Storage backend for the reference triangulation data structure.
///
/// # Feature Flags
///
/// - **default**: `DenseSlotMap` (via the default `dense-slotmap` feature),
///   which favours iteration speed.
/// - **--no-default-features**: `SlotMap`, which favours insertion and
///   removal speed.
#[cfg(feature = "dense-slotmap")]
pub type StorageMap<K, V> = DenseSlotMap<K, V>;

// =============================================================================
// HASH COLLECTIONS
// =============================================================================

/// Hash map with the fast non-cryptographic `FxHash` hasher.
///
/// # Examples
///
/// ```rust
/// use cached_simplex::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<usize, &str> = FastHashMap::default();
/// map.insert(1, "one");
/// assert_eq!(map.get(&1), Some(&"one"));
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Hash set with the fast non-cryptographic `FxHash` hasher.
///
/// # Examples
///
/// ```rust
/// use cached_simplex::core::collections::FastHashSet;
///
/// let mut seen: FastHashSet<usize> = FastHashSet::default();
/// assert!(seen.insert(3));
/// assert!(!seen.insert(3));
/// ```
pub type FastHashSet<T> = FxHashSet<T>;

// =============================================================================
// SMALL BUFFERS
// =============================================================================

/// Stack-first vector that spills to the heap past `N` elements.
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// Inline capacity covering the D+1 vertices of a simplex up to D = 7.
pub const MAX_PRACTICAL_DIMENSION_SIZE: usize = 8;

/// Buffer for the sites (or handles) of one simplex.
pub type SimplexBuffer<T> = SmallBuffer<T, MAX_PRACTICAL_DIMENSION_SIZE>;
