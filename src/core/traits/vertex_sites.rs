//! Site lookup for vertex handles.
//!
//! Cells store only vertex handles. To compute a derived point they need the
//! geometric input (the *site*) behind each handle, which lives in the host.
//! This trait is the one capability a cell requires from that host.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

/// Resolves a vertex handle `VH` to the site stored for it.
///
/// Implemented for slices, arrays and `Vec`s indexed by `usize` (the handles
/// of unbound cells), for hash maps keyed by arbitrary handles, and for the
/// reference triangulation data structure.
///
/// # Examples
///
/// ```rust
/// use cached_simplex::core::traits::VertexSites;
/// use cached_simplex::geometry::point::Point;
///
/// let sites = vec![Point::new([0.0, 0.0]), Point::new([1.0, 0.0])];
/// assert_eq!(sites.site(1), Some(&Point::new([1.0, 0.0])));
/// assert_eq!(sites.site(2), None);
/// ```
pub trait VertexSites<VH> {
    /// The geometric input stored per vertex.
    type Site;

    /// The site of `handle`, or `None` if the handle is unknown.
    fn site(&self, handle: VH) -> Option<&Self::Site>;
}

impl<S> VertexSites<usize> for [S] {
    type Site = S;

    #[inline]
    fn site(&self, handle: usize) -> Option<&S> {
        self.get(handle)
    }
}

impl<S, const N: usize> VertexSites<usize> for [S; N] {
    type Site = S;

    #[inline]
    fn site(&self, handle: usize) -> Option<&S> {
        self.get(handle)
    }
}

impl<S> VertexSites<usize> for Vec<S> {
    type Site = S;

    #[inline]
    fn site(&self, handle: usize) -> Option<&S> {
        self.as_slice().get(handle)
    }
}

impl<VH, S, B> VertexSites<VH> for HashMap<VH, S, B>
where
    VH: Eq + Hash,
    B: BuildHasher,
{
    type Site = S;

    #[inline]
    fn site(&self, handle: VH) -> Option<&S> {
        self.get(&handle)
    }
}
