//! Integration tests for rebinding cached cells onto different hosts.
//!
//! The same cell description (`RegularCell3`, `DelaunayCell2`, ...) is bound to
//! the reference `Tds` and to a custom host with its own handle types. Every
//! binding must keep the caching behavior of the original.

use std::any::TypeId;
use std::collections::HashMap;

use cached_simplex::prelude::*;

// =============================================================================
// A SECOND HOST
// =============================================================================

/// Handle family of a toy host addressing vertices by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
struct NamedHandles;

impl TdsHandles for NamedHandles {
    type VertexHandle = &'static str;
    type CellHandle = u8;
}

/// A host storing sites by name and cells in a `Vec`.
struct NamedHost<Cb: RebindTds<NamedHandles>> {
    sites: HashMap<&'static str, WeightedPoint<f64, 3>>,
    cells: Vec<Rebound<Cb, NamedHandles>>,
}

impl<Cb: RebindTds<NamedHandles>> NamedHost<Cb> {
    fn new() -> Self {
        Self {
            sites: HashMap::new(),
            cells: Vec::new(),
        }
    }

    fn move_site(&mut self, name: &'static str, site: WeightedPoint<f64, 3>) {
        self.sites.insert(name, site);
        for cell in &mut self.cells {
            if cell.contains_vertex(name) {
                cell.invalidate_caches();
            }
        }
    }
}

fn wp(coords: [f64; 3], weight: f64) -> WeightedPoint<f64, 3> {
    WeightedPoint::new(Point::new(coords), weight)
}

// =============================================================================
// TYPE-LEVEL TESTS
// =============================================================================

#[test]
fn test_rebound_types_keep_kernel_and_dimension() {
    assert_eq!(
        TypeId::of::<TdsCell<RegularCell3<f64>>>(),
        TypeId::of::<CachedCell<RegularKernel<f64>, CellBase3<TdsKeys>, 3>>()
    );
    assert_eq!(
        TypeId::of::<Rebound<DelaunayCell2<f32>, NamedHandles>>(),
        TypeId::of::<CachedCell<FastKernel<f32>, CellBase2<NamedHandles>, 2>>()
    );
    // Rebinding is idempotent and reversible.
    assert_eq!(
        TypeId::of::<Rebound<TdsCell<RegularCell3<f64>>, TdsKeys>>(),
        TypeId::of::<TdsCell<RegularCell3<f64>>>()
    );
    assert_eq!(
        TypeId::of::<Rebound<TdsCell<RegularCell3<f64>>, Unbound>>(),
        TypeId::of::<RegularCell3<f64>>()
    );
    assert_eq!(<TdsCell<RegularCell3<f64>> as CellBase>::ARITY, 4);
    assert_eq!(<Rebound<DelaunayCell2<f64>, NamedHandles> as CellBase>::ARITY, 3);
}

// =============================================================================
// BEHAVIOR ON BOTH HOSTS
// =============================================================================

#[test]
fn test_same_cache_contract_on_both_hosts() {
    // Reference host.
    let mut tds: Tds<WeightedPoint<f64, 3>, RegularCell3<f64>> = Tds::new();
    let keys: Vec<VertexKey> = [
        wp([0.0, 0.0, 0.0], 1.0),
        wp([1.0, 0.0, 0.0], 0.0),
        wp([0.0, 1.0, 0.0], 0.0),
        wp([0.0, 0.0, 1.0], 0.0),
    ]
    .into_iter()
    .map(|s| tds.insert_vertex(s))
    .collect();
    let tds_cell = tds.insert_cell(&keys).unwrap();

    // Named host.
    let mut host: NamedHost<RegularCell3<f64>> = NamedHost::new();
    for (name, site) in ["a", "b", "c", "d"].into_iter().zip([
        wp([0.0, 0.0, 0.0], 1.0),
        wp([1.0, 0.0, 0.0], 0.0),
        wp([0.0, 1.0, 0.0], 0.0),
        wp([0.0, 0.0, 1.0], 0.0),
    ]) {
        host.sites.insert(name, site);
    }
    host.cells.push(
        Rebound::<RegularCell3<f64>, NamedHandles>::from_vertices(&["a", "b", "c", "d"]).unwrap(),
    );

    // Same value on both.
    let from_tds = *tds.derived_point(tds_cell).unwrap();
    let from_host = *host.cells[0].derived_point(&host.sites).unwrap();
    assert_eq!(from_tds, Point::new([1.0, 1.0, 1.0]));
    assert_eq!(from_tds, from_host);

    // Same invalidation on an in-place move.
    tds.move_vertex(keys[2], wp([0.0, 2.0, 0.0], 0.0)).unwrap();
    host.move_site("c", wp([0.0, 2.0, 0.0], 0.0));
    assert!(!tds.cell(tds_cell).unwrap().is_cached());
    assert!(!host.cells[0].is_cached());

    let from_tds = *tds.derived_point(tds_cell).unwrap();
    let from_host = *host.cells[0].derived_point(&host.sites).unwrap();
    assert_eq!(from_tds, Point::new([1.0, 1.25, 1.0]));
    assert_eq!(from_tds, from_host);

    // Same invalidation on a rebinding mutation.
    host.cells[0].set_vertex(0, "b");
    assert!(!host.cells[0].is_cached());
    assert!(matches!(
        host.cells[0].is_valid(),
        Err(CellValidationError::DuplicateVertices)
    ));
}

#[test]
fn test_neighbors_use_host_cell_handles() {
    let mut host: NamedHost<DelaunayCell3<f64>> = NamedHost::new();
    let cell = Rebound::<DelaunayCell3<f64>, NamedHandles>::from_vertices_and_neighbors(
        &["a", "b", "c", "d"],
        &[Some(1), None, Some(2), None],
    )
    .unwrap();
    host.cells.push(cell);
    assert_eq!(host.cells[0].neighbor(2), Some(2u8));
    assert_eq!(host.cells[0].index_of("c"), Some(2));
}

#[test]
fn test_2d_delaunay_host() {
    let mut tds: Tds<Point<f64, 2>, DelaunayCell2<f64>> = Tds::new();
    let a = tds.insert_vertex(Point::new([0.0, 0.0]));
    let b = tds.insert_vertex(Point::new([4.0, 0.0]));
    let c = tds.insert_vertex(Point::new([0.0, 2.0]));
    let d = tds.insert_vertex(Point::new([4.0, 2.0]));

    let left = tds.insert_cell(&[a, b, c]).unwrap();
    let right = tds
        .insert_cell_with_neighbors(&[d, c, b], &[Some(left), None, None])
        .unwrap();
    tds.set_neighbor(left, 0, Some(right)).unwrap();
    assert!(tds.is_valid().is_ok());

    assert_eq!(*tds.derived_point(left).unwrap(), Point::new([2.0, 1.0]));
    assert_eq!(*tds.derived_point(right).unwrap(), Point::new([2.0, 1.0]));
    assert_eq!(tds.verify_derived_points(&FastKernel::new()), Ok(2));

    // Flip the shared diagonal by rewriting both cells.
    tds.set_cell_vertices(left, &[a, b, d]).unwrap();
    tds.set_cell_vertices(right, &[a, d, c]).unwrap();
    assert!(tds.cells().all(|(_, cell)| !cell.is_cached()));
    assert_eq!(*tds.derived_point(left).unwrap(), Point::new([2.0, 1.0]));
    assert_eq!(tds.number_of_cells(), 2);
}
