//! Property-based tests for cached derived points.
//!
//! This module uses proptest to verify the cache discipline of `CachedCell`
//! under random interleavings of queries and mutations:
//! - a cached value always equals a fresh computation from the current sites
//! - a failed computation never leaves a cached value behind
//! - repeated queries without mutation return the same value
//! - clones evolve independently
//! - the reference host keeps every cell fresh across `move_vertex`
//!
//! Tests are generated for dimensions 2D-3D using macros to reduce duplication.

use cached_simplex::prelude::*;
use proptest::prelude::*;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

/// Strategy for generating finite f64 coordinates
fn finite_coordinate() -> impl Strategy<Value = f64> {
    (-10.0..10.0).prop_filter("must be finite", |x: &f64| x.is_finite())
}

/// Strategy for generating non-negative weights
fn weight() -> impl Strategy<Value = f64> {
    0.0..2.0
}

/// One step applied to a cell and its sites.
#[derive(Clone, Debug)]
enum Op<const D: usize> {
    /// Query the derived point.
    Query,
    /// Rebind one vertex slot to another site.
    SetVertex { slot: usize, handle: usize },
    /// Rotate all vertex handles by one site.
    ShiftVertices,
    /// Explicitly invalidate.
    Invalidate,
    /// Move a site in place; the owner must invalidate affected cells.
    MoveSite { handle: usize, site: WeightedPoint<f64, D> },
}

// =============================================================================
// DIMENSIONAL TEST GENERATION MACROS
// =============================================================================

/// Macro to generate cached-cell property tests for a given dimension
macro_rules! test_cached_cell_properties {
    ($dim:literal, $arity:literal) => {
        pastey::paste! {
            type [<Cell $dim D>] = CachedCell<RegularKernel<f64>, TriangulationCellBase<Unbound, $arity>, $dim>;

            const [<SITES_ $dim D>]: usize = $arity + 3;

            fn [<weighted_site_ $dim d>]() -> impl Strategy<Value = WeightedPoint<f64, $dim>> {
                (prop::array::[<uniform $dim>](finite_coordinate()), weight())
                    .prop_map(|(coords, w)| WeightedPoint::new(Point::new(coords), w))
            }

            fn [<op_ $dim d>]() -> impl Strategy<Value = Op<$dim>> {
                prop_oneof![
                    3 => Just(Op::Query),
                    2 => (0usize..$arity, 0usize..[<SITES_ $dim D>])
                        .prop_map(|(slot, handle)| Op::SetVertex { slot, handle }),
                    1 => Just(Op::ShiftVertices),
                    1 => Just(Op::Invalidate),
                    2 => (0usize..[<SITES_ $dim D>], [<weighted_site_ $dim d>]())
                        .prop_map(|(handle, site)| Op::MoveSite { handle, site }),
                ]
            }

            /// Applies `op`, acting as the owner of `sites`.
            fn [<apply_ $dim d>](
                cell: &mut [<Cell $dim D>],
                sites: &mut [WeightedPoint<f64, $dim>],
                op: &Op<$dim>,
            ) {
                match op {
                    Op::Query => {
                        let _ = cell.derived_point(&*sites);
                    }
                    Op::SetVertex { slot, handle } => cell.set_vertex(*slot, *handle),
                    Op::ShiftVertices => {
                        let shifted: Vec<usize> = cell
                            .vertices()
                            .iter()
                            .map(|v| (v.unwrap_or(0) + 1) % sites.len())
                            .collect();
                        cell.set_vertices(&shifted).unwrap();
                    }
                    Op::Invalidate => cell.invalidate(),
                    Op::MoveSite { handle, site } => {
                        sites[*handle] = *site;
                        if cell.contains_vertex(*handle) {
                            cell.invalidate_caches();
                        }
                    }
                }
            }

            proptest! {
                /// Property: a cached value always matches a fresh computation
                #[test]
                fn [<prop_cache_is_always_fresh_ $dim d>](
                    initial in prop::collection::vec([<weighted_site_ $dim d>](), [<SITES_ $dim D>]),
                    ops in prop::collection::vec([<op_ $dim d>](), 1..40),
                ) {
                    let kernel = RegularKernel::<f64>::new();
                    let mut sites = initial;
                    let handles: Vec<usize> = (0..$arity).collect();
                    let mut cell = [<Cell $dim D>]::from_vertices(&handles).unwrap();

                    for op in &ops {
                        [<apply_ $dim d>](&mut cell, &mut sites, op);

                        let fresh = cell.compute_derived_point(&kernel, &sites);
                        if let Some(cached) = cell.cached_derived_point() {
                            prop_assert_eq!(Ok(*cached), fresh);
                        }
                        prop_assert!(cell.verify_derived_point(&kernel, &sites).is_ok());
                    }
                }

                /// Property: a failed query leaves the cache empty; a successful one fills it
                #[test]
                fn [<prop_query_outcome_matches_cache_state_ $dim d>](
                    sites in prop::collection::vec([<weighted_site_ $dim d>](), [<SITES_ $dim D>]),
                    handles in prop::collection::vec(0usize..[<SITES_ $dim D>], $arity),
                ) {
                    let cell = [<Cell $dim D>]::from_vertices(&handles).unwrap();
                    match cell.derived_point(&sites) {
                        Ok(point) => {
                            let point = *point;
                            prop_assert_eq!(cell.cached_derived_point(), Some(&point));
                            // Idempotent.
                            prop_assert_eq!(*cell.derived_point(&sites).unwrap(), point);
                        }
                        Err(_) => prop_assert!(!cell.is_cached()),
                    }
                }

                /// Property: clones own independent caches
                #[test]
                fn [<prop_clones_are_independent_ $dim d>](
                    sites in prop::collection::vec([<weighted_site_ $dim d>](), [<SITES_ $dim D>]),
                    slot in 0usize..$arity,
                    handle in 0usize..[<SITES_ $dim D>],
                ) {
                    let handles: Vec<usize> = (0..$arity).collect();
                    let original = [<Cell $dim D>]::from_vertices(&handles).unwrap();
                    let _ = original.derived_point(&sites);
                    let snapshot = original.cached_derived_point().copied();

                    let mut copy = original.clone();
                    prop_assert_eq!(copy.cached_derived_point().copied(), snapshot);

                    copy.set_vertex(slot, handle);
                    let _ = copy.derived_point(&sites);
                    prop_assert_eq!(original.cached_derived_point().copied(), snapshot);
                }

                /// Property: the host keeps every cached cell fresh across vertex moves
                #[test]
                fn [<prop_host_move_vertex_keeps_cells_fresh_ $dim d>](
                    initial in prop::collection::vec([<weighted_site_ $dim d>](), [<SITES_ $dim D>]),
                    moves in prop::collection::vec(
                        (0usize..[<SITES_ $dim D>], [<weighted_site_ $dim d>]()),
                        1..10,
                    ),
                ) {
                    let kernel = RegularKernel::<f64>::new();
                    let mut tds: Tds<WeightedPoint<f64, $dim>, [<Cell $dim D>]> = Tds::new();
                    let keys: Vec<VertexKey> = initial.into_iter().map(|s| tds.insert_vertex(s)).collect();

                    // Cells over sites [0, arity) and [3, arity + 3); they share sites from 3D up.
                    let first = tds.insert_cell(&keys[..$arity]).unwrap();
                    let second = tds.insert_cell(&keys[3..]).unwrap();

                    for (index, site) in moves {
                        for cell in [first, second] {
                            let _ = tds.derived_point_with(cell, &kernel);
                        }
                        tds.move_vertex(keys[index], site).unwrap();
                        prop_assert!(tds.verify_derived_points(&kernel).is_ok());
                        for cell in [first, second] {
                            if tds.cell(cell).unwrap().contains_vertex(keys[index]) {
                                prop_assert!(!tds.cell(cell).unwrap().is_cached());
                            }
                        }
                    }
                    prop_assert!(tds.is_valid().is_ok());
                }
            }
        }
    };
}

test_cached_cell_properties!(2, 3);
test_cached_cell_properties!(3, 4);
