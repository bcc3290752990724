//! # Cached Weighted Circumcenter of a Regular 3D Cell
//!
//! This example walks one tetrahedral cell of a regular triangulation through
//! the full cache lifecycle:
//!
//! - First query computes the weighted circumcenter and caches it
//! - Repeated queries are served from the cache
//! - Replacing a vertex invalidates the cache; the next query recomputes
//! - A clone keeps its own cache while the original changes
//! - A host moving a vertex in place invalidates the incident cells
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=trace cargo run --example regular_cell_3d
//! ```

use cached_simplex::prelude::*;
use std::sync::Once;
use std::time::Instant;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}

fn wp(coords: [f64; 3], weight: f64) -> WeightedPoint<f64, 3> {
    WeightedPoint::new(Point::new(coords), weight)
}

fn main() {
    init_tracing();

    println!("=================================================================");
    println!("Regular 3D Cell - Cached Weighted Circumcenter");
    println!("=================================================================\n");

    standalone_cell();

    println!("\n-----------------------------------------------------------------\n");

    hosted_cells();

    println!("\n=================================================================");
    println!("Example complete!");
    println!("=================================================================");
}

// ============================================================================
// STANDALONE CELL
// ============================================================================

fn standalone_cell() {
    let sites = vec![
        wp([0.0, 0.0, 0.0], 1.0),
        wp([1.0, 0.0, 0.0], 0.0),
        wp([0.0, 1.0, 0.0], 0.0),
        wp([0.0, 0.0, 1.0], 0.0),
        wp([0.0, 2.0, 0.0], 0.0),
    ];

    let mut cell = match RegularCell3::<f64>::from_vertices(&[0, 1, 2, 3]) {
        Ok(cell) => cell,
        Err(e) => {
            eprintln!("✗ Failed to build cell: {e}");
            return;
        }
    };
    println!("Cell vertices: {:?}", cell.vertices());
    println!("Cached before first query: {}", cell.is_cached());

    let start = Instant::now();
    let center = match cell.derived_point(&sites) {
        Ok(center) => *center,
        Err(e) => {
            eprintln!("✗ Query failed: {e}");
            return;
        }
    };
    println!("✓ First query:  {:?} in {:?}", center.coords(), start.elapsed());

    let start = Instant::now();
    if let Ok(again) = cell.derived_point(&sites) {
        println!("✓ Second query: {:?} in {:?} (cached)", again.coords(), start.elapsed());
    }

    for (i, site) in sites.iter().take(4).enumerate() {
        println!("  power distance to site {i}: {:.6}", site.power_distance(&center));
    }

    let snapshot = cell.clone();
    cell.set_vertex(2, 4);
    println!("\nReplaced slot 2 with site 4; cached: {}", cell.is_cached());
    match cell.derived_point(&sites) {
        Ok(moved) => println!("✓ Recomputed:   {:?}", moved.coords()),
        Err(e) => eprintln!("✗ Query failed: {e}"),
    }
    println!(
        "Clone taken before the change still holds {:?}",
        snapshot.cached_derived_point().map(Point::coords)
    );

    let kernel = RegularKernel::<f64>::new();
    match cell.verify_derived_point(&kernel, &sites) {
        Ok(()) => println!("✓ Cache verified against a fresh computation"),
        Err(e) => eprintln!("✗ Verification failed: {e}"),
    }
}

// ============================================================================
// CELLS IN THE REFERENCE HOST
// ============================================================================

fn hosted_cells() {
    let mut tds: Tds<WeightedPoint<f64, 3>, RegularCell3<f64>> = Tds::new();
    let apex = tds.insert_vertex(wp([0.0, 0.0, 0.0], 0.5));
    let a = tds.insert_vertex(wp([1.0, 0.0, 0.0], 0.0));
    let b = tds.insert_vertex(wp([0.0, 1.0, 0.0], 0.0));
    let c = tds.insert_vertex(wp([0.0, 0.0, 1.0], 0.0));
    let d = tds.insert_vertex(wp([-1.0, 0.0, 0.0], 0.0));

    let cells = [
        tds.insert_cell(&[apex, a, b, c]),
        tds.insert_cell(&[apex, d, b, c]),
    ];
    let cells: Vec<CellKey> = match cells.into_iter().collect::<Result<Vec<_>, _>>() {
        Ok(cells) => cells,
        Err(e) => {
            eprintln!("✗ Failed to insert cells: {e}");
            return;
        }
    };
    println!(
        "Host with {} vertices and {} cells",
        tds.number_of_vertices(),
        tds.number_of_cells()
    );

    for &cell in &cells {
        match tds.derived_point(cell) {
            Ok(center) => println!("  {cell:?}: {:?}", center.coords()),
            Err(e) => eprintln!("  {cell:?}: ✗ {e}"),
        }
    }

    if let Err(e) = tds.move_vertex(apex, wp([0.1, 0.1, 0.1], 0.0)) {
        eprintln!("✗ Move failed: {e}");
        return;
    }
    let stale = cells
        .iter()
        .filter(|&&cell| tds.cell(cell).is_some_and(|c| c.is_cached()))
        .count();
    println!("\nMoved the shared apex; cells still cached: {stale}");

    for &cell in &cells {
        match tds.derived_point(cell) {
            Ok(center) => println!("  {cell:?}: {:?}", center.coords()),
            Err(e) => eprintln!("  {cell:?}: ✗ {e}"),
        }
    }

    match tds.verify_derived_points(&RegularKernel::new()) {
        Ok(checked) => println!("✓ Verified {checked} cached cells"),
        Err(e) => eprintln!("✗ Verification failed: {e}"),
    }
}
