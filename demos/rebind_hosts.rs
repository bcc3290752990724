//! # Rebinding One Cell Description onto Two Hosts
//!
//! A cell type is written once against the placeholder [`Unbound`] handles and
//! then rebound to whatever handle types a host uses. This example binds
//! `DelaunayCell2` to:
//!
//! - the reference [`Tds`] (slotmap keys)
//! - a small host of its own that names vertices with `char`s and stores cells in a `Vec`
//!
//! Both bindings compute the same circumcenters and follow the same cache rules.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example rebind_hosts
//! ```

use cached_simplex::prelude::*;
use std::any::type_name;
use std::collections::HashMap;

/// Handle family of a host addressing vertices by `char` and cells by index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
struct CharHandles;

impl TdsHandles for CharHandles {
    type VertexHandle = char;
    type CellHandle = usize;
}

type CharCell = Rebound<DelaunayCell2<f64>, CharHandles>;

fn main() {
    println!("=================================================================");
    println!("Rebinding DelaunayCell2 onto two hosts");
    println!("=================================================================\n");

    println!("Unbound:    {}", type_name::<DelaunayCell2<f64>>());
    println!("Tds-bound:  {}", type_name::<TdsCell<DelaunayCell2<f64>>>());
    println!("Char-bound: {}", type_name::<CharCell>());
    println!();

    let coords = [[0.0, 0.0], [4.0, 0.0], [0.0, 2.0], [4.0, 2.0]];

    // Reference host.
    let mut tds: Tds<Point<f64, 2>, DelaunayCell2<f64>> = Tds::new();
    let keys: Vec<VertexKey> = coords
        .iter()
        .map(|&c| tds.insert_vertex(Point::new(c)))
        .collect();
    let tds_cells = [
        tds.insert_cell(&[keys[0], keys[1], keys[2]]),
        tds.insert_cell(&[keys[3], keys[2], keys[1]]),
    ];

    // Char host.
    let sites: HashMap<char, Point<f64, 2>> = ['a', 'b', 'c', 'd']
        .into_iter()
        .zip(coords.iter().map(|&c| Point::new(c)))
        .collect();
    let char_cells: Vec<Result<CharCell, CellValidationError>> = vec![
        CharCell::from_vertices_and_neighbors(&['a', 'b', 'c'], &[Some(1), None, None]),
        CharCell::from_vertices_and_neighbors(&['d', 'c', 'b'], &[Some(0), None, None]),
    ];

    println!("{:<8} {:>24} {:>24}", "cell", "Tds", "char host");
    for (i, (tds_cell, char_cell)) in tds_cells.iter().zip(&char_cells).enumerate() {
        let from_tds = tds_cell
            .as_ref()
            .map_err(ToString::to_string)
            .and_then(|&k| tds.derived_point(k).map(|p| *p).map_err(|e| e.to_string()));
        let from_chars = char_cell
            .as_ref()
            .map_err(ToString::to_string)
            .and_then(|cell| cell.derived_point(&sites).map(|p| *p).map_err(|e| e.to_string()));
        println!(
            "{i:<8} {:>24} {:>24}",
            format!("{:?}", from_tds.map(|p| p.to_array())),
            format!("{:?}", from_chars.map(|p| p.to_array())),
        );
    }

    if let Some(Ok(cell)) = char_cells.first() {
        println!(
            "\nchar cell 0: vertices {:?}, neighbor across 'a' is cell {:?}",
            cell.vertices(),
            cell.neighbor(0)
        );
    }
}
