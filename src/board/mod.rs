//! Board geometry: edge and box addresses on an N×N dot grid.
//!
//! Pure helpers, no state. The game state stores edges and boxes in
//! row-major vectors indexed through these addresses.

pub mod geometry;

pub use geometry::{
    adjacent_boxes, box_count, box_edges, edge_count, edge_dims, BoxEdges, BoxPos, Edge,
    Orientation,
};

/// Iterate over every edge of a grid, horizontal edges first, row-major.
pub fn all_edges(size: usize) -> impl Iterator<Item = Edge> {
    [Orientation::Horizontal, Orientation::Vertical]
        .into_iter()
        .flat_map(move |orientation| {
            let (rows, cols) = edge_dims(orientation, size);
            (0..rows).flat_map(move |row| (0..cols).map(move |col| Edge::new(orientation, row, col)))
        })
}
