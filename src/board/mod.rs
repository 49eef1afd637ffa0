//! Board: bounded square grid with occupancy and adjacency rules.

mod grid;

pub use grid::Board;
