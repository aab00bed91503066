//! Spatial data structures
//!
//! - Diamond neighborhood offsets
//! - Output pixels and candidate weights

/// Output and candidate grids
pub mod grid;
/// Neighborhood offset sets
pub mod neighborhood;

pub use grid::{CandidateGrid, Neighbor, OutputGrid, Pixel, Position};
pub use neighborhood::{NeighborhoodOffsets, Offset};
