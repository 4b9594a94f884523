//! Grid topology management for 2D and 3D lattices

/// Coordinate codecs, neighbour offset tables, and toroidal wrapping
pub mod lattice;

pub use lattice::{Grid2, Grid3, Lattice};
