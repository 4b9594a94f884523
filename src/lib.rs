//! Wave function collapse solver using entropy-guided observation and arc-consistency propagation
//!
//! The solver fills a 2D or 3D grid of cells with discrete wave values such that
//! every adjacency constraint in a supplied propagator table is satisfied,
//! collapsing low-entropy cells first and pruning impossible assignments
//! incrementally. Model construction and output decoding are caller concerns.

#![forbid(unsafe_code)]

/// Error types for construction-time validation failures
pub mod error;
/// Mathematical utilities for entropy bookkeeping and weighted sampling
pub mod math;
/// Immutable model inputs: adjacency rules and wave value weights
pub mod model;
/// Core solver state, observation, propagation, and snapshot operations
pub mod solver;
/// Grid topologies and coordinate codecs for 2D and 3D lattices
pub mod spatial;

pub use error::{Result, SolverError};
