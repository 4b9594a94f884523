//! Immutable model inputs consumed by the solver
//!
//! A model builder (outside this crate) produces an adjacency table and a
//! weight vector; the solver treats both as fixed for its lifetime.

/// Per-direction, per-wave-value adjacency rules
pub mod propagator;
/// Validated wave value weights with precomputed entropy aggregates
pub mod weights;

pub use propagator::{PropagatorTable, SymmetryViolation};
pub use weights::WaveWeights;
