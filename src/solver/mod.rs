//! Core constraint solver: superposition state, entropy-guided observation,
//! arc-consistency propagation, and snapshot recovery

/// Bit-per-wave-value superposition set
pub mod bitset;
/// Localized 3D reset for approximate conflict recovery (experimental)
pub mod blast;
/// Per-cell running entropy and weight aggregates
pub mod cell;
/// Snapshot-cadence retry driver over observe/propagate cycles
pub mod runner;
/// Generic solver state shared by the 2D and 3D lattices
pub mod state;

pub use state::{Contradiction, Solver, Solver2, Solver3, StepResult};
