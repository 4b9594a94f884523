//! Mathematical utilities for the solver

/// Shannon entropy aggregates maintained incrementally per cell
pub mod entropy;
/// Weighted random selection via inverse cumulative distribution
pub mod sampling;
