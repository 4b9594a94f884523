//! Error types for solver construction and model validation
//!
//! Contradictions discovered while solving are not errors: they are an expected
//! algorithmic outcome reported through [`crate::solver::StepResult`]. Errors
//! here cover only inputs that can never produce a working solver.

use std::fmt;

/// Main error type for solver construction failures
#[derive(Debug)]
pub enum SolverError {
    /// Weight vector cannot seed the entropy bookkeeping
    InvalidWeights {
        /// Number of wave values in the rejected vector
        count: usize,
        /// Explanation of why the vector is invalid
        reason: String,
    },

    /// Lattice dimensions do not describe at least one cell
    InvalidDimensions {
        /// Number of cells the lattice resolves to
        cell_count: usize,
    },

    /// Propagator table shape disagrees with the lattice or weight vector
    PropagatorShape {
        /// Direction count carried by the table
        directions: usize,
        /// Direction count required by the lattice
        expected_directions: usize,
        /// Wave value count carried by the table
        wave_values: usize,
        /// Wave value count required by the weight vector
        expected_wave_values: usize,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWeights { count, reason } => {
                write!(f, "Invalid weight vector of {count} entries: {reason}")
            }
            Self::InvalidDimensions { cell_count } => {
                write!(f, "Lattice must contain at least one cell (got {cell_count})")
            }
            Self::PropagatorShape {
                directions,
                expected_directions,
                wave_values,
                expected_wave_values,
            } => {
                write!(
                    f,
                    "Propagator table is {directions} directions x {wave_values} wave values, \
                     expected {expected_directions} x {expected_wave_values}"
                )
            }
        }
    }
}

impl std::error::Error for SolverError {}

/// Convenience type alias for solver results
pub type Result<T> = std::result::Result<T, SolverError>;

/// Create an invalid weights error
pub fn invalid_weights(count: usize, reason: &impl ToString) -> SolverError {
    SolverError::InvalidWeights {
        count,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_shape_mismatch() {
        let err = SolverError::PropagatorShape {
            directions: 4,
            expected_directions: 6,
            wave_values: 3,
            expected_wave_values: 3,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("4 directions"));
        assert!(rendered.contains("expected 6"));
    }

    #[test]
    fn test_invalid_weights_helper() {
        let err = invalid_weights(5, &"total weight is zero");
        match err {
            SolverError::InvalidWeights { count, reason } => {
                assert_eq!(count, 5);
                assert_eq!(reason, "total weight is zero");
            }
            _ => unreachable!("Expected InvalidWeights error type"),
        }
    }
}
