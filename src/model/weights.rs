//! Wave value weights and the global entropy aggregates derived from them

use crate::error::{Result, invalid_weights};
use crate::math::entropy::{shannon_entropy, weight_log_weight};

/// Validated per-wave-value weight vector
///
/// Weights act as relative frequencies during observation sampling and seed
/// every cell's entropy bookkeeping on reset. Captured once at construction;
/// constant for the solver's lifetime.
#[derive(Debug, Clone)]
pub struct WaveWeights {
    weights: Vec<f64>,
    weight_log_weights: Vec<f64>,
    sum_of_weights: f64,
    sum_of_weight_log_weights: f64,
    starting_entropy: f64,
}

impl WaveWeights {
    /// Validate a weight vector and capture its aggregates
    ///
    /// # Errors
    ///
    /// Returns [`crate::SolverError::InvalidWeights`] when the vector is
    /// empty, contains a negative or non-finite entry, or sums to zero.
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        let count = weights.len();
        if count == 0 {
            return Err(invalid_weights(count, &"weight vector is empty"));
        }
        for (index, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid_weights(
                    count,
                    &format!("weight {weight} at index {index} must be finite and non-negative"),
                ));
            }
        }

        let weight_log_weights: Vec<f64> =
            weights.iter().map(|&weight| weight_log_weight(weight)).collect();
        let sum_of_weights: f64 = weights.iter().sum();
        let sum_of_weight_log_weights: f64 = weight_log_weights.iter().sum();

        if sum_of_weights <= 0.0 {
            return Err(invalid_weights(count, &"total weight is zero"));
        }

        let starting_entropy = shannon_entropy(sum_of_weights, sum_of_weight_log_weights);

        Ok(Self {
            weights,
            weight_log_weights,
            sum_of_weights,
            sum_of_weight_log_weights,
            starting_entropy,
        })
    }

    /// Number of wave values
    pub fn wave_count(&self) -> usize {
        self.weights.len()
    }

    /// Raw weight vector
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight of one wave value, zero when out of range
    pub fn weight(&self, wave_value: usize) -> f64 {
        self.weights.get(wave_value).copied().unwrap_or(0.0)
    }

    /// `weight * ln(weight)` of one wave value, zero when out of range
    pub fn log_weight(&self, wave_value: usize) -> f64 {
        self.weight_log_weights.get(wave_value).copied().unwrap_or(0.0)
    }

    /// Total weight over all wave values
    pub const fn sum_of_weights(&self) -> f64 {
        self.sum_of_weights
    }

    /// Total `weight * ln(weight)` over all wave values
    pub const fn sum_of_weight_log_weights(&self) -> f64 {
        self.sum_of_weight_log_weights
    }

    /// Entropy of a fully uncertain cell
    pub const fn starting_entropy(&self) -> f64 {
        self.starting_entropy
    }
}
