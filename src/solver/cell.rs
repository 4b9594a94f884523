use crate::model::WaveWeights;

/// Running aggregates for one cell's superposition
///
/// `entropy` must equal the closed-form entropy over the currently-possible
/// values' weights except transiently inside a single ban. To preserve that
/// invariant the fields are mutated only by ban, reset, and snapshot copies.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellStats {
    /// Count of still-possible wave values; zero signals a contradiction
    pub(crate) sum_of_ones: usize,
    /// Total weight over still-possible wave values
    pub(crate) sum_of_weights: f64,
    /// Total weight·ln(weight) over still-possible wave values
    pub(crate) sum_of_weight_log_weights: f64,
    /// Incrementally maintained Shannon entropy
    pub(crate) entropy: f64,
}

impl CellStats {
    /// Return the cell to the fully uncertain starting state
    pub(crate) fn reset(&mut self, wave_count: usize, weights: &WaveWeights) {
        self.sum_of_ones = wave_count;
        self.sum_of_weights = weights.sum_of_weights();
        self.sum_of_weight_log_weights = weights.sum_of_weight_log_weights();
        self.entropy = weights.starting_entropy();
    }

    /// Remove one value's contribution from the aggregates
    ///
    /// Undoes the closed-form term at the old sums, shrinks the sums, and
    /// re-applies the term at the new sums. Never resummed over wave values.
    pub(crate) fn remove(&mut self, weight: f64, weight_log_weight: f64) {
        let sum = self.sum_of_weights;
        self.entropy += self.sum_of_weight_log_weights / sum - sum.ln();

        self.sum_of_weights -= weight;
        self.sum_of_weight_log_weights -= weight_log_weight;

        let next_sum = self.sum_of_weights;
        self.entropy -= self.sum_of_weight_log_weights / next_sum - next_sum.ln();
    }
}
