//! Closed-form entropy over a weighted possibility set
//!
//! The solver never recomputes entropy by summation during a ban; it maintains
//! running weight aggregates and re-derives the closed form below. These
//! helpers exist so construction, reset, and verification all share one
//! definition of that closed form.

/// Weight contribution to the log-weight aggregate
///
/// Defines `0 * ln(0)` as zero so that zero-weight wave values are admissible
/// in an otherwise positive weight vector.
pub fn weight_log_weight(weight: f64) -> f64 {
    if weight > 0.0 { weight * weight.ln() } else { 0.0 }
}

/// Shannon-style entropy of a possibility set from its running aggregates
///
/// `log(sumOfWeights) - sumOfWeightLogWeights / sumOfWeights`. Lower entropy
/// means fewer or more skewed remaining options, and therefore a higher
/// priority for observation.
pub fn shannon_entropy(sum_of_weights: f64, sum_of_weight_log_weights: f64) -> f64 {
    sum_of_weights.ln() - sum_of_weight_log_weights / sum_of_weights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_weight_contributes_nothing() {
        assert!((weight_log_weight(0.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_uniform_entropy_matches_log_count() {
        // Two equal weights of 0.5: entropy is ln(2) of the normalized distribution
        let wlw = 2.0 * weight_log_weight(0.5);
        let entropy = shannon_entropy(1.0, wlw);
        assert!((entropy - 2.0_f64.ln()).abs() < 1e-12);
    }
}
