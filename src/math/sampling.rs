//! Inverse-CDF selection over an unnormalized weight vector

/// Select an index from a discrete distribution using a uniform draw in `[0, 1)`
///
/// Weights are treated as unnormalized probability mass. Returns `None` when
/// the total mass is zero or non-finite, leaving the fallback policy to the
/// caller. Floating point shortfall at the end of the walk resolves to the
/// last index carrying positive mass.
pub fn weighted_index(weights: &[f64], draw: f64) -> Option<usize> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }

    let mut cumulative = 0.0;
    let mut fallback = None;
    for (index, &weight) in weights.iter().enumerate() {
        if weight > 0.0 {
            fallback = Some(index);
        }
        cumulative += weight / total;
        if draw <= cumulative && weight > 0.0 {
            return Some(index);
        }
    }
    fallback
}
