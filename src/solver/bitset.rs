use bitvec::prelude::*;
use std::fmt;

/// Fixed-size bitset tracking a cell's still-possible wave values
///
/// Starts with every wave value present and only ever shrinks: banned values
/// stay banned until a full [`reset`](Self::reset), which is why no single-bit
/// insert operation exists. Provides O(1) membership testing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveBitset {
    bits: BitVec,
    wave_count: usize,
}

impl WaveBitset {
    /// Create a bitset containing every wave value
    pub fn all(wave_count: usize) -> Self {
        Self {
            bits: bitvec![1; wave_count],
            wave_count,
        }
    }

    /// Test wave value membership
    pub fn contains(&self, wave_value: usize) -> bool {
        self.bits.get(wave_value).as_deref() == Some(&true)
    }

    /// Remove a wave value
    pub fn remove(&mut self, wave_value: usize) {
        if wave_value < self.wave_count {
            self.bits.set(wave_value, false);
        }
    }

    /// Restore every wave value
    pub fn reset(&mut self) {
        self.bits.fill(true);
    }

    /// Count still-possible wave values
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Test if no wave value remains
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Lowest still-possible wave value, if any
    pub fn first_set(&self) -> Option<usize> {
        self.bits.first_one()
    }

    /// Number of wave values the set ranges over
    pub const fn wave_count(&self) -> usize {
        self.wave_count
    }

    /// Extract all still-possible wave values as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }
}

impl fmt::Display for WaveBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WaveBitset({} of {}: {:?})", self.count(), self.wave_count, self.to_vec())
    }
}
