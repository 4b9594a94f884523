//! Adjacency compatibility rules between neighbouring wave values
//!
//! For each (direction, wave value) pair the table lists the wave values that
//! remain permitted in the neighbouring cell on that side. The solver consumes
//! the table read-only; builders assemble it once up front.

/// One asymmetric adjacency entry found during validation
///
/// `neighbour_value` is reachable from `wave_value` in `direction`, but
/// `wave_value` is not reachable back along the opposite direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymmetryViolation {
    /// Direction of the one-way rule
    pub direction: usize,
    /// Wave value on the near side
    pub wave_value: usize,
    /// Wave value on the far side that cannot see back
    pub neighbour_value: usize,
}

/// Per-direction, per-wave-value adjacency table
///
/// Entry order is irrelevant and duplicates are harmless but wasteful; the
/// solver only iterates entries and counts them.
#[derive(Debug, Clone)]
pub struct PropagatorTable {
    allowed: Vec<Vec<Vec<usize>>>,
    wave_count: usize,
}

impl PropagatorTable {
    /// Create an empty table for the given direction and wave value counts
    pub fn new(direction_count: usize, wave_count: usize) -> Self {
        Self {
            allowed: vec![vec![Vec::new(); wave_count]; direction_count],
            wave_count,
        }
    }

    /// Create a table permitting every adjacency in every direction
    pub fn permissive(direction_count: usize, wave_count: usize) -> Self {
        let every: Vec<usize> = (0..wave_count).collect();
        Self {
            allowed: vec![vec![every; wave_count]; direction_count],
            wave_count,
        }
    }

    /// Permit `neighbour_value` next to `wave_value` in `direction`
    ///
    /// Out-of-range indices are ignored; the rule set stays unchanged.
    pub fn allow(&mut self, direction: usize, wave_value: usize, neighbour_value: usize) {
        if neighbour_value >= self.wave_count {
            return;
        }
        if let Some(row) = self
            .allowed
            .get_mut(direction)
            .and_then(|by_wave| by_wave.get_mut(wave_value))
        {
            row.push(neighbour_value);
        }
    }

    /// Number of directions the table covers
    pub fn direction_count(&self) -> usize {
        self.allowed.len()
    }

    /// Number of wave values the table covers
    pub const fn wave_count(&self) -> usize {
        self.wave_count
    }

    /// Wave values permitted in the `direction` neighbour of a `wave_value` cell
    pub fn allowed(&self, direction: usize, wave_value: usize) -> &[usize] {
        self.allowed
            .get(direction)
            .and_then(|by_wave| by_wave.get(wave_value))
            .map_or(&[], Vec::as_slice)
    }

    /// Size of the rule row for `wave_value` in `direction`
    ///
    /// Taken along the opposite direction this seeds the per-cell
    /// compatibility counters on reset; it matches the true supporter count
    /// exactly when the table is symmetric.
    pub fn support_count(&self, direction: usize, wave_value: usize) -> i32 {
        self.allowed(direction, wave_value).len() as i32
    }

    /// Find one-way adjacency rules
    ///
    /// A rule `w1 -d-> w2` without the matching `w2 -opposite(d)-> w1` makes
    /// the compatibility counters start from the wrong supporter count. Some
    /// models are deliberately asymmetric (directional floors and ceilings),
    /// so the solver reports these as a diagnostic rather than rejecting them.
    pub fn symmetry_violations(&self, opposite: fn(usize) -> usize) -> Vec<SymmetryViolation> {
        let mut violations = Vec::new();
        for direction in 0..self.direction_count() {
            for wave_value in 0..self.wave_count {
                for &neighbour_value in self.allowed(direction, wave_value) {
                    let reverse = self.allowed(opposite(direction), neighbour_value);
                    if !reverse.contains(&wave_value) {
                        violations.push(SymmetryViolation {
                            direction,
                            wave_value,
                            neighbour_value,
                        });
                    }
                }
            }
        }
        violations
    }
}
