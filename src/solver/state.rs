//! Generic solver state over a lattice topology
//!
//! One solver implementation covers both the 2D and 3D variants: the lattice
//! strategy supplies the coordinate codec and neighbour tables, while all
//! entropy bookkeeping, ban cascades, and propagation logic are shared.

use ndarray::Array3;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::rc::Rc;

use crate::error::{Result, SolverError};
use crate::math::sampling::weighted_index;
use crate::model::{PropagatorTable, SymmetryViolation, WaveWeights};
use crate::solver::bitset::WaveBitset;
use crate::solver::cell::CellStats;
use crate::spatial::{Grid2, Grid3, Lattice};

/// Scale of the random noise added to entropy for tie breaking
const ENTROPY_NOISE_SCALE: f64 = 1e-6;
/// Starting minimum for the entropy scan; above any reachable cell entropy
const ENTROPY_SCAN_START: f64 = 1e3;

/// Location and cause of a contradiction
///
/// A contradiction is an expected algorithmic outcome, not a failure of the
/// solver: it signals that the current partial assignment is unsatisfiable
/// and must be rolled back or reset by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contradiction<C> {
    /// Coordinates of the exhausted cell
    pub coords: C,
    /// The wave value whose removal emptied the cell, when known
    pub wave_value: Option<usize>,
    /// The propagation direction that caused the removal, when known
    pub direction: Option<usize>,
}

/// Outcome of one observe or propagate call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepResult<C> {
    /// Progress was made; the caller should keep cycling observe/propagate
    Continue,
    /// Every cell is determined; the observed array is populated
    Finished,
    /// The partial assignment is unsatisfiable; roll back or reset
    Conflict(Contradiction<C>),
}

/// 2D solver over a [`Grid2`] lattice (4 neighbour directions)
pub type Solver2 = Solver<Grid2>;
/// 3D solver over a [`Grid3`] lattice (6 neighbour directions)
pub type Solver3 = Solver<Grid3>;

/// Wave function collapse solver state
///
/// Owns the per-cell superposition bitsets, compatibility counters, entropy
/// aggregates, observed values, and the pending-removals worklist. Created
/// once per model; [`clear`](Self::clear) makes it reusable across solve
/// attempts, and [`copy`](Self::copy)/[`copy_into`](Self::copy_into) provide
/// snapshots for backtracking.
pub struct Solver<L: Lattice> {
    pub(crate) lattice: L,
    pub(crate) seed: u64,
    pub(crate) rng: StdRng,
    pub(crate) weights: WaveWeights,
    pub(crate) propagator: Rc<PropagatorTable>,
    pub(crate) boundary: Rc<dyn Fn(L::Coords) -> bool>,
    pub(crate) prior: Option<Rc<dyn Fn(L::Coords, usize) -> f64>>,
    pub(crate) bias: Option<Rc<dyn Fn(L::Coords) -> f64>>,
    pub(crate) wave: Vec<WaveBitset>,
    pub(crate) compatible: Array3<i32>,
    pub(crate) stats: Vec<CellStats>,
    pub(crate) observed: Vec<Option<usize>>,
    pub(crate) removals: Vec<(usize, usize)>,
    pub(crate) observable: bool,
}

impl<L: Lattice> Solver<L> {
    /// Create a solver for a lattice, weight vector, and propagator table
    ///
    /// The solver starts in the fully uncertain state (an implicit
    /// [`clear`](Self::clear)). An asymmetric propagator table is accepted
    /// with a stderr diagnostic: some models are deliberately one-way, but
    /// the compatibility counters may then under- or over-constrain.
    ///
    /// # Errors
    ///
    /// Returns an error if the lattice has no cells, the weight vector is
    /// invalid, or the table shape disagrees with the lattice or weights.
    pub fn new(
        lattice: L,
        seed: u64,
        weights: Vec<f64>,
        propagator: PropagatorTable,
    ) -> Result<Self> {
        let cell_count = lattice.cell_count();
        if cell_count == 0 {
            return Err(SolverError::InvalidDimensions { cell_count });
        }

        let weights = WaveWeights::new(weights)?;
        if propagator.direction_count() != L::DIRECTION_COUNT
            || propagator.wave_count() != weights.wave_count()
        {
            return Err(SolverError::PropagatorShape {
                directions: propagator.direction_count(),
                expected_directions: L::DIRECTION_COUNT,
                wave_values: propagator.wave_count(),
                expected_wave_values: weights.wave_count(),
            });
        }

        warn_asymmetry(&propagator.symmetry_violations(L::opposite));

        let wave_count = weights.wave_count();
        let mut solver = Self {
            lattice,
            seed,
            rng: StdRng::seed_from_u64(seed),
            weights,
            propagator: Rc::new(propagator),
            boundary: Rc::new(|_: L::Coords| false),
            prior: None,
            bias: None,
            wave: vec![WaveBitset::all(wave_count); cell_count],
            compatible: Array3::zeros((cell_count, wave_count, L::DIRECTION_COUNT)),
            stats: vec![CellStats::default(); cell_count],
            observed: vec![None; cell_count],
            removals: Vec::new(),
            observable: false,
        };
        solver.clear();
        Ok(solver)
    }

    /// Replace the boundary predicate
    ///
    /// Coordinates for which the predicate returns true are outside the
    /// solvable region: excluded from observation and from propagation across
    /// that edge. The predicate is tested on raw neighbour coordinates before
    /// toroidal wrapping, so a predicate that is false everywhere yields
    /// fully periodic behaviour.
    #[must_use]
    pub fn with_boundary(mut self, boundary: impl Fn(L::Coords) -> bool + 'static) -> Self {
        self.boundary = Rc::new(boundary);
        self
    }

    /// Install a multiplicative observation-time bias per (coords, wave value)
    ///
    /// Applied only while building the sampling distribution, never during
    /// propagation. Must be side-effect free and cheap.
    #[must_use]
    pub fn with_prior(mut self, prior: impl Fn(L::Coords, usize) -> f64 + 'static) -> Self {
        self.prior = Some(Rc::new(prior));
        self
    }

    /// Install an additive noise bias nudging observation order per cell
    #[must_use]
    pub fn with_positional_bias(mut self, bias: impl Fn(L::Coords) -> f64 + 'static) -> Self {
        self.bias = Some(Rc::new(bias));
        self
    }

    /// Reset every cell to the fully uncertain starting state
    ///
    /// Restores all-possible superpositions, reseeds compatibility counters
    /// from the propagator table, clears observed values, and empties the
    /// pending worklist. Cost is O(cells · wave values · directions).
    pub fn clear(&mut self) {
        self.removals.clear();
        self.observable = false;
        let wave_count = self.weights.wave_count();

        for cell in 0..self.lattice.cell_count() {
            if let Some(wave) = self.wave.get_mut(cell) {
                wave.reset();
            }
            for wave_value in 0..wave_count {
                for direction in 0..L::DIRECTION_COUNT {
                    if let Some(count) = self.compatible.get_mut((cell, wave_value, direction)) {
                        *count = self
                            .propagator
                            .support_count(L::opposite(direction), wave_value);
                    }
                }
            }
            if let Some(slot) = self.observed.get_mut(cell) {
                *slot = None;
            }
            if let Some(stats) = self.stats.get_mut(cell) {
                stats.reset(wave_count, &self.weights);
            }
        }
    }

    /// Remove one wave value from one cell's superposition
    ///
    /// Records the removal on the pending worklist for a later
    /// [`propagate`](Self::propagate) and updates the cell's aggregates
    /// incrementally. Re-banning an already-banned pair is a no-op returning
    /// `Continue`. Also usable externally to impose hand-authored constraints
    /// before or between solve cycles.
    ///
    /// Returns `Conflict` when this removal empties the cell; the removal is
    /// recorded but the aggregates are not touched further, and the caller
    /// must roll back rather than resume.
    pub fn ban(&mut self, cell: usize, wave_value: usize) -> StepResult<L::Coords> {
        let possible = self
            .wave
            .get(cell)
            .is_some_and(|wave| wave.contains(wave_value));
        if !possible {
            return StepResult::Continue;
        }

        if let Some(wave) = self.wave.get_mut(cell) {
            wave.remove(wave_value);
        }
        // A banned value can no longer constrain anything
        for direction in 0..L::DIRECTION_COUNT {
            if let Some(count) = self.compatible.get_mut((cell, wave_value, direction)) {
                *count = 0;
            }
        }
        self.removals.push((cell, wave_value));

        let weight = self.weights.weight(wave_value);
        let weight_log_weight = self.weights.log_weight(wave_value);
        let coords = self.lattice.coords_of(cell);
        let Some(stats) = self.stats.get_mut(cell) else {
            return StepResult::Continue;
        };

        stats.sum_of_ones = stats.sum_of_ones.saturating_sub(1);
        if stats.sum_of_ones == 0 {
            return StepResult::Conflict(Contradiction {
                coords,
                wave_value: Some(wave_value),
                direction: None,
            });
        }

        stats.remove(weight, weight_log_weight);
        StepResult::Continue
    }

    /// Drain the pending worklist to an arc-consistency fixpoint
    ///
    /// Work is done lazily per removal, so the cost is proportional to the
    /// number of actual removals rather than cells · wave values per call.
    /// On `Conflict` the worklist may still hold unprocessed entries; the
    /// caller must discard or restore state rather than resume.
    pub fn propagate(&mut self) -> StepResult<L::Coords> {
        while let Some((cell, wave_value)) = self.removals.pop() {
            let coords = self.lattice.coords_of(cell);

            for direction in 0..L::DIRECTION_COUNT {
                let raw = L::step(coords, direction);
                if (self.boundary)(raw) {
                    continue;
                }
                let neighbour = self.lattice.index_of(self.lattice.wrap(raw));

                let rule_len = self.propagator.allowed(direction, wave_value).len();
                for rule_index in 0..rule_len {
                    let Some(&neighbour_value) = self
                        .propagator
                        .allowed(direction, wave_value)
                        .get(rule_index)
                    else {
                        break;
                    };

                    let hit_zero = match self
                        .compatible
                        .get_mut((neighbour, neighbour_value, direction))
                    {
                        Some(count) => {
                            *count -= 1;
                            *count == 0
                        }
                        None => false,
                    };

                    if hit_zero {
                        if let StepResult::Conflict(conflict) = self.ban(neighbour, neighbour_value)
                        {
                            return StepResult::Conflict(Contradiction {
                                direction: Some(direction),
                                ..conflict
                            });
                        }
                    }
                }
            }
        }
        StepResult::Continue
    }

    /// Collapse the lowest-entropy undecided cell to a single wave value
    ///
    /// Scans every non-excluded cell for the minimum entropy with randomized
    /// tie noise, samples a value from the cell's weighted (and optionally
    /// prior-biased) distribution, and bans every other possibility there.
    /// Returns `Finished` once no undecided cell remains, populating the
    /// observed array; `Conflict` on a latent or freshly created empty cell.
    pub fn observe(&mut self) -> StepResult<L::Coords> {
        let mut min = ENTROPY_SCAN_START;
        let mut argmin: Option<usize> = None;

        for cell in 0..self.lattice.cell_count() {
            let coords = self.lattice.coords_of(cell);
            if (self.boundary)(coords) {
                continue;
            }
            let Some(stats) = self.stats.get(cell) else {
                continue;
            };
            // A cell emptied outside ban's own bookkeeping surfaces here
            if stats.sum_of_ones == 0 {
                return StepResult::Conflict(Contradiction {
                    coords,
                    wave_value: None,
                    direction: None,
                });
            }
            if stats.sum_of_ones > 1 && stats.entropy <= min {
                let noise = ENTROPY_NOISE_SCALE * self.rng.random::<f64>()
                    + self.bias.as_ref().map_or(0.0, |bias| bias(coords));
                if stats.entropy + noise < min {
                    min = stats.entropy + noise;
                    argmin = Some(cell);
                }
            }
        }

        let Some(cell) = argmin else {
            // Fully determined: record each cell's sole remaining value.
            // Excluded cells may still hold several values; they stay unset
            self.observable = true;
            for index in 0..self.lattice.cell_count() {
                let resolved = self
                    .wave
                    .get(index)
                    .filter(|wave| wave.count() == 1)
                    .and_then(|wave| wave.first_set());
                if let Some(slot) = self.observed.get_mut(index) {
                    *slot = resolved;
                }
            }
            return StepResult::Finished;
        };

        let coords = self.lattice.coords_of(cell);
        let wave_count = self.weights.wave_count();
        let mut distribution = vec![0.0; wave_count];
        for wave_value in 0..wave_count {
            let possible = self
                .wave
                .get(cell)
                .is_some_and(|wave| wave.contains(wave_value));
            if possible {
                let prior = self
                    .prior
                    .as_ref()
                    .map_or(1.0, |prior| prior(coords, wave_value));
                if let Some(slot) = distribution.get_mut(wave_value) {
                    *slot = self.weights.weight(wave_value) * prior;
                }
            }
        }

        let draw = self.rng.random::<f64>();
        let chosen = weighted_index(&distribution, draw).or_else(|| {
            // Zero total mass: treat all still-possible values as equally likely
            for (wave_value, slot) in distribution.iter_mut().enumerate() {
                let possible = self
                    .wave
                    .get(cell)
                    .is_some_and(|wave| wave.contains(wave_value));
                *slot = if possible { 1.0 } else { 0.0 };
            }
            weighted_index(&distribution, draw)
        });
        let Some(chosen) = chosen else {
            return StepResult::Conflict(Contradiction {
                coords,
                wave_value: None,
                direction: None,
            });
        };

        if let Some(slot) = self.observed.get_mut(cell) {
            *slot = Some(chosen);
        }
        for wave_value in 0..wave_count {
            let possible = self
                .wave
                .get(cell)
                .is_some_and(|wave| wave.contains(wave_value));
            if possible && wave_value != chosen {
                if let StepResult::Conflict(conflict) = self.ban(cell, wave_value) {
                    return StepResult::Conflict(conflict);
                }
            }
        }
        StepResult::Continue
    }

    /// Produce a fully independent snapshot of the bookkeeping state
    ///
    /// The snapshot shares the immutable model inputs but owns deep copies of
    /// all mutable state. It excludes the RNG stream: the copy's generator is
    /// reseeded from the construction seed, and the pending worklist starts
    /// empty.
    #[must_use]
    pub fn copy(&self) -> Self {
        let mut snapshot = Self {
            lattice: self.lattice,
            seed: self.seed,
            rng: StdRng::seed_from_u64(self.seed),
            weights: self.weights.clone(),
            propagator: Rc::clone(&self.propagator),
            boundary: Rc::clone(&self.boundary),
            prior: self.prior.clone(),
            bias: self.bias.clone(),
            wave: Vec::new(),
            compatible: Array3::zeros((0, 0, 0)),
            stats: Vec::new(),
            observed: Vec::new(),
            removals: Vec::new(),
            observable: false,
        };
        self.copy_into(&mut snapshot);
        snapshot
    }

    /// Overwrite another solver's bookkeeping with this one's
    ///
    /// The target must have been built from the same construction inputs.
    /// Its pending worklist is wiped and its RNG stream is left untouched.
    pub fn copy_into(&self, target: &mut Self) {
        target.observable = false;
        target.wave.clone_from(&self.wave);
        target.compatible.clone_from(&self.compatible);
        target.stats.clone_from(&self.stats);
        target.observed.clone_from(&self.observed);
        target.removals.clear();
    }

    /// The lattice topology
    pub const fn lattice(&self) -> L {
        self.lattice
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.lattice.cell_count()
    }

    /// Number of wave values per cell
    pub fn wave_count(&self) -> usize {
        self.weights.wave_count()
    }

    /// True once every cell is determined and the observed array is valid
    pub const fn observable(&self) -> bool {
        self.observable
    }

    /// Test whether a wave value is still possible in a cell
    pub fn possible(&self, cell: usize, wave_value: usize) -> bool {
        self.wave
            .get(cell)
            .is_some_and(|wave| wave.contains(wave_value))
    }

    /// A cell's superposition bitset
    pub fn wave(&self, cell: usize) -> Option<&WaveBitset> {
        self.wave.get(cell)
    }

    /// Count of still-possible wave values in a cell
    pub fn remaining(&self, cell: usize) -> usize {
        self.stats.get(cell).map_or(0, |stats| stats.sum_of_ones)
    }

    /// A cell's incrementally maintained entropy
    pub fn entropy(&self, cell: usize) -> Option<f64> {
        self.stats.get(cell).map(|stats| stats.entropy)
    }

    /// A cell's resolved wave value, once observed or finished
    ///
    /// Cells that never narrowed to a single value, such as
    /// boundary-excluded cells, report `None` even after `Finished`.
    pub fn observed(&self, cell: usize) -> Option<usize> {
        self.observed.get(cell).copied().flatten()
    }

    /// The wave value weight vector
    pub fn weights(&self) -> &[f64] {
        self.weights.weights()
    }

    /// Number of banned-but-unpropagated removals on the worklist
    pub fn pending_removals(&self) -> usize {
        self.removals.len()
    }

    /// Linear index of in-range coordinates
    pub fn index_of(&self, coords: L::Coords) -> usize {
        self.lattice.index_of(coords)
    }

    /// Coordinates of a linear index
    pub fn coords_of(&self, index: usize) -> L::Coords {
        self.lattice.coords_of(index)
    }
}

/// Report one-way propagator rules without rejecting the model
// Diagnostic goes to stderr so library callers need no logging wiring
#[allow(clippy::print_stderr)]
fn warn_asymmetry(violations: &[SymmetryViolation]) {
    if let Some(first) = violations.first() {
        eprintln!(
            "Warning: propagator table has {} one-way rule(s), first {:?}; \
             compatibility counters may under- or over-constrain",
            violations.len(),
            first
        );
    }
}
