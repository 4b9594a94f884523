//! Localized reset for approximate 3D conflict recovery
//!
//! Experimental operation: it can leave the grid needing a subsequent
//! [`propagate`](crate::solver::Solver::propagate) and is known to be
//! unreliable near dense constraints. Snapshot restore via
//! [`copy`](crate::solver::Solver::copy)/[`copy_into`](crate::solver::Solver::copy_into)
//! is the supported recovery path.

use crate::solver::state::{Contradiction, Solver, StepResult};
use crate::spatial::{Grid3, Lattice};

impl Solver<Grid3> {
    /// Reset a box of cells around `center` and reseed their constraints (experimental)
    ///
    /// Every cell inside the radius box returns to the fully uncertain state,
    /// then has its compatibility counters re-derived from its neighbours,
    /// processed boundary-inward so each reset cell consults state that is
    /// already final for this pass. Wave values with no remaining support are
    /// banned immediately. The pending worklist is discarded afterwards
    /// instead of propagated, which is what makes the operation approximate.
    ///
    /// Returns `Conflict` when a neighbour turns out to be inert (nothing it
    /// still permits can support the reset cell) or a forced ban exhausts a
    /// cell; the box is left partially reseeded in that case.
    pub fn blast(&mut self, center: [i32; 3], radius: [i32; 3]) -> StepResult<[i32; 3]> {
        let lattice = self.lattice;
        let wave_count = self.weights.wave_count();

        let mut blasted: Vec<[i32; 3]> = Vec::new();
        for dz in -radius[2]..=radius[2] {
            for dy in -radius[1]..=radius[1] {
                for dx in -radius[0]..=radius[0] {
                    let coords = [center[0] + dx, center[1] + dy, center[2] + dz];
                    if in_bounds(lattice, coords) {
                        self.reset_cell(coords);
                        blasted.push(coords);
                    }
                }
            }
        }

        // Boundary-inward: outermost ring first, so inner cells see reseeded
        // neighbours that are already settled for this pass
        blasted.sort_by_key(|&coords| std::cmp::Reverse(chebyshev(coords, center)));

        for coords in blasted {
            let cell = lattice.index_of(coords);
            for direction in 0..Grid3::DIRECTION_COUNT {
                let neighbour_coords = Grid3::step(coords, direction);
                if !in_bounds(lattice, neighbour_coords) {
                    continue;
                }
                let neighbour = lattice.index_of(neighbour_coords);
                let reverse = Grid3::opposite(direction);

                // Support this cell receives from the neighbour's remaining values
                let mut counts = vec![0_i32; wave_count];
                for wave_value in 0..wave_count {
                    let possible = self
                        .wave
                        .get(neighbour)
                        .is_some_and(|wave| wave.contains(wave_value));
                    if !possible {
                        continue;
                    }
                    let rule_len = self.propagator.allowed(reverse, wave_value).len();
                    for rule_index in 0..rule_len {
                        let Some(&supported) =
                            self.propagator.allowed(reverse, wave_value).get(rule_index)
                        else {
                            break;
                        };
                        if let Some(slot) = counts.get_mut(supported) {
                            *slot += 1;
                        }
                    }
                }

                if counts.iter().all(|&count| count == 0) {
                    self.removals.clear();
                    return StepResult::Conflict(Contradiction {
                        coords: neighbour_coords,
                        wave_value: None,
                        direction: Some(direction),
                    });
                }

                for wave_value in 0..wave_count {
                    let count = counts.get(wave_value).copied().unwrap_or(0);
                    if let Some(slot) = self.compatible.get_mut((cell, wave_value, direction)) {
                        *slot = count;
                    }
                    if count == 0 {
                        if let StepResult::Conflict(conflict) = self.ban(cell, wave_value) {
                            self.removals.clear();
                            return StepResult::Conflict(conflict);
                        }
                    }
                }
            }
        }

        // Approximate by design: drop the worklist rather than propagate it
        self.removals.clear();
        StepResult::Continue
    }

    /// Re-initialize one cell's bookkeeping exactly as `clear` does per cell
    fn reset_cell(&mut self, coords: [i32; 3]) {
        let cell = self.lattice.index_of(coords);
        let wave_count = self.weights.wave_count();

        self.observable = false;
        if let Some(slot) = self.observed.get_mut(cell) {
            *slot = None;
        }
        if let Some(wave) = self.wave.get_mut(cell) {
            wave.reset();
        }
        for wave_value in 0..wave_count {
            for direction in 0..Grid3::DIRECTION_COUNT {
                if let Some(count) = self.compatible.get_mut((cell, wave_value, direction)) {
                    *count = self
                        .propagator
                        .support_count(Grid3::opposite(direction), wave_value);
                }
            }
        }
        if let Some(stats) = self.stats.get_mut(cell) {
            stats.reset(wave_count, &self.weights);
        }
    }
}

/// Test raw coordinates against the hard lattice extents
fn in_bounds(lattice: Grid3, coords: [i32; 3]) -> bool {
    coords[0] >= 0
        && coords[1] >= 0
        && coords[2] >= 0
        && coords[0] < lattice.width as i32
        && coords[1] < lattice.height as i32
        && coords[2] < lattice.depth as i32
}

/// Chebyshev distance between two coordinates
fn chebyshev(a: [i32; 3], b: [i32; 3]) -> i32 {
    (a[0] - b[0])
        .abs()
        .max((a[1] - b[1]).abs())
        .max((a[2] - b[2]).abs())
}
