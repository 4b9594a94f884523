//! Snapshot-cadence retry driver
//!
//! The core never retries internally: recovery policy belongs to the caller.
//! This module packages the documented pattern (retain periodic snapshots,
//! restore on conflict, keep observing) for callers that do not need a custom
//! policy.

use crate::solver::state::{Contradiction, Solver, StepResult};
use crate::spatial::Lattice;

/// Caller-owned recovery policy for [`solve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Successful observe/propagate cycles between snapshot refreshes
    pub snapshot_interval: usize,
    /// Conflicts tolerated before giving up
    pub max_restores: usize,
    /// Hard ceiling on observe calls, guarding against thrashing models
    pub max_steps: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            snapshot_interval: 16,
            max_restores: 8,
            max_steps: 1_000_000,
        }
    }
}

/// Terminal state of a driven solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolveOutcome<C> {
    /// Every cell resolved; the solver's observed array is valid
    Finished,
    /// The restore budget ran out; carries the last contradiction
    Exhausted(Contradiction<C>),
    /// The step ceiling was hit before resolution
    StepLimit,
}

/// Drive observe/propagate cycles to completion with snapshot rollback
///
/// On conflict the solver is restored to the most recent snapshot and the
/// restore budget decremented; snapshots refresh every
/// `snapshot_interval` successful cycles. The solver is left in whatever
/// state the terminal outcome implies.
pub fn solve<L: Lattice>(solver: &mut Solver<L>, policy: &RetryPolicy) -> SolveOutcome<L::Coords> {
    let mut snapshot = solver.copy();
    let mut restores_left = policy.max_restores;
    let mut cycles_since_snapshot = 0_usize;

    for _ in 0..policy.max_steps {
        match solver.observe() {
            StepResult::Finished => return SolveOutcome::Finished,
            StepResult::Conflict(conflict) => {
                if restores_left == 0 {
                    return SolveOutcome::Exhausted(conflict);
                }
                restores_left -= 1;
                snapshot.copy_into(solver);
                cycles_since_snapshot = 0;
                continue;
            }
            StepResult::Continue => {}
        }

        if let StepResult::Conflict(conflict) = solver.propagate() {
            if restores_left == 0 {
                return SolveOutcome::Exhausted(conflict);
            }
            restores_left -= 1;
            snapshot.copy_into(solver);
            cycles_since_snapshot = 0;
            continue;
        }

        cycles_since_snapshot += 1;
        if cycles_since_snapshot >= policy.snapshot_interval {
            solver.copy_into(&mut snapshot);
            cycles_since_snapshot = 0;
        }
    }
    SolveOutcome::StepLimit
}
