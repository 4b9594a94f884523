//! Validates observe/propagate cycles, ban bookkeeping, and conflict
//! reporting on 2D lattices

use wavefold::math::entropy::{shannon_entropy, weight_log_weight};
use wavefold::model::PropagatorTable;
use wavefold::solver::{Solver2, StepResult};
use wavefold::spatial::Grid2;

/// Boundary predicate excluding everything outside a width × height box
fn box_boundary(width: i32, height: i32) -> impl Fn([i32; 2]) -> bool {
    move |c: [i32; 2]| c[0] < 0 || c[0] >= width || c[1] < 0 || c[1] >= height
}

fn permissive_solver(width: usize, height: usize, weights: Vec<f64>, seed: u64) -> Solver2 {
    let wave_count = weights.len();
    let table = PropagatorTable::permissive(4, wave_count);
    Solver2::new(Grid2::new(width, height), seed, weights, table)
        .expect("Failed to create solver")
        .with_boundary(box_boundary(width as i32, height as i32))
}

fn drive_to_finish(solver: &mut Solver2, max_cycles: usize) -> bool {
    for _ in 0..max_cycles {
        match solver.observe() {
            StepResult::Finished => return true,
            StepResult::Conflict(conflict) => panic!("unexpected conflict: {conflict:?}"),
            StepResult::Continue => {}
        }
        if let StepResult::Conflict(conflict) = solver.propagate() {
            panic!("unexpected conflict: {conflict:?}");
        }
    }
    false
}

#[test]
fn test_permissive_grid_runs_to_completion() {
    let mut solver = permissive_solver(4, 4, vec![0.5, 0.5], 11);

    // First observation makes progress rather than finishing outright
    assert!(matches!(solver.observe(), StepResult::Continue));
    assert!(matches!(solver.propagate(), StepResult::Continue));

    assert!(drive_to_finish(&mut solver, 100));
    assert!(solver.observable());
    for cell in 0..solver.cell_count() {
        assert_eq!(solver.remaining(cell), 1);
        let observed = solver.observed(cell);
        assert!(matches!(observed, Some(0 | 1)), "cell {cell}: {observed:?}");
    }
}

#[test]
fn test_banning_last_value_reports_conflict() {
    let table = PropagatorTable::permissive(4, 2);
    let mut solver =
        Solver2::new(Grid2::new(1, 1), 0, vec![1.0, 1.0], table).expect("Failed to create solver");

    assert!(matches!(solver.ban(0, 0), StepResult::Continue));
    match solver.ban(0, 1) {
        StepResult::Conflict(conflict) => {
            assert_eq!(conflict.coords, [0, 0]);
            assert_eq!(conflict.wave_value, Some(1));
            assert_eq!(conflict.direction, None);
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn test_banned_values_never_revive() {
    let mut solver = permissive_solver(4, 4, vec![1.0, 2.0, 3.0], 3);

    assert!(matches!(solver.ban(5, 2), StepResult::Continue));
    assert!(matches!(solver.propagate(), StepResult::Continue));
    assert!(!solver.possible(5, 2));
    assert_eq!(solver.remaining(5), 2);

    // Still banned after further collapse work elsewhere
    assert!(matches!(solver.observe(), StepResult::Continue));
    assert!(matches!(solver.propagate(), StepResult::Continue));
    assert!(!solver.possible(5, 2));
}

#[test]
fn test_entropy_matches_closed_form_after_bans() {
    let weights = vec![1.0, 2.0, 3.0, 4.0];
    let mut solver = permissive_solver(3, 3, weights.clone(), 9);

    for &(cell, wave_value) in &[(0, 1), (0, 3), (4, 0), (8, 2), (8, 3)] {
        assert!(matches!(solver.ban(cell, wave_value), StepResult::Continue));
    }

    for cell in 0..solver.cell_count() {
        let mut sum = 0.0;
        let mut sum_log = 0.0;
        for (wave_value, &weight) in weights.iter().enumerate() {
            if solver.possible(cell, wave_value) {
                sum += weight;
                sum_log += weight_log_weight(weight);
            }
        }
        let expected = shannon_entropy(sum, sum_log);
        let Some(actual) = solver.entropy(cell) else {
            panic!("missing stats for cell {cell}");
        };
        assert!(
            (actual - expected).abs() < 1e-9,
            "cell {cell}: incremental {actual} vs closed form {expected}"
        );
    }
}

#[test]
fn test_propagation_cascade_reports_direction() {
    // 2 × 1 grid where collapsing the left cell to value 0 leaves the right
    // cell with nothing: value 0 has no eastward successor at all, and value
    // 1 eastward requires the left cell to keep value 1.
    let mut table = PropagatorTable::new(4, 2);
    // East (direction 2)
    table.allow(2, 1, 0);
    table.allow(2, 1, 1);
    // West (direction 0), mirror of the east rules
    table.allow(0, 0, 1);
    table.allow(0, 1, 1);
    // North/south fully permissive; unused at height 1 but keeps the table
    // symmetric
    for wave_value in 0..2 {
        for neighbour_value in 0..2 {
            table.allow(1, wave_value, neighbour_value);
            table.allow(3, wave_value, neighbour_value);
        }
    }

    let mut solver = Solver2::new(Grid2::new(2, 1), 0, vec![1.0, 1.0], table)
        .expect("Failed to create solver")
        .with_boundary(box_boundary(2, 1));

    // Collapse the left cell to value 0
    assert!(matches!(solver.ban(0, 1), StepResult::Continue));
    match solver.propagate() {
        StepResult::Conflict(conflict) => {
            assert_eq!(conflict.coords, [1, 0]);
            assert_eq!(conflict.direction, Some(2));
            assert!(conflict.wave_value.is_some());
        }
        other => panic!("expected cascade conflict, got {other:?}"),
    }
}

#[test]
fn test_periodic_wrap_propagates_across_the_seam() {
    // 3 x 1 grid with the default boundary predicate: nothing is excluded,
    // so an east step from x = 2 wraps to x = 0. Value 0 demands value 1 on
    // both horizontal sides, so banning value 1 at x = 2 must remove value 0
    // from the wrapped neighbour at x = 0.
    let mut table = PropagatorTable::new(4, 2);
    // East (direction 2)
    table.allow(2, 0, 1);
    table.allow(2, 1, 0);
    table.allow(2, 1, 1);
    // West (direction 0), mirror of the east rules
    table.allow(0, 0, 1);
    table.allow(0, 1, 0);
    table.allow(0, 1, 1);
    for wave_value in 0..2 {
        for neighbour_value in 0..2 {
            table.allow(1, wave_value, neighbour_value);
            table.allow(3, wave_value, neighbour_value);
        }
    }

    let mut solver =
        Solver2::new(Grid2::new(3, 1), 0, vec![1.0, 1.0], table).expect("Failed to create solver");

    let seam_cell = solver.index_of([2, 0]);
    assert!(matches!(solver.ban(seam_cell, 1), StepResult::Continue));
    assert!(matches!(solver.propagate(), StepResult::Continue));

    let wrapped = solver.index_of([0, 0]);
    assert!(!solver.possible(wrapped, 0), "ban must cross the seam");
    assert!(solver.possible(wrapped, 1));
    // The cascade settles the whole ring as 1, 1, 0
    let middle = solver.index_of([1, 0]);
    assert_eq!(solver.remaining(middle), 1);
    assert!(solver.possible(middle, 1));
}

#[test]
fn test_zero_mass_prior_falls_back_to_uniform() {
    // A prior that zeroes every candidate empties the sampling distribution;
    // observation falls back to uniform over still-possible values instead
    // of conflicting
    let mut solver = permissive_solver(2, 2, vec![1.0, 1.0], 19).with_prior(|_, _| 0.0);

    assert!(matches!(solver.observe(), StepResult::Continue));
    assert!(matches!(solver.propagate(), StepResult::Continue));

    let collapsed = (0..solver.cell_count())
        .filter(|&cell| solver.remaining(cell) == 1)
        .count();
    assert_eq!(collapsed, 1, "exactly one cell collapses per observation");
    assert!(drive_to_finish(&mut solver, 100));
}

#[test]
fn test_prior_steers_sampling() {
    // A prior that zeroes value 0 everywhere forces every cell to value 1
    let mut solver = permissive_solver(3, 3, vec![5.0, 1.0], 21)
        .with_prior(|_, wave_value| if wave_value == 0 { 0.0 } else { 1.0 });

    assert!(drive_to_finish(&mut solver, 100));
    for cell in 0..solver.cell_count() {
        assert_eq!(solver.observed(cell), Some(1));
    }
}

#[test]
fn test_boundary_cells_stay_unobserved() {
    // Restrict the solvable region to the left 2 × 2 quadrant of a 4 × 2 grid
    let table = PropagatorTable::permissive(4, 2);
    let mut solver = Solver2::new(Grid2::new(4, 2), 5, vec![1.0, 1.0], table)
        .expect("Failed to create solver")
        .with_boundary(|c: [i32; 2]| c[0] < 0 || c[0] >= 2 || c[1] < 0 || c[1] >= 2);

    assert!(drive_to_finish(&mut solver, 100));
    // Excluded cells never collapse; their superpositions stay full and
    // they report no resolved value
    for cell in 0..solver.cell_count() {
        let coords = solver.coords_of(cell);
        if coords[0] >= 2 {
            assert_eq!(solver.remaining(cell), 2, "excluded cell {coords:?}");
            assert_eq!(solver.observed(cell), None, "excluded cell {coords:?}");
        } else {
            assert_eq!(solver.remaining(cell), 1, "solvable cell {coords:?}");
            assert!(solver.observed(cell).is_some(), "solvable cell {coords:?}");
        }
    }
}

#[test]
fn test_clear_restores_full_uncertainty() {
    let mut solver = permissive_solver(3, 3, vec![1.0, 1.0], 13);
    assert!(drive_to_finish(&mut solver, 100));
    assert!(solver.observable());

    solver.clear();
    assert!(!solver.observable());
    assert_eq!(solver.pending_removals(), 0);
    for cell in 0..solver.cell_count() {
        assert_eq!(solver.remaining(cell), 2);
        assert_eq!(solver.observed(cell), None);
    }
    // Reusable: a second run completes as well
    assert!(drive_to_finish(&mut solver, 100));
}
