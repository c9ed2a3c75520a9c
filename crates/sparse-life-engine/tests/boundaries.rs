//! Boundary policy behaviour at the grid edges, and agreement with the
//! dense reference stepper under every policy.

use std::collections::BTreeSet;

use proptest::prelude::*;
use sparse_life_core::{Pattern, Position};
use sparse_life_engine::SimulationEngine;
use sparse_life_space::BoundaryPolicy;
use sparse_life_test_utils::fixtures::reference_run;
use sparse_life_test_utils::{canonical, sorted};

fn engine_with(policy: BoundaryPolicy, pattern: &Pattern) -> SimulationEngine {
    let mut engine = SimulationEngine::new(policy).unwrap();
    engine.apply_pattern(pattern).unwrap();
    engine
}

// ── Wrap ────────────────────────────────────────────────────────

#[test]
fn glider_reappears_across_torus_edge() {
    let policy = BoundaryPolicy::wrap(12, 12).unwrap();
    let glider = Pattern::glider().offset(8, 8);
    let mut engine = engine_with(policy, &glider);

    // 4 steps per cell, 12 cells to come all the way round.
    for step in 1..=48 {
        engine.step();
        assert_eq!(engine.live_count(), 5, "step {step}");
    }
    assert_eq!(sorted(engine.live_cells()), glider.cells());
}

#[test]
fn glider_straddling_edge_keeps_its_shape() {
    let policy = BoundaryPolicy::wrap(10, 10).unwrap();
    let mut engine = engine_with(policy, &Pattern::glider().offset(7, 7));
    for _ in 0..8 {
        engine.step();
    }
    // Moved (+2, +2) from (7, 7): the shape now spans x and y 9..=11,
    // which wraps to 9, 0, 1.
    let cells = sorted(engine.live_cells());
    assert!(cells.iter().all(|p| (0..10).contains(&p.x) && (0..10).contains(&p.y)));
    let unwrapped: Vec<Position> = cells
        .iter()
        .map(|p| Position::new(if p.x < 5 { p.x + 10 } else { p.x }, if p.y < 5 { p.y + 10 } else { p.y }))
        .collect();
    assert_eq!(canonical(unwrapped), canonical(Pattern::glider().cells().iter().copied()));
}

#[test]
fn minimum_torus_still_steps() {
    let policy = BoundaryPolicy::wrap(3, 3).unwrap();
    let mut engine = SimulationEngine::new(policy).unwrap();
    engine.activate(Position::new(0, 0));
    engine.activate(Position::new(1, 0));
    engine.activate(Position::new(2, 0));
    // Every cell of a 3x3 torus sees all three, so all nine are born or
    // survive, then all die of overcrowding.
    engine.step();
    assert_eq!(engine.live_count(), 9);
    engine.step();
    assert_eq!(engine.live_count(), 0);
}

// ── Clip ────────────────────────────────────────────────────────

#[test]
fn births_never_happen_outside_clipped_grid() {
    let policy = BoundaryPolicy::clip(6, 6).unwrap();
    let mut engine = engine_with(policy, &Pattern::glider().offset(2, 2));
    for _ in 0..40 {
        engine.step();
        for pos in engine.live_cells() {
            assert!((0..6).contains(&pos.x) && (0..6).contains(&pos.y), "{pos} off-grid");
        }
    }
}

#[test]
fn glider_becomes_block_in_clipped_corner() {
    let policy = BoundaryPolicy::clip(8, 8).unwrap();
    let mut engine = engine_with(policy, &Pattern::glider().offset(2, 2));
    for _ in 0..40 {
        engine.step();
    }
    assert_eq!(canonical(engine.live_cells()), Pattern::block().cells());
}

#[test]
fn edge_blinker_is_cut_by_clip() {
    // A vertical blinker against the top edge loses the cell it would
    // grow above row 0.
    let policy = BoundaryPolicy::clip(5, 5).unwrap();
    let mut engine = SimulationEngine::new(policy).unwrap();
    for x in 1..=3 {
        engine.activate(Position::new(x, 0));
    }
    engine.step();
    assert_eq!(
        sorted(engine.live_cells()),
        vec![Position::new(2, 0), Position::new(2, 1)]
    );
}

#[test]
fn off_grid_activation_is_ignored() {
    let mut engine = SimulationEngine::new(BoundaryPolicy::clip(4, 4).unwrap()).unwrap();
    assert!(!engine.activate(Position::new(-1, 0)));
    assert!(!engine.activate(Position::new(4, 4)));
    assert!(!engine.is_alive(Position::new(-1, 0)));
    assert_eq!(engine.live_count(), 0);
}

// ── Reference agreement ─────────────────────────────────────────

fn arb_policy() -> impl Strategy<Value = BoundaryPolicy> {
    prop_oneof![
        Just(BoundaryPolicy::Unbounded),
        (3u32..12, 3u32..12).prop_map(|(width, height)| BoundaryPolicy::Clip { width, height }),
        (3u32..12, 3u32..12).prop_map(|(width, height)| BoundaryPolicy::Wrap { width, height }),
    ]
}

proptest! {
    #[test]
    fn engine_matches_dense_reference(
        policy in arb_policy(),
        cells in prop::collection::vec((-2i32..12, -2i32..12), 0..40),
        generations in 1usize..12,
    ) {
        let cells: Vec<Position> = cells.into_iter().map(Position::from).collect();
        let mut engine = SimulationEngine::new(policy).unwrap();
        for &pos in &cells {
            engine.activate(pos);
        }
        for _ in 0..generations {
            engine.step();
        }
        let actual: BTreeSet<Position> = engine.live_cells().into_iter().collect();
        prop_assert_eq!(actual, reference_run(&policy, &cells, generations));
    }

    #[test]
    fn cached_counts_match_previous_generation(
        policy in arb_policy(),
        cells in prop::collection::vec((0i32..10, 0i32..10), 0..40),
    ) {
        let mut engine = SimulationEngine::new(policy).unwrap();
        for (x, y) in cells {
            engine.activate(Position::new(x, y));
        }
        let before = engine.clone();
        engine.step();
        // Each surviving or newborn cell caches the count that decided it.
        for pos in engine.live_cells() {
            prop_assert_eq!(engine.cached_neighbours(pos), Some(before.neighbour_count(pos)));
        }
    }
}
