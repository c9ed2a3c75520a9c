//! Boundary policy compliance helpers.
//!
//! These check the neighbourhood invariants every policy must satisfy
//! for the evaluator's counts to be correct. Reused by the boundary and
//! store test modules.

use crate::boundary::BoundaryPolicy;
use indexmap::IndexSet;
use sparse_life_core::Position;

/// Every cell of a bounded policy in row-major order.
///
/// Unbounded policies get a small window around the origin.
pub fn grid_positions(policy: &BoundaryPolicy) -> Vec<Position> {
    let (w, h) = policy.extent().unwrap_or((7, 7));
    let mut out = Vec::with_capacity((w as usize) * (h as usize));
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            out.push(Position::new(x, y));
        }
    }
    out
}

/// Assert that a cell never neighbours itself and has no duplicate neighbours.
pub fn assert_neighbours_distinct(policy: &BoundaryPolicy, pos: Position) {
    let nbs = policy.neighbours(pos);
    assert!(!nbs.contains(&pos), "{pos} is its own neighbour under {policy:?}");
    let unique: IndexSet<Position> = nbs.iter().copied().collect();
    assert_eq!(
        unique.len(),
        nbs.len(),
        "duplicate neighbours of {pos} under {policy:?}: {nbs:?}"
    );
}

/// Assert that `b in neighbours(a)` implies `a in neighbours(b)`.
pub fn assert_neighbours_symmetric(policy: &BoundaryPolicy, pos: Position) {
    for nb in policy.neighbours(pos) {
        assert!(
            policy.neighbours(nb).contains(&pos),
            "{nb} neighbours {pos} but not vice versa under {policy:?}"
        );
    }
}

/// Assert that every neighbour is already in normalized form.
pub fn assert_neighbours_normalized(policy: &BoundaryPolicy, pos: Position) {
    for nb in policy.neighbours(pos) {
        assert_eq!(
            policy.normalize(nb),
            Some(nb),
            "neighbour {nb} of {pos} is not normalized under {policy:?}"
        );
    }
}

/// Assert that non-wrapping neighbours are at Chebyshev distance 1.
pub fn assert_neighbours_adjacent(policy: &BoundaryPolicy, pos: Position) {
    if policy.is_wrapping() {
        return;
    }
    for nb in policy.neighbours(pos) {
        assert_eq!(pos.chebyshev_distance(nb), 1, "{nb} is not adjacent to {pos}");
    }
}

/// Run every compliance check over `positions`.
pub fn run_full_compliance(policy: &BoundaryPolicy, positions: &[Position]) {
    for &pos in positions {
        assert_neighbours_distinct(policy, pos);
        assert_neighbours_symmetric(policy, pos);
        assert_neighbours_normalized(policy, pos);
        assert_neighbours_adjacent(policy, pos);
    }
}
