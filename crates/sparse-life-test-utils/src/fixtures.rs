//! Dense reference stepper.
//!
//! Evaluates B3/S23 by scanning every cell of the grid (or the live
//! bounding box plus a one-cell margin when unbounded) and counting all
//! eight neighbours directly. Slow and obviously correct; the sparse
//! engine must agree with it generation for generation.

use std::collections::BTreeSet;

use sparse_life_core::Position;
use sparse_life_space::BoundaryPolicy;

/// Every position that could be alive after one step.
fn scan_area(policy: &BoundaryPolicy, live: &BTreeSet<Position>) -> Vec<Position> {
    let (min, max) = match policy.extent() {
        Some((w, h)) => (
            Position::new(0, 0),
            Position::new(w as i32 - 1, h as i32 - 1),
        ),
        None => {
            let (Some(min_x), Some(max_x)) = (
                live.iter().map(|p| p.x).min(),
                live.iter().map(|p| p.x).max(),
            ) else {
                return Vec::new();
            };
            let min_y = live.iter().map(|p| p.y).min().unwrap_or(0);
            let max_y = live.iter().map(|p| p.y).max().unwrap_or(0);
            (
                Position::new(min_x.saturating_sub(1), min_y.saturating_sub(1)),
                Position::new(max_x.saturating_add(1), max_y.saturating_add(1)),
            )
        }
    };
    let mut out = Vec::new();
    for y in min.y..=max.y {
        for x in min.x..=max.x {
            out.push(Position::new(x, y));
        }
    }
    out
}

/// One B3/S23 generation of `live` under `policy`.
///
/// `live` must already be normalized for the policy.
pub fn reference_step(policy: &BoundaryPolicy, live: &BTreeSet<Position>) -> BTreeSet<Position> {
    scan_area(policy, live)
        .into_iter()
        .filter(|&pos| {
            let mut n = 0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if (dx, dy) == (0, 0) {
                        continue;
                    }
                    if policy
                        .neighbour(pos, dx, dy)
                        .is_some_and(|nb| live.contains(&nb))
                    {
                        n += 1;
                    }
                }
            }
            n == 3 || (n == 2 && live.contains(&pos))
        })
        .collect()
}

/// `generations` reference steps from `cells`, normalized first.
pub fn reference_run(
    policy: &BoundaryPolicy,
    cells: &[Position],
    generations: usize,
) -> BTreeSet<Position> {
    let mut live: BTreeSet<Position> = cells
        .iter()
        .filter_map(|&pos| policy.normalize(pos))
        .collect();
    for _ in 0..generations {
        live = reference_step(policy, &live);
    }
    live
}
