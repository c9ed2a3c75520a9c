//! Test utilities for sparse-life development.
//!
//! Provides helpers for comparing unordered cell sets ([`sorted`],
//! [`canonical`], [`translate`]) and, in [`fixtures`], a dense
//! reference stepper that the sparse engine is checked against.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use sparse_life_core::Position;
use sparse_life_space::{BoundaryPolicy, CellStore};

/// Shorthand for a list of positions from coordinate pairs.
pub fn positions(coords: &[(i32, i32)]) -> Vec<Position> {
    coords.iter().map(|&(x, y)| Position::new(x, y)).collect()
}

/// The cells in sorted order, for comparing unordered snapshots.
pub fn sorted(cells: impl IntoIterator<Item = Position>) -> Vec<Position> {
    let mut out: Vec<Position> = cells.into_iter().collect();
    out.sort();
    out.dedup();
    out
}

/// The cells moved by `(dx, dy)`, sorted.
pub fn translate(cells: impl IntoIterator<Item = Position>, dx: i32, dy: i32) -> Vec<Position> {
    sorted(
        cells
            .into_iter()
            .map(|p| Position::new(p.x + dx, p.y + dy)),
    )
}

/// The cells shifted so their bounding box starts at the origin, sorted.
///
/// Two shapes are translations of each other exactly when their
/// canonical forms are equal.
pub fn canonical(cells: impl IntoIterator<Item = Position>) -> Vec<Position> {
    let cells = sorted(cells);
    let Some(min_x) = cells.iter().map(|p| p.x).min() else {
        return cells;
    };
    let min_y = cells.iter().map(|p| p.y).min().unwrap_or(0);
    translate(cells, -min_x, -min_y)
}

/// A store under `policy` holding `cells`.
///
/// Panics if the policy is invalid.
pub fn store_with(policy: BoundaryPolicy, cells: &[Position]) -> CellStore {
    let mut store = CellStore::new(policy).unwrap();
    for &pos in cells {
        store.activate(pos);
    }
    store
}
