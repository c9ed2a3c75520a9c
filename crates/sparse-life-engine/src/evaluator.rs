//! Neighbour evaluation over the frontier.
//!
//! The frontier is every live position plus every in-grid neighbour of a
//! live position. Those are the only cells whose state can change in one
//! generation, so evaluating them is O(live cells), independent of the
//! grid's extent.
//!
//! Counts are built by accumulation: each live cell adds one to each of
//! its neighbours. A live cell that nothing touched is still inserted
//! with a count of 0 so the rule sees it and kills it.

use indexmap::IndexMap;
use sparse_life_core::Position;
use sparse_life_space::CellStore;

/// Live-neighbour counts for every frontier position.
///
/// Reusable: [`evaluate`](Frontier::evaluate) clears the previous
/// generation's counts but keeps the allocation.
#[derive(Clone, Debug, Default)]
pub struct Frontier {
    counts: IndexMap<Position, u8>,
}

impl Frontier {
    /// An empty frontier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute counts for the live set in `store`.
    ///
    /// Neighbours resolve through the store's boundary policy: clipped
    /// neighbours are left out, wrapped ones land on the opposite edge.
    pub fn evaluate(&mut self, store: &CellStore) {
        self.counts.clear();
        let policy = store.policy();
        for pos in store.positions() {
            for nb in policy.neighbours(pos) {
                *self.counts.entry(nb).or_insert(0) += 1;
            }
        }
        for pos in store.positions() {
            self.counts.entry(pos).or_insert(0);
        }
    }

    /// Live-neighbour count of `pos`, if it is on the frontier.
    pub fn count(&self, pos: Position) -> Option<u8> {
        self.counts.get(&pos).copied()
    }

    /// Iterate `(position, live-neighbour count)` pairs.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Position, u8)> + '_ {
        self.counts.iter().map(|(p, n)| (*p, *n))
    }

    /// Number of frontier positions.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the frontier is empty (no live cells).
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
