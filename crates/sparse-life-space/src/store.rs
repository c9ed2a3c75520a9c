//! The sparse live-cell store.

use crate::boundary::{BoundaryPolicy, OFFSETS_8};
use crate::error::SpaceError;
use indexmap::IndexMap;
use sparse_life_core::{Cell, Position};

/// Sparse set of live cells under a fixed [`BoundaryPolicy`].
///
/// A position has an entry if and only if the cell there is alive; dead
/// cells take no memory. All lookups normalize through the policy first,
/// so under `Wrap` the positions `(-1, 0)` and `(width - 1, 0)` name the
/// same entry, and under `Clip` an off-grid position is never stored.
///
/// Membership, insertion and removal are O(1) on average. Iteration
/// order is unspecified.
#[derive(Clone, Debug)]
pub struct CellStore {
    policy: BoundaryPolicy,
    cells: IndexMap<Position, Cell>,
}

impl CellStore {
    /// An empty store under `policy`.
    ///
    /// Fails if the policy's extent is invalid (see
    /// [`BoundaryPolicy::validate`]).
    pub fn new(policy: BoundaryPolicy) -> Result<Self, SpaceError> {
        policy.validate()?;
        Ok(Self {
            policy,
            cells: IndexMap::new(),
        })
    }

    /// The boundary policy every lookup resolves through.
    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// Whether the cell at `pos` is alive. Off-grid positions are dead.
    pub fn is_alive(&self, pos: Position) -> bool {
        self.policy
            .normalize(pos)
            .is_some_and(|p| self.cells.contains_key(&p))
    }

    /// Bring the cell at `pos` to life.
    ///
    /// Returns `true` if a new entry was created. Activating a live cell
    /// or an off-grid position is a no-op returning `false`.
    pub fn activate(&mut self, pos: Position) -> bool {
        self.activate_with(pos, Cell::default())
    }

    /// Like [`activate`](Self::activate), recording `cell` as the metadata
    /// of a newly created entry. An existing entry is left untouched.
    pub fn activate_with(&mut self, pos: Position, cell: Cell) -> bool {
        let Some(p) = self.policy.normalize(pos) else {
            return false;
        };
        match self.cells.entry(p) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(cell);
                true
            }
        }
    }

    /// Kill the cell at `pos`.
    ///
    /// Returns `true` if an entry was removed.
    pub fn deactivate(&mut self, pos: Position) -> bool {
        self.policy
            .normalize(pos)
            .is_some_and(|p| self.cells.swap_remove(&p).is_some())
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is alive.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate live positions (normalized).
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Position> + '_ {
        self.cells.keys().copied()
    }

    /// Iterate live cells with their metadata.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = (Position, &Cell)> + '_ {
        self.cells.iter().map(|(p, c)| (*p, c))
    }

    /// Metadata of the live cell at `pos`.
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&self.policy.normalize(pos)?)
    }

    /// Mutable metadata of the live cell at `pos`.
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        let p = self.policy.normalize(pos)?;
        self.cells.get_mut(&p)
    }

    /// Remove every live cell. The policy is kept.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Live positions inside the inclusive rectangle `[min, max]`.
    ///
    /// Bounds are compared against normalized coordinates. An inverted
    /// rectangle yields nothing. Cost is O(live cells), independent of
    /// the rectangle's area.
    pub fn cells_in_region(&self, min: Position, max: Position) -> Vec<Position> {
        self.cells
            .keys()
            .filter(|p| p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y)
            .copied()
            .collect()
    }

    /// Inclusive bounding box of the live set, or `None` when empty.
    pub fn bounding_box(&self) -> Option<(Position, Position)> {
        let mut keys = self.cells.keys();
        let first = *keys.next()?;
        Some(keys.fold((first, first), |(lo, hi), p| {
            (
                Position::new(lo.x.min(p.x), lo.y.min(p.y)),
                Position::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }

    /// Number of live Moore neighbours of `pos`, computed from the store.
    pub fn count_live_neighbours(&self, pos: Position) -> u8 {
        OFFSETS_8
            .iter()
            .filter_map(|&(dx, dy)| self.policy.neighbour(pos, dx, dy))
            .filter(|p| self.cells.contains_key(p))
            .count() as u8
    }
}
