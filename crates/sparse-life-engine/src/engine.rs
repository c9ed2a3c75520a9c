//! The simulation engine: one synchronous generation per `step()`.
//!
//! [`SimulationEngine`] owns the live set, the generation counter and
//! the boundary policy. A step runs in three phases against the frozen
//! generation N:
//!
//! 1. **Evaluate:** build the [`Frontier`] and its neighbour counts.
//! 2. **Decide:** apply the [`Rule`] to list births and deaths.
//! 3. **Commit:** apply all deaths and births, refresh cached neighbour
//!    counts, advance the generation.
//!
//! Nothing is written before phase 3, so callers never observe a board
//! that is partly generation N and partly N+1.

use std::time::Instant;

use serde::Serialize;
use sparse_life_core::{Cell, Generation, Pattern, PatternError, Position};
use sparse_life_space::{BoundaryPolicy, CellStore};
use tracing::trace;

use crate::config::ConfigError;
use crate::evaluator::Frontier;
use crate::metrics::StepMetrics;
use crate::rules::{Rule, Transitions};

// ── StepOutcome ─────────────────────────────────────────────────

/// What a single [`SimulationEngine::step()`] changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    /// Generation reached by the step.
    pub generation: Generation,
    /// Cells born.
    pub births: usize,
    /// Cells that died.
    pub deaths: usize,
}

impl StepOutcome {
    /// Whether any cell changed state.
    pub fn changed(&self) -> bool {
        self.births > 0 || self.deaths > 0
    }
}

// ── SimulationEngine ────────────────────────────────────────────

/// Sparse Game of Life engine under a fixed [`BoundaryPolicy`].
///
/// Step cost is proportional to the number of live cells, never to the
/// area of the grid.
#[derive(Clone, Debug)]
pub struct SimulationEngine {
    store: CellStore,
    rule: Rule,
    generation: Generation,
    frontier: Frontier,
    transitions: Transitions,
    last_metrics: StepMetrics,
}

impl SimulationEngine {
    /// An empty engine at generation 0.
    pub fn new(policy: BoundaryPolicy) -> Result<Self, ConfigError> {
        Ok(Self {
            store: CellStore::new(policy)?,
            rule: Rule::CONWAY,
            generation: Generation::ZERO,
            frontier: Frontier::new(),
            transitions: Transitions::default(),
            last_metrics: StepMetrics::default(),
        })
    }

    /// Advance exactly one generation.
    pub fn step(&mut self) -> StepOutcome {
        let start = Instant::now();
        let live_before = self.store.len();

        // 1. Evaluate.
        self.frontier.evaluate(&self.store);
        let evaluated = Instant::now();

        // 2. Decide.
        self.transitions
            .recompute(&self.frontier, &self.store, self.rule);
        let decided = Instant::now();

        // 3. Commit.
        for &pos in self.transitions.to_deactivate() {
            self.store.deactivate(pos);
        }
        for &pos in self.transitions.to_activate() {
            self.store.activate(pos);
        }
        for (pos, neighbours) in self.frontier.iter() {
            if let Some(cell) = self.store.get_mut(pos) {
                cell.set_neighbours(neighbours);
            }
        }
        self.generation = self.generation.next();
        let committed = Instant::now();

        let outcome = StepOutcome {
            generation: self.generation,
            births: self.transitions.to_activate().len(),
            deaths: self.transitions.to_deactivate().len(),
        };
        self.last_metrics = StepMetrics {
            total_us: (committed - start).as_micros() as u64,
            evaluate_us: (evaluated - start).as_micros() as u64,
            decide_us: (decided - evaluated).as_micros() as u64,
            commit_us: (committed - decided).as_micros() as u64,
            frontier_len: self.frontier.len(),
            live_before,
            live_after: self.store.len(),
        };
        trace!(
            generation = outcome.generation.0,
            births = outcome.births,
            deaths = outcome.deaths,
            frontier = self.frontier.len(),
            live = self.store.len(),
            "step"
        );
        outcome
    }

    /// Clear every cell and return to generation 0. The policy is kept.
    pub fn reset(&mut self) {
        self.store.clear();
        self.generation = Generation::ZERO;
        self.last_metrics = StepMetrics::default();
    }

    /// Clear every cell, keeping the generation counter.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Bring the cell at `pos` to life. See [`CellStore::activate`].
    pub fn activate(&mut self, pos: Position) -> bool {
        self.store.activate(pos)
    }

    /// Kill the cell at `pos`. See [`CellStore::deactivate`].
    pub fn deactivate(&mut self, pos: Position) -> bool {
        self.store.deactivate(pos)
    }

    /// Activate every cell of `pattern`, all or nothing.
    ///
    /// Under a clipped policy every cell is checked first; if any lies
    /// outside the grid, nothing is activated. Returns the number of
    /// cells that were newly brought to life.
    pub fn apply_pattern(&mut self, pattern: &Pattern) -> Result<usize, PatternError> {
        check_pattern_fits(pattern, self.store.policy())?;
        Ok(pattern
            .cells()
            .iter()
            .filter(|&&pos| self.store.activate(pos))
            .count())
    }

    /// Whether the cell at `pos` is alive.
    pub fn is_alive(&self, pos: Position) -> bool {
        self.store.is_alive(pos)
    }

    /// Number of live cells.
    pub fn live_count(&self) -> usize {
        self.store.len()
    }

    /// Current generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Snapshot of all live positions, unordered.
    pub fn live_cells(&self) -> Vec<Position> {
        self.store.positions().collect()
    }

    /// Live positions inside the inclusive rectangle `[min, max]`.
    pub fn cells_in_region(&self, min: Position, max: Position) -> Vec<Position> {
        self.store.cells_in_region(min, max)
    }

    /// Current live-neighbour count of `pos`, read from the store.
    pub fn neighbour_count(&self, pos: Position) -> u8 {
        self.store.count_live_neighbours(pos)
    }

    /// Neighbour count cached on the live cell at `pos` by the last step.
    pub fn cached_neighbours(&self, pos: Position) -> Option<u8> {
        self.store.get(pos).map(Cell::neighbours)
    }

    /// Inclusive bounding box of the live set.
    pub fn bounding_box(&self) -> Option<(Position, Position)> {
        self.store.bounding_box()
    }

    /// The boundary policy fixed at construction.
    pub fn policy(&self) -> BoundaryPolicy {
        self.store.policy()
    }

    /// The rule applied each generation.
    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Read-only view of the live set.
    pub fn store(&self) -> &CellStore {
        &self.store
    }

    /// Metrics of the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }
}

/// Check that every cell of `pattern` names an in-grid cell.
pub(crate) fn check_pattern_fits(
    pattern: &Pattern,
    policy: BoundaryPolicy,
) -> Result<(), PatternError> {
    if let BoundaryPolicy::Clip { width, height } = policy {
        if let Some(position) = pattern.first_outside(width, height) {
            return Err(PatternError::OutOfBounds {
                position,
                width,
                height,
            });
        }
    }
    Ok(())
}
