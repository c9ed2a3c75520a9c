//! The Life rule and the per-generation transition decision.
//!
//! [`Transitions::decide`] is a pure function of the frozen generation:
//! it reads the frontier and the store, and lists what must change. The
//! engine commits those lists afterwards, so no birth or death can leak
//! into the neighbour counts of the generation being computed.

use std::fmt;

use sparse_life_core::Position;
use sparse_life_space::CellStore;

use crate::evaluator::Frontier;

/// An outer-totalistic rule over the Moore neighbourhood.
///
/// Stored as two 9-bit masks indexed by live-neighbour count. Only
/// [`Rule::CONWAY`] is constructible from outside this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rule {
    birth: u16,
    survival: u16,
}

impl Rule {
    /// B3/S23: a dead cell with exactly 3 live neighbours is born, a live
    /// cell with 2 or 3 survives, every other cell is dead next generation.
    pub const CONWAY: Rule = Rule {
        birth: 1 << 3,
        survival: (1 << 2) | (1 << 3),
    };

    /// Whether a dead cell with `neighbours` live neighbours is born.
    pub fn is_birth(&self, neighbours: u8) -> bool {
        neighbours <= 8 && self.birth & (1 << neighbours) != 0
    }

    /// Whether a live cell with `neighbours` live neighbours survives.
    pub fn survives(&self, neighbours: u8) -> bool {
        neighbours <= 8 && self.survival & (1 << neighbours) != 0
    }

    /// State of a cell in the next generation.
    pub fn next_state(&self, alive: bool, neighbours: u8) -> bool {
        if alive {
            self.survives(neighbours)
        } else {
            self.is_birth(neighbours)
        }
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::CONWAY
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("B")?;
        for n in 0..=8u8 {
            if self.is_birth(n) {
                write!(f, "{n}")?;
            }
        }
        f.write_str("/S")?;
        for n in 0..=8u8 {
            if self.survives(n) {
                write!(f, "{n}")?;
            }
        }
        Ok(())
    }
}

/// The changes that turn generation N into generation N+1.
///
/// `to_activate` and `to_deactivate` are disjoint: the first holds only
/// dead positions, the second only live ones. Positions in neither are
/// unchanged. The buffers are reused across generations.
#[derive(Clone, Debug, Default)]
pub struct Transitions {
    to_activate: Vec<Position>,
    to_deactivate: Vec<Position>,
}

impl Transitions {
    /// Decide the next generation for every frontier position.
    pub fn decide(frontier: &Frontier, store: &CellStore, rule: Rule) -> Self {
        let mut transitions = Self::default();
        transitions.recompute(frontier, store, rule);
        transitions
    }

    /// Like [`decide`](Self::decide), reusing this value's allocations.
    pub fn recompute(&mut self, frontier: &Frontier, store: &CellStore, rule: Rule) {
        self.to_activate.clear();
        self.to_deactivate.clear();
        for (pos, neighbours) in frontier.iter() {
            let alive = store.is_alive(pos);
            match (alive, rule.next_state(alive, neighbours)) {
                (true, false) => self.to_deactivate.push(pos),
                (false, true) => self.to_activate.push(pos),
                _ => {}
            }
        }
    }

    /// Dead positions that are born next generation.
    pub fn to_activate(&self) -> &[Position] {
        &self.to_activate
    }

    /// Live positions that die next generation.
    pub fn to_deactivate(&self) -> &[Position] {
        &self.to_deactivate
    }

    /// Whether the next generation equals this one.
    pub fn is_empty(&self) -> bool {
        self.to_activate.is_empty() && self.to_deactivate.is_empty()
    }
}
