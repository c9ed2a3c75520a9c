//! Strongly-typed counters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonically increasing generation counter.
///
/// Incremented exactly once per successful engine step and reset to
/// zero when the engine is reset.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(pub u64);

impl Generation {
    /// The initial generation of every engine.
    pub const ZERO: Generation = Generation(0);

    /// The generation that follows this one.
    ///
    /// Saturates at `u64::MAX` rather than wrapping.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Generation {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<Generation> for u64 {
    fn from(g: Generation) -> Self {
        g.0
    }
}
