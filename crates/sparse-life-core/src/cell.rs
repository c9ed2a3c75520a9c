//! Grid positions and per-cell metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer grid coordinate.
///
/// `x` grows to the right and `y` grows downward, matching the row-major
/// layout renderers use. Ordering is structural: `x` first, then `y`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev (L-inf) distance, the metric under which the Moore
    /// neighbourhood is the unit ball.
    pub fn chebyshev_distance(self, other: Position) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Position> for (i32, i32) {
    fn from(p: Position) -> Self {
        (p.x, p.y)
    }
}

/// Metadata stored for a live cell.
///
/// Dead cells have no representation at all. The cached neighbour count
/// is the number of live neighbours observed the last time this cell's
/// fate was evaluated: newborn cells record 3, survivors record 2 or 3,
/// and manually activated cells record 0 until the next step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    neighbours: u8,
}

impl Cell {
    /// Maximum number of neighbours in the Moore neighbourhood.
    pub const MAX_NEIGHBOURS: u8 = 8;

    /// A cell with the given cached neighbour count.
    ///
    /// Counts above [`Cell::MAX_NEIGHBOURS`] are clamped.
    pub fn with_neighbours(neighbours: u8) -> Self {
        Self {
            neighbours: neighbours.min(Self::MAX_NEIGHBOURS),
        }
    }

    /// Cached live-neighbour count (0 to 8).
    pub fn neighbours(&self) -> u8 {
        self.neighbours
    }

    /// Overwrite the cached live-neighbour count.
    pub fn set_neighbours(&mut self, neighbours: u8) {
        self.neighbours = neighbours.min(Self::MAX_NEIGHBOURS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ordering_is_x_then_y() {
        let mut v = vec![
            Position::new(1, 0),
            Position::new(0, 5),
            Position::new(0, -1),
        ];
        v.sort();
        assert_eq!(
            v,
            vec![
                Position::new(0, -1),
                Position::new(0, 5),
                Position::new(1, 0)
            ]
        );
    }

    #[test]
    fn cell_clamps_neighbour_count() {
        let mut cell = Cell::with_neighbours(12);
        assert_eq!(cell.neighbours(), 8);
        cell.set_neighbours(3);
        assert_eq!(cell.neighbours(), 3);
    }

    #[test]
    fn serializes_as_xy_object() {
        let json = serde_json::to_string(&Position::new(-2, 9)).unwrap();
        assert_eq!(json, r#"{"x":-2,"y":9}"#);
    }

    proptest! {
        #[test]
        fn chebyshev_is_symmetric(
            ax in -1000i32..1000, ay in -1000i32..1000,
            bx in -1000i32..1000, by in -1000i32..1000,
        ) {
            let a = Position::new(ax, ay);
            let b = Position::new(bx, by);
            prop_assert_eq!(a.chebyshev_distance(b), b.chebyshev_distance(a));
            prop_assert_eq!(a.chebyshev_distance(a), 0);
        }
    }
}
