//! Named cell patterns used to seed a board.
//!
//! A [`Pattern`] is an immutable, sorted, duplicate-free list of live
//! positions. The built-in library covers the classic still lifes,
//! oscillators, spaceships and methuselahs, plus a seeded random soup.
//! All built-ins lie in the non-negative quadrant next to the origin;
//! use [`Pattern::offset`] to place them elsewhere.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::cell::Position;
use crate::error::PatternError;

/// Names accepted by [`Pattern::by_name`], in library order.
pub const BUILTIN_NAMES: &[&str] = &[
    "block",
    "beehive",
    "loaf",
    "boat",
    "blinker",
    "toad",
    "beacon",
    "pulsar",
    "glider",
    "lwss",
    "r-pentomino",
    "diehard",
    "acorn",
    "gosper-gun",
];

const BLOCK: &[(i32, i32)] = &[(0, 0), (1, 0), (0, 1), (1, 1)];
const BEEHIVE: &[(i32, i32)] = &[(1, 0), (2, 0), (0, 1), (3, 1), (1, 2), (2, 2)];
const LOAF: &[(i32, i32)] = &[(1, 0), (2, 0), (0, 1), (3, 1), (1, 2), (3, 2), (2, 3)];
const BOAT: &[(i32, i32)] = &[(0, 0), (1, 0), (0, 1), (2, 1), (1, 2)];
const BLINKER: &[(i32, i32)] = &[(0, 1), (1, 1), (2, 1)];
const TOAD: &[(i32, i32)] = &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)];
const BEACON: &[(i32, i32)] = &[
    (0, 0),
    (1, 0),
    (0, 1),
    (1, 1),
    (2, 2),
    (3, 2),
    (2, 3),
    (3, 3),
];
const GLIDER: &[(i32, i32)] = &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
const LWSS: &[(i32, i32)] = &[
    (1, 0),
    (4, 0),
    (0, 1),
    (0, 2),
    (4, 2),
    (0, 3),
    (1, 3),
    (2, 3),
    (3, 3),
];
const R_PENTOMINO: &[(i32, i32)] = &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)];
const DIEHARD: &[(i32, i32)] = &[(6, 0), (0, 1), (1, 1), (1, 2), (5, 2), (6, 2), (7, 2)];
const ACORN: &[(i32, i32)] = &[(1, 0), (3, 1), (0, 2), (1, 2), (4, 2), (5, 2), (6, 2)];
const GOSPER_GUN: &[(i32, i32)] = &[
    (0, 4),
    (0, 5),
    (1, 4),
    (1, 5),
    (10, 4),
    (10, 5),
    (10, 6),
    (11, 3),
    (11, 7),
    (12, 2),
    (12, 8),
    (13, 2),
    (13, 8),
    (14, 5),
    (15, 3),
    (15, 7),
    (16, 4),
    (16, 5),
    (16, 6),
    (17, 5),
    (20, 2),
    (20, 3),
    (20, 4),
    (21, 2),
    (21, 3),
    (21, 4),
    (22, 1),
    (22, 5),
    (24, 0),
    (24, 1),
    (24, 5),
    (24, 6),
    (34, 2),
    (34, 3),
    (35, 2),
    (35, 3),
];

/// A named set of live cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PatternRepr")]
pub struct Pattern {
    name: String,
    cells: Vec<Position>,
}

#[derive(Deserialize)]
struct PatternRepr {
    name: String,
    cells: Vec<Position>,
}

impl From<PatternRepr> for Pattern {
    fn from(repr: PatternRepr) -> Self {
        Pattern::new(repr.name, repr.cells)
    }
}

impl Pattern {
    /// Build a pattern from arbitrary cells.
    ///
    /// Cells are sorted and duplicates are removed, so two patterns with
    /// the same live set compare equal regardless of input order.
    pub fn new(name: impl Into<String>, cells: impl IntoIterator<Item = Position>) -> Self {
        let mut cells: Vec<Position> = cells.into_iter().collect();
        cells.sort_unstable();
        cells.dedup();
        Self {
            name: name.into(),
            cells,
        }
    }

    fn from_table(name: &str, table: &[(i32, i32)]) -> Self {
        Self::new(name, table.iter().copied().map(Position::from))
    }

    /// Look up a built-in pattern by name (case-insensitive, `_` and
    /// spaces are treated as `-`).
    pub fn by_name(name: &str) -> Result<Self, PatternError> {
        let key = name.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let pattern = match key.as_str() {
            "block" => Self::block(),
            "beehive" => Self::beehive(),
            "loaf" => Self::loaf(),
            "boat" => Self::boat(),
            "blinker" => Self::blinker(),
            "toad" => Self::toad(),
            "beacon" => Self::beacon(),
            "pulsar" => Self::pulsar(),
            "glider" => Self::glider(),
            "lwss" | "lightweight-spaceship" => Self::lwss(),
            "r-pentomino" => Self::r_pentomino(),
            "diehard" => Self::diehard(),
            "acorn" => Self::acorn(),
            "gosper-gun" | "gosper-glider-gun" => Self::gosper_gun(),
            _ => {
                return Err(PatternError::UnknownPattern {
                    name: name.to_string(),
                })
            }
        };
        Ok(pattern)
    }

    /// 2x2 still life.
    pub fn block() -> Self {
        Self::from_table("block", BLOCK)
    }

    /// 6-cell still life.
    pub fn beehive() -> Self {
        Self::from_table("beehive", BEEHIVE)
    }

    /// 7-cell still life.
    pub fn loaf() -> Self {
        Self::from_table("loaf", LOAF)
    }

    /// 5-cell still life.
    pub fn boat() -> Self {
        Self::from_table("boat", BOAT)
    }

    /// Period-2 oscillator: three cells in a row.
    pub fn blinker() -> Self {
        Self::from_table("blinker", BLINKER)
    }

    /// Period-2 oscillator.
    pub fn toad() -> Self {
        Self::from_table("toad", TOAD)
    }

    /// Period-2 oscillator alternating between 8 and 6 cells.
    pub fn beacon() -> Self {
        Self::from_table("beacon", BEACON)
    }

    /// Period-3 oscillator in a 13x13 box.
    pub fn pulsar() -> Self {
        const BARS: [i32; 6] = [2, 3, 4, 8, 9, 10];
        const POSTS: [i32; 4] = [0, 5, 7, 12];
        let mut cells = Vec::with_capacity(48);
        for &y in &[0, 5, 7, 12] {
            cells.extend(BARS.iter().map(|&x| Position::new(x, y)));
        }
        for &y in &[2, 3, 4, 8, 9, 10] {
            cells.extend(POSTS.iter().map(|&x| Position::new(x, y)));
        }
        Self::new("pulsar", cells)
    }

    /// The 5-cell spaceship; moves `(+1, +1)` every 4 generations.
    pub fn glider() -> Self {
        Self::from_table("glider", GLIDER)
    }

    /// Lightweight spaceship; moves 2 cells left every 4 generations.
    pub fn lwss() -> Self {
        Self::from_table("lwss", LWSS)
    }

    /// Methuselah that stabilizes after 1103 generations.
    pub fn r_pentomino() -> Self {
        Self::from_table("r-pentomino", R_PENTOMINO)
    }

    /// Methuselah that vanishes after 130 generations.
    pub fn diehard() -> Self {
        Self::from_table("diehard", DIEHARD)
    }

    /// Methuselah that takes 5206 generations to stabilize.
    pub fn acorn() -> Self {
        Self::from_table("acorn", ACORN)
    }

    /// Gosper glider gun; emits a glider every 30 generations.
    pub fn gosper_gun() -> Self {
        Self::from_table("gosper-gun", GOSPER_GUN)
    }

    /// Seeded random soup filling `[0, width) x [0, height)`.
    ///
    /// Each position is independently alive with probability `density`.
    /// The same seed always yields the same soup.
    pub fn random_soup(
        width: u32,
        height: u32,
        density: f64,
        seed: u64,
    ) -> Result<Self, PatternError> {
        if !density.is_finite() || !(0.0..=1.0).contains(&density) {
            return Err(PatternError::InvalidDensity { value: density });
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut cells = Vec::new();
        for y in 0..height.min(i32::MAX as u32) as i32 {
            for x in 0..width.min(i32::MAX as u32) as i32 {
                if rng.gen_bool(density) {
                    cells.push(Position::new(x, y));
                }
            }
        }
        Ok(Self::new(format!("soup-{seed}"), cells))
    }

    /// Pattern name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Live cells, sorted by position.
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the pattern has no live cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// A copy of this pattern translated by `(dx, dy)`.
    ///
    /// Coordinates saturate at the `i32` range.
    #[must_use]
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.name.clone(),
            self.cells
                .iter()
                .map(|p| Position::new(p.x.saturating_add(dx), p.y.saturating_add(dy))),
        )
    }

    /// Inclusive bounding box `(min, max)`, or `None` for an empty pattern.
    pub fn bounding_box(&self) -> Option<(Position, Position)> {
        let first = *self.cells.first()?;
        let (mut min, mut max) = (first, first);
        for p in &self.cells {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some((min, max))
    }

    /// First cell lying outside `[0, width) x [0, height)`, if any.
    pub fn first_outside(&self, width: u32, height: u32) -> Option<Position> {
        self.cells.iter().copied().find(|p| {
            p.x < 0 || p.y < 0 || p.x as u32 >= width || p.y as u32 >= height
        })
    }
}
