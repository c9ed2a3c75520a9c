//! Boundary (edge) policies for the simulation plane.

use crate::error::SpaceError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use sparse_life_core::Position;

/// All 8 Moore offsets as `(dx, dy)`: W, E, N, S, NW, NE, SW, SE.
pub const OFFSETS_8: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// How the plane handles coordinates at and beyond its edges.
///
/// The policy is fixed for the lifetime of an engine. Every coordinate
/// that enters the simulation passes through [`BoundaryPolicy::normalize`]
/// (or [`BoundaryPolicy::neighbour`], which shares its resolution logic),
/// so activation, evaluation and queries can never disagree about which
/// cell a coordinate names.
///
/// # Examples
///
/// ```
/// use sparse_life_core::Position;
/// use sparse_life_space::BoundaryPolicy;
///
/// let clip = BoundaryPolicy::clip(4, 4).unwrap();
/// assert_eq!(clip.neighbours(Position::new(0, 0)).len(), 3);
/// assert_eq!(clip.normalize(Position::new(4, 0)), None);
///
/// let wrap = BoundaryPolicy::wrap(4, 4).unwrap();
/// assert_eq!(wrap.neighbours(Position::new(0, 0)).len(), 8);
/// assert_eq!(wrap.normalize(Position::new(-1, 5)), Some(Position::new(3, 1)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// The whole `i32` plane. Neighbours that would overflow are off-grid.
    Unbounded,
    /// Finite rectangle `[0, width) x [0, height)`. Everything outside is
    /// permanently dead and never evaluated.
    Clip {
        /// Number of columns.
        width: u32,
        /// Number of rows.
        height: u32,
    },
    /// Torus of `width x height`. Coordinates normalize by Euclidean
    /// remainder, so negative coordinates wrap correctly.
    Wrap {
        /// Number of columns.
        width: u32,
        /// Number of rows.
        height: u32,
    },
}

impl BoundaryPolicy {
    /// Maximum extent per axis: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Minimum extent per axis for a wrapped grid.
    ///
    /// Below 3, a cell's neighbourhood wraps onto itself and neighbours
    /// would be counted more than once.
    pub const MIN_WRAP: u32 = 3;

    /// A validated clipped rectangle.
    pub fn clip(width: u32, height: u32) -> Result<Self, SpaceError> {
        let policy = Self::Clip { width, height };
        policy.validate()?;
        Ok(policy)
    }

    /// A validated torus.
    pub fn wrap(width: u32, height: u32) -> Result<Self, SpaceError> {
        let policy = Self::Wrap { width, height };
        policy.validate()?;
        Ok(policy)
    }

    /// Check the extent of a bounded policy.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if either dimension is 0,
    /// `Err(SpaceError::DimensionTooLarge)` if either exceeds
    /// [`MAX_DIM`](Self::MAX_DIM), and `Err(SpaceError::WrapTooSmall)` for a
    /// torus narrower than [`MIN_WRAP`](Self::MIN_WRAP) on either axis.
    pub fn validate(&self) -> Result<(), SpaceError> {
        let (width, height, wrap) = match *self {
            Self::Unbounded => return Ok(()),
            Self::Clip { width, height } => (width, height, false),
            Self::Wrap { width, height } => (width, height, true),
        };
        if width == 0 || height == 0 {
            return Err(SpaceError::EmptySpace);
        }
        for (name, value) in [("width", width), ("height", height)] {
            if value > Self::MAX_DIM {
                return Err(SpaceError::DimensionTooLarge {
                    name,
                    value,
                    max: Self::MAX_DIM,
                });
            }
            if wrap && value < Self::MIN_WRAP {
                return Err(SpaceError::WrapTooSmall {
                    name,
                    value,
                    min: Self::MIN_WRAP,
                });
            }
        }
        Ok(())
    }

    /// Grid extent `(width, height)`, or `None` when unbounded.
    pub fn extent(&self) -> Option<(u32, u32)> {
        match *self {
            Self::Unbounded => None,
            Self::Clip { width, height } | Self::Wrap { width, height } => Some((width, height)),
        }
    }

    /// Whether this policy wraps around its edges.
    pub fn is_wrapping(&self) -> bool {
        matches!(self, Self::Wrap { .. })
    }

    /// Map a coordinate to the cell it names.
    ///
    /// `None` means the coordinate is off-grid (outside a clipped
    /// rectangle) and can never hold a live cell.
    pub fn normalize(&self, pos: Position) -> Option<Position> {
        self.resolve(i64::from(pos.x), i64::from(pos.y))
    }

    /// The neighbour of `pos` at offset `(dx, dy)`, normalized.
    pub fn neighbour(&self, pos: Position, dx: i32, dy: i32) -> Option<Position> {
        self.resolve(
            i64::from(pos.x) + i64::from(dx),
            i64::from(pos.y) + i64::from(dy),
        )
    }

    /// All in-grid Moore neighbours of `pos`.
    ///
    /// Clipped corners have 3 and clipped edges 5; wrapped and interior
    /// cells always have 8.
    pub fn neighbours(&self, pos: Position) -> SmallVec<[Position; 8]> {
        OFFSETS_8
            .iter()
            .filter_map(|&(dx, dy)| self.neighbour(pos, dx, dy))
            .collect()
    }

    fn resolve(&self, x: i64, y: i64) -> Option<Position> {
        match *self {
            Self::Unbounded => Some(Position::new(
                i32::try_from(x).ok()?,
                i32::try_from(y).ok()?,
            )),
            Self::Clip { width, height } => {
                let inside =
                    (0..i64::from(width)).contains(&x) && (0..i64::from(height)).contains(&y);
                inside.then(|| Position::new(x as i32, y as i32))
            }
            Self::Wrap { width, height } => Some(Position::new(
                x.rem_euclid(i64::from(width)) as i32,
                y.rem_euclid(i64::from(height)) as i32,
            )),
        }
    }
}
