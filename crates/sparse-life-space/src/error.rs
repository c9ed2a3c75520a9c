//! Error types for space construction.

use thiserror::Error;

/// Errors arising from boundary policy validation.
///
/// Coordinate handling itself is total; only grid extents can be invalid.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SpaceError {
    /// A bounded grid was given a zero width or height.
    #[error("space must have at least one cell")]
    EmptySpace,
    /// A grid dimension exceeds the maximum representable extent.
    #[error("{name} = {value} exceeds maximum {max}")]
    DimensionTooLarge {
        /// Which dimension (`"width"` or `"height"`).
        name: &'static str,
        /// The rejected value.
        value: u32,
        /// The largest accepted value.
        max: u32,
    },
    /// A wrapped axis is too short for the 8 neighbours of a cell to be
    /// distinct from each other and from the cell itself.
    #[error("wrapped {name} = {value} is below the minimum of {min}")]
    WrapTooSmall {
        /// Which dimension (`"width"` or `"height"`).
        name: &'static str,
        /// The rejected value.
        value: u32,
        /// The smallest accepted value.
        min: u32,
    },
}
