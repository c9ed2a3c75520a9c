//! Error types for pattern construction and placement.

use crate::cell::Position;
use thiserror::Error;

/// Errors raised while building or placing a [`Pattern`](crate::Pattern).
///
/// Pattern placement is all-or-nothing: when any of these is returned,
/// no cell of the pattern has been activated.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PatternError {
    /// A pattern cell lies outside a clipped grid.
    #[error("pattern cell {position} lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// The first offending cell.
        position: Position,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
    /// No built-in pattern has the requested name.
    #[error("unknown pattern '{name}'")]
    UnknownPattern {
        /// The name that was looked up.
        name: String,
    },
    /// Random soup density must be a finite value in `[0, 1]`.
    #[error("soup density must be within [0, 1], got {value}")]
    InvalidDensity {
        /// The rejected density.
        value: f64,
    },
}
