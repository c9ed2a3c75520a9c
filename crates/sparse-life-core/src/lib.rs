//! Core value types for sparse Game of Life simulations.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental vocabulary used throughout the workspace: grid
//! positions, per-cell metadata, the generation counter, and the
//! built-in pattern library used to seed a board.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod id;
pub mod pattern;

pub use cell::{Cell, Position};
pub use error::PatternError;
pub use id::Generation;
pub use pattern::Pattern;
