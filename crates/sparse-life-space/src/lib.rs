//! Spatial layer for sparse-life simulations.
//!
//! Two pieces live here:
//!
//! - [`BoundaryPolicy`]: the one place where coordinates are clipped or
//!   wrapped. Activation, neighbour enumeration and membership queries
//!   all resolve positions through it.
//! - [`CellStore`]: the sparse live set, one entry per live cell keyed
//!   by [`Position`](sparse_life_core::Position). A position is present
//!   if and only if the cell there is alive.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod error;
pub mod store;

#[cfg(test)]
pub(crate) mod compliance;

pub use boundary::{BoundaryPolicy, OFFSETS_8};
pub use error::SpaceError;
pub use store::CellStore;
