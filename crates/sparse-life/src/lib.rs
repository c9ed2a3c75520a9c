//! sparse-life: a sparse Conway's Game of Life engine.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all sparse-life sub-crates. For most users, adding `sparse-life` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use sparse_life::prelude::*;
//!
//! let config = SimulationConfig {
//!     boundary: BoundaryPolicy::Unbounded,
//!     ..SimulationConfig::default()
//! };
//! let mut controller = Controller::new(config).unwrap();
//! controller.load_pattern(Pattern::blinker()).unwrap();
//!
//! controller.step();
//! assert!(controller.is_cell_alive(1, 0));
//! assert!(!controller.is_cell_alive(0, 1));
//!
//! controller.step();
//! assert!(controller.is_cell_alive(0, 1));
//! assert_eq!(controller.living_cell_count(), 3);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `sparse-life-core` | Positions, cells, generations, patterns |
//! | [`space`] | `sparse-life-space` | Boundary policies and the live-cell store |
//! | [`engine`] | `sparse-life-engine` | Engine, rules, controllers, statistics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types (`sparse-life-core`).
///
/// [`types::Position`], [`types::Generation`] and the built-in
/// [`types::Pattern`] library.
pub use sparse_life_core as types;

/// Boundary policies and cell storage (`sparse-life-space`).
///
/// [`space::BoundaryPolicy`] decides what lies past the grid edge;
/// [`space::CellStore`] holds the live set.
pub use sparse_life_space as space;

/// Simulation engine and controllers (`sparse-life-engine`).
///
/// [`engine::SimulationEngine`] for direct stepping,
/// [`engine::Controller`] for paced single-threaded runs and
/// [`engine::ThreadedController`] for background stepping.
pub use sparse_life_engine as engine;

/// Common imports for typical sparse-life usage.
///
/// ```rust
/// use sparse_life::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use sparse_life_core::{Generation, Pattern, Position};

    // Errors
    pub use sparse_life_core::PatternError;
    pub use sparse_life_engine::{ConfigError, ControllerError};
    pub use sparse_life_space::SpaceError;

    // Space
    pub use sparse_life_space::BoundaryPolicy;

    // Engine
    pub use sparse_life_engine::{
        Controller, Periodicity, RunState, SimulationConfig, SimulationEngine, SimulationStats,
        StepOutcome, ThreadedController,
    };
}
