//! Sparse Game of Life engine and simulation controllers.
//!
//! Provides the [`SimulationEngine`] that advances a sparse live set one
//! generation at a time, the single-threaded [`Controller`] that paces it
//! and tracks stability, and the [`ThreadedController`] that drives a
//! controller from a background stepping thread.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod engine;
pub mod evaluator;
pub mod history;
pub mod metrics;
pub mod rules;
pub mod threaded;

mod worker;

pub use config::{ConfigError, SimulationConfig};
pub use controller::{
    Controller, PeriodicityCallback, RunState, SimulationStats, StateChangeCallback, StepCallback,
};
pub use engine::{SimulationEngine, StepOutcome};
pub use evaluator::Frontier;
pub use history::{PeriodDetector, Periodicity, PopulationHistory, RateMeter, StepTimes};
pub use metrics::StepMetrics;
pub use rules::{Rule, Transitions};
pub use threaded::{ControllerError, ThreadedController};
