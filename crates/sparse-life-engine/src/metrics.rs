//! Per-step performance metrics for the simulation engine.
//!
//! [`StepMetrics`] captures timing and size data for a single generation,
//! feeding the controller's step-time history and the benchmarks.

use serde::Serialize;

/// Timing and size metrics collected during a single step.
///
/// All durations are in microseconds. The engine overwrites these after
/// each `step()` call; readers see the most recent generation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Time spent building the frontier and its neighbour counts.
    pub evaluate_us: u64,
    /// Time spent applying the rule to the frontier.
    pub decide_us: u64,
    /// Time spent committing births and deaths to the store.
    pub commit_us: u64,
    /// Number of positions evaluated.
    pub frontier_len: usize,
    /// Live cells before the step.
    pub live_before: usize,
    /// Live cells after the step.
    pub live_after: usize,
}
