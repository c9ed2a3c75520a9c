//! Thread-safe controller with a background stepping thread.
//!
//! [`ThreadedController`] shares one [`Controller`] between the owning
//! thread and a worker thread through a single mutex. Every command and
//! query takes that lock for its whole duration, so:
//!
//! - a manual [`step()`](ThreadedController::step) while running queues
//!   behind the worker and never double-steps;
//! - queries return owned snapshots and never observe a half-applied
//!   generation.
//!
//! # Shutdown
//!
//! [`stop()`](ThreadedController::stop) marks the controller stopped,
//! disconnects the wake channel and joins the worker. Once it returns no
//! further step can happen. Dropping the controller performs `stop()`.
//!
//! A worker that dies (a callback panicked on it) is noticed by the next
//! [`start()`](ThreadedController::start), which joins it and spawns a
//! replacement.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use sparse_life_core::{Pattern, PatternError, Position};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, SimulationConfig};
use crate::controller::{Controller, RunState, SimulationStats};
use crate::engine::StepOutcome;
use crate::history::Periodicity;
use crate::worker::{lock, StepWorker};

// ── ControllerError ──────────────────────────────────────────────

/// Error returned by [`ThreadedController::start()`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// The background stepping thread could not be spawned.
    #[error("thread spawn failed: {reason}")]
    ThreadSpawnFailed {
        /// Description from the OS.
        reason: String,
    },
}

// ── ThreadedController ───────────────────────────────────────────

/// A [`Controller`] driven by its own stepping thread.
///
/// The worker is spawned lazily by the first [`start()`](Self::start) and
/// lives until [`stop()`](Self::stop). Pausing keeps it parked on its
/// wake channel.
pub struct ThreadedController {
    shared: Arc<Mutex<Controller>>,
    wake_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadedController {
    /// Build a stopped controller with an empty board. No thread is
    /// spawned yet.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_controller(Controller::new(config)?))
    }

    /// Wrap an existing controller.
    pub fn from_controller(controller: Controller) -> Self {
        Self {
            shared: Arc::new(Mutex::new(controller)),
            wake_tx: None,
            worker: None,
        }
    }

    // ── Run state ──────────────────────────────────────────────

    /// Begin (or resume) autonomous stepping on the worker thread.
    ///
    /// Spawns the worker if none is running, replacing one that has
    /// exited.
    pub fn start(&mut self) -> Result<(), ControllerError> {
        if self.worker.as_ref().is_some_and(JoinHandle::is_finished) {
            self.wake_tx.take();
            if let Some(handle) = self.worker.take() {
                let panicked = handle.join().is_err();
                warn!(panicked, "step worker exited unexpectedly, respawning");
            }
        }
        if self.worker.is_none() {
            self.spawn_worker()?;
        }
        lock(&self.shared).start();
        self.wake();
        Ok(())
    }

    /// Suspend autonomous stepping. The worker stays parked.
    pub fn pause(&self) {
        lock(&self.shared).pause();
    }

    /// Stop stepping and join the worker.
    ///
    /// No step runs after this returns. The board is kept.
    pub fn stop(&mut self) {
        lock(&self.shared).stop();
        self.wake_tx.take();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                debug!("step worker panicked");
            }
        }
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        lock(&self.shared).state()
    }

    /// Whether the worker thread is alive.
    pub fn has_worker(&self) -> bool {
        self.worker.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    // ── Commands ───────────────────────────────────────────────

    /// Perform exactly one generation, serialized with the worker.
    pub fn step(&self) -> StepOutcome {
        lock(&self.shared).step()
    }

    /// Stop autonomous stepping, clear the board and re-apply the initial
    /// pattern. The worker stays parked.
    pub fn reset(&self) {
        lock(&self.shared).reset();
    }

    /// Change the autonomous stepping rate; takes effect immediately.
    pub fn set_target_gps(&self, gps: f64) -> Result<(), ConfigError> {
        lock(&self.shared).set_target_gps(gps)?;
        self.wake();
        Ok(())
    }

    /// Kill every cell, keeping the generation and the run state.
    pub fn clear_grid(&self) {
        lock(&self.shared).clear_grid();
    }

    /// See [`Controller::set_period_detection`].
    pub fn set_period_detection(&self, enabled: bool) {
        lock(&self.shared).set_period_detection(enabled);
    }

    /// See [`Controller::set_initial_pattern`].
    pub fn set_initial_pattern(&self, pattern: Option<Pattern>) -> Result<(), PatternError> {
        lock(&self.shared).set_initial_pattern(pattern)
    }

    /// See [`Controller::load_pattern`].
    pub fn load_pattern(&self, pattern: Pattern) -> Result<(), PatternError> {
        lock(&self.shared).load_pattern(pattern)
    }

    /// See [`Controller::reconfigure`].
    pub fn reconfigure(&self, config: SimulationConfig) -> Result<(), ConfigError> {
        lock(&self.shared).reconfigure(config)
    }

    /// Register the per-step callback. It runs on the worker thread (or
    /// the caller's, for manual steps) with the controller lock held, so
    /// it must not call back into this controller.
    pub fn on_step(&self, callback: impl FnMut(&SimulationStats) + Send + 'static) {
        lock(&self.shared).on_step(callback);
    }

    /// Register the periodicity callback. Same locking rules as
    /// [`on_step`](Self::on_step).
    pub fn on_periodicity(&self, callback: impl FnMut(&Periodicity) + Send + 'static) {
        lock(&self.shared).on_periodicity(callback);
    }

    /// Register the state-change callback. Auto-pauses fire it on the
    /// worker thread; same locking rules as [`on_step`](Self::on_step).
    pub fn on_state_change(&self, callback: impl FnMut(&SimulationStats) + Send + 'static) {
        lock(&self.shared).on_state_change(callback);
    }

    /// Bring `(x, y)` to life. Valid in any state.
    pub fn set_cell_alive(&self, x: i32, y: i32) -> bool {
        lock(&self.shared).set_cell_alive(x, y)
    }

    /// Kill `(x, y)`. Valid in any state.
    pub fn set_cell_dead(&self, x: i32, y: i32) -> bool {
        lock(&self.shared).set_cell_dead(x, y)
    }

    // ── Queries ────────────────────────────────────────────────

    /// Whether the cell at `(x, y)` is alive.
    pub fn is_cell_alive(&self, x: i32, y: i32) -> bool {
        lock(&self.shared).is_cell_alive(x, y)
    }

    /// Snapshot of all live positions, unordered.
    pub fn living_cells(&self) -> Vec<Position> {
        lock(&self.shared).living_cells()
    }

    /// Number of live cells.
    pub fn living_cell_count(&self) -> usize {
        lock(&self.shared).living_cell_count()
    }

    /// Live positions inside the inclusive rectangle `[min, max]`.
    pub fn cells_in_region(&self, min: Position, max: Position) -> Vec<Position> {
        lock(&self.shared).cells_in_region(min, max)
    }

    /// Owned snapshot of the current statistics.
    pub fn stats(&self) -> SimulationStats {
        lock(&self.shared).stats()
    }

    /// Run `f` against the controller under the lock.
    ///
    /// For consistent multi-part reads; keep `f` short, the worker
    /// cannot step while it runs.
    pub fn with_controller<R>(&self, f: impl FnOnce(&Controller) -> R) -> R {
        f(&lock(&self.shared))
    }

    // ── Internal ───────────────────────────────────────────────

    fn spawn_worker(&mut self) -> Result<(), ControllerError> {
        let (wake_tx, wake_rx) = crossbeam_channel::bounded(1);
        let worker = StepWorker::new(Arc::clone(&self.shared), wake_rx);
        let handle = thread::Builder::new()
            .name("sparse-life-step".into())
            .spawn(move || worker.run())
            .map_err(|e| ControllerError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;
        debug!("step worker spawned");
        self.wake_tx = Some(wake_tx);
        self.worker = Some(handle);
        Ok(())
    }

    /// Nudge the worker to recompute its deadline. A full channel means
    /// a wake-up is already pending.
    fn wake(&self) {
        if let Some(tx) = &self.wake_tx {
            let _ = tx.try_send(());
        }
    }
}

impl Drop for ThreadedController {
    fn drop(&mut self) {
        self.stop();
    }
}
