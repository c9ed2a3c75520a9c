//! Single-threaded simulation controller.
//!
//! [`Controller`] wraps a [`SimulationEngine`] with a run-state machine,
//! autonomous pacing, rolling statistics and callbacks. It never spawns
//! threads: the owner drives it by calling [`step()`](Controller::step)
//! directly or [`update()`](Controller::update) from its own loop. For a
//! background stepping thread see
//! [`ThreadedController`](crate::ThreadedController).
//!
//! # State machine
//!
//! ```text
//!            start()            pause()
//! Stopped ──────────▶ Running ─────────▶ Paused
//!    ▲                  ▲  ◀─────────────  │
//!    │                  │     start()      │
//!    └──── stop() / reset() ◀──────────────┘
//! ```
//!
//! [`step()`](Controller::step) performs exactly one generation from any
//! state. Autonomous steps from [`update()`](Controller::update) only
//! happen while `Running`.
//!
//! # Stability
//!
//! The board is *stable* when the last `stability_window` populations
//! are all equal. With `auto_pause_on_stable`, a running controller
//! pauses as soon as that holds. A step that changes nothing does not
//! pause on its own: a frozen board fills the window and pauses
//! `stability_window` steps later.
//!
//! # Generation limit
//!
//! A running controller pauses once the generation reaches the active
//! limit (the configured `max_generations`, or the override passed to
//! [`run_headless`](Controller::run_headless) for the length of that
//! run). `start()` refuses to resume at or past the limit; `reset()`
//! rewinds the generation and lifts the block.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use sparse_life_core::{Generation, Pattern, PatternError, Position};
use tracing::{debug, info, warn};

use crate::config::{validate_rate, ConfigError, SimulationConfig};
use crate::engine::{check_pattern_fits, SimulationEngine, StepOutcome};
use crate::history::{PeriodDetector, Periodicity, PopulationHistory, RateMeter, StepTimes};

// ── RunState ───────────────────────────────────────────────────────

/// Autonomous stepping state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Not stepping. Initial state, and the state after `stop()` or `reset()`.
    #[default]
    Stopped,
    /// Stepping at the target rate.
    Running,
    /// Suspended by the caller or by auto-pause.
    Paused,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Paused => "paused",
        })
    }
}

// ── SimulationStats ────────────────────────────────────────────────

/// Owned snapshot of the controller's derived statistics.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationStats {
    /// Current generation.
    pub generation: Generation,
    /// Number of live cells.
    pub living_cells: usize,
    /// Whether the population window is full and constant.
    pub is_stable: bool,
    /// Run state at the time of the snapshot.
    pub state: RunState,
    /// Births in the most recent step.
    pub births: usize,
    /// Deaths in the most recent step.
    pub deaths: usize,
    /// Configured generations per second.
    pub target_gps: f64,
    /// Measured generations per second over recent steps.
    pub measured_gps: f64,
    /// Duration of the most recent step in microseconds.
    pub last_step_us: u64,
    /// Mean step duration over recent steps in microseconds.
    pub average_step_us: f64,
    /// Period currently matched by the detector, if enabled.
    pub period: Option<Periodicity>,
    /// Inclusive bounding box of the live cells.
    pub bounding_box: Option<(Position, Position)>,
}

/// Called after every step with the post-step statistics.
pub type StepCallback = Box<dyn FnMut(&SimulationStats) + Send>;

/// Called once per newly detected population period.
pub type PeriodicityCallback = Box<dyn FnMut(&Periodicity) + Send>;

/// Called on every run-state transition and after the board is reset or
/// cleared.
pub type StateChangeCallback = Box<dyn FnMut(&SimulationStats) + Send>;

// ── Controller ─────────────────────────────────────────────────────

/// Single-threaded driver for a [`SimulationEngine`].
pub struct Controller {
    config: SimulationConfig,
    engine: SimulationEngine,
    state: RunState,
    initial_pattern: Option<Pattern>,
    population: PopulationHistory,
    periods: PeriodDetector,
    step_times: StepTimes,
    rate: RateMeter,
    interval: Duration,
    /// Generation at which a running controller pauses.
    limit: Option<u64>,
    last_step_at: Option<Instant>,
    last_outcome: StepOutcome,
    on_step: Option<StepCallback>,
    on_periodicity: Option<PeriodicityCallback>,
    on_state_change: Option<StateChangeCallback>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("generation", &self.engine.generation())
            .field("living_cells", &self.engine.live_count())
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Build a stopped controller with an empty board.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = SimulationEngine::new(config.boundary)?;
        Ok(Self {
            population: PopulationHistory::new(config.stability_window),
            interval: Duration::from_secs_f64(1.0 / config.generations_per_second),
            limit: config.max_generations,
            config,
            engine,
            state: RunState::Stopped,
            initial_pattern: None,
            periods: PeriodDetector::new(),
            step_times: StepTimes::default(),
            rate: RateMeter::default(),
            last_step_at: None,
            last_outcome: StepOutcome::default(),
            on_step: None,
            on_periodicity: None,
            on_state_change: None,
        })
    }

    // ── Run state ──────────────────────────────────────────────────

    /// Begin (or resume) autonomous stepping.
    ///
    /// No-op while running, and while the generation is at or past the
    /// active limit.
    pub fn start(&mut self) {
        if self.state == RunState::Running {
            return;
        }
        let generation = self.engine.generation().0;
        if self.limit.is_some_and(|limit| generation >= limit) {
            debug!(generation, limit = ?self.limit, "generation limit reached, not starting");
            return;
        }
        debug!(from = %self.state, generation, "start");
        self.last_step_at = None;
        self.set_state(RunState::Running);
    }

    /// Suspend autonomous stepping. No-op unless running.
    pub fn pause(&mut self) {
        if self.state != RunState::Running {
            return;
        }
        debug!(generation = self.engine.generation().0, "pause");
        self.set_state(RunState::Paused);
    }

    /// Stop autonomous stepping, keeping the board as it is.
    pub fn stop(&mut self) {
        if self.state == RunState::Stopped {
            return;
        }
        debug!(from = %self.state, generation = self.engine.generation().0, "stop");
        self.last_step_at = None;
        self.set_state(RunState::Stopped);
    }

    fn set_state(&mut self, state: RunState) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.notify_state_change();
    }

    fn notify_state_change(&mut self) {
        if self.on_state_change.is_some() {
            let stats = self.stats();
            if let Some(callback) = self.on_state_change.as_mut() {
                callback(&stats);
            }
        }
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Whether autonomous stepping is active.
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    // ── Stepping ───────────────────────────────────────────────────

    /// Perform exactly one generation, whatever the run state.
    ///
    /// Updates statistics, runs stability and period detection, invokes
    /// the callbacks and applies the auto-pause policy.
    pub fn step(&mut self) -> StepOutcome {
        self.step_at(Instant::now())
    }

    /// Step if running and the pacing interval has elapsed.
    pub fn update(&mut self) -> Option<StepOutcome> {
        self.update_at(Instant::now())
    }

    /// [`update()`](Self::update) against an explicit clock reading.
    ///
    /// The first call after `start()` steps immediately; later calls step
    /// only once `1 / generations_per_second` has passed since the last
    /// autonomous step, however often they are made.
    pub fn update_at(&mut self, now: Instant) -> Option<StepOutcome> {
        if self.time_until_next_step(now)? > Duration::ZERO {
            return None;
        }
        self.last_step_at = Some(now);
        Some(self.step_at(now))
    }

    /// Time until the next autonomous step is due, or `None` when not
    /// running. `Some(Duration::ZERO)` means a step is due now.
    pub fn time_until_next_step(&self, now: Instant) -> Option<Duration> {
        if self.state != RunState::Running {
            return None;
        }
        Some(match self.last_step_at {
            None => Duration::ZERO,
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
        })
    }

    fn step_at(&mut self, now: Instant) -> StepOutcome {
        let outcome = self.engine.step();
        self.last_outcome = outcome;
        self.step_times.push(self.engine.last_metrics().total_us);
        self.rate.record(now);

        let living = self.engine.live_count();
        self.population.push(living);
        if self.config.period_detection {
            if let Some(found) = self.periods.push(living, outcome.generation) {
                info!(period = found.period, generation = found.detected_at.0, "{}", found.label());
                if let Some(callback) = self.on_periodicity.as_mut() {
                    callback(&found);
                }
            }
        }

        if self.state == RunState::Running {
            if self.config.auto_pause_on_stable && self.population.is_stable() {
                info!(
                    generation = outcome.generation.0,
                    living,
                    window = self.population.capacity(),
                    "population stable, pausing"
                );
                self.set_state(RunState::Paused);
            } else if self.limit.is_some_and(|limit| outcome.generation.0 >= limit) {
                info!(generation = outcome.generation.0, "generation limit reached, pausing");
                self.set_state(RunState::Paused);
            }
        }

        if self.on_step.is_some() {
            let stats = self.stats();
            if let Some(callback) = self.on_step.as_mut() {
                callback(&stats);
            }
        }
        outcome
    }

    /// Run paced until the generation limit, extinction or auto-pause.
    ///
    /// `max_generations` overrides the configured limit. With neither set
    /// the run ends only on extinction or stability. Sleeps between steps
    /// to honour the target rate; returns the final statistics.
    pub fn run_headless(&mut self, max_generations: Option<u64>) -> SimulationStats {
        self.run_until(max_generations, true)
    }

    /// Like [`run_headless`](Self::run_headless) but steps back to back
    /// without pacing.
    pub fn run_batch(&mut self, max_generations: Option<u64>) -> SimulationStats {
        self.run_until(max_generations, false)
    }

    fn run_until(&mut self, max_generations: Option<u64>, paced: bool) -> SimulationStats {
        self.limit = max_generations.or(self.config.max_generations);
        info!(limit = ?self.limit, paced, living = self.engine.live_count(), "run started");
        self.start();
        while self.state == RunState::Running {
            if self.limit.is_some_and(|l| self.engine.generation().0 >= l) {
                self.pause();
                break;
            }
            if paced {
                if let Some(wait) = self.time_until_next_step(Instant::now()) {
                    if !wait.is_zero() {
                        thread::sleep(wait);
                    }
                }
                self.update_at(Instant::now());
            } else {
                self.step();
            }
            if self.engine.live_count() == 0 {
                info!(generation = self.engine.generation().0, "population extinct");
                self.pause();
            }
        }
        self.limit = self.config.max_generations;
        let stats = self.stats();
        info!(
            generation = stats.generation.0,
            living = stats.living_cells,
            stable = stats.is_stable,
            "run finished"
        );
        stats
    }

    /// Stop, clear the board and histories, and re-apply the initial pattern.
    pub fn reset(&mut self) {
        self.state = RunState::Stopped;
        self.limit = self.config.max_generations;
        self.engine.reset();
        self.population.clear();
        self.periods.clear();
        self.step_times.clear();
        self.rate.clear();
        self.last_step_at = None;
        self.last_outcome = StepOutcome::default();
        if let Some(pattern) = &self.initial_pattern {
            if let Err(err) = self.engine.apply_pattern(pattern) {
                warn!(pattern = pattern.name(), %err, "initial pattern not applied");
            }
        }
        debug!(living = self.engine.live_count(), "reset");
        self.notify_state_change();
    }

    /// Kill every cell, keeping the generation and the run state.
    ///
    /// Population and period histories restart from the empty board.
    pub fn clear_grid(&mut self) {
        self.engine.clear();
        self.population.clear();
        self.periods.clear();
        self.last_outcome = StepOutcome::default();
        debug!(generation = self.engine.generation().0, "grid cleared");
        self.notify_state_change();
    }

    // ── Configuration ──────────────────────────────────────────────

    /// Change the autonomous stepping rate.
    pub fn set_target_gps(&mut self, gps: f64) -> Result<(), ConfigError> {
        validate_rate(gps)?;
        self.config.generations_per_second = gps;
        self.interval = Duration::from_secs_f64(1.0 / gps);
        debug!(gps, "target rate changed");
        Ok(())
    }

    /// Register the pattern applied on every [`reset()`](Self::reset).
    ///
    /// The pattern is checked against the boundary now, so a later reset
    /// cannot fail. `None` removes it. The board is not touched.
    pub fn set_initial_pattern(&mut self, pattern: Option<Pattern>) -> Result<(), PatternError> {
        if let Some(p) = &pattern {
            check_pattern_fits(p, self.engine.policy())?;
        }
        self.initial_pattern = pattern;
        Ok(())
    }

    /// Turn period detection on or off.
    ///
    /// Turning it off forgets the detector's history and every period
    /// reported so far.
    pub fn set_period_detection(&mut self, enabled: bool) {
        self.config.period_detection = enabled;
        if !enabled {
            self.periods.clear();
        }
        debug!(enabled, "period detection toggled");
    }

    /// Register `pattern` as the initial pattern and reset onto it.
    ///
    /// All or nothing: on error the board and the previous initial
    /// pattern are unchanged.
    pub fn load_pattern(&mut self, pattern: Pattern) -> Result<(), PatternError> {
        self.set_initial_pattern(Some(pattern))?;
        self.reset();
        Ok(())
    }

    /// Replace the configuration, rebuilding the engine and resetting.
    ///
    /// On error nothing changes.
    pub fn reconfigure(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if let Some(pattern) = &self.initial_pattern {
            check_pattern_fits(pattern, config.boundary)?;
        }
        self.engine = SimulationEngine::new(config.boundary)?;
        self.population = PopulationHistory::new(config.stability_window);
        self.interval = Duration::from_secs_f64(1.0 / config.generations_per_second);
        self.limit = config.max_generations;
        self.config = config;
        self.reset();
        Ok(())
    }

    /// Current configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Register the per-step callback, replacing any previous one.
    ///
    /// Runs on the stepping thread; under a
    /// [`ThreadedController`](crate::ThreadedController) the controller
    /// lock is held, so the callback must not call back into it.
    pub fn on_step(&mut self, callback: impl FnMut(&SimulationStats) + Send + 'static) {
        self.on_step = Some(Box::new(callback));
    }

    /// Register the periodicity callback, replacing any previous one.
    pub fn on_periodicity(&mut self, callback: impl FnMut(&Periodicity) + Send + 'static) {
        self.on_periodicity = Some(Box::new(callback));
    }

    /// Register the state-change callback, replacing any previous one.
    ///
    /// Fires on every run-state transition, auto-pause included, and
    /// after [`reset()`](Self::reset), [`load_pattern()`](Self::load_pattern)
    /// and [`clear_grid()`](Self::clear_grid). Same threading caveat as
    /// [`on_step`](Self::on_step).
    pub fn on_state_change(&mut self, callback: impl FnMut(&SimulationStats) + Send + 'static) {
        self.on_state_change = Some(Box::new(callback));
    }

    // ── Queries and edits ──────────────────────────────────────────

    /// Whether the cell at `(x, y)` is alive.
    pub fn is_cell_alive(&self, x: i32, y: i32) -> bool {
        self.engine.is_alive(Position::new(x, y))
    }

    /// Snapshot of all live positions, unordered.
    pub fn living_cells(&self) -> Vec<Position> {
        self.engine.live_cells()
    }

    /// Number of live cells.
    pub fn living_cell_count(&self) -> usize {
        self.engine.live_count()
    }

    /// Live positions inside the inclusive rectangle `[min, max]`.
    pub fn cells_in_region(&self, min: Position, max: Position) -> Vec<Position> {
        self.engine.cells_in_region(min, max)
    }

    /// Bring `(x, y)` to life. Valid in any state.
    pub fn set_cell_alive(&mut self, x: i32, y: i32) -> bool {
        self.engine.activate(Position::new(x, y))
    }

    /// Kill `(x, y)`. Valid in any state.
    pub fn set_cell_dead(&mut self, x: i32, y: i32) -> bool {
        self.engine.deactivate(Position::new(x, y))
    }

    /// Whether the population window is full and constant.
    pub fn is_stable(&self) -> bool {
        self.population.is_stable()
    }

    /// Outcome of the most recent step.
    pub fn last_outcome(&self) -> StepOutcome {
        self.last_outcome
    }

    /// Every distinct period reported since the last reset.
    pub fn reported_periods(&self) -> &[usize] {
        self.periods.reported()
    }

    /// The underlying engine.
    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// Owned snapshot of the current statistics.
    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            generation: self.engine.generation(),
            living_cells: self.engine.live_count(),
            is_stable: self.population.is_stable(),
            state: self.state,
            births: self.last_outcome.births,
            deaths: self.last_outcome.deaths,
            target_gps: self.config.generations_per_second,
            measured_gps: self.rate.rate(),
            last_step_us: self.step_times.last(),
            average_step_us: self.step_times.average(),
            period: self.periods.current(),
            bounding_box: self.engine.bounding_box(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparse_life_space::BoundaryPolicy;
    use std::sync::{Arc, Mutex};

    // Gliders and blinkers have constant populations, so auto-pause is
    // off unless a test asks for it.
    fn config() -> SimulationConfig {
        SimulationConfig {
            boundary: BoundaryPolicy::Unbounded,
            generations_per_second: 10.0,
            stability_window: 3,
            auto_pause_on_stable: false,
            ..SimulationConfig::default()
        }
    }

    fn auto_pausing(pattern: Pattern) -> Controller {
        let mut c = Controller::new(SimulationConfig {
            auto_pause_on_stable: true,
            ..config()
        })
        .unwrap();
        c.load_pattern(pattern).unwrap();
        c
    }

    fn controller_with(pattern: Pattern) -> Controller {
        let mut c = Controller::new(config()).unwrap();
        c.load_pattern(pattern).unwrap();
        c
    }

    // ── State machine ─────────────────────────────────────────────

    #[test]
    fn state_transitions() {
        let mut c = Controller::new(config()).unwrap();
        assert_eq!(c.state(), RunState::Stopped);
        c.pause();
        assert_eq!(c.state(), RunState::Stopped);
        c.start();
        assert_eq!(c.state(), RunState::Running);
        c.start();
        assert_eq!(c.state(), RunState::Running);
        c.pause();
        assert_eq!(c.state(), RunState::Paused);
        c.start();
        assert_eq!(c.state(), RunState::Running);
        c.stop();
        assert_eq!(c.state(), RunState::Stopped);
    }

    #[test]
    fn manual_step_works_in_any_state() {
        let mut c = controller_with(Pattern::blinker());
        assert_eq!(c.step().generation, Generation(1));
        c.start();
        c.pause();
        assert_eq!(c.step().generation, Generation(2));
        assert_eq!(c.state(), RunState::Paused);
    }

    // ── Pacing ────────────────────────────────────────────────────

    #[test]
    fn update_does_nothing_unless_running() {
        let mut c = controller_with(Pattern::glider());
        assert_eq!(c.update_at(Instant::now()), None);
        assert_eq!(c.time_until_next_step(Instant::now()), None);
    }

    #[test]
    fn update_honours_interval() {
        let mut c = controller_with(Pattern::glider());
        c.start();
        let t0 = Instant::now();
        assert!(c.update_at(t0).is_some());
        assert!(c.update_at(t0 + Duration::from_millis(10)).is_none());
        assert!(c.update_at(t0 + Duration::from_millis(99)).is_none());
        assert_eq!(
            c.time_until_next_step(t0 + Duration::from_millis(40)),
            Some(Duration::from_millis(60))
        );
        assert!(c.update_at(t0 + Duration::from_millis(100)).is_some());
        assert_eq!(c.engine().generation(), Generation(2));
    }

    #[test]
    fn polling_frequency_does_not_change_rate() {
        let mut c = controller_with(Pattern::glider());
        c.start();
        let t0 = Instant::now();
        let steps = (0..=1000)
            .filter_map(|ms| c.update_at(t0 + Duration::from_millis(ms)))
            .count();
        assert_eq!(steps, 11);
    }

    #[test]
    fn set_target_gps_validates() {
        let mut c = Controller::new(config()).unwrap();
        assert!(c.set_target_gps(0.0).is_err());
        c.set_target_gps(4.0).unwrap();
        assert_eq!(c.config().generations_per_second, 4.0);
        c.start();
        let t0 = Instant::now();
        c.update_at(t0);
        assert_eq!(
            c.time_until_next_step(t0),
            Some(Duration::from_millis(250))
        );
    }

    // ── Stability and auto-pause ──────────────────────────────────

    #[test]
    fn still_life_auto_pauses_after_window() {
        let mut c = auto_pausing(Pattern::block());
        c.start();
        c.step();
        c.step();
        assert_eq!(c.state(), RunState::Running);
        assert!(!c.is_stable());
        c.step();
        assert!(c.is_stable());
        assert_eq!(c.state(), RunState::Paused);
    }

    #[test]
    fn no_auto_pause_when_disabled() {
        let mut c = controller_with(Pattern::block());
        c.start();
        for _ in 0..10 {
            c.step();
        }
        assert!(c.is_stable());
        assert_eq!(c.state(), RunState::Running);
    }

    #[test]
    fn manual_steps_while_stopped_never_pause() {
        let mut c = auto_pausing(Pattern::block());
        for _ in 0..5 {
            c.step();
        }
        assert!(c.is_stable());
        assert_eq!(c.state(), RunState::Stopped);
    }

    #[test]
    fn generation_limit_pauses() {
        let mut c = Controller::new(SimulationConfig {
            max_generations: Some(4),
            ..config()
        })
        .unwrap();
        c.load_pattern(Pattern::glider()).unwrap();
        c.start();
        for _ in 0..3 {
            c.step();
        }
        assert_eq!(c.state(), RunState::Running);
        c.step();
        assert_eq!(c.state(), RunState::Paused);
    }

    #[test]
    fn start_refused_at_generation_limit() {
        let mut c = Controller::new(SimulationConfig {
            max_generations: Some(4),
            ..config()
        })
        .unwrap();
        c.load_pattern(Pattern::glider()).unwrap();
        c.start();
        for _ in 0..4 {
            c.step();
        }
        assert_eq!(c.state(), RunState::Paused);

        c.start();
        assert_eq!(c.state(), RunState::Paused);
        assert_eq!(c.update_at(Instant::now()), None);
        assert_eq!(c.engine().generation(), Generation(4));

        c.reset();
        c.start();
        assert_eq!(c.state(), RunState::Running);
        assert!(c.update_at(Instant::now()).is_some());
    }

    // ── Reset and patterns ────────────────────────────────────────

    #[test]
    fn reset_reapplies_initial_pattern() {
        let mut c = controller_with(Pattern::glider());
        c.start();
        for _ in 0..7 {
            c.step();
        }
        c.set_cell_alive(100, 100);
        c.reset();
        assert_eq!(c.state(), RunState::Stopped);
        assert_eq!(c.engine().generation(), Generation::ZERO);
        let mut cells = c.living_cells();
        cells.sort();
        assert_eq!(cells, Pattern::glider().cells());
        assert!(!c.is_stable());
    }

    #[test]
    fn reset_without_pattern_empties_board() {
        let mut c = Controller::new(config()).unwrap();
        c.set_cell_alive(1, 1);
        c.step();
        c.reset();
        assert_eq!(c.living_cell_count(), 0);
        assert_eq!(c.stats().generation, Generation::ZERO);
    }

    #[test]
    fn load_pattern_rejects_out_of_bounds_atomically() {
        let mut c = Controller::new(SimulationConfig {
            boundary: BoundaryPolicy::clip(20, 20).unwrap(),
            ..config()
        })
        .unwrap();
        c.load_pattern(Pattern::block()).unwrap();
        let err = c.load_pattern(Pattern::gosper_gun()).unwrap_err();
        assert!(matches!(err, PatternError::OutOfBounds { .. }));
        assert_eq!(c.living_cell_count(), 4);
        c.reset();
        assert_eq!(c.living_cell_count(), 4);
    }

    #[test]
    fn reconfigure_checks_initial_pattern() {
        let mut c = controller_with(Pattern::gosper_gun());
        let small = SimulationConfig {
            boundary: BoundaryPolicy::clip(10, 10).unwrap(),
            ..config()
        };
        assert!(matches!(
            c.reconfigure(small),
            Err(ConfigError::InitialPattern(_))
        ));
        assert_eq!(c.config().boundary, BoundaryPolicy::Unbounded);

        let torus = SimulationConfig {
            boundary: BoundaryPolicy::wrap(64, 64).unwrap(),
            ..config()
        };
        c.reconfigure(torus).unwrap();
        assert_eq!(c.engine().policy(), BoundaryPolicy::wrap(64, 64).unwrap());
        assert_eq!(c.living_cell_count(), Pattern::gosper_gun().len());
    }

    // ── Queries ───────────────────────────────────────────────────

    #[test]
    fn manual_edits_and_queries() {
        let mut c = Controller::new(config()).unwrap();
        assert!(c.set_cell_alive(2, 3));
        assert!(!c.set_cell_alive(2, 3));
        assert!(c.is_cell_alive(2, 3));
        assert_eq!(c.cells_in_region(Position::new(0, 0), Position::new(5, 5)).len(), 1);
        assert!(c.set_cell_dead(2, 3));
        assert!(!c.set_cell_dead(2, 3));
        assert_eq!(c.living_cell_count(), 0);
    }

    #[test]
    fn stats_reflect_last_step() {
        let mut c = controller_with(Pattern::blinker());
        c.step();
        let stats = c.stats();
        assert_eq!(stats.generation, Generation(1));
        assert_eq!(stats.living_cells, 3);
        assert_eq!(stats.births, 2);
        assert_eq!(stats.deaths, 2);
        assert_eq!(stats.state, RunState::Stopped);
        assert_eq!(stats.target_gps, 10.0);
        assert_eq!(stats.period, None);
    }

    // ── Callbacks ─────────────────────────────────────────────────

    #[test]
    fn on_step_sees_every_generation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut c = controller_with(Pattern::glider());
        c.on_step(move |stats| sink.lock().unwrap().push(stats.generation.0));
        for _ in 0..4 {
            c.step();
        }
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn on_step_sees_auto_pause() {
        let states = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&states);
        let mut c = auto_pausing(Pattern::block());
        c.on_step(move |stats| sink.lock().unwrap().push(stats.state));
        c.start();
        for _ in 0..3 {
            c.step();
        }
        assert_eq!(
            *states.lock().unwrap(),
            vec![RunState::Running, RunState::Running, RunState::Paused]
        );
    }

    #[test]
    fn periodicity_reported_once() {
        let found = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&found);
        let mut c = Controller::new(SimulationConfig {
            period_detection: true,
            ..config()
        })
        .unwrap();
        c.load_pattern(Pattern::beacon()).unwrap();
        c.on_periodicity(move |p| sink.lock().unwrap().push(p.period));
        for _ in 0..80 {
            c.step();
        }
        assert_eq!(*found.lock().unwrap(), vec![2]);
        assert_eq!(c.stats().period.map(|p| p.period), Some(2));
        assert_eq!(c.reported_periods(), &[2]);
    }

    #[test]
    fn period_detection_off_by_default() {
        let mut c = controller_with(Pattern::block());
        for _ in 0..40 {
            c.step();
        }
        assert!(c.reported_periods().is_empty());
    }

    #[test]
    fn disabling_period_detection_forgets_periods() {
        let mut c = Controller::new(SimulationConfig {
            period_detection: true,
            ..config()
        })
        .unwrap();
        c.load_pattern(Pattern::beacon()).unwrap();
        for _ in 0..80 {
            c.step();
        }
        assert_eq!(c.reported_periods(), &[2]);

        c.set_period_detection(false);
        assert!(!c.config().period_detection);
        assert!(c.reported_periods().is_empty());
        assert_eq!(c.stats().period, None);
        for _ in 0..80 {
            c.step();
        }
        assert!(c.reported_periods().is_empty());

        c.set_period_detection(true);
        for _ in 0..80 {
            c.step();
        }
        assert_eq!(c.reported_periods(), &[2]);
    }

    #[test]
    fn state_change_fires_on_transitions() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut c = auto_pausing(Pattern::block());
        c.on_state_change(move |stats| sink.lock().unwrap().push(stats.state));
        c.pause();
        c.start();
        c.start();
        for _ in 0..3 {
            c.step();
        }
        c.stop();
        c.stop();
        c.reset();
        c.clear_grid();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                RunState::Running,
                RunState::Paused,
                RunState::Stopped,
                RunState::Stopped,
                RunState::Stopped,
            ]
        );
    }

    // ── Clearing ──────────────────────────────────────────────────

    #[test]
    fn clear_grid_keeps_generation_and_state() {
        let mut c = controller_with(Pattern::block());
        c.start();
        for _ in 0..3 {
            c.step();
        }
        assert!(c.is_stable());
        c.clear_grid();
        assert_eq!(c.living_cell_count(), 0);
        assert_eq!(c.engine().generation(), Generation(3));
        assert_eq!(c.state(), RunState::Running);
        assert!(!c.is_stable());
        assert_eq!(c.stats().births, 0);

        c.reset();
        assert_eq!(c.living_cell_count(), 4);
    }

    // ── Headless runs ─────────────────────────────────────────────

    #[test]
    fn batch_run_stops_at_limit() {
        let mut c = controller_with(Pattern::glider());
        let stats = c.run_batch(Some(12));
        assert_eq!(stats.generation, Generation(12));
        assert_eq!(stats.living_cells, 5);
        assert_eq!(stats.state, RunState::Paused);
    }

    #[test]
    fn batch_override_exceeds_configured_limit() {
        let mut c = Controller::new(SimulationConfig {
            max_generations: Some(10),
            ..config()
        })
        .unwrap();
        c.load_pattern(Pattern::glider()).unwrap();
        let stats = c.run_batch(Some(20));
        assert_eq!(stats.generation, Generation(20));
        assert_eq!(stats.state, RunState::Paused);

        // The configured limit applies again once the run is over.
        c.start();
        assert_eq!(c.state(), RunState::Paused);
    }

    #[test]
    fn batch_run_stops_on_extinction() {
        let mut c = Controller::new(config()).unwrap();
        c.set_cell_alive(0, 0);
        let stats = c.run_batch(Some(100));
        assert_eq!(stats.generation, Generation(1));
        assert_eq!(stats.living_cells, 0);
    }

    #[test]
    fn batch_run_stops_on_stability() {
        let mut c = auto_pausing(Pattern::block());
        let stats = c.run_batch(None);
        assert!(stats.is_stable);
        assert_eq!(stats.generation, Generation(3));
    }

    #[test]
    fn headless_run_is_paced() {
        let mut c = Controller::new(SimulationConfig {
            generations_per_second: 200.0,
            ..config()
        })
        .unwrap();
        c.load_pattern(Pattern::glider()).unwrap();
        let start = Instant::now();
        let stats = c.run_headless(Some(5));
        assert_eq!(stats.generation, Generation(5));
        // First step is immediate, the next four wait 5ms each.
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
