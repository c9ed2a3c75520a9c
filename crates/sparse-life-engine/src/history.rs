//! Rolling windows the controller derives its statistics from.
//!
//! All of these are bounded ring buffers over recent generations. None
//! of them is authoritative: they are rebuilt from scratch after a reset.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use sparse_life_core::Generation;

// ── PopulationHistory ──────────────────────────────────────────────

/// The last `W` live-cell counts, used for the stability heuristic.
#[derive(Clone, Debug)]
pub struct PopulationHistory {
    /// Ring buffer of population counts.
    window: Vec<usize>,
    /// Current write position in the ring buffer.
    pos: usize,
    /// Number of valid samples (saturates at `window.len()`).
    filled: usize,
}

impl PopulationHistory {
    /// A history holding up to `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            window: vec![0; capacity.max(1)],
            pos: 0,
            filled: 0,
        }
    }

    /// Record the population after a step.
    pub fn push(&mut self, population: usize) {
        self.window[self.pos] = population;
        self.pos = (self.pos + 1) % self.window.len();
        self.filled = (self.filled + 1).min(self.window.len());
    }

    /// Whether the window is full and every sample is equal.
    ///
    /// This is a population heuristic: two different boards with the same
    /// population look identical to it, and an oscillator whose population
    /// does not change (a blinker) reads as stable.
    pub fn is_stable(&self) -> bool {
        self.filled == self.window.len() && self.window.iter().all(|&n| n == self.window[0])
    }

    /// Number of samples recorded, up to the capacity.
    pub fn len(&self) -> usize {
        self.filled
    }

    /// Whether no sample has been recorded.
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Window size.
    pub fn capacity(&self) -> usize {
        self.window.len()
    }

    /// Forget every sample.
    pub fn clear(&mut self) {
        self.pos = 0;
        self.filled = 0;
    }
}

// ── Periodicity ────────────────────────────────────────────────────

/// An oscillation detected in the population sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Periodicity {
    /// Period in generations. 1 means the population is constant.
    pub period: usize,
    /// Generation at which the period was first observed.
    pub detected_at: Generation,
}

impl Periodicity {
    /// Human-readable name of the period.
    pub fn label(&self) -> String {
        match self.period {
            1 => "still life".to_string(),
            n => format!("period-{n} oscillator"),
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at generation {}", self.label(), self.detected_at)
    }
}

// ── PeriodDetector ─────────────────────────────────────────────────

/// Detects repeating population sequences.
///
/// Keeps the last [`HISTORY`](Self::HISTORY) populations. Once more than
/// [`MIN_SAMPLES`](Self::MIN_SAMPLES) are recorded, each period `p` from 1
/// to [`MAX_PERIOD`](Self::MAX_PERIOD) (and below half the history) is
/// tried in order: the latest `min(3p, len - p)` samples must equal the
/// samples `p` generations earlier. The shortest matching period wins,
/// and each distinct period is reported once until [`clear`](Self::clear).
#[derive(Clone, Debug, Default)]
pub struct PeriodDetector {
    history: VecDeque<usize>,
    reported: Vec<usize>,
    current: Option<Periodicity>,
}

impl PeriodDetector {
    /// Populations retained.
    pub const HISTORY: usize = 200;
    /// Samples required before detection starts (exclusive).
    pub const MIN_SAMPLES: usize = 20;
    /// Longest period tried.
    pub const MAX_PERIOD: usize = 50;

    /// An empty detector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the population reached at `generation`.
    ///
    /// Returns the periodicity if this sample revealed a period that has
    /// not been reported before.
    pub fn push(&mut self, population: usize, generation: Generation) -> Option<Periodicity> {
        if self.history.len() == Self::HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(population);

        let Some(period) = self.detect() else {
            self.current = None;
            return None;
        };
        if self.current.map(|c| c.period) != Some(period) {
            self.current = Some(Periodicity {
                period,
                detected_at: generation,
            });
        }
        if self.reported.contains(&period) {
            return None;
        }
        self.reported.push(period);
        self.current
    }

    /// The shortest period matching the current history, if any.
    pub fn detect(&self) -> Option<usize> {
        let len = self.history.len();
        if len <= Self::MIN_SAMPLES {
            return None;
        }
        (1..=Self::MAX_PERIOD)
            .take_while(|&period| period < len / 2)
            .find(|&period| {
                let check = (period * 3).min(len - period);
                (0..check).all(|i| self.history[len - 1 - i] == self.history[len - 1 - i - period])
            })
    }

    /// The period currently matched, with the generation it started at.
    pub fn current(&self) -> Option<Periodicity> {
        self.current
    }

    /// Every distinct period reported since the last clear, in order.
    pub fn reported(&self) -> &[usize] {
        &self.reported
    }

    /// Forget the history and the reported periods.
    pub fn clear(&mut self) {
        self.history.clear();
        self.reported.clear();
        self.current = None;
    }
}

// ── StepTimes ──────────────────────────────────────────────────────

const STEP_TIME_SAMPLES: usize = 60;

/// Ring of the last [`StepTimes::CAPACITY`] step durations in microseconds.
#[derive(Clone, Debug)]
pub struct StepTimes {
    samples: [u64; STEP_TIME_SAMPLES],
    pos: usize,
    filled: usize,
}

impl Default for StepTimes {
    fn default() -> Self {
        Self {
            samples: [0; STEP_TIME_SAMPLES],
            pos: 0,
            filled: 0,
        }
    }
}

impl StepTimes {
    /// Number of step durations retained.
    pub const CAPACITY: usize = STEP_TIME_SAMPLES;

    /// Record one step duration.
    pub fn push(&mut self, micros: u64) {
        self.samples[self.pos] = micros;
        self.pos = (self.pos + 1) % Self::CAPACITY;
        self.filled = (self.filled + 1).min(Self::CAPACITY);
    }

    /// Most recent duration, or 0 before the first step.
    pub fn last(&self) -> u64 {
        if self.filled == 0 {
            return 0;
        }
        self.samples[(self.pos + Self::CAPACITY - 1) % Self::CAPACITY]
    }

    /// Mean over the retained durations, or 0 before the first step.
    pub fn average(&self) -> f64 {
        if self.filled == 0 {
            return 0.0;
        }
        let sum: u64 = if self.filled == Self::CAPACITY {
            self.samples.iter().sum()
        } else {
            self.samples[..self.filled].iter().sum()
        };
        sum as f64 / self.filled as f64
    }

    /// Forget every sample.
    pub fn clear(&mut self) {
        self.pos = 0;
        self.filled = 0;
    }
}

// ── RateMeter ──────────────────────────────────────────────────────

/// Measured stepping rate over the last [`RateMeter::WINDOW`] steps.
#[derive(Clone, Debug, Default)]
pub struct RateMeter {
    stamps: VecDeque<Instant>,
}

impl RateMeter {
    /// Step timestamps retained.
    pub const WINDOW: usize = 60;

    /// Record a step taken at `now`.
    pub fn record(&mut self, now: Instant) {
        if self.stamps.len() == Self::WINDOW {
            self.stamps.pop_front();
        }
        self.stamps.push_back(now);
    }

    /// Steps per second across the window, or 0 with fewer than two steps.
    pub fn rate(&self) -> f64 {
        let (Some(first), Some(last)) = (self.stamps.front(), self.stamps.back()) else {
            return 0.0;
        };
        let span = last.saturating_duration_since(*first);
        if span == Duration::ZERO {
            return 0.0;
        }
        (self.stamps.len() - 1) as f64 / span.as_secs_f64()
    }

    /// Forget every timestamp.
    pub fn clear(&mut self) {
        self.stamps.clear();
    }
}
