//! Command-line arguments and their translation into a run plan.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use sparse_life::prelude::*;
use thiserror::Error;

/// Errors that end a headless run before or during setup.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("reading {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error("writing stats: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BoundaryKind {
    /// Cells past the edge are permanently dead.
    Clip,
    /// Edges join to form a torus.
    Wrap,
    /// No edges.
    Unbounded,
}

#[derive(Parser, Debug)]
#[command(name = "sparse-life-headless")]
#[command(about = "Run a sparse Game of Life simulation without a display and print the final stats")]
pub struct Args {
    /// JSON simulation config; flags below override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Built-in pattern to start from
    #[arg(long, short = 'p', default_value = "r-pentomino")]
    pub pattern: String,

    /// Start from a seeded random soup covering the grid instead
    #[arg(long, conflicts_with = "pattern")]
    pub soup: bool,

    /// Soup density in [0, 1]
    #[arg(long, default_value_t = 0.3)]
    pub density: f64,

    /// Soup seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Grid width (soup width when unbounded)
    #[arg(long)]
    pub width: Option<u32>,

    /// Grid height (soup height when unbounded)
    #[arg(long)]
    pub height: Option<u32>,

    /// Edge handling
    #[arg(long, value_enum)]
    pub boundary: Option<BoundaryKind>,

    /// Stop after this many generations
    #[arg(long, short = 'g')]
    pub generations: Option<u64>,

    /// Target generations per second
    #[arg(long)]
    pub rate: Option<f64>,

    /// Population samples that must agree before the run counts as stable
    #[arg(long)]
    pub window: Option<usize>,

    /// Keep running after the population stabilizes
    #[arg(long)]
    pub no_auto_pause: bool,

    /// Report population periods as they are found
    #[arg(long)]
    pub detect_periods: bool,

    /// Step back to back instead of at the target rate
    #[arg(long, conflicts_with = "threaded")]
    pub unpaced: bool,

    /// Step on a background thread
    #[arg(long)]
    pub threaded: bool,
}

/// Everything needed to start a run.
#[derive(Debug)]
pub struct RunPlan {
    pub config: SimulationConfig,
    pub pattern: Pattern,
}

impl Args {
    /// Resolve the config and starting pattern.
    pub fn plan(&self) -> Result<RunPlan, CliError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SimulationConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;

        let pattern = if self.soup {
            let (w, h) = config
                .boundary
                .extent()
                .unwrap_or((self.width.unwrap_or(100), self.height.unwrap_or(100)));
            Pattern::random_soup(w, h, self.density, self.seed)?
        } else {
            centred(Pattern::by_name(&self.pattern)?, config.boundary)
        };
        Ok(RunPlan { config, pattern })
    }

    fn apply_overrides(&self, config: &mut SimulationConfig) {
        let (w, h) = config.boundary.extent().unwrap_or((100, 100));
        let (w, h) = (self.width.unwrap_or(w), self.height.unwrap_or(h));
        let kind = self.boundary.unwrap_or(match config.boundary {
            BoundaryPolicy::Clip { .. } => BoundaryKind::Clip,
            BoundaryPolicy::Wrap { .. } => BoundaryKind::Wrap,
            BoundaryPolicy::Unbounded => BoundaryKind::Unbounded,
        });
        config.boundary = match kind {
            BoundaryKind::Clip => BoundaryPolicy::Clip {
                width: w,
                height: h,
            },
            BoundaryKind::Wrap => BoundaryPolicy::Wrap {
                width: w,
                height: h,
            },
            BoundaryKind::Unbounded => BoundaryPolicy::Unbounded,
        };
        if let Some(rate) = self.rate {
            config.generations_per_second = rate;
        }
        if let Some(window) = self.window {
            config.stability_window = window;
        }
        if self.no_auto_pause {
            config.auto_pause_on_stable = false;
        }
        if self.detect_periods {
            config.period_detection = true;
        }
        if self.generations.is_some() {
            config.max_generations = self.generations;
        }
    }
}

fn load_config(path: &Path) -> Result<SimulationConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })
}

/// Move `pattern` to the middle of a bounded grid. Unbounded and
/// oversized patterns are left where they are.
fn centred(pattern: Pattern, boundary: BoundaryPolicy) -> Pattern {
    let (Some((w, h)), Some((min, max))) = (boundary.extent(), pattern.bounding_box()) else {
        return pattern;
    };
    let span_x = i64::from(max.x) - i64::from(min.x) + 1;
    let span_y = i64::from(max.y) - i64::from(min.y) + 1;
    if span_x > i64::from(w) || span_y > i64::from(h) {
        return pattern;
    }
    let dx = (i64::from(w) - span_x) / 2 - i64::from(min.x);
    let dy = (i64::from(h) - span_y) / 2 - i64::from(min.y);
    pattern.offset(dx as i32, dy as i32)
}
