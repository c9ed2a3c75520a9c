//! Headless runner: build a simulation from flags, run it to completion
//! and print the final statistics as JSON.

mod cli;

use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use sparse_life::prelude::*;
use tracing::{debug, info, warn};

use crate::cli::{Args, CliError, RunPlan};

/// Generations between progress log lines.
const PROGRESS_EVERY: u64 = 100;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let RunPlan { config, pattern } = args.plan()?;
    info!(
        pattern = pattern.name(),
        cells = pattern.len(),
        boundary = ?config.boundary,
        gps = config.generations_per_second,
        "starting"
    );

    let stats = if args.threaded {
        run_threaded(config, pattern)?
    } else {
        run_inline(config, pattern, !args.unpaced)?
    };

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn log_progress(stats: &SimulationStats) {
    if stats.generation.0 % PROGRESS_EVERY == 0 {
        debug!(
            generation = stats.generation.0,
            living = stats.living_cells,
            avg_step_us = stats.average_step_us,
            "progress"
        );
    }
}

fn run_inline(
    config: SimulationConfig,
    pattern: Pattern,
    paced: bool,
) -> Result<SimulationStats, CliError> {
    let mut controller = Controller::new(config)?;
    controller.load_pattern(pattern)?;
    controller.on_step(log_progress);
    Ok(if paced {
        controller.run_headless(None)
    } else {
        controller.run_batch(None)
    })
}

/// Start the background worker and poll until it parks, the board
/// empties or the worker dies.
fn run_threaded(config: SimulationConfig, pattern: Pattern) -> Result<SimulationStats, CliError> {
    let poll = Duration::from_secs_f64((1.0 / config.generations_per_second).min(0.1));
    let mut controller = ThreadedController::new(config)?;
    controller.load_pattern(pattern)?;
    controller.on_step(log_progress);
    controller.start()?;

    loop {
        thread::sleep(poll);
        if !controller.has_worker() {
            warn!("step worker exited, ending run");
            break;
        }
        let stats = controller.stats();
        if stats.state != RunState::Running || stats.living_cells == 0 {
            break;
        }
    }
    controller.stop();
    let stats = controller.stats();
    info!(
        generation = stats.generation.0,
        living = stats.living_cells,
        stable = stats.is_stable,
        "run finished"
    );
    Ok(stats)
}
