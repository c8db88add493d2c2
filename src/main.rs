// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! STIRAP pulse game CLI
//!
//! Shoots the lasers from the command line: pulse samples in, level
//! populations and a score out.
//!
//! # Usage
//!
//! ```bash
//! # Shoot with explicit samples
//! stirap shoot --pump 0,0.67,0.07,0.54,0.89,1,1,1,1,0 --stokes 0,0.8,1,1,1,1,0.84,0.47,0.77,0
//!
//! # Seed both pulses from presets and print a JSON report
//! stirap shoot --pump-preset sine --stokes-preset gaussian --json
//!
//! # Score a file of shots through one session
//! stirap batch shots.yaml
//!
//! # Show effective configuration
//! stirap config
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stirap_sim::{
    config::{Config, LoggingConfig},
    pulse::{Preset, SampleArray},
    scoring::ScoreSession,
    shot::{ShotBatch, ShotOutcome},
    Result, Simulator, VERSION,
};

/// STIRAP pulse game simulator
#[derive(Parser)]
#[command(name = "stirap")]
#[command(author = "STIRAP Game Contributors")]
#[command(version = VERSION)]
#[command(about = "Three-level STIRAP population transfer from hand-drawn pulses")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one shot and print its score
    Shoot {
        /// Pump samples, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        pump: Option<Vec<f64>>,

        /// Stokes samples, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        stokes: Option<Vec<f64>>,

        /// Seed the pump from a preset instead of explicit samples
        #[arg(long, value_enum, conflicts_with = "pump")]
        pump_preset: Option<PresetArg>,

        /// Seed the Stokes pulse from a preset instead of explicit samples
        #[arg(long, value_enum, conflicts_with = "stokes")]
        stokes_preset: Option<PresetArg>,

        /// Print a JSON report instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Score every shot in a YAML file through one session
    Batch {
        /// Batch file (a `shots:` list of pump/stokes pairs)
        file: PathBuf,

        /// Print JSON reports
        #[arg(long)]
        json: bool,
    },

    /// Print the seed array of a preset
    Preset {
        #[arg(value_enum)]
        preset: PresetArg,

        /// Number of samples (defaults to the configured count)
        #[arg(short = 'n', long)]
        samples: Option<usize>,
    },

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    FreeHand,
    Sine,
    Cosine,
    Gaussian,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::FreeHand => Preset::FreeHand,
            PresetArg::Sine => Preset::Sine,
            PresetArg::Cosine => Preset::Cosine,
            PresetArg::Gaussian => Preset::Gaussian,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // Initialize logging
    init_logging(&config.logging);

    match cli.command {
        Commands::Shoot {
            pump,
            stokes,
            pump_preset,
            stokes_preset,
            json,
        } => {
            let n = config.shot.num_samples;
            let pump = resolve_samples(pump, pump_preset, n)?;
            let stokes = resolve_samples(stokes, stokes_preset, n)?;
            let simulator = Simulator::new(config)?;

            info!(version = VERSION, "Shooting the lasers");
            let outcome = simulator.shoot(&pump, &stokes)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.report())?);
            } else {
                print_outcome(&outcome);
            }
        }

        Commands::Batch { file, json } => {
            let batch = ShotBatch::load(&file)?;
            let simulator = Simulator::new(config)?;
            let mut session = ScoreSession::new();
            let reports = simulator.run_batch(&batch, &mut session)?;

            if json {
                let body = serde_json::json!({
                    "shots": reports,
                    "high_score": session.high_score(),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                for (request, report) in batch.shots.iter().zip(&reports) {
                    println!(
                        "{:<24} score {:>3}  fidelity {:.4}",
                        request.name.as_deref().unwrap_or("-"),
                        report.score,
                        report.fidelity
                    );
                }
                println!("High score: {}", session.finish());
            }
        }

        Commands::Preset { preset, samples } => {
            let n = samples.unwrap_or(config.shot.num_samples);
            match Preset::from(preset).seed(n) {
                Some(values) => println!("{}", format_samples(&values)),
                None => println!("{}", format_samples(SampleArray::zeros(n).as_slice())),
            }
        }

        Commands::Config => {
            // Show effective configuration
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => {
            // Validate configuration
            match config.validate() {
                Ok(()) => {
                    println!("Configuration is valid");
                }
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Explicit samples win; otherwise a preset seed; otherwise all zeros.
fn resolve_samples(
    explicit: Option<Vec<f64>>,
    preset: Option<PresetArg>,
    n: usize,
) -> Result<Vec<f64>> {
    if let Some(values) = explicit {
        return Ok(values);
    }
    let base = SampleArray::zeros(n);
    match preset {
        Some(p) => Ok(Preset::from(p).apply(&base)?.into_vec()),
        None => Ok(base.into_vec()),
    }
}

fn format_samples(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{:.2}", v))
        .collect::<Vec<_>>()
        .join(",")
}

fn print_outcome(outcome: &ShotOutcome) {
    let finals = outcome.final_populations();
    let peaks = outcome.peak_populations();
    println!("Score: {}", outcome.score);
    println!("Target fidelity: {:.4}", outcome.fidelity);
    println!("Level   final    peak");
    for (level, (f, p)) in finals.iter().zip(&peaks).enumerate() {
        println!("{:>5}  {:>6.2}%  {:>6.2}%", level + 1, 100.0 * f, 100.0 * p);
    }
}

/// Initialize logging with tracing.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // Logs go to stderr so stdout carries only results
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
