// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for the simulator.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. stirap.yaml file
//! 3. Environment variables (STIRAP_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::dynamics::{Representation, SolverConfig};
use crate::error::{Error, Result};
use crate::hamiltonian::LambdaParameters;
use crate::pulse::MIN_SPLINE_POINTS;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Shot layout (samples, duration, dense grid)
    #[serde(default)]
    pub shot: ShotConfig,

    /// Level energies and carrier frequencies
    #[serde(default)]
    pub physics: LambdaParameters,

    /// Integrator settings
    #[serde(default)]
    pub solver: SolverConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            for path in &["stirap.yaml", "stirap.yml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("STIRAP_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("STIRAP_LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("STIRAP_NUM_SAMPLES") {
            if let Ok(n) = val.parse() {
                self.shot.num_samples = n;
            }
        }
        if let Ok(val) = env::var("STIRAP_DURATION") {
            if let Ok(d) = val.parse() {
                self.shot.duration = d;
            }
        }
        if let Ok(val) = env::var("STIRAP_SMOOTH_POINTS") {
            if let Ok(n) = val.parse() {
                self.shot.smooth_points = n;
            }
        }
        if let Ok(val) = env::var("STIRAP_SOLVER_RTOL") {
            if let Ok(tol) = val.parse() {
                self.solver.rtol = tol;
            }
        }
        if let Ok(val) = env::var("STIRAP_SOLVER_ATOL") {
            if let Ok(tol) = val.parse() {
                self.solver.atol = tol;
            }
        }
        if let Ok(val) = env::var("STIRAP_SOLVER_MAX_STEPS") {
            if let Ok(n) = val.parse() {
                self.solver.max_steps = n;
            }
        }
        if let Ok(val) = env::var("STIRAP_REPRESENTATION") {
            match val.to_lowercase().as_str() {
                "ket" => self.solver.representation = Representation::Ket,
                "density_matrix" | "density" => {
                    self.solver.representation = Representation::DensityMatrix
                }
                other => tracing::warn!(value = other, "Ignoring unknown STIRAP_REPRESENTATION"),
            }
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        self.shot.validate()?;
        self.physics.validate()?;
        self.solver.validate()?;
        Ok(())
    }
}

/// Layout of one shot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotConfig {
    /// Number of user-set samples per pulse
    #[serde(default = "default_num_samples")]
    pub num_samples: usize,

    /// Total evolution time; samples sit at integer times 0..=duration
    #[serde(default = "default_duration")]
    pub duration: f64,

    /// Length of each smoothed pulse and of the output time grid
    #[serde(default = "default_smooth_points")]
    pub smooth_points: usize,

    /// Force the first and last samples to zero before smoothing
    #[serde(default)]
    pub pin_endpoints: bool,

    /// Zero-based index of the scored level
    #[serde(default = "default_target_level")]
    pub target_level: usize,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            num_samples: default_num_samples(),
            duration: default_duration(),
            smooth_points: default_smooth_points(),
            pin_endpoints: false,
            target_level: default_target_level(),
        }
    }
}

impl ShotConfig {
    /// Validate the shot layout.
    pub fn validate(&self) -> Result<()> {
        if self.num_samples < MIN_SPLINE_POINTS {
            return Err(Error::Config(format!(
                "num_samples must be at least {}, got {}",
                MIN_SPLINE_POINTS, self.num_samples
            )));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 || self.duration.fract() != 0.0 {
            return Err(Error::Config(format!(
                "duration must be a positive integer, got {}",
                self.duration
            )));
        }
        if self.duration as usize != self.num_samples - 1 {
            return Err(Error::Config(format!(
                "duration {} must equal num_samples - 1 ({})",
                self.duration,
                self.num_samples - 1
            )));
        }
        if self.smooth_points < 2 {
            return Err(Error::Config(format!(
                "smooth_points must be at least 2, got {}",
                self.smooth_points
            )));
        }
        if self.target_level >= crate::hamiltonian::LAMBDA_DIM {
            return Err(Error::Config(format!(
                "target_level must be < {}, got {}",
                crate::hamiltonian::LAMBDA_DIM,
                self.target_level
            )));
        }
        Ok(())
    }
}

fn default_num_samples() -> usize {
    10
}

fn default_duration() -> f64 {
    9.0
}

fn default_smooth_points() -> usize {
    500
}

fn default_target_level() -> usize {
    2
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}
