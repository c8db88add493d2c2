// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! One shot of the lasers: samples in, populations and a score out.
//!
//! ```text
//! pump, stokes samples ─► smooth ─► Lambda Hamiltonian ─► evolve ─► score
//! ```
//!
//! Every shot owns its own pulses, Hamiltonian and trajectory, so a
//! [`Simulator`] can be shared between threads.

use std::path::Path;
use std::sync::Arc;

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::dynamics::{
    evolve, evolve_density, projectors, state_fidelity, CollapseOperator, Representation,
    Trajectory,
};
use crate::error::{Result, ShapeError};
use crate::hamiltonian::{basis_state, lambda_hamiltonian, lambda_target, LAMBDA_DIM};
use crate::pulse::{smooth_with_points, SampleArray, SmoothedPulse};
use crate::scoring;
use crate::validation::{validate_length, validate_square};

/// Everything produced by one shot.
#[derive(Debug, Clone)]
pub struct ShotOutcome {
    /// Smoothed pump envelope (for preview plotting).
    pub pump: SmoothedPulse,
    /// Smoothed Stokes envelope.
    pub stokes: SmoothedPulse,
    /// Level populations over the dense grid.
    pub trajectory: Trajectory,
    /// Integer score in `[0, 100]`.
    pub score: u32,
    /// Phase-rotated level-3 reference state.
    pub target: Array1<Complex64>,
    /// Overlap of the final state with `target`.
    pub fidelity: f64,
}

impl ShotOutcome {
    /// Population series of one level (zero-based).
    pub fn populations(&self, level: usize) -> Option<&[f64]> {
        self.trajectory.expect.get(level).map(Vec::as_slice)
    }

    /// Populations at the final time.
    pub fn final_populations(&self) -> Vec<f64> {
        self.trajectory
            .expect
            .iter()
            .map(|series| series.last().copied().unwrap_or(f64::NAN))
            .collect()
    }

    /// Largest population reached by each level.
    pub fn peak_populations(&self) -> Vec<f64> {
        self.trajectory
            .expect
            .iter()
            .map(|series| series.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .collect()
    }

    /// Serializable summary.
    pub fn report(&self) -> ShotReport {
        ShotReport {
            score: self.score,
            fidelity: self.fidelity,
            final_populations: self.final_populations(),
            peak_populations: self.peak_populations(),
            pump_peak: self.pump.peak(),
            stokes_peak: self.stokes.peak(),
            accepted_steps: self.trajectory.accepted_steps,
            rejected_steps: self.trajectory.rejected_steps,
        }
    }
}

/// Compact, serializable result of a shot.
#[derive(Debug, Clone, Serialize)]
pub struct ShotReport {
    pub score: u32,
    pub fidelity: f64,
    pub final_populations: Vec<f64>,
    pub peak_populations: Vec<f64>,
    pub pump_peak: f64,
    pub stokes_peak: f64,
    pub accepted_steps: usize,
    pub rejected_steps: usize,
}

/// One named shot in a batch file.
#[derive(Debug, Clone, Deserialize)]
pub struct ShotRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub pump: Vec<f64>,
    pub stokes: Vec<f64>,
}

/// A list of shots scored through one session.
///
/// ```yaml
/// shots:
///   - name: counter-intuitive
///     pump:   [0, 0.67, 0.07, 0.54, 0.89, 1, 1, 1, 1, 0]
///     stokes: [0, 0.8, 1, 1, 1, 1, 0.84, 0.47, 0.77, 0]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShotBatch {
    #[serde(default)]
    pub shots: Vec<ShotRequest>,
}

impl ShotBatch {
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read a batch from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

/// Runs shots with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: Config,
    collapse_ops: Vec<CollapseOperator>,
}

impl Simulator {
    /// Create a simulator; fails if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            collapse_ops: Vec::new(),
        })
    }

    /// Add dissipation channels (used by the density-matrix representation).
    pub fn with_collapse_operators(mut self, ops: Vec<CollapseOperator>) -> Result<Self> {
        for op in &ops {
            validate_square(&op.label, &op.matrix, LAMBDA_DIM)?;
        }
        self.collapse_ops = ops;
        Ok(self)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shoot the lasers with the given pump and Stokes samples.
    #[instrument(skip_all, fields(samples = pump.len()))]
    pub fn shoot(&self, pump: &[f64], stokes: &[f64]) -> Result<ShotOutcome> {
        let shot = &self.config.shot;
        validate_length("pump", pump, shot.num_samples)?;
        validate_length("stokes", stokes, shot.num_samples)?;

        let mut pump = SampleArray::new(pump.to_vec())?;
        let mut stokes = SampleArray::new(stokes.to_vec())?;
        if shot.pin_endpoints {
            pump.pin_endpoints();
            stokes.pin_endpoints();
        }

        let pump_pulse = smooth_with_points(pump.as_slice(), shot.duration, shot.smooth_points)?;
        let stokes_pulse =
            smooth_with_points(stokes.as_slice(), shot.duration, shot.smooth_points)?;
        if pump_pulse.times() != stokes_pulse.times() {
            return Err(ShapeError::Field {
                field: "stokes".into(),
                message: "smoothed pulse grid differs from the pump grid".into(),
            }
            .into());
        }

        let hamiltonian = lambda_hamiltonian(
            Arc::new(pump_pulse.clone()),
            Arc::new(stokes_pulse.clone()),
            &self.config.physics,
        )?;
        let times = pump_pulse.times();
        let observables = projectors(LAMBDA_DIM);
        let psi0 = basis_state(LAMBDA_DIM, 0)?;

        let solver = &self.config.solver;
        let trajectory = match solver.representation {
            Representation::Ket => evolve(&hamiltonian, &psi0, times, &observables, solver)?,
            Representation::DensityMatrix => {
                let rho0 = Array2::from_shape_fn((LAMBDA_DIM, LAMBDA_DIM), |(i, j)| {
                    psi0[i] * psi0[j].conj()
                });
                evolve_density(
                    &hamiltonian,
                    &rho0,
                    times,
                    &observables,
                    &self.collapse_ops,
                    solver,
                )?
            }
        };
        debug!(
            accepted = trajectory.accepted_steps,
            rejected = trajectory.rejected_steps,
            "Evolution finished"
        );

        let score = scoring::score(&trajectory, shot.target_level)?;
        let target = lambda_target(
            self.config.physics.e2,
            self.config.physics.omega_s,
            shot.duration,
        );
        let fidelity = state_fidelity(&trajectory.final_state, &target);

        info!(score, fidelity, "Shot complete");

        Ok(ShotOutcome {
            pump: pump_pulse,
            stokes: stokes_pulse,
            trajectory,
            score,
            target,
            fidelity,
        })
    }

    /// Shoot and record the score in `session`.
    pub fn shoot_scored(
        &self,
        pump: &[f64],
        stokes: &[f64],
        session: &mut scoring::ScoreSession,
    ) -> Result<ShotOutcome> {
        let outcome = self.shoot(pump, stokes)?;
        session.record(outcome.score);
        Ok(outcome)
    }

    /// Run every shot of `batch` in order, recording each score in `session`.
    ///
    /// Stops at the first failing shot.
    pub fn run_batch(
        &self,
        batch: &ShotBatch,
        session: &mut scoring::ScoreSession,
    ) -> Result<Vec<ShotReport>> {
        let mut reports = Vec::with_capacity(batch.shots.len());
        for (index, request) in batch.shots.iter().enumerate() {
            let name = request.name.as_deref().unwrap_or("");
            debug!(index, name, "Running batch shot");
            let outcome = self.shoot_scored(&request.pump, &request.stokes, session)?;
            reports.push(outcome.report());
        }
        info!(
            shots = reports.len(),
            high_score = session.high_score(),
            "Batch complete"
        );
        Ok(reports)
    }
}
