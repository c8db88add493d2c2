// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Solver configuration, collapse operators, and trajectory types.
//!
//! Ref: Lindblad (1976), Commun. Math. Phys. 48, 119.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, ShapeError};

/// How the system state is represented during integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// State vector under the Schrödinger equation.
    #[default]
    Ket,
    /// Density matrix under the Liouville–von Neumann (Lindblad) equation.
    DensityMatrix,
}

/// Configuration for the adaptive integrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Relative error tolerance per step.
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    /// Absolute error tolerance per step.
    #[serde(default = "default_atol")]
    pub atol: f64,
    /// Maximum attempted steps between two consecutive output times.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Upper bound on the step size (unbounded if unset).
    #[serde(default)]
    pub max_step: Option<f64>,
    /// State representation.
    #[serde(default)]
    pub representation: Representation,
    /// Whether to keep the state at every output time.
    #[serde(default)]
    pub store_states: bool,
    /// Largest |H - H†| accepted when evaluating H(t).
    #[serde(default = "default_hermiticity_tolerance")]
    pub hermiticity_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            rtol: default_rtol(),
            atol: default_atol(),
            max_steps: default_max_steps(),
            max_step: None,
            representation: Representation::default(),
            store_states: false,
            hermiticity_tolerance: default_hermiticity_tolerance(),
        }
    }
}

impl SolverConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.rtol.is_finite() && self.rtol > 0.0) {
            return Err(Error::Config(format!("rtol must be > 0, got {}", self.rtol)));
        }
        if !(self.atol.is_finite() && self.atol > 0.0) {
            return Err(Error::Config(format!("atol must be > 0, got {}", self.atol)));
        }
        if self.max_steps == 0 {
            return Err(Error::Config("max_steps must be > 0".into()));
        }
        if let Some(h) = self.max_step {
            if !(h.is_finite() && h > 0.0) {
                return Err(Error::Config(format!("max_step must be > 0, got {}", h)));
            }
        }
        if !(self.hermiticity_tolerance.is_finite() && self.hermiticity_tolerance >= 0.0) {
            return Err(Error::Config(format!(
                "hermiticity_tolerance must be >= 0, got {}",
                self.hermiticity_tolerance
            )));
        }
        Ok(())
    }
}

fn default_rtol() -> f64 {
    1e-8
}

fn default_atol() -> f64 {
    1e-10
}

fn default_max_steps() -> usize {
    10_000
}

fn default_hermiticity_tolerance() -> f64 {
    1e-9
}

/// A Lindblad collapse (jump) operator with its rate.
///
///   D[L](ρ) = γ (L ρ L† − ½{L†L, ρ})
#[derive(Debug, Clone)]
pub struct CollapseOperator {
    /// Operator matrix (d × d).
    pub matrix: Array2<Complex64>,
    /// Decay rate in inverse time units.
    pub rate: f64,
    /// Human-readable label (e.g., "decay_2_to_1").
    pub label: String,
}

impl CollapseOperator {
    /// Spontaneous decay |to⟩⟨from| at `rate`.
    pub fn decay(dim: usize, from: usize, to: usize, rate: f64) -> Result<Self> {
        check_level(dim, from)?;
        check_level(dim, to)?;
        check_rate(rate)?;
        let mut matrix = Array2::zeros((dim, dim));
        matrix[[to, from]] = Complex64::new(1.0, 0.0);
        Ok(Self {
            matrix,
            rate,
            label: format!("decay_{}_to_{}", from + 1, to + 1),
        })
    }

    /// Pure dephasing of one level, L = |k⟩⟨k|.
    pub fn dephasing(dim: usize, level: usize, rate: f64) -> Result<Self> {
        check_level(dim, level)?;
        check_rate(rate)?;
        let mut matrix = Array2::zeros((dim, dim));
        matrix[[level, level]] = Complex64::new(1.0, 0.0);
        Ok(Self {
            matrix,
            rate,
            label: format!("dephasing_{}", level + 1),
        })
    }
}

fn check_level(dim: usize, level: usize) -> Result<()> {
    if level >= dim {
        return Err(ShapeError::Field {
            field: "level".into(),
            message: format!("level index {} out of range for dimension {}", level, dim),
        }
        .into());
    }
    Ok(())
}

fn check_rate(rate: f64) -> Result<()> {
    if !(rate.is_finite() && rate >= 0.0) {
        return Err(ShapeError::Field {
            field: "rate".into(),
            message: format!("must be finite and >= 0, got {}", rate),
        }
        .into());
    }
    Ok(())
}

/// Quantum state in either representation.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantumState {
    Ket(Array1<Complex64>),
    Density(Array2<Complex64>),
}

impl QuantumState {
    /// Hilbert space dimension.
    pub fn dim(&self) -> usize {
        match self {
            QuantumState::Ket(psi) => psi.len(),
            QuantumState::Density(rho) => rho.nrows(),
        }
    }

    /// ⟨ψ|ψ⟩ or Tr(ρ).
    pub fn norm(&self) -> f64 {
        match self {
            QuantumState::Ket(psi) => psi.iter().map(|a| a.norm_sqr()).sum(),
            QuantumState::Density(rho) => rho.diag().iter().map(|a| a.re).sum(),
        }
    }

    /// Diagonal populations.
    pub fn populations(&self) -> Vec<f64> {
        match self {
            QuantumState::Ket(psi) => psi.iter().map(|a| a.norm_sqr()).collect(),
            QuantumState::Density(rho) => rho.diag().iter().map(|a| a.re).collect(),
        }
    }
}

/// Output of one evolution.
#[derive(Debug, Clone)]
pub struct Trajectory {
    /// Output times.
    pub times: Vec<f64>,
    /// One expectation-value series per observable, each `times.len()` long.
    pub expect: Vec<Vec<f64>>,
    /// State at every output time (if `store_states` was set).
    pub states: Option<Vec<QuantumState>>,
    /// State at the last output time.
    pub final_state: QuantumState,
    /// Accepted integration steps.
    pub accepted_steps: usize,
    /// Rejected integration steps.
    pub rejected_steps: usize,
}

impl Trajectory {
    /// Value of observable `index` at the last output time.
    pub fn final_expectation(&self, index: usize) -> Option<f64> {
        self.expect.get(index).and_then(|series| series.last().copied())
    }
}
