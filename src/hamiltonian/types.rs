// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Hamiltonian decomposition and physical parameters.

use std::fmt;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pulse::SharedDrive;
use crate::validation::validate_hermitian;

/// Level energies and carrier frequencies of the Lambda system, in the same
/// arbitrary energy units used for time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaParameters {
    /// Energy of level 1
    #[serde(default = "default_e1")]
    pub e1: f64,
    /// Energy of level 2 (the intermediate level)
    #[serde(default = "default_e2")]
    pub e2: f64,
    /// Energy of level 3
    #[serde(default = "default_e3")]
    pub e3: f64,
    /// Pump carrier frequency (1 ↔ 2)
    #[serde(default = "default_omega_p")]
    pub omega_p: f64,
    /// Stokes carrier frequency (2 ↔ 3)
    #[serde(default = "default_omega_s")]
    pub omega_s: f64,
}

impl Default for LambdaParameters {
    fn default() -> Self {
        Self {
            e1: default_e1(),
            e2: default_e2(),
            e3: default_e3(),
            omega_p: default_omega_p(),
            omega_s: default_omega_s(),
        }
    }
}

impl LambdaParameters {
    /// Pump detuning `E1 + Ωp − E2`.
    pub fn pump_detuning(&self) -> f64 {
        self.e1 + self.omega_p - self.e2
    }

    /// Stokes detuning `E3 + Ωs − E2`.
    pub fn stokes_detuning(&self) -> f64 {
        self.e3 + self.omega_s - self.e2
    }

    /// Reject non-finite parameters.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("e1", self.e1),
            ("e2", self.e2),
            ("e3", self.e3),
            ("omega_p", self.omega_p),
            ("omega_s", self.omega_s),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::Config(format!(
                    "physics.{} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

fn default_e1() -> f64 {
    0.0
}

fn default_e2() -> f64 {
    10.0
}

fn default_e3() -> f64 {
    5.0
}

fn default_omega_p() -> f64 {
    9.5
}

fn default_omega_s() -> f64 {
    4.5
}

/// A constant Hermitian operator weighted by a time-dependent drive.
#[derive(Clone)]
pub struct ControlTerm {
    /// Human-readable label (e.g., "pump_re").
    pub label: String,
    /// Coupling operator (d × d, Hermitian).
    pub operator: Array2<Complex64>,
    /// Real coefficient f(t).
    pub drive: SharedDrive,
}

impl fmt::Debug for ControlTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlTerm")
            .field("label", &self.label)
            .field("operator", &self.operator)
            .field("drive", &"Drive(...)")
            .finish()
    }
}

/// H(t) = H0 + Σ_k f_k(t) H_k.
#[derive(Debug, Clone)]
pub struct Hamiltonian {
    /// Constant (drift) term.
    pub drift: Array2<Complex64>,
    /// Drive-weighted terms.
    pub controls: Vec<ControlTerm>,
}

impl Hamiltonian {
    /// Create a Hamiltonian with no control terms.
    pub fn new(drift: Array2<Complex64>) -> Self {
        Self {
            drift,
            controls: Vec::new(),
        }
    }

    /// Append a drive-weighted term.
    pub fn with_control(
        mut self,
        label: impl Into<String>,
        operator: Array2<Complex64>,
        drive: SharedDrive,
    ) -> Self {
        self.controls.push(ControlTerm {
            label: label.into(),
            operator,
            drive,
        });
        self
    }

    /// Hilbert space dimension.
    pub fn dim(&self) -> usize {
        self.drift.nrows()
    }

    /// Check that every constant matrix is square, of matching dimension,
    /// and Hermitian within `tolerance`.
    pub fn validate(&self, tolerance: f64) -> Result<()> {
        let d = self.dim();
        validate_hermitian("drift", &self.drift, d, tolerance)?;
        for term in &self.controls {
            validate_hermitian(&term.label, &term.operator, d, tolerance)?;
        }
        Ok(())
    }

    /// Evaluate H(t).
    pub fn at(&self, t: f64) -> Array2<Complex64> {
        let mut h = self.drift.clone();
        for term in &self.controls {
            let f = term.drive.amplitude(t);
            if f != 0.0 {
                h.scaled_add(Complex64::new(f, 0.0), &term.operator);
            }
        }
        h
    }

    /// Drive coefficients at time `t`, in term order.
    pub fn coefficients(&self, t: f64) -> Vec<f64> {
        self.controls
            .iter()
            .map(|term| term.drive.amplitude(t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sigma_x() -> Array2<Complex64> {
        let mut m = Array2::zeros((2, 2));
        m[[0, 1]] = Complex64::new(1.0, 0.0);
        m[[1, 0]] = Complex64::new(1.0, 0.0);
        m
    }

    #[test]
    fn test_default_parameters() {
        let p = LambdaParameters::default();
        assert_eq!(p.pump_detuning(), -0.5);
        assert_eq!(p.stokes_detuning(), -0.5);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_parameters_reject_nan() {
        let p = LambdaParameters {
            omega_s: f64::NAN,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_evaluate_sums_terms() {
        let h = Hamiltonian::new(Array2::zeros((2, 2)))
            .with_control("x", sigma_x(), Arc::new(|t: f64| 2.0 * t));
        let ht = h.at(0.25);
        assert_eq!(ht[[0, 1]], Complex64::new(0.5, 0.0));
        assert_eq!(ht[[1, 0]], Complex64::new(0.5, 0.0));
        assert_eq!(ht[[0, 0]], Complex64::new(0.0, 0.0));
        assert_eq!(h.coefficients(0.25), vec![0.5]);
    }

    #[test]
    fn test_validate_rejects_dimension_mismatch() {
        let h = Hamiltonian::new(Array2::zeros((3, 3))).with_control(
            "x",
            sigma_x(),
            Arc::new(crate::pulse::ZeroDrive),
        );
        assert!(h.validate(1e-12).is_err());
    }

    #[test]
    fn test_validate_rejects_non_hermitian() {
        let mut bad = sigma_x();
        bad[[1, 0]] = Complex64::new(-1.0, 0.0);
        let h = Hamiltonian::new(bad);
        assert!(h.validate(1e-12).is_err());
    }
}
