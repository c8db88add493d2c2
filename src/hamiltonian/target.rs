// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Target state for population transfer into level 3.

use ndarray::Array1;
use num_complex::Complex64;

use super::lambda::LAMBDA_DIM;
use crate::error::{Result, ShapeError};

/// Basis ket |k⟩ (zero-based) of a `dim`-level system.
pub fn basis_state(dim: usize, k: usize) -> Result<Array1<Complex64>> {
    if k >= dim {
        return Err(ShapeError::Field {
            field: "level".into(),
            message: format!("level index {} out of range for {} levels", k, dim),
        }
        .into());
    }
    Ok(unit_ket(dim, k))
}

fn unit_ket(dim: usize, k: usize) -> Array1<Complex64> {
    let mut ket = Array1::zeros(dim);
    ket[k] = Complex64::new(1.0, 0.0);
    ket
}

/// `exp(i (E2 − Ωs) T) · ket`.
///
/// A pure phase rotation; the norm of `ket` is preserved.
pub fn rwa_target_state(ket: &Array1<Complex64>, e2: f64, omega_s: f64, t: f64) -> Array1<Complex64> {
    let phase = Complex64::from_polar(1.0, (e2 - omega_s) * t);
    ket.mapv(|a| a * phase)
}

/// Phase-rotated level-3 target of the Lambda system.
pub fn lambda_target(e2: f64, omega_s: f64, t: f64) -> Array1<Complex64> {
    rwa_target_state(&unit_ket(LAMBDA_DIM, 2), e2, omega_s, t)
}
