// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lambda-system Hamiltonian in the rotating-wave approximation.
//!
//! Levels 1 and 3 are coupled to the intermediate level 2 by the pump and
//! Stokes fields; there is no direct 1 ↔ 3 coupling. In the frame rotating
//! with both carriers:
//!
//!   H(t) = diag(Δp, 0, Δs)
//!        − ½ [Ωp,re(t) (|1⟩⟨2| + |2⟩⟨1|) + Ωp,im(t) (i|1⟩⟨2| − i|2⟩⟨1|)]
//!        − ½ [Ωs,re(t) (|2⟩⟨3| + |3⟩⟨2|) + Ωs,im(t) (i|2⟩⟨3| − i|3⟩⟨2|)]
//!
//! with Δp = E1 + Ωp − E2 and Δs = E3 + Ωs − E2.
//!
//! Ref: Vitanov et al. (2017), "Stimulated Raman adiabatic passage in
//! physics, chemistry, and beyond", Rev. Mod. Phys. 89, 015006.

use std::sync::Arc;

use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use super::types::{Hamiltonian, LambdaParameters};
use crate::error::Result;
use crate::pulse::{SharedDrive, ZeroDrive};

/// Hilbert space dimension of the Lambda system.
pub const LAMBDA_DIM: usize = 3;

/// Labels of the control terms, in order.
pub const TERM_LABELS: [&str; 4] = ["pump_re", "pump_im", "stokes_re", "stokes_im"];

/// Real symmetric coupling −½(|a⟩⟨b| + |b⟩⟨a|).
fn in_phase_coupling(a: usize, b: usize) -> Array2<Complex64> {
    let mut m = Array2::zeros((LAMBDA_DIM, LAMBDA_DIM));
    m[[a, b]] = Complex64::new(-0.5, 0.0);
    m[[b, a]] = Complex64::new(-0.5, 0.0);
    m
}

/// Quadrature coupling −½(i|a⟩⟨b| − i|b⟩⟨a|).
fn quadrature_coupling(a: usize, b: usize) -> Array2<Complex64> {
    let mut m = Array2::zeros((LAMBDA_DIM, LAMBDA_DIM));
    m[[a, b]] = Complex64::new(0.0, -0.5);
    m[[b, a]] = Complex64::new(0.0, 0.5);
    m
}

/// Constant detuning term diag(Δp, 0, Δs).
pub fn drift(params: &LambdaParameters) -> Array2<Complex64> {
    let mut h0 = Array2::zeros((LAMBDA_DIM, LAMBDA_DIM));
    h0[[0, 0]] = Complex64::new(params.pump_detuning(), 0.0);
    h0[[2, 2]] = Complex64::new(params.stokes_detuning(), 0.0);
    h0
}

/// Build the five-term Lambda Hamiltonian
/// `[H0, (HP_re, pump), (HP_im, 0), (HS_re, stokes), (HS_im, 0)]`.
///
/// The imaginary quadratures are present but driven by [`ZeroDrive`].
pub fn lambda_hamiltonian(
    pump: SharedDrive,
    stokes: SharedDrive,
    params: &LambdaParameters,
) -> Result<Hamiltonian> {
    params.validate()?;
    debug!(
        pump_detuning = params.pump_detuning(),
        stokes_detuning = params.stokes_detuning(),
        "Building Lambda Hamiltonian"
    );

    let zero: SharedDrive = Arc::new(ZeroDrive);
    Ok(Hamiltonian::new(drift(params))
        .with_control(TERM_LABELS[0], in_phase_coupling(0, 1), pump)
        .with_control(TERM_LABELS[1], quadrature_coupling(0, 1), zero.clone())
        .with_control(TERM_LABELS[2], in_phase_coupling(1, 2), stokes)
        .with_control(TERM_LABELS[3], quadrature_coupling(1, 2), zero))
}
