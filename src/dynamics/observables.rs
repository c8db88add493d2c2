// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Projectors, expectation values and state fidelity.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use super::types::QuantumState;

/// Level projectors |k⟩⟨k| for k = 0..dim.
pub fn projectors(dim: usize) -> Vec<Array2<Complex64>> {
    (0..dim)
        .map(|k| {
            let mut p = Array2::zeros((dim, dim));
            p[[k, k]] = Complex64::new(1.0, 0.0);
            p
        })
        .collect()
}

/// ⟨ψ|O|ψ⟩ (real part).
pub fn ket_expectation(op: &Array2<Complex64>, psi: &Array1<Complex64>) -> f64 {
    let o_psi = op.dot(psi);
    psi.iter().zip(o_psi.iter()).map(|(a, b)| (a.conj() * b).re).sum()
}

/// Tr(O ρ) (real part).
pub fn density_expectation(op: &Array2<Complex64>, rho: &Array2<Complex64>) -> f64 {
    op.dot(rho).diag().iter().map(|z| z.re).sum()
}

/// Expectation value of `op` in either representation.
pub fn expectation(op: &Array2<Complex64>, state: &QuantumState) -> f64 {
    match state {
        QuantumState::Ket(psi) => ket_expectation(op, psi),
        QuantumState::Density(rho) => density_expectation(op, rho),
    }
}

/// Overlap with a pure target: |⟨target|ψ⟩|² or ⟨target|ρ|target⟩.
pub fn state_fidelity(state: &QuantumState, target: &Array1<Complex64>) -> f64 {
    match state {
        QuantumState::Ket(psi) => target
            .iter()
            .zip(psi.iter())
            .map(|(t, p)| t.conj() * p)
            .sum::<Complex64>()
            .norm_sqr(),
        QuantumState::Density(rho) => {
            let rho_t = rho.dot(target);
            target
                .iter()
                .zip(rho_t.iter())
                .map(|(t, r)| t.conj() * r)
                .sum::<Complex64>()
                .re
        }
    }
}

/// Purity Tr(ρ²); 1 for any normalized ket.
pub fn purity(state: &QuantumState) -> f64 {
    match state {
        QuantumState::Ket(psi) => psi.iter().map(|a| a.norm_sqr()).sum::<f64>().powi(2),
        QuantumState::Density(rho) => rho.dot(rho).diag().iter().map(|z| z.re).sum(),
    }
}
