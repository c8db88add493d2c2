// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Density-matrix evolution under the Lindblad master equation.
//!
//!   dρ/dt = −i[H(t), ρ] + Σ_k γ_k (L_k ρ L_k† − ½{L_k†L_k, ρ})
//!
//! With no collapse operators this is the Liouville–von Neumann equation and
//! reproduces the populations of [`evolve`](super::evolve).
//!
//! Ref: Breuer & Petruccione, "The Theory of Open Quantum Systems" (2002), Ch. 3.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use super::integrate::{checked_hamiltonian, integrate};
use super::observables::density_expectation;
use super::schrodinger::validate_problem;
use super::types::{CollapseOperator, QuantumState, SolverConfig, Trajectory};
use crate::error::{Result, ShapeError};
use crate::hamiltonian::Hamiltonian;
use crate::validation::{validate_hermitian, validate_square};

/// A collapse operator with L† and L†L precomputed.
struct Channel {
    l: Array2<Complex64>,
    l_dag: Array2<Complex64>,
    l_dag_l: Array2<Complex64>,
    rate: Complex64,
}

impl Channel {
    fn new(op: &CollapseOperator) -> Self {
        let l_dag = conjugate_transpose(&op.matrix);
        let l_dag_l = l_dag.dot(&op.matrix);
        Self {
            l: op.matrix.clone(),
            l_dag,
            l_dag_l,
            rate: Complex64::new(op.rate, 0.0),
        }
    }

    /// γ (L ρ L† − ½ L†L ρ − ½ ρ L†L)
    fn apply(&self, rho: &Array2<Complex64>, out: &mut Array2<Complex64>) {
        let half = Complex64::new(0.5, 0.0);
        let jump = self.l.dot(rho).dot(&self.l_dag);
        out.scaled_add(self.rate, &jump);
        out.scaled_add(-half * self.rate, &self.l_dag_l.dot(rho));
        out.scaled_add(-half * self.rate, &rho.dot(&self.l_dag_l));
    }
}

/// Conjugate transpose (dagger) of a matrix.
fn conjugate_transpose(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|z| z.conj())
}

/// −i[H, ρ] + Σ D[L](ρ)
fn lindblad_rhs(
    hamiltonian: &Array2<Complex64>,
    channels: &[Channel],
    rho: &Array2<Complex64>,
) -> Array2<Complex64> {
    let i = Complex64::new(0.0, 1.0);
    let commutator = hamiltonian.dot(rho) - rho.dot(hamiltonian);
    let mut out = commutator.mapv(|z| -i * z);
    for channel in channels {
        channel.apply(rho, &mut out);
    }
    out
}

/// Evolve a density matrix and record Tr(O ρ) at every output time.
///
/// `rho0` must be Hermitian with unit trace.
pub fn evolve_density(
    hamiltonian: &Hamiltonian,
    rho0: &Array2<Complex64>,
    times: &[f64],
    observables: &[Array2<Complex64>],
    collapse_ops: &[CollapseOperator],
    config: &SolverConfig,
) -> Result<Trajectory> {
    validate_problem(hamiltonian, times, observables, config)?;
    let d = hamiltonian.dim();
    validate_hermitian("initial_state", rho0, d, config.hermiticity_tolerance)?;
    let trace: f64 = rho0.diag().iter().map(|z| z.re).sum();
    if (trace - 1.0).abs() > config.hermiticity_tolerance {
        return Err(ShapeError::Field {
            field: "initial_state".into(),
            message: format!("trace is {:.6}, expected 1", trace),
        }
        .into());
    }
    for op in collapse_ops {
        validate_square(&op.label, &op.matrix, d)?;
    }

    let channels: Vec<Channel> = collapse_ops
        .iter()
        .filter(|op| op.rate > 0.0)
        .map(Channel::new)
        .collect();
    let tolerance = config.hermiticity_tolerance;
    let mut expect: Vec<Vec<f64>> = vec![Vec::with_capacity(times.len()); observables.len()];
    let mut states = config.store_states.then(|| Vec::with_capacity(times.len()));

    let result = integrate(
        rho0.clone(),
        times,
        config,
        |t, rho: &Array2<Complex64>| {
            let h = checked_hamiltonian(hamiltonian, t, tolerance)?;
            Ok(lindblad_rhs(&h, &channels, rho))
        },
        |_, rho| {
            for (series, op) in expect.iter_mut().zip(observables) {
                series.push(density_expectation(op, rho));
            }
            if let Some(ref mut stored) = states {
                stored.push(QuantumState::Density(rho.clone()));
            }
        },
    )?;

    debug!(
        channels = channels.len(),
        accepted = result.accepted_steps,
        rejected = result.rejected_steps,
        "Density-matrix evolution complete"
    );

    Ok(Trajectory {
        times: times.to_vec(),
        expect,
        states,
        final_state: QuantumState::Density(result.final_state),
        accepted_steps: result.accepted_steps,
        rejected_steps: result.rejected_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::observables::projectors;
    use crate::dynamics::schrodinger::evolve;
    use crate::error::Error;
    use crate::hamiltonian::{basis_state, lambda_hamiltonian, LambdaParameters};
    use crate::pulse::{linspace, ZeroDrive};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn pure(k: usize) -> Array2<Complex64> {
        let mut rho = Array2::zeros((3, 3));
        rho[[k, k]] = Complex64::new(1.0, 0.0);
        rho
    }

    #[test]
    fn test_matches_ket_evolution() {
        let h = lambda_hamiltonian(
            Arc::new(|t: f64| (-(t - 5.0).powi(2) / 4.0).exp()),
            Arc::new(|t: f64| (-(t - 4.0).powi(2) / 4.0).exp()),
            &LambdaParameters::default(),
        )
        .unwrap();
        let times = linspace(0.0, 9.0, 30);
        let config = SolverConfig::default();
        let psi0 = basis_state(3, 0).unwrap();
        let ket = evolve(&h, &psi0, &times, &projectors(3), &config).unwrap();
        let dm = evolve_density(&h, &pure(0), &times, &projectors(3), &[], &config).unwrap();
        for level in 0..3 {
            for (a, b) in ket.expect[level].iter().zip(&dm.expect[level]) {
                assert_relative_eq!(*a, *b, epsilon = 1e-6);
            }
        }
        assert_relative_eq!(dm.final_state.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_decay_from_intermediate_level() {
        let h = Hamiltonian::new(Array2::zeros((3, 3)));
        let gamma = 0.5;
        let ops = vec![CollapseOperator::decay(3, 1, 0, gamma).unwrap()];
        let times = linspace(0.0, 4.0, 9);
        let traj = evolve_density(
            &h,
            &pure(1),
            &times,
            &projectors(3),
            &ops,
            &SolverConfig::default(),
        )
        .unwrap();
        for (k, &t) in times.iter().enumerate() {
            let p2 = (-gamma * t).exp();
            assert_relative_eq!(traj.expect[1][k], p2, epsilon = 1e-6);
            assert_relative_eq!(traj.expect[0][k], 1.0 - p2, epsilon = 1e-6);
            assert_relative_eq!(traj.expect[2][k], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_dephasing_preserves_populations() {
        let mut rho = Array2::zeros((3, 3));
        let half = Complex64::new(0.5, 0.0);
        rho[[0, 0]] = half;
        rho[[0, 2]] = half;
        rho[[2, 0]] = half;
        rho[[2, 2]] = half;
        let ops = vec![CollapseOperator::dephasing(3, 2, 1.0).unwrap()];
        let config = SolverConfig {
            store_states: true,
            ..Default::default()
        };
        let traj = evolve_density(
            &Hamiltonian::new(Array2::zeros((3, 3))),
            &rho,
            &[0.0, 5.0],
            &projectors(3),
            &ops,
            &config,
        )
        .unwrap();
        assert_relative_eq!(traj.expect[0][1], 0.5, epsilon = 1e-9);
        assert_relative_eq!(traj.expect[2][1], 0.5, epsilon = 1e-9);
        let QuantumState::Density(final_rho) = &traj.final_state else {
            panic!("expected a density matrix");
        };
        // Coherence decays as exp(-γ t / 2)
        assert_relative_eq!(final_rho[[0, 2]].re, 0.5 * (-2.5f64).exp(), epsilon = 1e-6);
        assert_eq!(traj.states.unwrap().len(), 2);
    }

    #[test]
    fn test_ground_state_is_steady() {
        let h = lambda_hamiltonian(
            Arc::new(ZeroDrive),
            Arc::new(ZeroDrive),
            &LambdaParameters::default(),
        )
        .unwrap();
        let ops = vec![CollapseOperator::decay(3, 1, 0, 1.0).unwrap()];
        let traj = evolve_density(
            &h,
            &pure(0),
            &[0.0, 9.0],
            &projectors(3),
            &ops,
            &SolverConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(traj.expect[0][1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_mismatched_collapse_operator_rejected() {
        let mut op = CollapseOperator::decay(3, 1, 0, 1.0).unwrap();
        op.matrix = Array2::zeros((2, 2));
        let result = evolve_density(
            &Hamiltonian::new(Array2::zeros((3, 3))),
            &pure(0),
            &[0.0, 1.0],
            &[],
            &[op],
            &SolverConfig::default(),
        );
        assert!(matches!(result, Err(Error::Shape(_))));
    }

    #[test]
    fn test_initial_density_matrix_checked() {
        let h = Hamiltonian::new(Array2::zeros((3, 3)));
        let config = SolverConfig::default();
        let run = |rho: &Array2<Complex64>| {
            evolve_density(&h, rho, &[0.0, 1.0], &projectors(3), &[], &config)
        };

        let doubled = pure(0).mapv(|z| z * 2.0);
        assert!(matches!(
            run(&doubled),
            Err(Error::Shape(ShapeError::Field { ref field, .. })) if field == "initial_state"
        ));

        let mut skew = pure(0);
        skew[[0, 1]] = Complex64::new(0.0, 0.5);
        skew[[1, 0]] = Complex64::new(0.0, 0.5);
        assert!(matches!(run(&skew), Err(Error::Shape(_))));

        assert!(run(&pure(2)).is_ok());
    }
}
