// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Closed-system evolution: dψ/dt = −i H(t) ψ.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use tracing::debug;

use super::integrate::{checked_hamiltonian, integrate};
use super::observables::ket_expectation;
use super::types::{QuantumState, SolverConfig, Trajectory};
use crate::error::{Result, ShapeError};
use crate::hamiltonian::Hamiltonian;
use crate::validation::{validate_hermitian, validate_square, validate_time_grid};

/// Validate the pieces shared by both evolution entry points.
pub(crate) fn validate_problem(
    hamiltonian: &Hamiltonian,
    times: &[f64],
    observables: &[Array2<Complex64>],
    config: &SolverConfig,
) -> Result<()> {
    config.validate()?;
    validate_time_grid(times)?;
    let d = hamiltonian.dim();
    validate_square("drift", &hamiltonian.drift, d)?;
    for term in &hamiltonian.controls {
        validate_square(&term.label, &term.operator, d)?;
    }
    for (k, op) in observables.iter().enumerate() {
        validate_hermitian(
            &format!("observable[{}]", k),
            op,
            d,
            config.hermiticity_tolerance,
        )?;
    }
    Ok(())
}

/// Evolve a state vector and record expectation values at every output time.
///
/// `times[0]` is the time of `psi0`, which must be a unit vector. The
/// Hamiltonian is checked for finiteness and Hermiticity at every evaluation.
pub fn evolve(
    hamiltonian: &Hamiltonian,
    psi0: &Array1<Complex64>,
    times: &[f64],
    observables: &[Array2<Complex64>],
    config: &SolverConfig,
) -> Result<Trajectory> {
    validate_problem(hamiltonian, times, observables, config)?;
    let d = hamiltonian.dim();
    if psi0.len() != d {
        return Err(ShapeError::Length {
            field: "initial_state".into(),
            expected: d,
            actual: psi0.len(),
        }
        .into());
    }
    if psi0.iter().any(|z| !(z.re.is_finite() && z.im.is_finite())) {
        return Err(ShapeError::Field {
            field: "initial_state".into(),
            message: "contains non-finite entries".into(),
        }
        .into());
    }
    let norm = psi0.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
    if (norm - 1.0).abs() > config.hermiticity_tolerance {
        return Err(ShapeError::Field {
            field: "initial_state".into(),
            message: format!("not normalised (norm = {:.6})", norm),
        }
        .into());
    }

    let minus_i = Complex64::new(0.0, -1.0);
    let tolerance = config.hermiticity_tolerance;
    let mut expect: Vec<Vec<f64>> = vec![Vec::with_capacity(times.len()); observables.len()];
    let mut states = config.store_states.then(|| Vec::with_capacity(times.len()));

    let result = integrate(
        psi0.clone(),
        times,
        config,
        |t, psi: &Array1<Complex64>| {
            let h = checked_hamiltonian(hamiltonian, t, tolerance)?;
            Ok(h.dot(psi).mapv(|z| minus_i * z))
        },
        |_, psi| {
            for (series, op) in expect.iter_mut().zip(observables) {
                series.push(ket_expectation(op, psi));
            }
            if let Some(ref mut stored) = states {
                stored.push(QuantumState::Ket(psi.clone()));
            }
        },
    )?;

    debug!(
        accepted = result.accepted_steps,
        rejected = result.rejected_steps,
        "Schrödinger evolution complete"
    );

    Ok(Trajectory {
        times: times.to_vec(),
        expect,
        states,
        final_state: QuantumState::Ket(result.final_state),
        accepted_steps: result.accepted_steps,
        rejected_steps: result.rejected_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::observables::projectors;
    use crate::error::{Error, NumericalError};
    use crate::hamiltonian::{basis_state, lambda_hamiltonian, LambdaParameters};
    use crate::pulse::{linspace, ZeroDrive};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn ground() -> Array1<Complex64> {
        basis_state(3, 0).unwrap()
    }

    fn run(h: &Hamiltonian, times: &[f64]) -> Result<Trajectory> {
        evolve(h, &ground(), times, &projectors(3), &SolverConfig::default())
    }

    fn resonant_params() -> LambdaParameters {
        LambdaParameters {
            e1: 0.0,
            e2: 10.0,
            e3: 5.0,
            omega_p: 10.0,
            omega_s: 5.0,
        }
    }

    #[test]
    fn test_zero_drive_keeps_ground_state() {
        let h = lambda_hamiltonian(
            Arc::new(ZeroDrive),
            Arc::new(ZeroDrive),
            &LambdaParameters::default(),
        )
        .unwrap();
        let times = linspace(0.0, 9.0, 50);
        let traj = run(&h, &times).unwrap();
        for &p in &traj.expect[0] {
            assert_relative_eq!(p, 1.0, epsilon = 1e-6);
        }
        assert!(traj.expect[1].iter().all(|&p| p == 0.0));
        assert!(traj.expect[2].iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_resonant_rabi_oscillation() {
        // Constant pump only, on resonance: p2(t) = sin²(t/2)
        let h = lambda_hamiltonian(
            Arc::new(|_t: f64| 1.0),
            Arc::new(ZeroDrive),
            &resonant_params(),
        )
        .unwrap();
        let times = linspace(0.0, 6.0, 61);
        let traj = run(&h, &times).unwrap();
        for (k, &t) in times.iter().enumerate() {
            assert_relative_eq!(traj.expect[1][k], (t / 2.0).sin().powi(2), epsilon = 1e-6);
            assert_relative_eq!(traj.expect[0][k], (t / 2.0).cos().powi(2), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_norm_conserved() {
        let h = lambda_hamiltonian(
            Arc::new(|t: f64| (0.5 * t).sin()),
            Arc::new(|t: f64| (0.3 * t).cos()),
            &LambdaParameters::default(),
        )
        .unwrap();
        let config = SolverConfig {
            store_states: true,
            ..Default::default()
        };
        let times = linspace(0.0, 9.0, 100);
        let traj = evolve(&h, &ground(), &times, &projectors(3), &config).unwrap();
        let states = traj.states.as_ref().unwrap();
        assert_eq!(states.len(), times.len());
        for (k, state) in states.iter().enumerate() {
            assert_relative_eq!(state.norm(), 1.0, epsilon = 1e-6);
            let total: f64 = traj.expect.iter().map(|series| series[k]).sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_deterministic() {
        let build = || {
            lambda_hamiltonian(
                Arc::new(|t: f64| (-(t - 5.0).powi(2)).exp()),
                Arc::new(|t: f64| (-(t - 4.0).powi(2)).exp()),
                &LambdaParameters::default(),
            )
            .unwrap()
        };
        let times = linspace(0.0, 9.0, 40);
        let a = run(&build(), &times).unwrap();
        let b = run(&build(), &times).unwrap();
        assert_eq!(a.expect, b.expect);
        assert_eq!(a.final_state, b.final_state);
    }

    #[test]
    fn test_nan_drive_is_rejected() {
        let h = lambda_hamiltonian(
            Arc::new(|t: f64| if t > 2.0 { f64::NAN } else { 0.5 }),
            Arc::new(ZeroDrive),
            &LambdaParameters::default(),
        )
        .unwrap();
        let times = linspace(0.0, 9.0, 10);
        let err = run(&h, &times).unwrap_err();
        match err {
            Error::Numerical(NumericalError::NonFinite { time }) => assert!(time > 2.0),
            other => panic!("expected NonFinite, got {other}"),
        }
    }

    #[test]
    fn test_non_hermitian_operator_is_rejected() {
        let mut skew = Array2::zeros((3, 3));
        skew[[0, 1]] = Complex64::new(1.0, 0.0);
        skew[[1, 0]] = Complex64::new(-1.0, 0.0);
        let h = Hamiltonian::new(Array2::zeros((3, 3))).with_control(
            "skew",
            skew,
            Arc::new(|_t: f64| 1.0),
        );
        let err = evolve(&h, &ground(), &[0.0, 1.0], &[], &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Numerical(NumericalError::NonHermitian { .. })
        ));
    }

    #[test]
    fn test_step_budget() {
        let h = lambda_hamiltonian(
            Arc::new(|t: f64| t.sin()),
            Arc::new(|t: f64| t.cos()),
            &LambdaParameters::default(),
        )
        .unwrap();
        let config = SolverConfig {
            max_steps: 1,
            ..Default::default()
        };
        let err = evolve(&h, &ground(), &[0.0, 9.0], &[], &config).unwrap_err();
        assert!(matches!(
            err,
            Error::Numerical(NumericalError::StepBudgetExhausted { max_steps: 1, .. })
        ));
    }

    #[test]
    fn test_shape_errors() {
        let h = lambda_hamiltonian(
            Arc::new(ZeroDrive),
            Arc::new(ZeroDrive),
            &LambdaParameters::default(),
        )
        .unwrap();
        let config = SolverConfig::default();
        assert!(matches!(
            evolve(&h, &basis_state(2, 0).unwrap(), &[0.0, 1.0], &[], &config),
            Err(Error::Shape(_))
        ));
        assert!(matches!(
            evolve(&h, &ground(), &[0.0, 1.0], &projectors(2), &config),
            Err(Error::Shape(_))
        ));
        assert!(matches!(
            evolve(&h, &ground(), &[1.0, 0.5], &[], &config),
            Err(Error::Shape(_))
        ));
        assert!(matches!(
            evolve(&h, &ground(), &[], &[], &config),
            Err(Error::Shape(_))
        ));
    }

    #[test]
    fn test_unnormalised_initial_state_rejected() {
        let h = Hamiltonian::new(Array2::zeros((3, 3)));
        let doubled = ground().mapv(|z| z * 2.0);
        let result = evolve(
            &h,
            &doubled,
            &linspace(0.0, 9.0, 10),
            &projectors(3),
            &SolverConfig::default(),
        );
        assert!(matches!(
            result,
            Err(Error::Shape(ShapeError::Field { ref field, .. })) if field == "initial_state"
        ));
        assert!(run(&h, &[0.0, 1.0]).is_ok());
    }

    #[test]
    fn test_non_hermitian_observable_rejected() {
        let h = Hamiltonian::new(Array2::zeros((3, 3)));
        let mut op = Array2::zeros((3, 3));
        op[[1, 1]] = Complex64::new(0.0, 3.0);
        let result = evolve(&h, &ground(), &[0.0, 1.0], &[op], &SolverConfig::default());
        assert!(matches!(result, Err(Error::Shape(ShapeError::Field { .. }))));
    }
}
