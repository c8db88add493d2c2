// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Adaptive Dormand–Prince 5(4) integrator.
//!
//! Integrates dy/dt = f(t, y) for complex arrays of any dimension (kets and
//! density matrices share the same stepper). The 5th-order solution is
//! propagated; the embedded 4th-order solution only drives step-size control.
//! Steps are clamped so that every requested output time is hit exactly.
//!
//! Ref: Dormand & Prince (1980), J. Comput. Appl. Math. 6, 19.
//! Ref: Hairer, Nørsett & Wanner, "Solving ODEs I" (1993), §II.4–5.

use ndarray::{Array, Dimension};
use num_complex::Complex64;
use tracing::trace;

use super::types::SolverConfig;
use crate::error::{NumericalError, Result};
use crate::hamiltonian::Hamiltonian;
use crate::validation::{hermiticity_deviation, is_finite_matrix};

const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights (also the 7th stage, FSAL)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// b5 − b4
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;
const ERROR_EXPONENT: f64 = -1.0 / 5.0;

/// Result of one integration run.
#[derive(Debug, Clone)]
pub(crate) struct Integration<D: Dimension> {
    pub final_state: Array<Complex64, D>,
    pub accepted_steps: usize,
    pub rejected_steps: usize,
}

/// Evaluate H(t) and reject non-finite or non-Hermitian results.
pub(crate) fn checked_hamiltonian(
    hamiltonian: &Hamiltonian,
    t: f64,
    tolerance: f64,
) -> Result<ndarray::Array2<Complex64>> {
    let h = hamiltonian.at(t);
    if !is_finite_matrix(&h) {
        return Err(NumericalError::NonFinite { time: t }.into());
    }
    let deviation = hermiticity_deviation(&h);
    if deviation > tolerance {
        return Err(NumericalError::NonHermitian { time: t, deviation }.into());
    }
    Ok(h)
}

/// y + h Σ c_i k_i
fn combine<D: Dimension>(
    y: &Array<Complex64, D>,
    h: f64,
    terms: &[(f64, &Array<Complex64, D>)],
) -> Array<Complex64, D> {
    let mut out = y.clone();
    for &(c, k) in terms {
        if c != 0.0 {
            out.scaled_add(Complex64::new(h * c, 0.0), k);
        }
    }
    out
}

/// max_i |err_i| / (atol + rtol · max(|y_i|, |y_new_i|))
fn error_norm<D: Dimension>(
    err: &Array<Complex64, D>,
    y: &Array<Complex64, D>,
    y_new: &Array<Complex64, D>,
    config: &SolverConfig,
) -> f64 {
    err.iter()
        .zip(y.iter())
        .zip(y_new.iter())
        .map(|((e, a), b)| e.norm() / (config.atol + config.rtol * a.norm().max(b.norm())))
        .fold(0.0, |worst: f64, v| if v.is_nan() { f64::NAN } else { worst.max(v) })
}

fn rms_scaled<D: Dimension>(
    v: &Array<Complex64, D>,
    y: &Array<Complex64, D>,
    config: &SolverConfig,
) -> f64 {
    let n = v.len().max(1) as f64;
    let sum: f64 = v
        .iter()
        .zip(y.iter())
        .map(|(x, a)| (x.norm() / (config.atol + config.rtol * a.norm())).powi(2))
        .sum();
    (sum / n).sqrt()
}

/// Initial step from the scale of y and f(t0, y).
fn initial_step<D: Dimension>(
    y: &Array<Complex64, D>,
    f0: &Array<Complex64, D>,
    span: f64,
    config: &SolverConfig,
) -> f64 {
    let d0 = rms_scaled(y, y, config);
    let d1 = rms_scaled(f0, y, config);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };
    let h0 = h0.min(span);
    match config.max_step {
        Some(max) => h0.min(max),
        None => h0,
    }
}

/// Integrate from `times[0]` through every later output time.
///
/// `observe(index, state)` is called once per output time, including the
/// initial one. The step budget applies between consecutive output times.
pub(crate) fn integrate<D, F, O>(
    y0: Array<Complex64, D>,
    times: &[f64],
    config: &SolverConfig,
    mut rhs: F,
    mut observe: O,
) -> Result<Integration<D>>
where
    D: Dimension,
    F: FnMut(f64, &Array<Complex64, D>) -> Result<Array<Complex64, D>>,
    O: FnMut(usize, &Array<Complex64, D>),
{
    let mut y = y0;
    let mut accepted = 0usize;
    let mut rejected = 0usize;

    let Some(&t0) = times.first() else {
        return Ok(Integration {
            final_state: y,
            accepted_steps: 0,
            rejected_steps: 0,
        });
    };
    observe(0, &y);
    if times.len() == 1 {
        return Ok(Integration {
            final_state: y,
            accepted_steps: 0,
            rejected_steps: 0,
        });
    }

    let span = times[times.len() - 1] - t0;
    let mut t = t0;
    let mut k1 = rhs(t, &y)?;
    let mut h = initial_step(&y, &k1, span, config);

    for (index, &t_end) in times.iter().enumerate().skip(1) {
        let mut attempts = 0usize;
        while t < t_end {
            if attempts >= config.max_steps {
                return Err(NumericalError::StepBudgetExhausted {
                    time: t,
                    max_steps: config.max_steps,
                }
                .into());
            }
            attempts += 1;

            let min_step = 10.0 * f64::EPSILON * t.abs().max(1.0);
            if h < min_step {
                return Err(NumericalError::StepSizeUnderflow { time: t, step: h }.into());
            }

            let remaining = t_end - t;
            let mut step = h;
            if let Some(max) = config.max_step {
                step = step.min(max);
            }
            let lands = step >= remaining || remaining - step < min_step;
            if lands {
                step = remaining;
            }

            let k2 = rhs(t + C2 * step, &combine(&y, step, &[(A21, &k1)]))?;
            let k3 = rhs(t + C3 * step, &combine(&y, step, &[(A31, &k1), (A32, &k2)]))?;
            let k4 = rhs(
                t + C4 * step,
                &combine(&y, step, &[(A41, &k1), (A42, &k2), (A43, &k3)]),
            )?;
            let k5 = rhs(
                t + C5 * step,
                &combine(&y, step, &[(A51, &k1), (A52, &k2), (A53, &k3), (A54, &k4)]),
            )?;
            let k6 = rhs(
                t + step,
                &combine(
                    &y,
                    step,
                    &[(A61, &k1), (A62, &k2), (A63, &k3), (A64, &k4), (A65, &k5)],
                ),
            )?;
            let y_new = combine(
                &y,
                step,
                &[(B1, &k1), (B3, &k3), (B4, &k4), (B5, &k5), (B6, &k6)],
            );
            let t_new = if lands { t_end } else { t + step };
            let k7 = rhs(t_new, &y_new)?;

            let zero = Array::zeros(y.raw_dim());
            let err = combine(
                &zero,
                step,
                &[(E1, &k1), (E3, &k3), (E4, &k4), (E5, &k5), (E6, &k6), (E7, &k7)],
            );
            let err_norm = error_norm(&err, &y, &y_new, config);
            if !err_norm.is_finite() {
                return Err(NumericalError::NonFinite { time: t_new }.into());
            }

            if err_norm <= 1.0 {
                let factor = if err_norm == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * err_norm.powf(ERROR_EXPONENT)).clamp(MIN_FACTOR, MAX_FACTOR)
                };
                // A step shortened to land on an output time does not shrink h
                h = if lands { h.max(step * factor) } else { step * factor };
                t = t_new;
                y = y_new;
                k1 = k7;
                accepted += 1;
            } else {
                let factor = (SAFETY * err_norm.powf(ERROR_EXPONENT)).max(MIN_FACTOR);
                h = step * factor;
                rejected += 1;
                trace!(t, step, err_norm, "Rejected step");
            }
        }
        observe(index, &y);
    }

    Ok(Integration {
        final_state: y,
        accepted_steps: accepted,
        rejected_steps: rejected,
    })
}
