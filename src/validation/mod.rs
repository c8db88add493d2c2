// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation shared by the smoother, the Hamiltonian builder and the
//! solver.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{Result, ShapeError};

/// Validate that a sequence has the expected length.
pub fn validate_length(field: &str, values: &[f64], expected: usize) -> Result<()> {
    if values.len() != expected {
        return Err(ShapeError::Length {
            field: field.into(),
            expected,
            actual: values.len(),
        }
        .into());
    }
    Ok(())
}

/// Validate that every value is finite.
pub fn validate_finite(field: &str, values: &[f64]) -> Result<()> {
    for (i, val) in values.iter().enumerate() {
        if val.is_nan() {
            return Err(ShapeError::Field {
                field: field.into(),
                message: format!("contains NaN at index {}", i),
            }
            .into());
        }
        if val.is_infinite() {
            return Err(ShapeError::Field {
                field: field.into(),
                message: format!("contains Inf at index {}", i),
            }
            .into());
        }
    }
    Ok(())
}

/// Validate that every value lies in `[-max_amplitude, max_amplitude]`.
pub fn validate_amplitude(field: &str, values: &[f64], max_amplitude: f64) -> Result<()> {
    validate_finite(field, values)?;
    for (i, val) in values.iter().enumerate() {
        if val.abs() > max_amplitude {
            return Err(ShapeError::Field {
                field: field.into(),
                message: format!(
                    "amplitude {} at index {} exceeds max {}",
                    val, i, max_amplitude
                ),
            }
            .into());
        }
    }
    Ok(())
}

/// Validate an output time grid: non-empty, finite, strictly increasing.
pub fn validate_time_grid(times: &[f64]) -> Result<()> {
    if times.is_empty() {
        return Err(ShapeError::Field {
            field: "times".into(),
            message: "time grid cannot be empty".into(),
        }
        .into());
    }
    validate_finite("times", times)?;
    for (i, pair) in times.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(ShapeError::Field {
                field: "times".into(),
                message: format!(
                    "not strictly increasing at index {} ({} then {})",
                    i + 1,
                    pair[0],
                    pair[1]
                ),
            }
            .into());
        }
    }
    Ok(())
}

/// Validate that a matrix is `dim × dim`.
pub fn validate_square(field: &str, matrix: &Array2<Complex64>, dim: usize) -> Result<()> {
    if matrix.nrows() != dim || matrix.ncols() != dim {
        return Err(ShapeError::Dimension {
            field: field.into(),
            expected: (dim, dim),
            actual: (matrix.nrows(), matrix.ncols()),
        }
        .into());
    }
    Ok(())
}

/// Largest elementwise deviation `|A_ij - conj(A_ji)|`.
///
/// Zero for an exactly Hermitian matrix. Returns NaN if any entry is NaN.
pub fn hermiticity_deviation(matrix: &Array2<Complex64>) -> f64 {
    let n = matrix.nrows();
    let mut worst = 0.0_f64;
    for i in 0..n {
        for j in i..n {
            let dev = (matrix[[i, j]] - matrix[[j, i]].conj()).norm();
            if dev.is_nan() {
                return f64::NAN;
            }
            worst = worst.max(dev);
        }
    }
    worst
}

/// Whether every entry of the matrix is finite.
pub fn is_finite_matrix(matrix: &Array2<Complex64>) -> bool {
    matrix.iter().all(|z| z.re.is_finite() && z.im.is_finite())
}

/// Validate that a constant operator is square and Hermitian.
pub fn validate_hermitian(
    field: &str,
    matrix: &Array2<Complex64>,
    dim: usize,
    tolerance: f64,
) -> Result<()> {
    validate_square(field, matrix, dim)?;
    if !is_finite_matrix(matrix) {
        return Err(ShapeError::Field {
            field: field.into(),
            message: "contains non-finite entries".into(),
        }
        .into());
    }
    let deviation = hermiticity_deviation(matrix);
    if deviation > tolerance {
        return Err(ShapeError::Field {
            field: field.into(),
            message: format!("not Hermitian (max |A - A†| = {:.3e})", deviation),
        }
        .into());
    }
    Ok(())
}
