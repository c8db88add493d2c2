// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Interpolating cubic spline with not-a-knot end conditions.
//!
//! With zero smoothing, a cubic B-spline fit whose interior knots are the data
//! abscissae minus the second and second-to-last point is the not-a-knot
//! interpolant: the third derivative is continuous across `x[1]` and
//! `x[n-2]`. We solve directly for the second derivatives `M_i` at the knots.
//!
//! Ref: de Boor, "A Practical Guide to Splines" (2001), Ch. IV.

use crate::error::{Error, Result};
use crate::validation::{validate_finite, validate_time_grid};

/// Minimum number of knots for a cubic fit (order + 1).
pub const MIN_SPLINE_POINTS: usize = 4;

/// Piecewise cubic through every `(x_i, y_i)`.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivative at each knot.
    m: Vec<f64>,
}

impl CubicSpline {
    /// Fit the spline through the given knots.
    ///
    /// `x` must be strictly increasing and have the same length as `y`.
    /// Fewer than [`MIN_SPLINE_POINTS`] knots is a degenerate fit.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(crate::error::ShapeError::Length {
                field: "y".into(),
                expected: x.len(),
                actual: y.len(),
            }
            .into());
        }
        let n = x.len();
        if n < MIN_SPLINE_POINTS {
            return Err(Error::DegenerateFit {
                points: n,
                required: MIN_SPLINE_POINTS,
            });
        }
        validate_time_grid(x)?;
        validate_finite("y", y)?;

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

        let mut a = vec![vec![0.0; n]; n];
        let mut rhs = vec![0.0; n];

        // Not-a-knot at x[1]: third derivative continuous.
        a[0][0] = -h[1];
        a[0][1] = h[0] + h[1];
        a[0][2] = -h[0];

        for i in 1..n - 1 {
            a[i][i - 1] = h[i - 1];
            a[i][i] = 2.0 * (h[i - 1] + h[i]);
            a[i][i + 1] = h[i];
            rhs[i] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
        }

        // Not-a-knot at x[n-2].
        a[n - 1][n - 3] = -h[n - 2];
        a[n - 1][n - 2] = h[n - 3] + h[n - 2];
        a[n - 1][n - 1] = -h[n - 3];

        let m = solve_linear(a, rhs).ok_or(Error::DegenerateFit {
            points: n,
            required: MIN_SPLINE_POINTS,
        })?;

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    /// Fit through samples at the integer times `0, 1, ..., N-1`.
    pub fn fit_uniform(y: &[f64]) -> Result<Self> {
        let x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
        Self::fit(&x, y)
    }

    /// Knot abscissae.
    pub fn knots(&self) -> &[f64] {
        &self.x
    }

    /// Evaluate at `t`. Outside the knot span the end polynomials are
    /// extrapolated.
    pub fn eval(&self, t: f64) -> f64 {
        let n = self.x.len();
        // Interval index i with x[i] <= t < x[i+1], clamped to [0, n-2].
        let i = self
            .x
            .partition_point(|&xk| xk <= t)
            .saturating_sub(1)
            .min(n - 2);

        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - t) / h;
        let b = (t - self.x[i]) / h;

        a * self.y[i]
            + b * self.y[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0
    }
}

/// Solve A·x = b by Gaussian elimination with partial pivoting.
///
/// Returns `None` if the system is numerically singular.
fn solve_linear(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let mut max_val = 0.0;
        let mut max_row = col;
        for (row, r) in a.iter().enumerate().skip(col) {
            let val = r[col].abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_val < 1e-14 {
            return None;
        }

        if max_row != col {
            a.swap(col, max_row);
            b.swap(col, max_row);
        }

        let pivot = a[col][col];
        for row in (col + 1)..n {
            let factor = a[row][col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                let val = a[col][j];
                a[row][j] -= factor * val;
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for col in (0..n).rev() {
        let mut sum = b[col];
        for k in (col + 1)..n {
            sum -= a[col][k] * x[k];
        }
        x[col] = sum / a[col][col];
    }
    Some(x)
}
