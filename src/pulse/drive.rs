// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Time-dependent drive coefficients.

use std::sync::Arc;

use super::spline::CubicSpline;

/// A real drive amplitude as a function of time.
///
/// Implemented for closures, the zero function, fitted splines and dense
/// [`SmoothedPulse`](super::SmoothedPulse) arrays, so closed-form and sampled
/// pulses weight Hamiltonian terms the same way.
pub trait Drive: Send + Sync {
    /// Amplitude at time `t`.
    fn amplitude(&self, t: f64) -> f64;
}

/// Shared, type-erased drive.
pub type SharedDrive = Arc<dyn Drive>;

impl<F> Drive for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn amplitude(&self, t: f64) -> f64 {
        self(t)
    }
}

/// The identically-zero drive (unused quadratures).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroDrive;

impl Drive for ZeroDrive {
    fn amplitude(&self, _t: f64) -> f64 {
        0.0
    }
}

impl Drive for CubicSpline {
    fn amplitude(&self, t: f64) -> f64 {
        self.eval(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_drive() {
        let d: SharedDrive = Arc::new(|t: f64| 2.0 * t);
        assert_eq!(d.amplitude(1.5), 3.0);
    }

    #[test]
    fn test_zero_drive() {
        assert_eq!(ZeroDrive.amplitude(0.0), 0.0);
        assert_eq!(ZeroDrive.amplitude(1e6), 0.0);
    }

    #[test]
    fn test_spline_drive() {
        let spline = CubicSpline::fit_uniform(&[0.0, 1.0, 0.5, 0.25, 0.0]).unwrap();
        let d: SharedDrive = Arc::new(spline);
        assert!((d.amplitude(1.0) - 1.0).abs() < 1e-12);
    }
}
