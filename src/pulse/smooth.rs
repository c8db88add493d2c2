// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pulse smoother: spline fit of the user samples, evaluated on a dense grid.

use serde::Serialize;
use tracing::debug;

use super::drive::Drive;
use super::spline::{CubicSpline, MIN_SPLINE_POINTS};
use super::SampleArray;
use crate::error::{Error, Result, ShapeError};
use crate::validation::validate_finite;

/// Number of dense samples per smoothed pulse.
pub const DEFAULT_SMOOTH_POINTS: usize = 500;

/// `n` evenly spaced points over `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut grid: Vec<f64> = (0..n).map(|k| start + step * k as f64).collect();
            grid[n - 1] = end;
            grid
        }
    }
}

/// A pulse sampled on a uniform grid over `[0, duration]`.
///
/// Evaluated between grid points by linear interpolation; outside the grid the
/// end values are held.
#[derive(Debug, Clone, Serialize)]
pub struct SmoothedPulse {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl SmoothedPulse {
    /// Build from values on `linspace(0, duration, values.len())`.
    pub fn from_values(values: Vec<f64>, duration: f64) -> Result<Self> {
        if values.len() < 2 {
            return Err(ShapeError::Field {
                field: "values".into(),
                message: format!("need at least 2 samples, got {}", values.len()),
            }
            .into());
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ShapeError::Field {
                field: "duration".into(),
                message: format!("must be positive, got {}", duration),
            }
            .into());
        }
        validate_finite("values", &values)?;
        let times = linspace(0.0, duration, values.len());
        Ok(Self { times, values })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Largest absolute amplitude.
    pub fn peak(&self) -> f64 {
        self.values.iter().fold(0.0, |acc, v| acc.max(v.abs()))
    }
}

impl Drive for SmoothedPulse {
    fn amplitude(&self, t: f64) -> f64 {
        let n = self.values.len();
        let duration = self.duration();
        if t <= 0.0 {
            return self.values[0];
        }
        if t >= duration {
            return self.values[n - 1];
        }
        let pos = t / duration * (n - 1) as f64;
        let k = (pos.floor() as usize).min(n - 2);
        let frac = pos - k as f64;
        self.values[k] * (1.0 - frac) + self.values[k + 1] * frac
    }
}

/// Smooth samples at integer times `0..=duration` onto
/// [`DEFAULT_SMOOTH_POINTS`] points.
pub fn smooth(samples: &[f64], duration: f64) -> Result<SmoothedPulse> {
    smooth_with_points(samples, duration, DEFAULT_SMOOTH_POINTS)
}

/// Smooth samples at integer times `0..=duration` onto `points` points.
///
/// The curve passes exactly through every sample; overshoot between samples
/// is kept as is.
pub fn smooth_with_points(samples: &[f64], duration: f64, points: usize) -> Result<SmoothedPulse> {
    if samples.len() < MIN_SPLINE_POINTS {
        return Err(Error::DegenerateFit {
            points: samples.len(),
            required: MIN_SPLINE_POINTS,
        });
    }
    if !duration.is_finite()
        || duration <= 0.0
        || duration.fract() != 0.0
        || duration as usize != samples.len() - 1
    {
        return Err(ShapeError::Duration {
            samples: samples.len(),
            duration,
        }
        .into());
    }
    if points < 2 {
        return Err(ShapeError::Field {
            field: "points".into(),
            message: format!("need at least 2 output points, got {}", points),
        }
        .into());
    }
    validate_finite("samples", samples)?;

    let spline = CubicSpline::fit_uniform(samples)?;
    let times = linspace(0.0, duration, points);
    let values: Vec<f64> = times.iter().map(|&t| spline.eval(t)).collect();

    let pulse = SmoothedPulse { times, values };
    let peak = pulse.peak();
    if peak > SampleArray::MAX_AMPLITUDE {
        debug!(peak, "Smoothed pulse overshoots the slider range");
    }
    Ok(pulse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace() {
        let g = linspace(0.0, 9.0, 500);
        assert_eq!(g.len(), 500);
        assert_eq!(g[0], 0.0);
        assert_eq!(g[499], 9.0);
        assert_relative_eq!(g[1] - g[0], 9.0 / 499.0, epsilon = 1e-15);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_smooth_shape() {
        let samples = [0.0, 0.3, 0.9, 1.0, 0.4, 0.0, -0.2, 0.0, 0.1, 0.0];
        let pulse = smooth(&samples, 9.0).unwrap();
        assert_eq!(pulse.len(), DEFAULT_SMOOTH_POINTS);
        assert_eq!(pulse.times()[0], 0.0);
        assert_eq!(pulse.duration(), 9.0);
        assert_relative_eq!(pulse.values()[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(pulse.values()[499], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_smooth_passes_through_samples_on_aligned_grid() {
        // With 10 * 9 + 1 points every integer time is a grid point.
        let samples = [0.0, 0.67, 0.07, 0.54, 0.89, 1.0, 1.0, 1.0, 1.0, 0.0];
        let pulse = smooth_with_points(&samples, 9.0, 91).unwrap();
        for (i, &s) in samples.iter().enumerate() {
            assert_relative_eq!(pulse.values()[i * 10], s, epsilon = 1e-12);
            assert_relative_eq!(pulse.amplitude(i as f64), s, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_smooth_eight_samples() {
        let samples = [0.0, 0.5, 0.8, 1.0, 0.8, 0.5, 0.2, 0.0];
        let pulse = smooth(&samples, 7.0).unwrap();
        assert_eq!(pulse.duration(), 7.0);
        assert!(pulse.peak() >= 1.0 - 1e-12);
    }

    #[test]
    fn test_smooth_allows_overshoot() {
        // Sharp step rings above 1 between knots; nothing is clamped.
        let samples = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        let pulse = smooth(&samples, 9.0).unwrap();
        assert!(pulse.peak() > 1.0);
    }

    #[test]
    fn test_smooth_duration_mismatch() {
        let err = smooth(&[0.0; 10], 5.0).unwrap_err();
        assert!(matches!(
            err,
            Error::Shape(ShapeError::Duration { samples: 10, .. })
        ));
        assert!(smooth(&[0.0; 10], 9.5).is_err());
        assert!(smooth(&[0.0; 10], -9.0).is_err());
    }

    #[test]
    fn test_smooth_too_few_samples() {
        let err = smooth(&[0.0, 1.0, 0.0], 2.0).unwrap_err();
        assert!(matches!(err, Error::DegenerateFit { points: 3, .. }));
    }

    #[test]
    fn test_smooth_rejects_nan() {
        let mut samples = [0.0; 10];
        samples[4] = f64::NAN;
        assert!(smooth(&samples, 9.0).is_err());
    }

    #[test]
    fn test_smoothed_pulse_interpolates_linearly() {
        let pulse = SmoothedPulse::from_values(vec![0.0, 1.0, 0.0], 2.0).unwrap();
        assert_relative_eq!(pulse.amplitude(0.5), 0.5, epsilon = 1e-15);
        assert_relative_eq!(pulse.amplitude(1.5), 0.5, epsilon = 1e-15);
        assert_eq!(pulse.amplitude(-1.0), 0.0);
        assert_eq!(pulse.amplitude(5.0), 0.0);
        assert_eq!(pulse.amplitude(1.0), 1.0);
    }

    #[test]
    fn test_smoothed_pulse_from_values_validation() {
        assert!(SmoothedPulse::from_values(vec![1.0], 1.0).is_err());
        assert!(SmoothedPulse::from_values(vec![1.0, 2.0], 0.0).is_err());
        assert!(SmoothedPulse::from_values(vec![1.0, f64::NAN], 1.0).is_err());
    }
}
