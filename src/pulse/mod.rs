// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pulse shaping: from a handful of user-set amplitudes to a smooth drive.
//!
//! A shot starts from two [`SampleArray`]s, one amplitude per integer time
//! index `0..N`. The [`smooth`] function fits an interpolating cubic spline
//! through those samples (zero smoothing, so the curve passes through every
//! knot) and evaluates it on a dense uniform grid, producing a
//! [`SmoothedPulse`]. Anything that maps time to a real amplitude implements
//! [`Drive`] and can weight a Hamiltonian term.
//!
//! # Example
//!
//! ```
//! use stirap_sim::pulse::{smooth, Drive};
//!
//! let samples = [0.0, 0.2, 0.8, 1.0, 0.6, 0.1, 0.0, 0.0, 0.0, 0.0];
//! let pulse = smooth(&samples, 9.0).unwrap();
//! assert_eq!(pulse.len(), 500);
//! assert!((pulse.amplitude(9.0) - 0.0).abs() < 1e-12);
//! ```

pub mod drive;
pub mod presets;
pub mod samples;
pub mod smooth;
pub mod spline;

pub use drive::{Drive, SharedDrive, ZeroDrive};
pub use presets::Preset;
pub use samples::SampleArray;
pub use smooth::{linspace, smooth, smooth_with_points, SmoothedPulse, DEFAULT_SMOOTH_POINTS};
pub use spline::{CubicSpline, MIN_SPLINE_POINTS};
