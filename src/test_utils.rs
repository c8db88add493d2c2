// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for unit tests.

use crate::config::Config;
use crate::shot::Simulator;

/// Default number of samples per pulse.
pub const NUM_SAMPLES: usize = 10;

/// All-zero samples of the default length.
pub fn zero_samples() -> Vec<f64> {
    vec![0.0; NUM_SAMPLES]
}

/// A Stokes-before-pump pair that transfers most of the population to level 3.
///
/// The Stokes pulse is on from the first interval and ramps down in the second
/// half while the pump ramps up and holds, with both returning to zero at the
/// last sample.
pub fn stirap_pair() -> (Vec<f64>, Vec<f64>) {
    let pump = vec![0.0, 0.67, 0.07, 0.54, 0.89, 1.0, 1.0, 1.0, 1.0, 0.0];
    let stokes = vec![0.0, 0.8, 1.0, 1.0, 1.0, 1.0, 0.84, 0.47, 0.77, 0.0];
    (pump, stokes)
}

/// Simulator with the default configuration.
pub fn default_simulator() -> Simulator {
    Simulator::new(Config::default()).expect("default config is valid")
}
