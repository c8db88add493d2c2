// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! User-set pulse samples.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShapeError};
use crate::validation::validate_amplitude;

/// Ordered amplitudes at the integer time indices `0..N`, each in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct SampleArray(Vec<f64>);

impl SampleArray {
    /// Largest magnitude a slider can produce.
    pub const MAX_AMPLITUDE: f64 = 1.0;

    /// Slider positions per unit amplitude.
    pub const SLIDER_SCALE: f64 = 100.0;

    /// Create from amplitudes, rejecting non-finite or out-of-range values.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        validate_amplitude("samples", &values, Self::MAX_AMPLITUDE)?;
        Ok(Self(values))
    }

    /// All-zero array of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self(vec![0.0; n])
    }

    /// Create from integer slider positions in `-100..=100`.
    pub fn from_slider_positions(positions: &[i32]) -> Result<Self> {
        Self::new(
            positions
                .iter()
                .map(|&p| p as f64 / Self::SLIDER_SCALE)
                .collect(),
        )
    }

    /// Set one sample.
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        if index >= self.0.len() {
            return Err(ShapeError::Field {
                field: "samples".into(),
                message: format!("index {} out of range for {} samples", index, self.0.len()),
            }
            .into());
        }
        validate_amplitude("samples", &[value], Self::MAX_AMPLITUDE)?;
        self.0[index] = value;
        Ok(())
    }

    /// Force the first and last samples to zero.
    pub fn pin_endpoints(&mut self) {
        if let Some(first) = self.0.first_mut() {
            *first = 0.0;
        }
        if let Some(last) = self.0.last_mut() {
            *last = 0.0;
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

impl TryFrom<Vec<f64>> for SampleArray {
    type Error = crate::error::Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::new(values)
    }
}

impl From<SampleArray> for Vec<f64> {
    fn from(samples: SampleArray) -> Self {
        samples.0
    }
}

impl AsRef<[f64]> for SampleArray {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
