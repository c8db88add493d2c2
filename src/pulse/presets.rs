// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Preset waveform seeds for the sample sliders.
//!
//! Presets only ever produce a starting [`SampleArray`]; the simulation core
//! never sees which preset was chosen.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::smooth::linspace;
use super::SampleArray;
use crate::error::Result;

/// Waveform used to seed a sample array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Keep whatever the sliders currently hold.
    #[default]
    FreeHand,
    Sine,
    /// Starts and ends at full amplitude; combine with
    /// [`SampleArray::pin_endpoints`] to zero the ends.
    Cosine,
    /// Unit-width Gaussian centred on the grid.
    Gaussian,
}

impl Preset {
    /// Slider x-grid: `n` points over `[0, 2π]`.
    pub fn x_grid(n: usize) -> Vec<f64> {
        linspace(0.0, 2.0 * PI, n)
    }

    /// Seed values for `n` sliders, or `None` for [`Preset::FreeHand`].
    ///
    /// Values are quantised the way an integer slider stores them.
    pub fn seed(self, n: usize) -> Option<Vec<f64>> {
        let x = Self::x_grid(n);
        let raw: Vec<f64> = match self {
            Preset::FreeHand => return None,
            Preset::Sine => x.iter().map(|v| v.sin()).collect(),
            Preset::Cosine => x.iter().map(|v| v.cos()).collect(),
            Preset::Gaussian => {
                let mean = x.iter().sum::<f64>() / n.max(1) as f64;
                x.iter().map(|v| (-(v - mean).powi(2) / 2.0).exp()).collect()
            }
        };
        Some(raw.into_iter().map(quantize_to_slider).collect())
    }

    /// Apply the preset to `samples`. [`Preset::FreeHand`] leaves them as is.
    pub fn apply(self, samples: &SampleArray) -> Result<SampleArray> {
        match self.seed(samples.len()) {
            Some(values) => SampleArray::new(values),
            None => Ok(samples.clone()),
        }
    }
}

/// Truncate toward zero to the slider resolution (hundredths).
pub fn quantize_to_slider(value: f64) -> f64 {
    (value * SampleArray::SLIDER_SCALE).trunc() / SampleArray::SLIDER_SCALE
}
