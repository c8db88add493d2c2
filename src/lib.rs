// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! STIRAP pulse game core
//!
//! A player sketches pump and Stokes pulse envelopes as a handful of
//! amplitude samples. This crate smooths them into drive functions, builds
//! the time-dependent Hamiltonian of a three-level Lambda system, integrates
//! its evolution from level 1, and scores the population left on level 3.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌──────────────┐   ┌───────────┐
//! │ pulse        │──►│ hamiltonian   │──►│ dynamics     │──►│ scoring   │
//! │ samples,     │   │ Lambda RWA    │   │ DP45, ket /  │   │ score,    │
//! │ spline       │   │ H(t), target  │   │ density      │   │ session   │
//! └──────────────┘   └───────────────┘   └──────────────┘   └───────────┘
//!                         shot::Simulator ties them together
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`pulse`]: Sample arrays, spline smoothing, drive functions
//! - [`hamiltonian`]: Hamiltonian decomposition and target state
//! - [`dynamics`]: Adaptive integration and observables
//! - [`scoring`]: Scores and session high score
//! - [`shot`]: The end-to-end pipeline
//! - [`validation`]: Input validation utilities
//! - [`error`]: Error types

pub mod config;
pub mod dynamics;
pub mod error;
pub mod hamiltonian;
pub mod pulse;
pub mod scoring;
pub mod shot;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use shot::{ShotOutcome, ShotReport, Simulator};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
