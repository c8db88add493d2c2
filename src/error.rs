// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the simulation core.

use std::fmt;

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Simulation error types.
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Config(String),
    /// Input shape or parameter error
    Shape(ShapeError),
    /// Spline fit is under-determined
    DegenerateFit { points: usize, required: usize },
    /// Integration could not produce a trustworthy trajectory
    Numerical(NumericalError),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Shape(e) => write!(f, "Input shape error: {}", e),
            Error::DegenerateFit { points, required } => write!(
                f,
                "Degenerate spline fit: {} points given, at least {} required",
                points, required
            ),
            Error::Numerical(e) => write!(f, "Numerical instability: {}", e),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Shape(e) => Some(e),
            Error::Numerical(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<ShapeError> for Error {
    fn from(e: ShapeError) -> Self {
        Error::Shape(e)
    }
}

impl From<NumericalError> for Error {
    fn from(e: NumericalError) -> Self {
        Error::Numerical(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Caller-supplied data with the wrong shape or an unusable value.
#[derive(Debug)]
pub enum ShapeError {
    /// Sequence length differs from the configured size
    Length {
        field: String,
        expected: usize,
        actual: usize,
    },
    /// Duration does not span the sample indices
    Duration { samples: usize, duration: f64 },
    /// Matrix has the wrong dimensions
    Dimension {
        field: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// Field validation failed
    Field { field: String, message: String },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::Length {
                field,
                expected,
                actual,
            } => write!(
                f,
                "'{}' has length {}, expected {}",
                field, actual, expected
            ),
            ShapeError::Duration { samples, duration } => write!(
                f,
                "duration {} is inconsistent with {} samples (expected {})",
                duration,
                samples,
                samples.saturating_sub(1)
            ),
            ShapeError::Dimension {
                field,
                expected,
                actual,
            } => write!(
                f,
                "'{}' is {} × {}, expected {} × {}",
                field, actual.0, actual.1, expected.0, expected.1
            ),
            ShapeError::Field { field, message } => write!(f, "Field '{}': {}", field, message),
        }
    }
}

impl std::error::Error for ShapeError {}

/// Failures surfaced by the dynamics solver.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericalError {
    /// Hamiltonian contains NaN or Inf
    NonFinite { time: f64 },
    /// Hamiltonian is not Hermitian
    NonHermitian { time: f64, deviation: f64 },
    /// Step controller ran out of steps before reaching the next output time
    StepBudgetExhausted { time: f64, max_steps: usize },
    /// Step size collapsed below floating-point resolution
    StepSizeUnderflow { time: f64, step: f64 },
}

impl fmt::Display for NumericalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericalError::NonFinite { time } => {
                write!(f, "Hamiltonian is not finite at t = {}", time)
            }
            NumericalError::NonHermitian { time, deviation } => write!(
                f,
                "Hamiltonian is not Hermitian at t = {} (max |H - H†| = {:.3e})",
                time, deviation
            ),
            NumericalError::StepBudgetExhausted { time, max_steps } => write!(
                f,
                "step budget of {} exhausted at t = {}",
                max_steps, time
            ),
            NumericalError::StepSizeUnderflow { time, step } => {
                write!(f, "step size {:.3e} underflowed at t = {}", step, time)
            }
        }
    }
}

impl std::error::Error for NumericalError {}
