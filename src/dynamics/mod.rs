// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Time evolution of the Lambda system.
//!
//! Two entry points share one adaptive Dormand–Prince stepper:
//! - [`evolve`]: state vector under the Schrödinger equation
//! - [`evolve_density`]: density matrix under the Lindblad master equation
//!
//! Both record expectation values of the given observables at every output
//! time and fail with a [`NumericalError`](crate::error::NumericalError)
//! instead of returning non-finite results.

mod integrate;
pub mod liouville;
pub mod observables;
pub mod schrodinger;
pub mod types;

pub use liouville::evolve_density;
pub use observables::{expectation, projectors, purity, state_fidelity};
pub use schrodinger::evolve;
pub use types::{CollapseOperator, QuantumState, Representation, SolverConfig, Trajectory};
