// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Time-dependent Hamiltonians for the three-level Lambda system.
//!
//! A [`Hamiltonian`] is a constant drift plus a list of constant Hermitian
//! operators, each weighted by a real [`Drive`](crate::pulse::Drive):
//!
//!   H(t) = H0 + Σ_k f_k(t) H_k
//!
//! [`lambda_hamiltonian`] assembles the five-term RWA Hamiltonian from a pump
//! and a Stokes drive; [`lambda_target`] gives the phase-rotated level-3
//! reference state.

pub mod lambda;
pub mod target;
pub mod types;

pub use lambda::{drift, lambda_hamiltonian, LAMBDA_DIM, TERM_LABELS};
pub use target::{basis_state, lambda_target, rwa_target_state};
pub use types::{ControlTerm, Hamiltonian, LambdaParameters};
