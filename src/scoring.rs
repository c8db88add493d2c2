// Copyright 2026 STIRAP Game Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scoring engine and session-scoped high score.
//!
//! A shot scores the final-time population of the target level as an integer
//! percentage. [`ScoreSession`] is a plain value owned by the caller;
//! [`SharedSession`] wraps one behind a lock for callers that score from
//! several threads.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dynamics::Trajectory;
use crate::error::{Result, ShapeError};

/// Highest possible score.
pub const MAX_SCORE: u32 = 100;

/// `round(100 · p)` clamped to `[0, 100]`; non-finite populations score 0.
pub fn score_from_population(population: f64) -> u32 {
    if population.is_nan() {
        return 0;
    }
    let percent = (100.0 * population).round();
    percent.clamp(0.0, MAX_SCORE as f64) as u32
}

/// Score a trajectory by the last recorded value of observable `target_level`.
pub fn score(trajectory: &Trajectory, target_level: usize) -> Result<u32> {
    let series = trajectory.expect.get(target_level).ok_or_else(|| ShapeError::Field {
        field: "target_level".into(),
        message: format!(
            "level index {} out of range for {} observables",
            target_level,
            trajectory.expect.len()
        ),
    })?;
    let last = series.last().ok_or_else(|| ShapeError::Field {
        field: "trajectory".into(),
        message: "no recorded populations".into(),
    })?;
    Ok(score_from_population(*last))
}

/// `max(current, previous)`.
pub fn update_high_score(current: u32, previous: u32) -> u32 {
    current.max(previous)
}

/// Current and best score since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSession {
    current: u32,
    high: u32,
}

impl ScoreSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn high_score(&self) -> u32 {
        self.high
    }

    /// Record a shot's score; returns the updated high score.
    pub fn record(&mut self, score: u32) -> u32 {
        self.current = score;
        self.high = update_high_score(score, self.high);
        debug!(score, high_score = self.high, "Recorded score");
        self.high
    }

    /// Zero both scores.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// End the session: returns the high score to submit and resets.
    pub fn finish(&mut self) -> u32 {
        let high = self.high;
        info!(high_score = high, "Session finished");
        self.reset();
        high
    }
}

/// A [`ScoreSession`] shared between threads.
///
/// Each call is a single locked read-modify-write.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<ScoreSession>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, score: u32) -> u32 {
        self.inner.lock().record(score)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ScoreSession {
        *self.inner.lock()
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    pub fn finish(&self) -> u32 {
        self.inner.lock().finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::QuantumState;
    use ndarray::Array1;
    use std::thread;

    fn trajectory_with(final_population: f64) -> Trajectory {
        Trajectory {
            times: vec![0.0, 1.0],
            expect: vec![
                vec![1.0, 1.0 - final_population],
                vec![0.0, 0.0],
                vec![0.0, final_population],
            ],
            states: None,
            final_state: QuantumState::Ket(Array1::zeros(3)),
            accepted_steps: 1,
            rejected_steps: 0,
        }
    }

    #[test]
    fn test_score_rounds() {
        assert_eq!(score_from_population(0.0), 0);
        assert_eq!(score_from_population(0.956), 96);
        assert_eq!(score_from_population(0.954), 95);
        assert_eq!(score_from_population(1.0), 100);
    }

    #[test]
    fn test_score_clamps() {
        assert_eq!(score_from_population(1.0000001), 100);
        assert_eq!(score_from_population(1.3), 100);
        assert_eq!(score_from_population(-1e-9), 0);
        assert_eq!(score_from_population(-0.2), 0);
        assert_eq!(score_from_population(f64::INFINITY), 100);
        assert_eq!(score_from_population(f64::NAN), 0);
    }

    #[test]
    fn test_score_is_monotone() {
        let mut last = 0;
        for k in 0..=1000 {
            let s = score_from_population(k as f64 / 1000.0);
            assert!(s >= last);
            assert!(s <= MAX_SCORE);
            last = s;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn test_score_trajectory() {
        assert_eq!(score(&trajectory_with(0.42), 2).unwrap(), 42);
        assert_eq!(score(&trajectory_with(0.42), 0).unwrap(), 58);
        assert!(score(&trajectory_with(0.42), 3).is_err());
    }

    #[test]
    fn test_score_empty_series() {
        let mut traj = trajectory_with(0.5);
        traj.expect[2].clear();
        assert!(score(&traj, 2).is_err());
    }

    #[test]
    fn test_update_high_score() {
        assert_eq!(update_high_score(40, 70), 70);
        assert_eq!(update_high_score(80, 70), 80);
        assert_eq!(update_high_score(0, 0), 0);
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = ScoreSession::new();
        assert_eq!(session.record(40), 40);
        assert_eq!(session.record(75), 75);
        assert_eq!(session.record(12), 75);
        assert_eq!(session.current(), 12);
        assert_eq!(session.high_score(), 75);

        assert_eq!(session.finish(), 75);
        assert_eq!(session, ScoreSession::default());

        session.record(5);
        session.reset();
        assert_eq!(session.current(), 0);
        assert_eq!(session.high_score(), 0);
    }

    #[test]
    fn test_shared_session_concurrent_records() {
        let session = SharedSession::new();
        let handles: Vec<_> = (0..8u32)
            .map(|worker| {
                let session = session.clone();
                thread::spawn(move || {
                    for k in 0..100u32 {
                        session.record((worker * 7 + k) % 101);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(session.snapshot().high_score(), 100);
        assert_eq!(session.finish(), 100);
        assert_eq!(session.snapshot().high_score(), 0);
    }
}
