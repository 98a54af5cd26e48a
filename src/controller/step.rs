//! Per-step state machine and the step schedule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SdcError};
use crate::types::StepIndex;

/// Relative tolerance when deciding whether the end time has been reached.
const TIME_EPS: f64 = 1e-12;

/// Lifecycle of one time step.
///
/// `Seeded -> Predicting -> Sweeping -> Converged | MaxIterReached`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    /// Initial condition handed to the sweeper.
    Seeded,
    /// Running the predictor.
    Predicting,
    /// Correcting; `iteration` sweeps done so far.
    Sweeping { iteration: usize },
    /// Every node residual met the tolerance.
    Converged { iterations: usize },
    /// The iteration cap was reached first.
    MaxIterReached { iterations: usize },
}

impl StepState {
    /// Whether the step loop is finished.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StepState::Converged { .. } | StepState::MaxIterReached { .. }
        )
    }

    /// Outcome of a terminal state.
    pub fn outcome(self) -> Option<StepOutcome> {
        match self {
            StepState::Converged { .. } => Some(StepOutcome::Converged),
            StepState::MaxIterReached { .. } => Some(StepOutcome::MaxIterReached),
            _ => None,
        }
    }

    /// Sweeps performed so far.
    pub fn iterations(self) -> usize {
        match self {
            StepState::Seeded | StepState::Predicting => 0,
            StepState::Sweeping { iteration } => iteration,
            StepState::Converged { iterations } | StepState::MaxIterReached { iterations } => {
                iterations
            }
        }
    }
}

/// How a step terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Converged,
    MaxIterReached,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Converged => f.write_str("converged"),
            StepOutcome::MaxIterReached => f.write_str("max-iter-reached"),
        }
    }
}

/// Time interval [t_start, t_start + dt) of one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepWindow {
    pub index: StepIndex,
    pub t_start: f64,
    pub dt: f64,
}

impl StepWindow {
    /// Right end of the interval.
    pub fn t_end(&self) -> f64 {
        self.t_start + self.dt
    }
}

/// Summary of a finished step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub index: StepIndex,
    pub t_start: f64,
    pub dt: f64,
    /// Sweeps performed after the predictor
    pub iterations: usize,
    pub outcome: StepOutcome,
    /// Largest node residual when the step terminated
    pub residual: f64,
}

/// Lazy sequence of step windows covering [t0, tend].
///
/// Each window is produced only when the previous one has been taken, the
/// last one shortened so it ends exactly at `tend`.
#[derive(Clone, Debug)]
pub struct StepSchedule {
    t: f64,
    tend: f64,
    dt: f64,
    eps: f64,
    index: StepIndex,
}

impl StepSchedule {
    /// Number of full-width steps plus the remainder step, if any.
    pub fn step_count(&self) -> usize {
        self.clone().count()
    }
}

impl Iterator for StepSchedule {
    type Item = StepWindow;

    fn next(&mut self) -> Option<StepWindow> {
        if self.tend - self.t <= self.eps {
            return None;
        }
        let mut width = self.dt;
        // Don't overshoot end time
        if self.t + width > self.tend - self.eps {
            width = self.tend - self.t;
        }
        let window = StepWindow {
            index: self.index,
            t_start: self.t,
            dt: width,
        };
        self.t += width;
        self.index = self.index.next();
        Some(window)
    }
}

/// Split [t0, tend] into steps of width `dt`, the last one taking the remainder.
///
/// A remainder below floating-point noise is not turned into a step, so an
/// exact multiple of `dt` yields exactly (tend - t0) / dt steps.
pub fn step_schedule(t0: f64, tend: f64, dt: f64) -> Result<StepSchedule> {
    if !(dt > 0.0) || !dt.is_finite() {
        return Err(SdcError::invalid_configuration(format!(
            "dt must be positive and finite, got {dt}"
        )));
    }
    if !(tend > t0) || !tend.is_finite() || !t0.is_finite() {
        return Err(SdcError::invalid_configuration(format!(
            "tend ({tend}) must be finite and greater than t0 ({t0})"
        )));
    }

    Ok(StepSchedule {
        t: t0,
        tend,
        dt,
        eps: TIME_EPS * dt.max(tend.abs()).max(1.0),
        index: StepIndex::ZERO,
    })
}
