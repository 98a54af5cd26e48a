//! Error evaluation and reporting at the end of a run.

mod sink;

pub use sink::{ErrorRecord, FileSink, ResultSink};

use std::collections::BTreeMap;

use tracing::info;

use crate::controller::{AdvectionDiffusionController, RunConfig, StepOutcome, StepRecord};
use crate::error::Result;
use crate::spatial::SpatialDiscretization;
use crate::state::{DofVector, StateVector};
use crate::types::StepIndex;

/// Outcome of a run measured against the exact solution.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// ||exact(tend) - u(tend)||_∞
    pub error: f64,
    /// Number of spatial elements
    pub element_count: usize,
    /// Configured step width
    pub dt: f64,
    /// Per-step records in order
    pub steps: Vec<StepRecord>,
    /// Error of every step's end state against the exact solution at its end time
    pub step_errors: BTreeMap<StepIndex, f64>,
}

impl RunReport {
    /// SDC iterations of every step.
    pub fn iterations(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.iterations).collect()
    }

    /// Termination outcome of every step.
    pub fn outcomes(&self) -> Vec<StepOutcome> {
        self.steps.iter().map(|s| s.outcome).collect()
    }

    /// Number of steps that hit the iteration cap.
    pub fn non_convergent_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::MaxIterReached)
            .count()
    }

    /// Record handed to a [`ResultSink`].
    pub fn error_record(&self) -> ErrorRecord {
        ErrorRecord {
            element_count: self.element_count,
            dt: self.dt,
            error: self.error,
        }
    }
}

/// Infinity norm of `exact - computed`.
pub fn solution_error<S: StateVector>(exact: &S, computed: &S) -> Result<f64> {
    let mut diff = exact.copy();
    Ok(diff.axpy(-1.0, computed)?.infinity_norm())
}

/// Run the reference advection-diffusion problem and measure its error.
///
/// The initial condition is the exact solution at t0.
pub fn run_advection_diffusion(config: &RunConfig) -> Result<RunReport> {
    let mut controller = AdvectionDiffusionController::from_config(config.clone())?;
    let problem = controller.level().sweeper().problem().clone();
    let initial = problem.exact_solution(config.t0);

    let mut step_errors = BTreeMap::new();
    let mut step_error_failure = None;
    let summary = controller.run(
        &initial,
        Some(|record: &StepRecord, end_state: &DofVector| {
            let exact = problem.exact_solution(record.t_start + record.dt);
            match solution_error(&exact, end_state) {
                Ok(err) => {
                    step_errors.insert(record.index, err);
                }
                Err(e) => {
                    if step_error_failure.is_none() {
                        step_error_failure = Some(e);
                    }
                }
            }
        }),
    )?;
    if let Some(e) = step_error_failure {
        return Err(e);
    }

    let exact = problem.exact_solution(summary.t_final);
    let error = solution_error(&exact, &summary.final_state)?;

    info!(
        element_count = config.num_elem,
        dt = config.dt,
        error,
        non_convergent = summary.non_convergent_steps(),
        "Computed final error"
    );

    Ok(RunReport {
        error,
        element_count: config.num_elem,
        dt: config.dt,
        steps: summary.steps,
        step_errors,
    })
}
