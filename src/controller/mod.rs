//! Step controller: drives the sweeper across the configured duration.
//!
//! Each step runs the state machine in [`StepState`]:
//!
//! 1. seed the sweeper with the previous end state
//! 2. run the predictor
//! 3. until every node residual is within
//!    `max(abs_residual_tol, rel_residual_tol * ||u0||_∞)`, sweep, unless the
//!    iteration cap is reached first
//!
//! A step that hits the cap is reported and the run continues from its best
//! state. A failed implicit solve aborts the run.

mod config;
mod level;
mod step;

pub use config::RunConfig;
pub use level::Level;
pub use step::{StepOutcome, StepRecord, StepSchedule, StepState, StepWindow, step_schedule};

use tracing::{debug, info, trace, warn};

use crate::error::{Result, SdcError};
use crate::quadrature::QuadratureCache;
use crate::spatial::AdvectionDiffusion1D;
use crate::state::{DofVectorFactory, StateFactory, StateVector};
use crate::sweeper::{ImexSweeper, Sweeper};

/// Result of a completed run.
#[derive(Clone, Debug)]
pub struct RunSummary<S> {
    /// End state of the last step
    pub final_state: S,
    /// Time reached
    pub t_final: f64,
    /// One record per step, in order
    pub steps: Vec<StepRecord>,
}

impl<S> RunSummary<S> {
    /// Number of steps that hit the iteration cap.
    pub fn non_convergent_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::MaxIterReached)
            .count()
    }
}

/// Serial single-level SDC controller.
pub struct SdcController<W, F>
where
    W: Sweeper,
    F: StateFactory<State = W::State>,
{
    config: RunConfig,
    level: Level<W, F>,
}

/// Controller for the reference advection-diffusion problem.
pub type AdvectionDiffusionController =
    SdcController<ImexSweeper<AdvectionDiffusion1D>, DofVectorFactory>;

impl AdvectionDiffusionController {
    /// Build the quadrature, problem, sweeper and level described by `config`.
    pub fn from_config(config: RunConfig) -> Result<Self> {
        config.validate()?;
        let mut cache = QuadratureCache::new();
        let quadrature = cache.get(config.num_nodes, config.quad_type)?;
        let problem = AdvectionDiffusion1D::from_config(&config)?;
        let factory = problem.state_factory();
        let sweeper = ImexSweeper::new(problem, quadrature, &factory, config.predictor)?;
        Self::new(config, Level::new(factory, sweeper))
    }
}

impl<W, F> SdcController<W, F>
where
    W: Sweeper,
    F: StateFactory<State = W::State>,
{
    /// Create a controller; the level must match the configured collocation rule.
    pub fn new(config: RunConfig, level: Level<W, F>) -> Result<Self> {
        config.validate()?;
        if level.num_nodes() != config.num_nodes || level.family() != config.quad_type {
            return Err(SdcError::invalid_configuration(format!(
                "level uses {} {} nodes, configuration asks for {} {} nodes",
                level.num_nodes(),
                level.family(),
                config.num_nodes,
                config.quad_type
            )));
        }
        Ok(Self { config, level })
    }

    /// Run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The level being driven.
    pub fn level(&self) -> &Level<W, F> {
        &self.level
    }

    /// Integrate from `initial` at t0 to tend.
    ///
    /// `callback` is invoked after every step with the step record and its
    /// end state.
    pub fn run<C>(&mut self, initial: &W::State, mut callback: Option<C>) -> Result<RunSummary<W::State>>
    where
        C: FnMut(&StepRecord, &W::State),
    {
        let expected = self.level.factory().dim();
        if initial.dim() != expected {
            return Err(SdcError::dimension_mismatch(expected, initial.dim()));
        }

        let windows = step_schedule(self.config.t0, self.config.tend, self.config.dt)?;
        let step_count = windows.step_count();
        info!(
            num_nodes = self.config.num_nodes,
            quad_type = %self.config.quad_type,
            dt = self.config.dt,
            t0 = self.config.t0,
            tend = self.config.tend,
            steps = step_count,
            "Starting SDC run"
        );

        let mut current = initial.copy();
        let mut steps = Vec::with_capacity(step_count);
        let mut t = self.config.t0;

        for window in windows {
            let record = self.run_step(&window, &current)?;
            current = self
                .level
                .sweeper()
                .end_state()
                .ok_or_else(|| {
                    SdcError::InvalidState(format!("{} produced no end state", window.index))
                })?
                .copy();
            t = window.t_end();

            if let Some(ref mut cb) = callback {
                cb(&record, &current);
            }
            steps.push(record);
        }

        let summary = RunSummary {
            final_state: current,
            t_final: t,
            steps,
        };
        info!(
            steps = summary.steps.len(),
            non_convergent = summary.non_convergent_steps(),
            t_final = summary.t_final,
            "SDC run finished"
        );
        Ok(summary)
    }

    /// Drive one step through its state machine.
    fn run_step(&mut self, window: &StepWindow, initial: &W::State) -> Result<StepRecord> {
        let max_iterations = self.config.max_iterations;
        let tolerance = self
            .config
            .abs_residual_tol
            .max(self.config.rel_residual_tol * initial.infinity_norm());

        let sweeper = self.level.sweeper_mut();
        sweeper.begin_step(window.index, window.t_start, window.dt);
        sweeper.set_initial_condition(initial)?;

        let mut state = StepState::Seeded;
        let mut residual = f64::INFINITY;

        while !state.is_terminal() {
            state = match state {
                StepState::Seeded => StepState::Predicting,
                StepState::Predicting => {
                    sweeper.predict()?;
                    StepState::Sweeping { iteration: 0 }
                }
                StepState::Sweeping { iteration } => {
                    residual = sweeper
                        .compute_residual()?
                        .iter()
                        .copied()
                        .fold(0.0, f64::max);
                    trace!(step = %window.index, iteration, residual, "Residual");

                    if residual <= tolerance {
                        StepState::Converged {
                            iterations: iteration,
                        }
                    } else if iteration >= max_iterations {
                        StepState::MaxIterReached {
                            iterations: iteration,
                        }
                    } else {
                        sweeper.sweep()?;
                        StepState::Sweeping {
                            iteration: iteration + 1,
                        }
                    }
                }
                terminal => terminal,
            };
        }

        sweeper.advance()?;

        let outcome = state.outcome().unwrap_or(StepOutcome::MaxIterReached);
        let record = StepRecord {
            index: window.index,
            t_start: window.t_start,
            dt: window.dt,
            iterations: state.iterations(),
            outcome,
            residual,
        };

        match outcome {
            StepOutcome::Converged => debug!(
                step = %window.index,
                t = window.t_end(),
                iterations = record.iterations,
                residual,
                "Step converged"
            ),
            StepOutcome::MaxIterReached => warn!(
                step = %window.index,
                t = window.t_end(),
                iterations = record.iterations,
                residual,
                tolerance,
                "Step reached the iteration cap without converging"
            ),
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadrature::QuadratureType;
    use crate::spatial::SpatialDiscretization;

    fn small_config() -> RunConfig {
        RunConfig::default()
            .with_elements(6, 4)
            .with_duration(0.0, 0.5, 0.25)
    }

    #[test]
    fn test_run_records_every_step() {
        let mut controller = AdvectionDiffusionController::from_config(small_config()).unwrap();
        let initial = controller.level().sweeper().problem().exact_solution(0.0);

        let mut seen = Vec::new();
        let summary = controller
            .run(
                &initial,
                Some(|record: &StepRecord, _: &crate::state::DofVector| {
                    seen.push(record.index)
                }),
            )
            .unwrap();

        assert_eq!(summary.steps.len(), 2);
        assert_eq!(seen.len(), 2);
        assert!((summary.t_final - 0.5).abs() < 1e-14);
        for step in &summary.steps {
            assert_eq!(step.outcome, StepOutcome::Converged);
            assert!(step.residual <= 1e-10);
        }
    }

    #[test]
    fn test_zero_iterations_runs_predictor_only() {
        let config = small_config()
            .with_max_iterations(0)
            .with_tolerances(1e-14, 0.0);
        let mut controller = AdvectionDiffusionController::from_config(config).unwrap();
        let initial = controller.level().sweeper().problem().exact_solution(0.0);
        let summary = controller
            .run(&initial, None::<fn(&StepRecord, &crate::state::DofVector)>)
            .unwrap();
        for step in &summary.steps {
            assert_eq!(step.iterations, 0);
            assert_eq!(step.outcome, StepOutcome::MaxIterReached);
        }
        assert_eq!(summary.non_convergent_steps(), 2);
    }

    #[test]
    fn test_relative_tolerance_loosens_threshold() {
        // A huge relative tolerance accepts the predictor
        let config = small_config().with_tolerances(0.0, 1.0);
        let mut controller = AdvectionDiffusionController::from_config(config).unwrap();
        let initial = controller.level().sweeper().problem().exact_solution(0.0);
        let summary = controller
            .run(&initial, None::<fn(&StepRecord, &crate::state::DofVector)>)
            .unwrap();
        assert!(summary.steps.iter().all(|s| s.iterations == 0));
        assert_eq!(summary.non_convergent_steps(), 0);
    }

    #[test]
    fn test_initial_state_dimension_checked() {
        let mut controller = AdvectionDiffusionController::from_config(small_config()).unwrap();
        let wrong = crate::state::DofVector::new(3);
        let result = controller.run(&wrong, None::<fn(&StepRecord, &crate::state::DofVector)>);
        assert!(matches!(result, Err(SdcError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_level_must_match_configuration() {
        let config = small_config();
        let controller = AdvectionDiffusionController::from_config(config.clone()).unwrap();
        let SdcController { level, .. } = controller;
        let mismatched = config.with_nodes(4, QuadratureType::GaussRadau);
        assert!(matches!(
            SdcController::new(mismatched, level),
            Err(SdcError::InvalidConfiguration(_))
        ));
    }
}
