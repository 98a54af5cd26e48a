//! Implicit-explicit SDC sweeper.
//!
//! With substep widths dt_m = dt (τ_m - τ_{m-1}) and τ_{-1} = 0, one sweep
//! computes, for m = 0..M-1,
//!
//! ```text
//! u_m^{k+1} = u_{m-1}^{k+1}
//!           + dt_m [f_E(u_{m-1}^{k+1}) - f_E(u_{m-1}^k)]
//!           + dt_m [f_I(u_m^{k+1})     - f_I(u_m^k)]
//!           + dt Σ_j S[m][j] f(u_j^k)
//! ```
//!
//! where u_{-1} is the step-initial value. The implicit term is solved by the
//! spatial discretization; a zero-width substep (the left Lobatto node) is
//! a plain copy.

use std::sync::Arc;

use tracing::trace;

use super::{Predictor, Sweeper};
use crate::error::{Result, SdcError};
use crate::quadrature::Quadrature;
use crate::spatial::SpatialDiscretization;
use crate::state::{StateFactory, StateVector};
use crate::types::{NodeIndex, StepIndex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// No initial condition for the current step.
    Empty,
    /// Initial condition set, nodes not yet predicted.
    Seeded,
    /// Nodes hold iterates.
    Active,
}

/// IMEX SDC sweeper over a spatial discretization `P`.
pub struct ImexSweeper<P: SpatialDiscretization> {
    problem: P,
    quadrature: Arc<Quadrature>,
    predictor: Predictor,

    step: StepIndex,
    t: f64,
    dt: f64,
    phase: Phase,

    u0: P::State,
    nodes: Vec<P::State>,
    f_expl: Vec<P::State>,
    f_impl: Vec<P::State>,
    residuals: Vec<f64>,
    end_state: Option<P::State>,
}

impl<P: SpatialDiscretization> ImexSweeper<P> {
    /// Create a sweeper with node storage allocated by `factory`.
    pub fn new<F>(
        problem: P,
        quadrature: Arc<Quadrature>,
        factory: &F,
        predictor: Predictor,
    ) -> Result<Self>
    where
        F: StateFactory<State = P::State>,
    {
        let dofs = problem.degrees_of_freedom_count();
        if factory.dim() != dofs {
            return Err(SdcError::dimension_mismatch(dofs, factory.dim()));
        }

        let n = quadrature.num_nodes();
        let zeros = |_| factory.create();

        Ok(Self {
            problem,
            quadrature,
            predictor,
            step: StepIndex::ZERO,
            t: 0.0,
            dt: 0.0,
            phase: Phase::Empty,
            u0: factory.create(),
            nodes: (0..n).map(zeros).collect(),
            f_expl: (0..n).map(zeros).collect(),
            f_impl: (0..n).map(zeros).collect(),
            residuals: vec![0.0; n],
            end_state: None,
        })
    }

    /// The spatial discretization being integrated.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Predictor used by [`Sweeper::predict`].
    pub fn predictor(&self) -> Predictor {
        self.predictor
    }

    /// Current node iterates.
    pub fn node_values(&self) -> &[P::State] {
        &self.nodes
    }

    fn require_active(&self, operation: &str) -> Result<()> {
        if self.phase != Phase::Active {
            return Err(SdcError::InvalidState(format!(
                "{operation} called on {} before predict",
                self.step
            )));
        }
        Ok(())
    }

    fn node_time(&self, m: usize) -> f64 {
        self.t + self.dt * self.quadrature.nodes()[m]
    }

    /// Re-evaluate f_E and f_I at node m.
    fn evaluate(&mut self, m: usize) -> Result<()> {
        let t_m = self.node_time(m);
        self.f_expl[m] = self.problem.apply_explicit_operator(&self.nodes[m], t_m)?;
        self.f_impl[m] = self.problem.apply_implicit_operator(&self.nodes[m], t_m)?;
        Ok(())
    }

    /// Solve u - dt_m f_I(u) = rhs at node m.
    fn implicit_substep(&self, m: usize, rhs: P::State, dt_m: f64) -> Result<P::State> {
        if dt_m <= 0.0 {
            return Ok(rhs);
        }
        self.problem
            .apply_implicit_operator_and_solve(&rhs, self.node_time(m), dt_m)
            .map_err(|source| SdcError::SweepFailure {
                step: self.step,
                node: NodeIndex::new(m),
                source,
            })
    }

    /// u0 + dt Σ_j A[m][j] (f_E + f_I)(u_j) for a row of the given matrix.
    fn integrate_row(&self, weights: impl Iterator<Item = f64>) -> Result<P::State> {
        let mut acc = self.u0.copy();
        for (j, w) in weights.enumerate() {
            let scaled = self.dt * w;
            acc.axpy(scaled, &self.f_expl[j])?
                .axpy(scaled, &self.f_impl[j])?;
        }
        Ok(acc)
    }
}

impl<P: SpatialDiscretization> Sweeper for ImexSweeper<P> {
    type State = P::State;

    fn quadrature(&self) -> &Quadrature {
        &self.quadrature
    }

    fn begin_step(&mut self, step: StepIndex, t: f64, dt: f64) {
        self.step = step;
        self.t = t;
        self.dt = dt;
        self.phase = Phase::Empty;
        self.end_state = None;
        self.residuals.fill(0.0);
    }

    fn set_initial_condition(&mut self, state: &P::State) -> Result<()> {
        if self.phase == Phase::Active {
            return Err(SdcError::InvalidState(format!(
                "cannot reseed {} after sweeping began",
                self.step
            )));
        }
        if state.dim() != self.u0.dim() {
            return Err(SdcError::dimension_mismatch(self.u0.dim(), state.dim()));
        }
        self.u0 = state.copy();
        self.phase = Phase::Seeded;
        Ok(())
    }

    fn initial_state(&self) -> &P::State {
        &self.u0
    }

    fn predict(&mut self) -> Result<()> {
        match self.phase {
            Phase::Seeded => {}
            Phase::Empty => {
                return Err(SdcError::InvalidState(format!(
                    "{} has no initial condition",
                    self.step
                )));
            }
            Phase::Active => {
                return Err(SdcError::InvalidState(format!(
                    "{} was already predicted",
                    self.step
                )));
            }
        }
        self.phase = Phase::Active;

        let n = self.quadrature.num_nodes();
        match self.predictor {
            Predictor::Spread => {
                for m in 0..n {
                    self.nodes[m] = self.u0.copy();
                    self.evaluate(m)?;
                }
            }
            Predictor::ImexEuler => {
                let substeps = self.quadrature.substeps();
                let mut previous = self.u0.copy();
                let mut f_previous = self.problem.apply_explicit_operator(&self.u0, self.t)?;
                for m in 0..n {
                    let dt_m = self.dt * substeps[m];
                    let mut rhs = previous;
                    rhs.axpy(dt_m, &f_previous)?;
                    self.nodes[m] = self.implicit_substep(m, rhs, dt_m)?;
                    self.evaluate(m)?;
                    previous = self.nodes[m].copy();
                    f_previous = self.f_expl[m].copy();
                }
            }
        }

        trace!(step = %self.step, predictor = %self.predictor, "Predicted nodes");
        Ok(())
    }

    fn sweep(&mut self) -> Result<()> {
        self.require_active("sweep")?;

        let quadrature = Arc::clone(&self.quadrature);
        let n = quadrature.num_nodes();
        let s = quadrature.s_matrix();
        let substeps = quadrature.substeps();

        // dt Σ_j S[m][j] f(u_j^k), all from the previous iterate
        let mut integrals = Vec::with_capacity(n);
        for m in 0..n {
            let mut acc = self.u0.zeros_like();
            for j in 0..n {
                let w = self.dt * s[(m, j)];
                acc.axpy(w, &self.f_expl[j])?.axpy(w, &self.f_impl[j])?;
            }
            integrals.push(acc);
        }
        let old_expl = self.f_expl.clone();
        let old_impl = self.f_impl.clone();

        for m in 0..n {
            let dt_m = self.dt * substeps[m];
            let mut rhs = if m == 0 {
                self.u0.copy()
            } else {
                let mut previous = self.nodes[m - 1].copy();
                previous
                    .axpy(dt_m, &self.f_expl[m - 1])?
                    .axpy(-dt_m, &old_expl[m - 1])?;
                previous
            };
            rhs.axpy(-dt_m, &old_impl[m])?.axpy(1.0, &integrals[m])?;

            self.nodes[m] = self.implicit_substep(m, rhs, dt_m)?;
            self.evaluate(m)?;
        }

        Ok(())
    }

    fn compute_residual(&mut self) -> Result<&[f64]> {
        self.require_active("compute_residual")?;

        let quadrature = Arc::clone(&self.quadrature);
        let q = quadrature.q_matrix();
        let n = quadrature.num_nodes();

        for m in 0..n {
            let mut defect = self.integrate_row((0..n).map(|j| q[(m, j)]))?;
            defect.axpy(-1.0, &self.nodes[m])?;
            self.residuals[m] = defect.infinity_norm();
        }

        Ok(&self.residuals)
    }

    fn advance(&mut self) -> Result<()> {
        self.require_active("advance")?;

        let end = if self.quadrature.right_is_node() {
            let last = self.quadrature.num_nodes() - 1;
            self.nodes[last].copy()
        } else {
            let quadrature = Arc::clone(&self.quadrature);
            self.integrate_row(quadrature.weights().iter().copied())?
        };
        self.end_state = Some(end);
        Ok(())
    }

    fn end_state(&self) -> Option<&P::State> {
        self.end_state.as_ref()
    }
}
