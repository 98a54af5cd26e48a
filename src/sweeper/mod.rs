//! Collocation sweepers.
//!
//! A sweeper owns the per-node iterates of one time step and knows how to
//! improve them. The step controller drives it through
//! `begin_step -> set_initial_condition -> predict -> (compute_residual, sweep)* -> advance`.

mod imex;

pub use imex::ImexSweeper;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SdcError};
use crate::quadrature::Quadrature;
use crate::state::StateVector;
use crate::types::StepIndex;

/// How the node iterates are initialized before the first sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predictor {
    /// IMEX Euler across the substeps.
    #[default]
    ImexEuler,
    /// Copy the initial condition to every node.
    Spread,
}

impl fmt::Display for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predictor::ImexEuler => f.write_str("imex-euler"),
            Predictor::Spread => f.write_str("spread"),
        }
    }
}

impl FromStr for Predictor {
    type Err = SdcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "imex-euler" | "euler" => Ok(Predictor::ImexEuler),
            "spread" | "copy" => Ok(Predictor::Spread),
            other => Err(SdcError::invalid_configuration(format!(
                "unknown predictor '{other}'"
            ))),
        }
    }
}

/// Per-step protocol of a collocation sweeper.
pub trait Sweeper {
    /// State vector type held at every node.
    type State: StateVector;

    /// Collocation rule used by this sweeper.
    fn quadrature(&self) -> &Quadrature;

    /// Start a new step [t, t + dt) and clear the previous step's state.
    fn begin_step(&mut self, step: StepIndex, t: f64, dt: f64);

    /// Seed the step-initial value.
    ///
    /// Fails with [`SdcError::InvalidState`] once the step has been predicted.
    fn set_initial_condition(&mut self, state: &Self::State) -> Result<()>;

    /// Step-initial value of the current step.
    fn initial_state(&self) -> &Self::State;

    /// Fill every node from the initial condition with the low-order predictor.
    fn predict(&mut self) -> Result<()>;

    /// One correction pass over the nodes, left to right.
    fn sweep(&mut self) -> Result<()>;

    /// Per-node infinity norm of the collocation defect.
    ///
    /// Does not modify the iterates, so repeated calls without an
    /// intervening sweep return the same values.
    fn compute_residual(&mut self) -> Result<&[f64]>;

    /// Make the step's end value available through [`Sweeper::end_state`].
    fn advance(&mut self) -> Result<()>;

    /// End value of the last advanced step.
    fn end_state(&self) -> Option<&Self::State>;
}
