//! # sdc-rs
//!
//! Spectral Deferred Correction (SDC) time integration with an
//! implicit-explicit (IMEX) split of the right-hand side.
//!
//! This crate provides:
//! - Collocation rules (Gauss-Lobatto, Gauss-Radau, Gauss-Legendre) with
//!   their spectral integration matrices
//! - A state vector abstraction for the per-node iterates
//! - An IMEX SDC sweeper with residual computation
//! - A step controller with residual-based convergence over a fixed duration
//! - Error evaluation and append-only result files
//! - A reference spatial problem: periodic 1D advection-diffusion with
//!   continuous spectral elements
//!
//! # Example
//!
//! ```no_run
//! use sdc_rs::{RunConfig, QuadratureType, run_advection_diffusion};
//!
//! let config = RunConfig::default().with_nodes(5, QuadratureType::GaussLobatto);
//! let report = run_advection_diffusion(&config)?;
//! println!("error = {:e} after {} steps", report.error, report.steps.len());
//! # Ok::<(), sdc_rs::SdcError>(())
//! ```

pub mod controller;
pub mod error;
pub mod polynomial;
pub mod quadrature;
pub mod report;
pub mod spatial;
pub mod state;
pub mod sweeper;
pub mod types;

pub use controller::{
    AdvectionDiffusionController, Level, RunConfig, RunSummary, SdcController, StepOutcome,
    StepRecord, StepSchedule, StepState, StepWindow, step_schedule,
};
pub use error::{Result, SdcError, SinkError, SolveError};
pub use quadrature::{Quadrature, QuadratureCache, QuadratureType, quadrature_factory};
pub use report::{
    ErrorRecord, FileSink, ResultSink, RunReport, run_advection_diffusion, solution_error,
};
pub use spatial::{AdvectionDiffusion1D, PeriodicMesh1D, SpatialDiscretization};
pub use state::{DofVector, DofVectorFactory, StateFactory, StateVector};
pub use sweeper::{ImexSweeper, Predictor, Sweeper};
pub use types::{NodeIndex, StepIndex};
