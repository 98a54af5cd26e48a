//! Spatial discretizations driven by the SDC engine.
//!
//! The engine only sees a [`SpatialDiscretization`]: two operator
//! applications, one implicit solve and an exact-solution evaluator. The
//! reference implementation is [`AdvectionDiffusion1D`], a continuous
//! spectral-element discretization of periodic advection-diffusion.

mod advection_diffusion;
mod element;
mod mesh;

pub use advection_diffusion::AdvectionDiffusion1D;
pub use element::ReferenceElement;
pub use mesh::PeriodicMesh1D;

use crate::error::{Result, SolveError};
use crate::state::StateVector;

/// Semi-discrete right-hand side split as `f(u, t) = f_E(u, t) + f_I(u, t)`.
///
/// `f_E` is treated explicitly and `f_I` implicitly by the sweeper.
pub trait SpatialDiscretization {
    /// State vector type for this discretization.
    type State: StateVector;

    /// Number of spatial degrees of freedom.
    fn degrees_of_freedom_count(&self) -> usize;

    /// Evaluate the explicit (non-stiff) part `f_E(u, t)`.
    fn apply_explicit_operator(&self, u: &Self::State, t: f64) -> Result<Self::State>;

    /// Evaluate the implicit (stiff) part `f_I(u, t)`.
    fn apply_implicit_operator(&self, u: &Self::State, t: f64) -> Result<Self::State>;

    /// Solve `u - dt * f_I(u, t) = rhs` for `u`.
    fn apply_implicit_operator_and_solve(
        &self,
        rhs: &Self::State,
        t: f64,
        dt: f64,
    ) -> std::result::Result<Self::State, SolveError>;

    /// Exact solution sampled at the degrees of freedom.
    fn exact_solution(&self, t: f64) -> Self::State;
}
