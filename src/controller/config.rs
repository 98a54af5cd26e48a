//! Run configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SdcError};
use crate::quadrature::QuadratureType;
use crate::sweeper::Predictor;

/// Immutable parameters of one SDC run.
///
/// Missing fields in a JSON file take their default values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of collocation nodes per step
    pub num_nodes: usize,
    /// Collocation node family
    pub quad_type: QuadratureType,
    /// Number of spatial elements
    pub num_elem: usize,
    /// Polynomial order of the spatial elements
    pub spatial_order: usize,
    /// Advection velocity a
    pub velocity: f64,
    /// Diffusion coefficient ν
    pub diffusivity: f64,
    /// Length of the periodic domain [0, L]
    pub domain_length: f64,
    /// Start time
    pub t0: f64,
    /// End time
    pub tend: f64,
    /// Step width (the last step may be shorter)
    pub dt: f64,
    /// Maximum SDC iterations per step
    pub max_iterations: usize,
    /// Absolute residual tolerance
    pub abs_residual_tol: f64,
    /// Residual tolerance relative to the step-initial state norm
    pub rel_residual_tol: f64,
    /// Node initialization before the first sweep
    pub predictor: Predictor,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_nodes: 3,
            quad_type: QuadratureType::GaussLobatto,
            num_elem: 10,
            spatial_order: 4,
            velocity: 0.1,
            diffusivity: 0.01,
            domain_length: 1.0,
            t0: 0.0,
            tend: 0.5,
            dt: 0.5,
            max_iterations: 20,
            abs_residual_tol: 1e-10,
            rel_residual_tol: 0.0,
            predictor: Predictor::ImexEuler,
        }
    }
}

impl RunConfig {
    /// Set the collocation rule.
    pub fn with_nodes(mut self, num_nodes: usize, quad_type: QuadratureType) -> Self {
        self.num_nodes = num_nodes;
        self.quad_type = quad_type;
        self
    }

    /// Set the spatial resolution.
    pub fn with_elements(mut self, num_elem: usize, spatial_order: usize) -> Self {
        self.num_elem = num_elem;
        self.spatial_order = spatial_order;
        self
    }

    /// Set the advection-diffusion coefficients.
    pub fn with_physics(mut self, velocity: f64, diffusivity: f64) -> Self {
        self.velocity = velocity;
        self.diffusivity = diffusivity;
        self
    }

    /// Set the length of the periodic domain.
    pub fn with_domain_length(mut self, length: f64) -> Self {
        self.domain_length = length;
        self
    }

    /// Set the integration interval and step width.
    pub fn with_duration(mut self, t0: f64, tend: f64, dt: f64) -> Self {
        self.t0 = t0;
        self.tend = tend;
        self.dt = dt;
        self
    }

    /// Set the per-step iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set absolute and relative residual tolerances.
    pub fn with_tolerances(mut self, abs_residual_tol: f64, rel_residual_tol: f64) -> Self {
        self.abs_residual_tol = abs_residual_tol;
        self.rel_residual_tol = rel_residual_tol;
        self
    }

    /// Set the predictor.
    pub fn with_predictor(mut self, predictor: Predictor) -> Self {
        self.predictor = predictor;
        self
    }

    /// Check every parameter before any work is done.
    pub fn validate(&self) -> Result<()> {
        let min = self.quad_type.min_nodes();
        if self.num_nodes < min {
            return Err(SdcError::invalid_configuration(format!(
                "{} needs at least {min} nodes, got {}",
                self.quad_type, self.num_nodes
            )));
        }
        if self.num_elem == 0 {
            return Err(SdcError::invalid_configuration("num_elem must be positive"));
        }
        if self.spatial_order == 0 {
            return Err(SdcError::invalid_configuration(
                "spatial_order must be positive",
            ));
        }
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(SdcError::invalid_configuration(format!(
                "dt must be positive and finite, got {}",
                self.dt
            )));
        }
        if !self.t0.is_finite() || !self.tend.is_finite() || !(self.tend > self.t0) {
            return Err(SdcError::invalid_configuration(format!(
                "tend ({}) must be greater than t0 ({})",
                self.tend, self.t0
            )));
        }
        for (name, tol) in [
            ("abs_residual_tol", self.abs_residual_tol),
            ("rel_residual_tol", self.rel_residual_tol),
        ] {
            if !(tol >= 0.0) || !tol.is_finite() {
                return Err(SdcError::invalid_configuration(format!(
                    "{name} must be finite and non-negative, got {tol}"
                )));
            }
        }
        if !(self.domain_length > 0.0) || !self.domain_length.is_finite() {
            return Err(SdcError::invalid_configuration(format!(
                "domain_length must be positive, got {}",
                self.domain_length
            )));
        }
        if !self.velocity.is_finite() {
            return Err(SdcError::invalid_configuration("velocity must be finite"));
        }
        if !(self.diffusivity >= 0.0) || !self.diffusivity.is_finite() {
            return Err(SdcError::invalid_configuration(format!(
                "diffusivity must be finite and non-negative, got {}",
                self.diffusivity
            )));
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SdcError::invalid_configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            SdcError::invalid_configuration(format!("cannot parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            SdcError::invalid_configuration(format!("cannot serialize configuration: {e}"))
        })?;
        fs::write(path, content).map_err(|e| {
            SdcError::invalid_configuration(format!("cannot write {}: {e}", path.display()))
        })
    }
}
