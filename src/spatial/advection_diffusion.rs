//! Periodic linear advection-diffusion, u_t + a u_x = ν u_xx.
//!
//! Continuous Galerkin spectral elements on GLL nodes with the mass matrix
//! lumped onto the quadrature weights:
//!
//! - explicit part: f_E(u) = -a M^{-1} C u
//! - implicit part: f_I(u) = -ν M^{-1} K u
//! - implicit solve: (M + dt ν K) u = M rhs
//!
//! The LU factors of the implicit system are cached per `dt`, since a run
//! only ever solves with one width per collocation substep.
//!
//! With k = 2π / L the exact solution is
//! u(x, t) = exp(-ν k² t) sin(k (x - a t)).

use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::{Arc, Mutex, PoisonError};

use faer::Mat;
use faer::linalg::solvers::{PartialPivLu, Solve};
use tracing::trace;

use super::SpatialDiscretization;
use super::element::ReferenceElement;
use super::mesh::PeriodicMesh1D;
use crate::controller::RunConfig;
use crate::error::{Result, SdcError, SolveError};
use crate::state::{DofVector, DofVectorFactory};

/// Relative residual above which an implicit solve is reported as singular.
const SOLVE_RESIDUAL_TOL: f64 = 1e-8;

/// Distinct step widths kept factored before the cache is flushed.
const MAX_CACHED_FACTORIZATIONS: usize = 16;

/// LU factors of `M + dt ν K`, keyed by the bit pattern of `dt`.
type FactorizationCache = Mutex<HashMap<u64, Arc<PartialPivLu<f64>>>>;

/// Spectral-element advection-diffusion problem on a periodic interval.
#[derive(Clone)]
pub struct AdvectionDiffusion1D {
    mesh: PeriodicMesh1D,
    element: ReferenceElement,
    velocity: f64,
    diffusivity: f64,
    /// Lumped global mass, one entry per degree of freedom
    mass: Vec<f64>,
    /// Assembled global stiffness matrix
    stiffness: Mat<f64>,
    /// Reference convection matrix (independent of the element size)
    convection: Mat<f64>,
    /// Physical coordinate of every degree of freedom
    positions: Vec<f64>,
    /// Factored implicit systems, shared between clones
    factorizations: Arc<FactorizationCache>,
}

impl AdvectionDiffusion1D {
    /// Discretize on `mesh` with polynomial order `order`.
    pub fn new(
        mesh: PeriodicMesh1D,
        order: usize,
        velocity: f64,
        diffusivity: f64,
    ) -> Result<Self> {
        if !velocity.is_finite() {
            return Err(SdcError::invalid_configuration(format!(
                "advection velocity must be finite, got {velocity}"
            )));
        }
        if !(diffusivity >= 0.0) || !diffusivity.is_finite() {
            return Err(SdcError::invalid_configuration(format!(
                "diffusivity must be finite and non-negative, got {diffusivity}"
            )));
        }

        let element = ReferenceElement::new(order)?;
        let n_dofs = mesh.n_global_nodes(order);

        let mut mass = vec![0.0; n_dofs];
        let mut positions = vec![0.0; n_dofs];
        let mut stiffness = Mat::zeros(n_dofs, n_dofs);
        let reference_stiffness = element.reference_stiffness();

        for k in 0..mesh.n_elements {
            let jac = mesh.jacobian(k);
            let jac_inv = mesh.jacobian_inv(k);
            for i in 0..element.n_nodes {
                let gi = mesh.global_index(order, k, i);
                mass[gi] += element.weights[i] * jac;
                if i < order {
                    positions[gi] = mesh.reference_to_physical(k, element.nodes[i]);
                }
                for j in 0..element.n_nodes {
                    let gj = mesh.global_index(order, k, j);
                    stiffness[(gi, gj)] += jac_inv * reference_stiffness[(i, j)];
                }
            }
        }

        let convection = element.reference_convection();

        Ok(Self {
            mesh,
            element,
            velocity,
            diffusivity,
            mass,
            stiffness,
            convection,
            positions,
            factorizations: Arc::default(),
        })
    }

    /// Build the problem described by a run configuration on [0, L].
    pub fn from_config(config: &RunConfig) -> Result<Self> {
        let mesh = PeriodicMesh1D::uniform(0.0, config.domain_length, config.num_elem)?;
        Self::new(
            mesh,
            config.spatial_order,
            config.velocity,
            config.diffusivity,
        )
    }

    /// Physical coordinates of the degrees of freedom.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Factory for state vectors of this problem's dimension.
    pub fn state_factory(&self) -> DofVectorFactory {
        DofVectorFactory::new(self.mass.len())
    }

    /// Number of step widths with a cached factorization.
    pub fn cached_factorizations(&self) -> usize {
        self.factorizations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// LU factors of `M + dt ν K`, factoring on first use of `dt`.
    fn implicit_factorization(&self, dt: f64) -> Arc<PartialPivLu<f64>> {
        let mut cache = self
            .factorizations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(lu) = cache.get(&dt.to_bits()) {
            return Arc::clone(lu);
        }

        let n = self.mass.len();
        let nu_dt = dt * self.diffusivity;
        let system = Mat::from_fn(n, n, |i, j| {
            let diagonal = if i == j { self.mass[i] } else { 0.0 };
            diagonal + nu_dt * self.stiffness[(i, j)]
        });
        let lu = Arc::new(system.as_ref().partial_piv_lu());
        trace!(dt, dofs = n, "Factored implicit system");

        if cache.len() >= MAX_CACHED_FACTORIZATIONS {
            cache.clear();
        }
        cache.insert(dt.to_bits(), Arc::clone(&lu));
        lu
    }

    fn check_dim(&self, u: &DofVector) -> Result<()> {
        if u.len() != self.mass.len() {
            return Err(SdcError::dimension_mismatch(self.mass.len(), u.len()));
        }
        Ok(())
    }

    /// Local product `scale(k) * A u_k` for element k.
    fn local_product<F>(&self, matrix: &Mat<f64>, scale: &F, k: usize, u: &DofVector) -> Vec<f64>
    where
        F: Fn(usize) -> f64,
    {
        let order = self.element.order;
        let n = self.element.n_nodes;
        let u_k: Vec<f64> = (0..n)
            .map(|j| u.data[self.mesh.global_index(order, k, j)])
            .collect();
        let s = scale(k);
        (0..n)
            .map(|i| s * (0..n).map(|j| matrix[(i, j)] * u_k[j]).sum::<f64>())
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn element_products<F>(&self, matrix: &Mat<f64>, scale: F, u: &DofVector) -> Vec<Vec<f64>>
    where
        F: Fn(usize) -> f64 + Sync,
    {
        (0..self.mesh.n_elements)
            .map(|k| self.local_product(matrix, &scale, k, u))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn element_products<F>(&self, matrix: &Mat<f64>, scale: F, u: &DofVector) -> Vec<Vec<f64>>
    where
        F: Fn(usize) -> f64 + Sync,
    {
        use rayon::prelude::*;

        (0..self.mesh.n_elements)
            .into_par_iter()
            .map(|k| self.local_product(matrix, &scale, k, u))
            .collect()
    }

    /// Assemble `-coeff * M^{-1} A u` from element contributions.
    fn apply_assembled<F>(
        &self,
        matrix: &Mat<f64>,
        scale: F,
        coeff: f64,
        u: &DofVector,
    ) -> DofVector
    where
        F: Fn(usize) -> f64 + Sync,
    {
        let order = self.element.order;
        let mut out = DofVector::new(self.mass.len());
        for (k, local) in self.element_products(matrix, scale, u).into_iter().enumerate() {
            for (i, value) in local.into_iter().enumerate() {
                out.data[self.mesh.global_index(order, k, i)] += value;
            }
        }
        for (v, &m) in out.data.iter_mut().zip(&self.mass) {
            *v *= -coeff / m;
        }
        out
    }
}

impl SpatialDiscretization for AdvectionDiffusion1D {
    type State = DofVector;

    fn degrees_of_freedom_count(&self) -> usize {
        self.mass.len()
    }

    fn apply_explicit_operator(&self, u: &DofVector, _t: f64) -> Result<DofVector> {
        self.check_dim(u)?;
        Ok(self.apply_assembled(&self.convection, |_| 1.0, self.velocity, u))
    }

    fn apply_implicit_operator(&self, u: &DofVector, _t: f64) -> Result<DofVector> {
        self.check_dim(u)?;
        let reference_stiffness = self.element.reference_stiffness();
        let mesh = &self.mesh;
        Ok(self.apply_assembled(
            &reference_stiffness,
            |k| mesh.jacobian_inv(k),
            self.diffusivity,
            u,
        ))
    }

    fn apply_implicit_operator_and_solve(
        &self,
        rhs: &DofVector,
        _t: f64,
        dt: f64,
    ) -> std::result::Result<DofVector, SolveError> {
        let n = self.mass.len();
        if rhs.len() != n {
            return Err(SolveError::DimensionMismatch {
                expected: n,
                actual: rhs.len(),
            });
        }

        // (M + dt ν K) u = M rhs
        let b = Mat::from_fn(n, 1, |i, _| self.mass[i] * rhs.data[i]);
        let x = self.implicit_factorization(dt).solve(&b);
        let solution = DofVector::from_vec((0..n).map(|i| x[(i, 0)]).collect());

        if let Some(dof) = solution.first_non_finite() {
            return Err(SolveError::NonFinite { dof });
        }

        // Defect M (u - dt f_I(u)) - M rhs, evaluated element by element
        let reference_stiffness = self.element.reference_stiffness();
        let mesh = &self.mesh;
        let fi = self.apply_assembled(
            &reference_stiffness,
            |k| mesh.jacobian_inv(k),
            self.diffusivity,
            &solution,
        );
        let b_norm = (0..n).map(|i| b[(i, 0)].abs()).fold(0.0_f64, f64::max);
        let defect = (0..n)
            .map(|i| (self.mass[i] * (solution.data[i] - dt * fi.data[i]) - b[(i, 0)]).abs())
            .fold(0.0_f64, f64::max);
        if defect > SOLVE_RESIDUAL_TOL * b_norm.max(1.0) {
            return Err(SolveError::Singular(format!(
                "implicit system residual {defect:.3e} with dt = {dt}"
            )));
        }

        Ok(solution)
    }

    fn exact_solution(&self, t: f64) -> DofVector {
        let wavenumber = 2.0 * PI / self.mesh.length();
        let decay = (-self.diffusivity * wavenumber * wavenumber * t).exp();
        DofVector::from_vec(
            self.positions
                .iter()
                .map(|&x| decay * (wavenumber * (x - self.velocity * t)).sin())
                .collect(),
        )
    }
}
