//! Collocation quadrature on the unit step interval [0, 1].
//!
//! A [`Quadrature`] carries the collocation nodes τ_m of one node family,
//! the weights of the rule over the whole step and the spectral integration
//! matrices used by the sweeper:
//!
//! - `Q[m][j] = ∫_0^{τ_m} l_j(s) ds` (from the left step boundary)
//! - `S[m][j] = ∫_{τ_{m-1}}^{τ_m} l_j(s) ds` with τ_{-1} = 0
//!
//! where l_j is the Lagrange polynomial of node j. For Gauss-Lobatto the
//! left step boundary coincides with τ_0, so the first rows of Q and S
//! vanish.
//!
//! # Example
//! ```
//! use sdc_rs::quadrature::{QuadratureType, quadrature_factory};
//!
//! let quad = quadrature_factory(3, QuadratureType::GaussLobatto).unwrap();
//! assert_eq!(quad.nodes(), &[0.0, 0.5, 1.0]);
//! // Simpson's rule
//! assert!((quad.weights()[1] - 2.0 / 3.0).abs() < 1e-14);
//! ```

mod cache;
mod matrices;
mod rule;

pub use cache::QuadratureCache;
pub use matrices::{integration_matrix, lagrange_basis, node_to_node_matrix};
pub use rule::{Quadrature, QuadratureType, quadrature_factory};
