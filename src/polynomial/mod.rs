//! Legendre polynomials and Gauss-type node families on [-1, 1].
//!
//! - Legendre polynomial evaluation (three-term recurrence)
//! - Gauss-Legendre, right Gauss-Radau and Gauss-Lobatto-Legendre nodes/weights
//!
//! The collocation rules in [`crate::quadrature`] and the spectral-element
//! reference element in [`crate::spatial`] are both built from these.

mod legendre;
mod nodes;

pub use legendre::{legendre, legendre_and_derivative};
pub use nodes::{
    gauss_legendre_nodes, gauss_legendre_weights, gauss_lobatto_nodes, gauss_lobatto_weights,
    gauss_radau_nodes, gauss_radau_weights,
};
