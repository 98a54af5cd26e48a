//! State vector abstraction.
//!
//! The SDC engine needs only a handful of vector-space operations on the
//! per-node states:
//! - `zero`: reset to the additive identity
//! - `axpy`: add a scaled vector (x <- x + alpha * y)
//! - `copy`: independent clone
//! - `infinity_norm`: max absolute component
//!
//! Everything PDE-specific (operator application, implicit solves) is
//! supplied by the spatial collaborator in [`crate::spatial`].
//!
//! # Example
//! ```
//! use sdc_rs::state::{DofVector, StateVector};
//!
//! let mut u = DofVector::from_vec(vec![1.0, -3.0, 2.0]);
//! let v = DofVector::from_vec(vec![1.0, 1.0, 1.0]);
//! u.axpy(2.0, &v).unwrap(); // u = [3, -1, 4]
//! assert_eq!(u.infinity_norm(), 4.0);
//! ```

mod dof_vector;

pub use dof_vector::{DofVector, DofVectorFactory};

use crate::error::Result;

/// Fixed-dimension numeric container used for every collocation node.
pub trait StateVector: Clone + Send + Sized {
    /// Number of degrees of freedom.
    fn dim(&self) -> usize;

    /// Reset every component to zero.
    fn zero(&mut self);

    /// Scaled accumulation: self <- self + alpha * other.
    ///
    /// Fails with [`crate::SdcError::DimensionMismatch`] if the dimensions
    /// differ. Returns `self` so that a norm can be chained.
    fn axpy(&mut self, alpha: f64, other: &Self) -> Result<&mut Self>;

    /// Maximum absolute component.
    fn infinity_norm(&self) -> f64;

    /// Independent copy.
    fn copy(&self) -> Self {
        self.clone()
    }

    /// Zero-initialized vector with the same shape.
    fn zeros_like(&self) -> Self {
        let mut result = self.clone();
        result.zero();
        result
    }
}

/// Produces zero-initialized state vectors of the problem's dimension.
pub trait StateFactory {
    /// State vector type produced.
    type State: StateVector;

    /// Create a zero vector.
    fn create(&self) -> Self::State;

    /// Dimension of the vectors produced.
    fn dim(&self) -> usize;
}
