//! Contiguous `f64` storage for spatial degrees of freedom.

use super::{StateFactory, StateVector};
use crate::error::{Result, SdcError};

/// Vector of spatial degrees of freedom.
#[derive(Clone, Debug, PartialEq)]
pub struct DofVector {
    /// Nodal values, one per global degree of freedom.
    pub data: Vec<f64>,
}

impl DofVector {
    /// Create a zero vector of length `n`.
    pub fn new(n: usize) -> Self {
        Self { data: vec![0.0; n] }
    }

    /// Wrap existing values.
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector has no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Index of the first NaN or Inf entry, if any.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.data.iter().position(|v| !v.is_finite())
    }
}

impl StateVector for DofVector {
    fn dim(&self) -> usize {
        self.data.len()
    }

    fn zero(&mut self) {
        self.data.fill(0.0);
    }

    fn axpy(&mut self, alpha: f64, other: &Self) -> Result<&mut Self> {
        if self.data.len() != other.data.len() {
            return Err(SdcError::dimension_mismatch(
                self.data.len(),
                other.data.len(),
            ));
        }
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += alpha * *b;
        }
        Ok(self)
    }

    fn infinity_norm(&self) -> f64 {
        self.data.iter().map(|&x| x.abs()).fold(0.0, f64::max)
    }
}

/// Factory for [`DofVector`]s of a fixed length.
#[derive(Clone, Copy, Debug)]
pub struct DofVectorFactory {
    dofs: usize,
}

impl DofVectorFactory {
    /// Create a factory for vectors with `dofs` entries.
    pub fn new(dofs: usize) -> Self {
        Self { dofs }
    }
}

impl StateFactory for DofVectorFactory {
    type State = DofVector;

    fn create(&self) -> DofVector {
        DofVector::new(self.dofs)
    }

    fn dim(&self) -> usize {
        self.dofs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axpy() {
        let mut a = DofVector::from_vec(vec![1.0; 6]);
        let b = DofVector::from_vec(vec![2.0; 6]);

        a.axpy(0.5, &b).unwrap(); // a = 1 + 0.5 * 2 = 2

        for &v in &a.data {
            assert!((v - 2.0).abs() < 1e-14);
        }
    }

    #[test]
    fn test_axpy_dimension_mismatch() {
        let mut a = DofVector::new(3);
        let b = DofVector::new(4);
        let err = a.axpy(1.0, &b).unwrap_err();
        assert!(matches!(
            err,
            SdcError::DimensionMismatch {
                expected: 3,
                actual: 4
            }
        ));
    }

    #[test]
    fn test_axpy_chains_into_norm() {
        let mut exact = DofVector::from_vec(vec![1.0, 2.0, 3.0]);
        let computed = DofVector::from_vec(vec![1.0, 2.5, 2.9]);
        let error = exact.axpy(-1.0, &computed).unwrap().infinity_norm();
        assert!((error - 0.5).abs() < 1e-14);
    }

    #[test]
    fn test_zero_and_copy_are_independent() {
        let source = DofVector::from_vec(vec![4.0, -5.0]);
        let mut copy = source.copy();
        copy.zero();
        assert_eq!(copy.infinity_norm(), 0.0);
        assert_eq!(source.infinity_norm(), 5.0);
    }

    #[test]
    fn test_factory_produces_zero_vectors() {
        let factory = DofVectorFactory::new(7);
        let v = factory.create();
        assert_eq!(v.len(), 7);
        assert_eq!(factory.dim(), 7);
        assert!(v.data.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_first_non_finite() {
        let mut v = DofVector::from_vec(vec![0.0, 1.0, 2.0]);
        assert_eq!(v.first_non_finite(), None);
        v.data[1] = f64::NAN;
        assert_eq!(v.first_non_finite(), Some(1));
    }
}
