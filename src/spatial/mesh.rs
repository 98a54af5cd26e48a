//! 1D periodic mesh with continuous (shared-vertex) node numbering.
//!
//! A mesh partitions [x_min, x_max] into elements. With polynomial order N,
//! element k owns the global nodes k*N .. k*N + N; the last node of element
//! k is the first node of element k+1, and the last node of the last element
//! wraps around to global node 0.

use crate::error::{Result, SdcError};

/// Uniform periodic mesh of an interval.
#[derive(Clone, Debug)]
pub struct PeriodicMesh1D {
    /// Left endpoint of domain
    pub x_min: f64,
    /// Right endpoint of domain
    pub x_max: f64,
    /// Number of elements
    pub n_elements: usize,
    /// Element vertices: vertices[k] is left endpoint of element k
    /// vertices has length n_elements + 1
    pub vertices: Vec<f64>,
    /// Element sizes: h[k] = vertices[k+1] - vertices[k]
    pub element_sizes: Vec<f64>,
}

impl PeriodicMesh1D {
    /// Create a uniform periodic mesh of [x_min, x_max] with n_elements elements.
    pub fn uniform(x_min: f64, x_max: f64, n_elements: usize) -> Result<Self> {
        if n_elements == 0 {
            return Err(SdcError::invalid_configuration(
                "mesh needs at least one element",
            ));
        }
        if !(x_max > x_min) {
            return Err(SdcError::invalid_configuration(format!(
                "domain [{x_min}, {x_max}] is empty"
            )));
        }

        let h = (x_max - x_min) / n_elements as f64;
        let vertices: Vec<f64> = (0..=n_elements).map(|i| x_min + i as f64 * h).collect();
        let element_sizes = vec![h; n_elements];

        Ok(Self {
            x_min,
            x_max,
            n_elements,
            vertices,
            element_sizes,
        })
    }

    /// Domain length x_max - x_min.
    pub fn length(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Map reference coordinate r in [-1, 1] to physical coordinate x in element k.
    ///
    /// x = x_k + (1 + r) * h_k / 2
    pub fn reference_to_physical(&self, k: usize, r: f64) -> f64 {
        let x_left = self.vertices[k];
        let h = self.element_sizes[k];
        x_left + (1.0 + r) * h / 2.0
    }

    /// Jacobian dx/dr for element k.
    pub fn jacobian(&self, k: usize) -> f64 {
        self.element_sizes[k] / 2.0
    }

    /// Inverse Jacobian dr/dx for element k.
    pub fn jacobian_inv(&self, k: usize) -> f64 {
        2.0 / self.element_sizes[k]
    }

    /// Number of global nodes for polynomial order `order`.
    pub fn n_global_nodes(&self, order: usize) -> usize {
        self.n_elements * order
    }

    /// Global index of local node `i` of element `k`.
    pub fn global_index(&self, order: usize, k: usize, i: usize) -> usize {
        (k * order + i) % self.n_global_nodes(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_mesh() {
        let mesh = PeriodicMesh1D::uniform(0.0, 1.0, 4).unwrap();
        assert_eq!(mesh.vertices.len(), 5);
        assert!((mesh.element_sizes[0] - 0.25).abs() < 1e-14);
        assert!((mesh.jacobian(2) - 0.125).abs() < 1e-14);
        assert!((mesh.jacobian(2) * mesh.jacobian_inv(2) - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_reference_mapping() {
        let mesh = PeriodicMesh1D::uniform(0.0, 2.0, 2).unwrap();
        assert!((mesh.reference_to_physical(1, -1.0) - 1.0).abs() < 1e-14);
        assert!((mesh.reference_to_physical(1, 0.0) - 1.5).abs() < 1e-14);
        assert!((mesh.reference_to_physical(1, 1.0) - 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_periodic_numbering() {
        let mesh = PeriodicMesh1D::uniform(0.0, 1.0, 3).unwrap();
        let order = 2;
        assert_eq!(mesh.n_global_nodes(order), 6);
        // Shared vertex between elements 0 and 1
        assert_eq!(mesh.global_index(order, 0, 2), mesh.global_index(order, 1, 0));
        // Last node wraps to the first
        assert_eq!(mesh.global_index(order, 2, 2), 0);
    }

    #[test]
    fn test_invalid_mesh() {
        assert!(PeriodicMesh1D::uniform(0.0, 1.0, 0).is_err());
        assert!(PeriodicMesh1D::uniform(1.0, 1.0, 4).is_err());
    }
}
