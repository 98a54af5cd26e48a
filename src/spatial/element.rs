//! Reference element on [-1, 1] with Gauss-Lobatto-Legendre nodes.
//!
//! The Vandermonde matrix V connects nodal and modal representations:
//! - V[i,j] = φ_j(r_i), φ_j the normalized Legendre polynomial
//! - Vr[i,j] = φ'_j(r_i)
//!
//! and the nodal differentiation matrix is Dr = Vr * V^{-1}.

use faer::{Mat, linalg::solvers::Solve};

use crate::error::{Result, SdcError};
use crate::polynomial::{gauss_lobatto_nodes, gauss_lobatto_weights, legendre_and_derivative};

/// GLL reference element of a given polynomial order.
#[derive(Clone)]
pub struct ReferenceElement {
    /// Polynomial order
    pub order: usize,
    /// Number of nodes per element (order + 1)
    pub n_nodes: usize,
    /// Reference nodes in [-1, 1]
    pub nodes: Vec<f64>,
    /// Quadrature weights (diagonal of the reference mass matrix)
    pub weights: Vec<f64>,
    /// Differentiation matrix: Dr[i,j] = dl_j/dr at node i
    pub dr: Mat<f64>,
}

impl ReferenceElement {
    /// Build the reference element for polynomial order `order` (at least 1).
    pub fn new(order: usize) -> Result<Self> {
        if order == 0 {
            return Err(SdcError::invalid_configuration(
                "spatial polynomial order must be at least 1",
            ));
        }
        let n = order + 1;
        let nodes = gauss_lobatto_nodes(order);
        let weights = gauss_lobatto_weights(order, &nodes);

        let mut v = Mat::zeros(n, n);
        let mut vr = Mat::zeros(n, n);
        for (i, &r) in nodes.iter().enumerate() {
            for j in 0..n {
                // Normalization factor: sqrt((2j+1)/2)
                let norm = ((2 * j + 1) as f64 / 2.0).sqrt();
                let (p, dp) = legendre_and_derivative(j, r);
                v[(i, j)] = norm * p;
                vr[(i, j)] = norm * dp;
            }
        }

        // Invert V column by column
        let lu = v.as_ref().partial_piv_lu();
        let mut v_inv = Mat::zeros(n, n);
        for j in 0..n {
            let mut rhs = Mat::zeros(n, 1);
            rhs[(j, 0)] = 1.0;
            let col = lu.solve(&rhs);
            for i in 0..n {
                v_inv[(i, j)] = col[(i, 0)];
            }
        }

        // Dr = Vr * V^{-1}
        let dr = Mat::from_fn(n, n, |i, j| {
            (0..n).map(|k| vr[(i, k)] * v_inv[(k, j)]).sum::<f64>()
        });

        Ok(Self {
            order,
            n_nodes: n,
            nodes,
            weights,
            dr,
        })
    }

    /// Local stiffness matrix on the reference element: K_ij = Σ_q w_q Dr[q,i] Dr[q,j].
    pub fn reference_stiffness(&self) -> Mat<f64> {
        let n = self.n_nodes;
        Mat::from_fn(n, n, |i, j| {
            (0..n)
                .map(|q| self.weights[q] * self.dr[(q, i)] * self.dr[(q, j)])
                .sum::<f64>()
        })
    }

    /// Local convection matrix: C_ij = ∫ l_i dl_j/dr dr = w_i Dr[i,j].
    pub fn reference_convection(&self) -> Mat<f64> {
        let n = self.n_nodes;
        Mat::from_fn(n, n, |i, j| self.weights[i] * self.dr[(i, j)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_differentiation_exact_for_polynomials() {
        let order = 5;
        let elem = ReferenceElement::new(order).unwrap();
        // d/dr (r^3 - 2 r) = 3 r^2 - 2
        let u: Vec<f64> = elem.nodes.iter().map(|&r| r.powi(3) - 2.0 * r).collect();
        for i in 0..elem.n_nodes {
            let du: f64 = (0..elem.n_nodes).map(|j| elem.dr[(i, j)] * u[j]).sum();
            let exact = 3.0 * elem.nodes[i].powi(2) - 2.0;
            assert!(
                (du - exact).abs() < 1e-12,
                "Node {i}: {du} vs {exact}"
            );
        }
    }

    #[test]
    fn test_high_order_differentiation_is_finite() {
        let elem = ReferenceElement::new(24).unwrap();
        // d/dr r = 1
        for i in 0..elem.n_nodes {
            let du: f64 = (0..elem.n_nodes).map(|j| elem.dr[(i, j)] * elem.nodes[j]).sum();
            assert!(du.is_finite(), "Node {i} is not finite");
            assert!((du - 1.0).abs() < 1e-8, "Node {i}: {du}");
        }
    }

    #[test]
    fn test_derivative_of_constant_vanishes() {
        let elem = ReferenceElement::new(4).unwrap();
        for i in 0..elem.n_nodes {
            let row_sum: f64 = (0..elem.n_nodes).map(|j| elem.dr[(i, j)]).sum();
            assert!(row_sum.abs() < 1e-12);
        }
    }

    #[test]
    fn test_stiffness_is_symmetric_with_constant_kernel() {
        let elem = ReferenceElement::new(3).unwrap();
        let k = elem.reference_stiffness();
        for i in 0..elem.n_nodes {
            let row_sum: f64 = (0..elem.n_nodes).map(|j| k[(i, j)]).sum();
            assert!(row_sum.abs() < 1e-12);
            for j in 0..elem.n_nodes {
                assert!((k[(i, j)] - k[(j, i)]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_order_zero_rejected() {
        assert!(ReferenceElement::new(0).is_err());
    }
}
