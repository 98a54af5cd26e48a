//! Spectral integration matrices for a set of collocation nodes.
//!
//! Integrals of the Lagrange basis are evaluated with an n-point
//! Gauss-Legendre rule mapped to each sub-interval. The basis polynomials have
//! degree n-1 and the rule is exact up to degree 2n-1, so the matrices are
//! exact up to round-off.

use faer::Mat;

use crate::polynomial::{gauss_legendre_nodes, gauss_legendre_weights};

/// Evaluate the Lagrange polynomial of node `j` at `s`.
///
/// l_j(s) = Π_{k≠j} (s - τ_k) / (τ_j - τ_k)
pub fn lagrange_basis(nodes: &[f64], j: usize, s: f64) -> f64 {
    nodes
        .iter()
        .enumerate()
        .filter(|&(k, _)| k != j)
        .fold(1.0, |acc, (_, &tau_k)| {
            acc * (s - tau_k) / (nodes[j] - tau_k)
        })
}

/// Integral of each Lagrange basis polynomial over [a, b].
fn integrate_basis(nodes: &[f64], gauss: &[(f64, f64)], a: f64, b: f64) -> Vec<f64> {
    let half = 0.5 * (b - a);
    (0..nodes.len())
        .map(|j| {
            gauss
                .iter()
                .map(|&(x, w)| {
                    let s = a + half * (x + 1.0);
                    w * lagrange_basis(nodes, j, s)
                })
                .sum::<f64>()
                * half
        })
        .collect()
}

/// Build Q with `Q[m][j] = ∫_0^{τ_m} l_j(s) ds`.
///
/// The last row of Q for a family that includes τ = 1 equals the weights of
/// the collocation rule.
pub fn integration_matrix(nodes: &[f64]) -> Mat<f64> {
    let n = nodes.len();
    let gauss_x = gauss_legendre_nodes(n);
    let gauss_w = gauss_legendre_weights(&gauss_x);
    let gauss: Vec<(f64, f64)> = gauss_x.into_iter().zip(gauss_w).collect();

    let mut q = Mat::zeros(n, n);
    for (m, &tau_m) in nodes.iter().enumerate() {
        let row = integrate_basis(nodes, &gauss, 0.0, tau_m);
        for (j, value) in row.into_iter().enumerate() {
            q[(m, j)] = value;
        }
    }
    q
}

/// Build S from Q: `S[0] = Q[0]`, `S[m] = Q[m] - Q[m-1]`.
pub fn node_to_node_matrix(q: &Mat<f64>) -> Mat<f64> {
    let n = q.nrows();
    let mut s = Mat::zeros(n, q.ncols());
    for j in 0..q.ncols() {
        s[(0, j)] = q[(0, j)];
        for m in 1..n {
            s[(m, j)] = q[(m, j)] - q[(m - 1, j)];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lagrange_is_cardinal() {
        let nodes = [0.0, 0.3, 0.7, 1.0];
        for j in 0..nodes.len() {
            for (k, &tau) in nodes.iter().enumerate() {
                let expected = if j == k { 1.0 } else { 0.0 };
                assert!((lagrange_basis(&nodes, j, tau) - expected).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_rows_integrate_polynomials() {
        // Σ_j Q[m][j] τ_j^k = τ_m^{k+1} / (k+1) for k < n
        let nodes = [0.1, 0.35, 0.8, 0.95];
        let q = integration_matrix(&nodes);
        for k in 0..nodes.len() {
            for (m, &tau_m) in nodes.iter().enumerate() {
                let numerical: f64 = (0..nodes.len())
                    .map(|j| q[(m, j)] * nodes[j].powi(k as i32))
                    .sum();
                let exact = tau_m.powi(k as i32 + 1) / (k + 1) as f64;
                assert!(
                    (numerical - exact).abs() < 1e-13,
                    "Row {m}, degree {k}: {numerical} vs {exact}"
                );
            }
        }
    }

    #[test]
    fn test_node_to_node_rows_sum_to_spacing() {
        let nodes = [0.2, 0.5, 1.0];
        let q = integration_matrix(&nodes);
        let s = node_to_node_matrix(&q);
        let mut previous = 0.0;
        for (m, &tau) in nodes.iter().enumerate() {
            let row_sum: f64 = (0..nodes.len()).map(|j| s[(m, j)]).sum();
            assert!((row_sum - (tau - previous)).abs() < 1e-14);
            previous = tau;
        }
    }
}
