//! Gauss-type nodes and weights on [-1, 1].
//!
//! | family | nodes | endpoints | exact up to degree |
//! |---|---|---|---|
//! | Gauss-Legendre | roots of P_n | none | 2n - 1 |
//! | Gauss-Radau (right) | roots of P_{n-1} - P_n | x = 1 | 2n - 2 |
//! | Gauss-Lobatto-Legendre | roots of (1-x²) P'_{n-1} | x = ±1 | 2n - 3 |
//!
//! Interior roots are found by Newton iteration from Chebyshev-type initial
//! guesses. The Legendre and Radau searches deflate previously found roots so
//! that two guesses cannot converge to the same node.

use super::legendre::{legendre, legendre_and_derivative};
use std::f64::consts::PI;

const NEWTON_MAX_ITER: usize = 100;
const NEWTON_TOL: f64 = 1e-15;

/// Newton iteration on f with the roots in `known` divided out.
///
/// For g(x) = f(x) / Π (x - r_k) the Newton step is
/// f / (f' - f Σ 1/(x - r_k)).
fn deflated_newton<F>(f: F, guess: f64, known: &[f64]) -> f64
where
    F: Fn(f64) -> (f64, f64),
{
    let mut x = guess;
    for _ in 0..NEWTON_MAX_ITER {
        let (p, dp) = f(x);
        let deflation: f64 = known.iter().map(|&r| 1.0 / (x - r)).sum();
        let update = p / (dp - p * deflation);
        x -= update;
        if update.abs() < NEWTON_TOL {
            break;
        }
    }
    x
}

// =============================================================================
// Gauss-Legendre
// =============================================================================

/// Compute the n Gauss-Legendre nodes (roots of P_n), ascending.
pub fn gauss_legendre_nodes(n: usize) -> Vec<f64> {
    let mut roots: Vec<f64> = Vec::with_capacity(n);

    // Descending Chebyshev-like guesses: cos(π (i + 3/4) / (n + 1/2))
    for i in 0..n {
        let guess = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let root = deflated_newton(|x| legendre_and_derivative(n, x), guess, &roots);
        roots.push(root);
    }

    roots.reverse();
    roots
}

/// Gauss-Legendre weights: w_j = 2 / ((1 - x_j²) [P'_n(x_j)]²)
pub fn gauss_legendre_weights(nodes: &[f64]) -> Vec<f64> {
    let n = nodes.len();
    nodes
        .iter()
        .map(|&x| {
            let (_, dp) = legendre_and_derivative(n, x);
            2.0 / ((1.0 - x * x) * dp * dp)
        })
        .collect()
}

// =============================================================================
// Gauss-Radau (right endpoint included)
// =============================================================================

/// Compute the n right Gauss-Radau nodes, ascending, with the last node at 1.
///
/// These mirror the left Radau nodes (roots of P_{n-1} + P_n, which include
/// x = -1), so the search runs on the left family and reflects the result.
pub fn gauss_radau_nodes(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![1.0];
    }

    let left_radau = |x: f64| {
        let (p_prev, dp_prev) = legendre_and_derivative(n - 1, x);
        let (p, dp) = legendre_and_derivative(n, x);
        (p_prev + p, dp_prev + dp)
    };

    let mut known = vec![-1.0];
    for j in 1..n {
        let guess = -(2.0 * PI * j as f64 / (2 * n - 1) as f64).cos();
        let root = deflated_newton(left_radau, guess, &known);
        known.push(root);
    }

    known.sort_by(|a, b| a.total_cmp(b));
    let mut nodes: Vec<f64> = known.iter().rev().map(|&x| -x).collect();
    nodes[n - 1] = 1.0;
    nodes
}

/// Right Gauss-Radau weights.
///
/// w = 2/n² at x = 1 and w_j = (1 + x_j) / (n² [P_{n-1}(x_j)]²) elsewhere.
pub fn gauss_radau_weights(nodes: &[f64]) -> Vec<f64> {
    let n = nodes.len();
    let n_sq = (n * n) as f64;
    nodes
        .iter()
        .map(|&x| {
            if (x - 1.0).abs() < 1e-14 {
                2.0 / n_sq
            } else {
                let p = legendre(n - 1, x);
                (1.0 + x) / (n_sq * p * p)
            }
        })
        .collect()
}

// =============================================================================
// Gauss-Lobatto-Legendre
// =============================================================================

/// Compute Gauss-Lobatto-Legendre nodes for polynomial order N.
///
/// Returns N+1 nodes in [-1, 1], including the endpoints.
/// Uses Newton iteration starting from Chebyshev-Lobatto nodes.
pub fn gauss_lobatto_nodes(order: usize) -> Vec<f64> {
    let n = order;

    if n == 0 {
        return vec![0.0];
    }
    if n == 1 {
        return vec![-1.0, 1.0];
    }

    // Chebyshev-Lobatto guesses x_j = -cos(π j / N); endpoints are exact
    let mut nodes: Vec<f64> = (0..=n).map(|j| -(PI * j as f64 / n as f64).cos()).collect();
    nodes[0] = -1.0;
    nodes[n] = 1.0;

    // Interior nodes are roots of L(x) = (1-x²) P'_N(x), and L'(x) = -N(N+1) P_N(x),
    // so the Newton step is x += (1-x²) P'_N / (N(N+1) P_N).
    for x in nodes.iter_mut().take(n).skip(1) {
        for _ in 0..NEWTON_MAX_ITER {
            let (p_n, dp_n) = legendre_and_derivative(n, *x);
            let update = (1.0 - *x * *x) * dp_n / (n as f64 * (n + 1) as f64 * p_n);
            *x += update;
            if update.abs() < NEWTON_TOL {
                break;
            }
        }
    }

    nodes
}

/// Compute Gauss-Lobatto-Legendre weights.
///
/// The weights are: w_j = 2 / (N(N+1) [P_N(x_j)]²)
pub fn gauss_lobatto_weights(order: usize, nodes: &[f64]) -> Vec<f64> {
    let n = order;

    if n == 0 {
        return vec![2.0];
    }

    let denom = (n * (n + 1)) as f64;
    nodes
        .iter()
        .map(|&x| {
            let p_n = legendre(n, x);
            2.0 / (denom * p_n * p_n)
        })
        .collect()
}
