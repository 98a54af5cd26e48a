//! Collocation node families and the quadrature factory.

use std::fmt;
use std::str::FromStr;

use faer::Mat;
use serde::{Deserialize, Serialize};

use super::matrices::{integration_matrix, node_to_node_matrix};
use crate::error::{Result, SdcError};
use crate::polynomial::{
    gauss_legendre_nodes, gauss_legendre_weights, gauss_lobatto_nodes, gauss_lobatto_weights,
    gauss_radau_nodes, gauss_radau_weights,
};

/// Collocation node family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuadratureType {
    /// Both step boundaries are nodes.
    #[default]
    GaussLobatto,
    /// The right step boundary is a node.
    GaussRadau,
    /// Neither step boundary is a node.
    GaussLegendre,
}

impl QuadratureType {
    /// Smallest node count the family is defined for.
    pub fn min_nodes(self) -> usize {
        match self {
            QuadratureType::GaussLobatto => 2,
            QuadratureType::GaussRadau | QuadratureType::GaussLegendre => 1,
        }
    }

    /// Whether τ = 0 is a collocation node.
    pub fn includes_left(self) -> bool {
        matches!(self, QuadratureType::GaussLobatto)
    }

    /// Whether τ = 1 is a collocation node.
    pub fn includes_right(self) -> bool {
        matches!(self, QuadratureType::GaussLobatto | QuadratureType::GaussRadau)
    }

    /// Order of accuracy of the collocation solution with `n` nodes.
    pub fn collocation_order(self, n: usize) -> usize {
        match self {
            QuadratureType::GaussLobatto => 2 * n - 2,
            QuadratureType::GaussRadau => 2 * n - 1,
            QuadratureType::GaussLegendre => 2 * n,
        }
    }

    /// Human-readable name for logging.
    pub fn name(self) -> &'static str {
        match self {
            QuadratureType::GaussLobatto => "gauss-lobatto",
            QuadratureType::GaussRadau => "gauss-radau",
            QuadratureType::GaussLegendre => "gauss-legendre",
        }
    }
}

impl fmt::Display for QuadratureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QuadratureType {
    type Err = SdcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "gauss-lobatto" | "lobatto" | "gausslobatto" => Ok(QuadratureType::GaussLobatto),
            "gauss-radau" | "radau" | "gaussradau" => Ok(QuadratureType::GaussRadau),
            "gauss-legendre" | "legendre" | "gausslegendre" => Ok(QuadratureType::GaussLegendre),
            other => Err(SdcError::invalid_configuration(format!(
                "unknown quadrature type '{other}'"
            ))),
        }
    }
}

/// Collocation rule on the unit step [0, 1].
#[derive(Clone, Debug)]
pub struct Quadrature {
    family: QuadratureType,
    nodes: Vec<f64>,
    weights: Vec<f64>,
    q: Mat<f64>,
    s: Mat<f64>,
}

impl Quadrature {
    /// Node family.
    pub fn family(&self) -> QuadratureType {
        self.family
    }

    /// Number of collocation nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Node positions τ_m in [0, 1], strictly increasing.
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Weights of the rule over [0, 1] (they sum to one).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Integration matrix from the left step boundary, `Q[m][j]`.
    pub fn q_matrix(&self) -> &Mat<f64> {
        &self.q
    }

    /// Node-to-node integration matrix, `S[m][j]`.
    pub fn s_matrix(&self) -> &Mat<f64> {
        &self.s
    }

    /// Whether the last node sits on the right step boundary.
    pub fn right_is_node(&self) -> bool {
        self.family.includes_right()
    }

    /// Substep widths Δτ_m = τ_m - τ_{m-1}, with τ_{-1} = 0.
    pub fn substeps(&self) -> Vec<f64> {
        let mut previous = 0.0;
        self.nodes
            .iter()
            .map(|&tau| {
                let width = tau - previous;
                previous = tau;
                width
            })
            .collect()
    }
}

/// Build the collocation rule with `num_nodes` nodes of the given family.
///
/// Fails with [`SdcError::InvalidConfiguration`] if the family is undefined
/// for that node count (zero nodes, or fewer than two Lobatto nodes).
pub fn quadrature_factory(num_nodes: usize, family: QuadratureType) -> Result<Quadrature> {
    if num_nodes < family.min_nodes() {
        return Err(SdcError::invalid_configuration(format!(
            "{family} quadrature needs at least {} nodes, got {num_nodes}",
            family.min_nodes()
        )));
    }

    let (reference_nodes, reference_weights) = match family {
        QuadratureType::GaussLobatto => {
            let x = gauss_lobatto_nodes(num_nodes - 1);
            let w = gauss_lobatto_weights(num_nodes - 1, &x);
            (x, w)
        }
        QuadratureType::GaussRadau => {
            let x = gauss_radau_nodes(num_nodes);
            let w = gauss_radau_weights(&x);
            (x, w)
        }
        QuadratureType::GaussLegendre => {
            let x = gauss_legendre_nodes(num_nodes);
            let w = gauss_legendre_weights(&x);
            (x, w)
        }
    };

    // [-1, 1] -> [0, 1]
    let nodes: Vec<f64> = reference_nodes.iter().map(|&x| 0.5 * (x + 1.0)).collect();
    let weights: Vec<f64> = reference_weights.iter().map(|&w| 0.5 * w).collect();

    if nodes.windows(2).any(|pair| pair[1] <= pair[0]) {
        return Err(SdcError::invalid_configuration(format!(
            "{family} node generation lost monotonicity at {num_nodes} nodes"
        )));
    }

    let q = integration_matrix(&nodes);
    let s = node_to_node_matrix(&q);

    Ok(Quadrature {
        family,
        nodes,
        weights,
        q,
        s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAMILIES: [QuadratureType; 3] = [
        QuadratureType::GaussLobatto,
        QuadratureType::GaussRadau,
        QuadratureType::GaussLegendre,
    ];

    #[test]
    fn test_zero_nodes_rejected() {
        for family in FAMILIES {
            let result = quadrature_factory(0, family);
            assert!(
                matches!(result, Err(SdcError::InvalidConfiguration(_))),
                "{family} accepted zero nodes"
            );
        }
    }

    #[test]
    fn test_single_lobatto_node_rejected() {
        assert!(quadrature_factory(1, QuadratureType::GaussLobatto).is_err());
        assert!(quadrature_factory(1, QuadratureType::GaussRadau).is_ok());
        assert!(quadrature_factory(1, QuadratureType::GaussLegendre).is_ok());
    }

    #[test]
    fn test_endpoint_inclusion() {
        for family in FAMILIES {
            for n in family.min_nodes()..=7 {
                let quad = quadrature_factory(n, family).unwrap();
                let nodes = quad.nodes();
                assert_eq!(nodes[0] == 0.0, family.includes_left(), "{family}, n={n}");
                assert_eq!(nodes[n - 1] == 1.0, family.includes_right(), "{family}, n={n}");
                assert!(nodes[0] >= 0.0 && nodes[n - 1] <= 1.0);
            }
        }
    }

    #[test]
    fn test_weights_match_last_row_of_q() {
        for family in [QuadratureType::GaussLobatto, QuadratureType::GaussRadau] {
            for n in family.min_nodes()..=6 {
                let quad = quadrature_factory(n, family).unwrap();
                for j in 0..n {
                    let diff = (quad.q_matrix()[(n - 1, j)] - quad.weights()[j]).abs();
                    assert!(diff < 1e-13, "{family}, n={n}, j={j}: diff {diff}");
                }
            }
        }
    }

    #[test]
    fn test_lobatto_first_row_is_zero() {
        let quad = quadrature_factory(4, QuadratureType::GaussLobatto).unwrap();
        for j in 0..4 {
            assert!(quad.q_matrix()[(0, j)].abs() < 1e-15);
            assert!(quad.s_matrix()[(0, j)].abs() < 1e-15);
        }
    }

    #[test]
    fn test_substeps_sum_to_last_node() {
        let quad = quadrature_factory(4, QuadratureType::GaussLegendre).unwrap();
        let total: f64 = quad.substeps().iter().sum();
        assert!((total - quad.nodes()[3]).abs() < 1e-15);
    }

    #[test]
    fn test_parse_quadrature_type() {
        assert_eq!(
            "GaussRadau".parse::<QuadratureType>().unwrap(),
            QuadratureType::GaussRadau
        );
        assert_eq!(
            "gauss_legendre".parse::<QuadratureType>().unwrap(),
            QuadratureType::GaussLegendre
        );
        assert_eq!(
            "lobatto".parse::<QuadratureType>().unwrap(),
            QuadratureType::GaussLobatto
        );
        assert!("simpson".parse::<QuadratureType>().is_err());
    }
}
