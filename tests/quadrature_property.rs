//! Property tests for the collocation rules.

use proptest::prelude::*;
use sdc_rs::quadrature::{QuadratureType, quadrature_factory};

fn family() -> impl Strategy<Value = QuadratureType> {
    prop_oneof![
        Just(QuadratureType::GaussLobatto),
        Just(QuadratureType::GaussRadau),
        Just(QuadratureType::GaussLegendre),
    ]
}

// Golden test: 3 Lobatto nodes give Simpson's rule.
#[test]
fn golden_simpson() {
    let quad = quadrature_factory(3, QuadratureType::GaussLobatto).unwrap();
    let expected_weights = [1.0 / 6.0, 2.0 / 3.0, 1.0 / 6.0];
    for (w, e) in quad.weights().iter().zip(expected_weights) {
        assert!((w - e).abs() < 1e-14, "weight {w} vs {e}");
    }
    // Q[1] integrates over [0, 1/2]
    let q = quad.q_matrix();
    let expected_mid = [5.0 / 24.0, 1.0 / 3.0, -1.0 / 24.0];
    for (j, e) in expected_mid.iter().enumerate() {
        assert!((q[(1, j)] - e).abs() < 1e-14, "Q[1][{j}] = {} vs {e}", q[(1, j)]);
    }
}

proptest! {
    #[test]
    fn prop_nodes_strictly_increasing_in_unit_interval(n in 2usize..12, family in family()) {
        let quad = quadrature_factory(n, family).unwrap();
        let nodes = quad.nodes();
        prop_assert_eq!(nodes.len(), n);
        prop_assert!(nodes[0] >= 0.0 && nodes[n - 1] <= 1.0);
        for pair in nodes.windows(2) {
            prop_assert!(pair[1] > pair[0], "{:?}", nodes);
        }
        prop_assert_eq!(nodes[0] == 0.0, family.includes_left());
        prop_assert_eq!(nodes[n - 1] == 1.0, family.includes_right());
    }

    #[test]
    fn prop_weights_sum_to_one(n in 1usize..12, family in family()) {
        prop_assume!(n >= family.min_nodes());
        let quad = quadrature_factory(n, family).unwrap();
        let total: f64 = quad.weights().iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-13, "sum = {}", total);
        prop_assert!(quad.weights().iter().all(|&w| w > 0.0));
    }

    #[test]
    fn prop_q_integrates_polynomials(n in 2usize..9, family in family(), degree in 0usize..8) {
        prop_assume!(degree < n);
        let quad = quadrature_factory(n, family).unwrap();
        let q = quad.q_matrix();
        for (m, &tau) in quad.nodes().iter().enumerate() {
            let numerical: f64 = (0..n)
                .map(|j| q[(m, j)] * quad.nodes()[j].powi(degree as i32))
                .sum();
            let exact = tau.powi(degree as i32 + 1) / (degree + 1) as f64;
            prop_assert!((numerical - exact).abs() < 1e-12, "row {}: {} vs {}", m, numerical, exact);
        }
    }

    #[test]
    fn prop_s_rows_sum_to_substeps(n in 2usize..10, family in family()) {
        let quad = quadrature_factory(n, family).unwrap();
        let s = quad.s_matrix();
        for (m, width) in quad.substeps().into_iter().enumerate() {
            let row_sum: f64 = (0..n).map(|j| s[(m, j)]).sum();
            prop_assert!((row_sum - width).abs() < 1e-13);
        }
    }
}
