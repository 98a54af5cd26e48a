//! End-to-end tests of SDC on the periodic advection-diffusion problem.
//!
//! u_t + a u_x = ν u_xx on [0, 1], u(x, 0) = sin(2πx).

use sdc_rs::{
    Predictor, QuadratureType, RunConfig, SdcError, StepOutcome, run_advection_diffusion,
};

/// Spatial resolution fine enough that the time error dominates.
fn fine_space() -> RunConfig {
    RunConfig::default()
        .with_elements(16, 8)
        .with_tolerances(1e-12, 0.0)
        .with_max_iterations(50)
}

#[test]
fn test_default_configuration_is_accurate() {
    let report = run_advection_diffusion(&RunConfig::default()).unwrap();
    println!("Default run: error={:.4e}, iterations={:?}", report.error, report.iterations());

    assert_eq!(report.steps.len(), 1);
    assert!(report.error < 1e-3, "error {:e}", report.error);
}

#[test]
fn test_more_nodes_reduce_error() {
    let errors: Vec<f64> = [3, 4, 5]
        .iter()
        .map(|&n| {
            let config = fine_space().with_nodes(n, QuadratureType::GaussLobatto);
            run_advection_diffusion(&config).unwrap().error
        })
        .collect();

    println!("Lobatto nodes 3..=5:");
    for (n, err) in (3..).zip(&errors) {
        println!("  M={n}: error={err:.4e}");
    }

    assert!(errors[0] < 1e-3);
    assert!(errors[1] < errors[0], "4 nodes: {:e} vs {:e}", errors[1], errors[0]);
    assert!(errors[2] < errors[1], "5 nodes: {:e} vs {:e}", errors[2], errors[1]);
}

#[test]
fn test_temporal_convergence_rate() {
    // 3 Lobatto nodes: collocation order 4
    let dts = [0.5, 0.25];
    let errors: Vec<f64> = dts
        .iter()
        .map(|&dt| {
            let config = fine_space()
                .with_nodes(3, QuadratureType::GaussLobatto)
                .with_duration(0.0, 1.0, dt);
            run_advection_diffusion(&config).unwrap().error
        })
        .collect();

    let observed_order = (errors[0] / errors[1]).log2();
    let expected_order = QuadratureType::GaussLobatto.collocation_order(3) as f64;
    println!(
        "dt={}: {:.4e}, dt={}: {:.4e}, order={:.2}",
        dts[0], errors[0], dts[1], errors[1], observed_order
    );
    assert!(
        observed_order > expected_order - 1.0,
        "observed order {observed_order:.2}, expected {expected_order}"
    );
}

#[test]
fn test_all_node_families() {
    for (family, n) in [
        (QuadratureType::GaussLobatto, 3),
        (QuadratureType::GaussRadau, 3),
        (QuadratureType::GaussLegendre, 3),
    ] {
        let config = RunConfig::default().with_nodes(n, family);
        let report = run_advection_diffusion(&config).unwrap();
        println!("{family}: error={:.4e}", report.error);
        assert!(report.error < 1e-3, "{family}: error {:e}", report.error);
    }
}

#[test]
fn test_zero_nodes_is_a_configuration_error() {
    for family in [
        QuadratureType::GaussLobatto,
        QuadratureType::GaussRadau,
        QuadratureType::GaussLegendre,
    ] {
        let config = RunConfig::default().with_nodes(0, family);
        let result = run_advection_diffusion(&config);
        assert!(
            matches!(result, Err(SdcError::InvalidConfiguration(_))),
            "{family}: {result:?}"
        );
    }
}

#[test]
fn test_iteration_cap_is_not_fatal() {
    let config = RunConfig::default()
        .with_duration(0.0, 1.0, 0.25)
        .with_tolerances(1e-14, 0.0)
        .with_max_iterations(1);
    let report = run_advection_diffusion(&config).unwrap();

    assert_eq!(report.steps.len(), 4);
    assert!(
        report
            .outcomes()
            .iter()
            .all(|&o| o == StepOutcome::MaxIterReached)
    );
    assert_eq!(report.non_convergent_steps(), 4);
    assert!(report.iterations().iter().all(|&it| it == 1));
    assert!(report.error.is_finite());
}

#[test]
fn test_remainder_step_reaches_end_time() {
    let config = RunConfig::default().with_duration(0.0, 0.5, 0.3);
    let report = run_advection_diffusion(&config).unwrap();

    assert_eq!(report.steps.len(), 2);
    assert!((report.steps[0].dt - 0.3).abs() < 1e-15);
    assert!((report.steps[1].dt - 0.2).abs() < 1e-15);
    assert!((report.steps[1].t_start + report.steps[1].dt - 0.5).abs() < 1e-15);
    assert!(report.error < 1e-3);
}

#[test]
fn test_predictors_agree_after_convergence() {
    let base = fine_space().with_nodes(4, QuadratureType::GaussRadau);
    let euler = run_advection_diffusion(&base.clone().with_predictor(Predictor::ImexEuler)).unwrap();
    let spread = run_advection_diffusion(&base.with_predictor(Predictor::Spread)).unwrap();

    println!(
        "imex-euler: {:.4e} ({:?}), spread: {:.4e} ({:?})",
        euler.error,
        euler.iterations(),
        spread.error,
        spread.iterations()
    );
    assert!((euler.error - spread.error).abs() < 1e-9);
}

#[test]
fn test_step_errors_cover_every_step() {
    let config = RunConfig::default().with_duration(0.0, 1.0, 0.25);
    let report = run_advection_diffusion(&config).unwrap();

    assert_eq!(report.step_errors.len(), 4);
    for (step, err) in &report.step_errors {
        assert!(err.is_finite() && *err < 1e-3, "{step}: {err:e}");
    }
}
