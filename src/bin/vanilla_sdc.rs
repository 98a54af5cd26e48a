//! Advection-diffusion with single-level SDC.
//!
//! Runs the reference problem, prints the final error and appends
//! `element_count dt error` to `<output-dir>/<num_elem>.dat`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use sdc_rs::{FileSink, Predictor, QuadratureType, ResultSink, RunConfig, run_advection_diffusion};

/// IMEX spectral deferred correction for periodic advection-diffusion
#[derive(Parser)]
#[command(name = "vanilla_sdc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Single-level IMEX SDC for 1D advection-diffusion", long_about = None)]
struct Cli {
    /// JSON run configuration; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Collocation nodes per step
    #[arg(long)]
    num_nodes: Option<usize>,

    /// Number of spatial elements
    #[arg(long)]
    num_elem: Option<usize>,

    /// Polynomial order of the spatial elements
    #[arg(long)]
    spatial_order: Option<usize>,

    /// Node family (gauss-lobatto, gauss-radau, gauss-legendre)
    #[arg(long)]
    quad_type: Option<QuadratureType>,

    /// Predictor (imex-euler, spread)
    #[arg(long)]
    predictor: Option<Predictor>,

    /// Step width
    #[arg(long)]
    dt: Option<f64>,

    /// End time
    #[arg(long)]
    tend: Option<f64>,

    /// Maximum SDC iterations per step
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Absolute residual tolerance
    #[arg(long)]
    abs_res_tol: Option<f64>,

    /// Relative residual tolerance
    #[arg(long)]
    rel_res_tol: Option<f64>,

    /// Directory for the .dat result files
    #[arg(short, long, default_value = "solution_sdc")]
    output_dir: PathBuf,

    /// Also append per-step iteration counts to <num_elem>_iter.dat
    #[arg(long)]
    write_iterations: bool,

    /// Log level
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl Cli {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(n) = self.num_nodes {
            config.num_nodes = n;
        }
        if let Some(n) = self.num_elem {
            config.num_elem = n;
        }
        if let Some(order) = self.spatial_order {
            config.spatial_order = order;
        }
        if let Some(quad_type) = self.quad_type {
            config.quad_type = quad_type;
        }
        if let Some(predictor) = self.predictor {
            config.predictor = predictor;
        }
        if let Some(dt) = self.dt {
            config.dt = dt;
        }
        if let Some(tend) = self.tend {
            config.tend = tend;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        if let Some(tol) = self.abs_res_tol {
            config.abs_residual_tol = tol;
        }
        if let Some(tol) = self.rel_res_tol {
            config.rel_residual_tol = tol;
        }

        config.validate().context("Invalid run configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.run_config()?;
    info!(
        num_nodes = config.num_nodes,
        quad_type = %config.quad_type,
        num_elem = config.num_elem,
        "Running SDC"
    );

    let report = run_advection_diffusion(&config).context("SDC run failed")?;
    if report.non_convergent_steps() > 0 {
        warn!(
            steps = report.non_convergent_steps(),
            "Some steps did not reach the residual tolerance"
        );
    }
    println!("error {:e}", report.error);

    let mut sink = FileSink::new(&cli.output_dir);
    sink.record_error(&report.error_record())
        .with_context(|| format!("Failed to write results to {}", cli.output_dir.display()))?;
    if cli.write_iterations {
        sink.record_iterations(report.element_count, report.dt, &report.iterations())
            .context("Failed to write iteration counts")?;
    }
    info!(path = %sink.error_path(report.element_count).display(), "Results appended");

    Ok(())
}
