//! Error types for the SDC engine.
//!
//! Fatal conditions surface as [`SdcError`]. Steps that exhaust their
//! iteration budget are not errors; they are recorded in the run report
//! (see [`crate::controller::StepOutcome`]).

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{NodeIndex, StepIndex};

/// Failure of the implicit solve delegated to the spatial collaborator.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The implicit system matrix could not be factorized.
    #[error("Singular implicit system: {0}")]
    Singular(String),

    /// Right-hand side does not match the discretization.
    #[error("Right-hand side has {actual} entries, discretization has {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The solution contains NaN or Inf.
    #[error("Non-finite value in implicit solution at dof {dof}")]
    NonFinite { dof: usize },
}

/// Errors raised by the SDC engine.
#[derive(Debug, Error)]
pub enum SdcError {
    /// Invalid node count, quadrature family, dt or duration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// State vector operation on incompatible shapes.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Sweeper protocol violated (e.g. reseeding after sweeping began).
    #[error("Invalid sweeper state: {0}")]
    InvalidState(String),

    /// The delegated implicit solve failed.
    #[error("Sweep failed at {step}, {node}: {source}")]
    SweepFailure {
        step: StepIndex,
        node: NodeIndex,
        #[source]
        source: SolveError,
    },
}

impl SdcError {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// Failure to persist run results.
#[derive(Debug, Error)]
pub enum SinkError {
    /// I/O error while creating the output directory or appending a record.
    #[error("Result sink I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SinkError {
    /// Attach the offending path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, SdcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_failure_message() {
        let err = SdcError::SweepFailure {
            step: StepIndex::new(3),
            node: NodeIndex::new(2),
            source: SolveError::Singular("zero pivot".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("step 3"), "{msg}");
        assert!(msg.contains("node 2"), "{msg}");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_sink_error_names_path() {
        let err = SinkError::io(
            "solution_sdc/10.dat",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("solution_sdc/10.dat"));
    }

    #[test]
    fn test_dimension_mismatch_helper() {
        let err = SdcError::dimension_mismatch(10, 12);
        assert!(matches!(
            err,
            SdcError::DimensionMismatch {
                expected: 10,
                actual: 12
            }
        ));
    }
}
