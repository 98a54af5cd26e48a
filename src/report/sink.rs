//! Append-only persistence of run results.
//!
//! Records are plain whitespace-separated text, one per line:
//!
//! - `<dir>/<element_count>.dat`: `element_count dt error`
//! - `<dir>/<element_count>_iter.dat`: `dt iterations`, one line per step

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SinkError;

/// Final error of one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErrorRecord {
    pub element_count: usize,
    pub dt: f64,
    pub error: f64,
}

/// Destination for run results.
pub trait ResultSink {
    /// Append the final error of a run.
    fn record_error(&mut self, record: &ErrorRecord) -> Result<(), SinkError>;

    /// Append the iteration count of every step.
    fn record_iterations(
        &mut self,
        element_count: usize,
        dt: f64,
        iterations: &[usize],
    ) -> Result<(), SinkError>;
}

/// Sink writing `.dat` files under a directory, created on first use.
#[derive(Clone, Debug)]
pub struct FileSink {
    output_dir: PathBuf,
}

impl FileSink {
    /// Create a sink rooted at `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory the records are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the error file for `element_count` elements.
    pub fn error_path(&self, element_count: usize) -> PathBuf {
        self.output_dir.join(format!("{element_count}.dat"))
    }

    /// Path of the iteration file for `element_count` elements.
    pub fn iterations_path(&self, element_count: usize) -> PathBuf {
        self.output_dir.join(format!("{element_count}_iter.dat"))
    }

    fn append_lines(&self, path: &Path, lines: &[String]) -> Result<(), SinkError> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| SinkError::io(&self.output_dir, e))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SinkError::io(path, e))?;
        for line in lines {
            writeln!(file, "{line}").map_err(|e| SinkError::io(path, e))?;
        }
        debug!(path = %path.display(), lines = lines.len(), "Appended results");
        Ok(())
    }
}

impl ResultSink for FileSink {
    fn record_error(&mut self, record: &ErrorRecord) -> Result<(), SinkError> {
        let path = self.error_path(record.element_count);
        let line = format!("{} {} {}", record.element_count, record.dt, record.error);
        self.append_lines(&path, &[line])
    }

    fn record_iterations(
        &mut self,
        element_count: usize,
        dt: f64,
        iterations: &[usize],
    ) -> Result<(), SinkError> {
        let path = self.iterations_path(element_count);
        let lines: Vec<String> = iterations.iter().map(|it| format!("{dt} {it}")).collect();
        self.append_lines(&path, &lines)
    }
}
