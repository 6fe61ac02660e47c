//! Error taxonomy for the cold-page analyzer
//!
//! Per-line problems never surface here; they are counted by
//! [`crate::page_log::LineError`] and skipped. These variants cover the
//! per-benchmark and run-level failures.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while analyzing benchmarks
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Baseline file not found: {}", path.display())]
    MissingBaseline { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create output file {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid benchmark filter: {0}")]
    Filter(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AnalyzerError {
    /// Whether this error should abort the whole run rather than one benchmark
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AnalyzerError::Io { .. } | AnalyzerError::Filter(_) | AnalyzerError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_baseline_is_not_fatal() {
        let err = AnalyzerError::MissingBaseline {
            path: PathBuf::from("bench/10M.csv"),
        };
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Baseline file not found: bench/10M.csv");
    }

    #[test]
    fn test_create_output_is_not_fatal() {
        let err = AnalyzerError::CreateOutput {
            path: PathBuf::from("page_info/bwaves"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("page_info/bwaves"));
    }

    #[test]
    fn test_write_io_is_fatal() {
        let err = AnalyzerError::Io {
            path: PathBuf::from("page_info/bwaves"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_config_errors_are_fatal() {
        assert!(AnalyzerError::Config("checkpoints".into()).is_fatal());
        assert!(AnalyzerError::Filter("bad".into()).is_fatal());
    }
}
