//! Analyzer configuration
//!
//! Defaults reproduce the classic layout: `10M.csv` baseline, checkpoints
//! `100M.csv` through `10000M.csv`, results under `page_info/`.
//! Values may come from a TOML file and are then overridden by CLI flags.

use crate::error::{AnalyzerError, Result};
use crate::output::ResultFormat;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What to write when a checkpoint file cannot be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Write nothing for the checkpoint (default)
    #[default]
    Skip,
    /// Write a `0 0 0` line so line N stays checkpoint N
    Zero,
}

/// Configuration for one analyzer run
///
/// # Example
/// ```
/// use coldpage::config::AnalyzerConfig;
///
/// let config = AnalyzerConfig::default();
/// assert_eq!(config.checkpoint_name(1), "100M.csv");
/// assert_eq!(config.checkpoint_name(100), "10000M.csv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Benchmark filter expression (None = all benchmarks)
    pub filter: Option<String>,

    /// Directory receiving one result file per benchmark
    pub output_dir: PathBuf,

    /// File name of the profiling baseline inside each benchmark directory
    pub baseline: String,

    /// Number of checkpoints per benchmark
    pub checkpoints: u32,

    /// Checkpoint spacing, in millions of accesses
    pub step_millions: u64,

    pub missing: MissingPolicy,

    pub format: ResultFormat,

    /// Worker threads for checkpoint comparisons (None = rayon default)
    pub jobs: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            filter: None,
            output_dir: PathBuf::from("page_info"),
            baseline: "10M.csv".to_string(),
            checkpoints: 100,
            step_millions: 100,
            missing: MissingPolicy::Skip,
            format: ResultFormat::Text,
            jobs: None,
        }
    }
}

impl AnalyzerConfig {
    /// Load and validate a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| AnalyzerError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: AnalyzerConfig = toml::from_str(&contents)
            .map_err(|e| AnalyzerError::Config(format!("{}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.checkpoints == 0 {
            return Err(AnalyzerError::Config(
                "checkpoints must be >= 1, got 0".to_string(),
            ));
        }

        if self.step_millions == 0 {
            return Err(AnalyzerError::Config(
                "step_millions must be >= 1, got 0".to_string(),
            ));
        }

        if self
            .step_millions
            .checked_mul(u64::from(self.checkpoints))
            .is_none()
        {
            return Err(AnalyzerError::Config(format!(
                "checkpoints * step_millions overflows ({} * {})",
                self.checkpoints, self.step_millions
            )));
        }

        if self.baseline.is_empty() {
            return Err(AnalyzerError::Config("baseline name is empty".to_string()));
        }

        if self.baseline.contains('/') || self.baseline.contains(std::path::MAIN_SEPARATOR) {
            return Err(AnalyzerError::Config(format!(
                "baseline must be a file name, got {}",
                self.baseline
            )));
        }

        Ok(())
    }

    /// File name of checkpoint `index` (1-based)
    pub fn checkpoint_name(&self, index: u32) -> String {
        format!("{}M.csv", u64::from(index) * self.step_millions)
    }

    /// Path of checkpoint `index` inside a benchmark directory
    pub fn checkpoint_path(&self, benchmark_dir: &Path, index: u32) -> PathBuf {
        benchmark_dir.join(self.checkpoint_name(index))
    }

    /// Path of the baseline inside a benchmark directory
    pub fn baseline_path(&self, benchmark_dir: &Path) -> PathBuf {
        benchmark_dir.join(&self.baseline)
    }
}
