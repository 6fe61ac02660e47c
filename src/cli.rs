//! CLI argument parsing for coldpage

use crate::config::{AnalyzerConfig, MissingPolicy};
use crate::output::ResultFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "coldpage")]
#[command(version)]
#[command(
    about = "Count inference-time pages whose footprint tag never appeared during profiling",
    long_about = None
)]
pub struct Cli {
    /// Directory containing one subdirectory per benchmark
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Benchmarks to analyze (e.g., -e bwaves,mcf or -e '/^5\d\d\./' or -e '!test')
    #[arg(short = 'e', long = "filter", value_name = "EXPR")]
    pub filter: Option<String>,

    /// Directory receiving one result file per benchmark [default: page_info]
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Baseline (profiling run) file name [default: 10M.csv]
    #[arg(long = "baseline", value_name = "FILE")]
    pub baseline: Option<String>,

    /// Number of checkpoints per benchmark [default: 100]
    #[arg(long = "checkpoints", value_name = "N")]
    pub checkpoints: Option<u32>,

    /// Checkpoint spacing in millions of accesses [default: 100]
    #[arg(long = "step", value_name = "MILLIONS")]
    pub step_millions: Option<u64>,

    /// What to write for a missing checkpoint file [default: skip]
    #[arg(long = "missing", value_enum)]
    pub missing: Option<MissingPolicy>,

    /// Result line format [default: text]
    #[arg(long = "format", value_enum)]
    pub format: Option<ResultFormat>,

    /// Worker threads for checkpoint comparisons
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// TOML configuration file (flags override its values)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the run summary as JSON
    #[arg(long = "report-json", value_name = "FILE")]
    pub report_json: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a base configuration
    pub fn apply_to(&self, mut config: AnalyzerConfig) -> AnalyzerConfig {
        if let Some(filter) = &self.filter {
            config.filter = Some(filter.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(baseline) = &self.baseline {
            config.baseline = baseline.clone();
        }
        if let Some(n) = self.checkpoints {
            config.checkpoints = n;
        }
        if let Some(step) = self.step_millions {
            config.step_millions = step;
        }
        if let Some(missing) = self.missing {
            config.missing = missing;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(jobs) = self.jobs {
            config.jobs = Some(jobs);
        }
        config
    }
}
