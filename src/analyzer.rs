//! Benchmark discovery and the per-benchmark driver
//!
//! For each selected benchmark directory the baseline is loaded once, every
//! checkpoint is compared against it on the rayon pool, and the results are
//! written in checkpoint order to `<output_dir>/<benchmark>`.

use crate::compare::{compare_checkpoint, CheckpointResult, Comparison};
use crate::config::{AnalyzerConfig, MissingPolicy};
use crate::error::{AnalyzerError, Result};
use crate::filter::BenchmarkFilter;
use crate::output::write_results;
use crate::page_log::BaselineTags;
use crate::summary::{BenchmarkReport, MalformedFile, RunSummary};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// A benchmark directory selected for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Benchmark {
    pub name: String,
    pub dir: PathBuf,
}

/// List benchmark directories under `root`, sorted by name
///
/// Hidden entries (leading `.`), plain files and `output_dir` itself (when it
/// lives under `root`) are ignored.
pub fn discover_benchmarks(
    root: &Path,
    filter: &BenchmarkFilter,
    output_dir: Option<&Path>,
) -> Result<Vec<Benchmark>> {
    let io_err = |source| AnalyzerError::Io {
        path: root.to_path_buf(),
        source,
    };
    let output_dir = output_dir.and_then(|dir| fs::canonicalize(dir).ok());

    let mut benchmarks = Vec::new();
    for entry in fs::read_dir(root).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if name.starts_with('.') {
            continue;
        }

        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }

        if output_dir.is_some() && fs::canonicalize(&dir).ok() == output_dir {
            tracing::debug!(dir = %dir.display(), "skipping output directory");
            continue;
        }

        if !filter.should_analyze(&name) {
            tracing::debug!(benchmark = %name, "filtered out");
            continue;
        }

        benchmarks.push(Benchmark { name, dir });
    }

    benchmarks.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(benchmarks)
}

/// Analyze every checkpoint of one benchmark and write its result file
///
/// Runs the comparisons on the current rayon pool. A missing baseline or an
/// output file that cannot be created fails only this benchmark; write
/// errors are fatal.
pub fn analyze_benchmark(
    benchmark: &Benchmark,
    config: &AnalyzerConfig,
) -> Result<BenchmarkReport> {
    let baseline_path = config.baseline_path(&benchmark.dir);
    let baseline = BaselineTags::from_file(&baseline_path)?;
    tracing::info!(
        benchmark = %benchmark.name,
        tags = baseline.len(),
        "loaded baseline"
    );

    let output = config.output_dir.join(&benchmark.name);
    let file = File::create(&output).map_err(|source| AnalyzerError::CreateOutput {
        path: output.clone(),
        source,
    })?;

    let outcomes: Vec<(PathBuf, Result<Comparison>)> = (1..=config.checkpoints)
        .into_par_iter()
        .map(|index| {
            let path = config.checkpoint_path(&benchmark.dir, index);
            let outcome = compare_checkpoint(&baseline, &path);
            (path, outcome)
        })
        .collect();

    let mut report = BenchmarkReport {
        name: benchmark.name.clone(),
        output: output.clone(),
        ..Default::default()
    };

    if baseline.malformed_lines() > 0 {
        tracing::warn!(
            path = %baseline_path.display(),
            lines = baseline.malformed_lines(),
            "skipped malformed baseline lines"
        );
        report.malformed_files.push(MalformedFile {
            path: baseline_path,
            lines: baseline.malformed_lines(),
        });
    }

    let mut results = Vec::with_capacity(outcomes.len());
    for (path, outcome) in outcomes {
        match outcome {
            Ok(comparison) => {
                tracing::debug!(
                    path = %path.display(),
                    cold_pages = comparison.result.cold_pages,
                    cold_accesses = comparison.result.cold_accesses,
                    total_accesses = comparison.result.total_accesses,
                    "compared checkpoint"
                );
                if comparison.malformed_lines > 0 {
                    tracing::warn!(
                        path = %path.display(),
                        lines = comparison.malformed_lines,
                        "skipped malformed checkpoint lines"
                    );
                    report.malformed_files.push(MalformedFile {
                        path,
                        lines: comparison.malformed_lines,
                    });
                }
                results.push(comparison.result);
            }
            Err(e) => {
                tracing::warn!("Skipping checkpoint: {}", e);
                if config.missing == MissingPolicy::Zero {
                    results.push(CheckpointResult::default());
                }
                report.skipped_checkpoints.push(path);
            }
        }
    }

    let mut writer = BufWriter::new(file);
    report.lines_written =
        write_results(&mut writer, config.format, &results).map_err(|source| AnalyzerError::Io {
            path: output,
            source,
        })?;

    Ok(report)
}

/// Analyze every selected benchmark under `root`
///
/// Per-benchmark failures are recorded in the summary; only fatal errors
/// (filesystem, configuration) abort the run.
pub fn run(root: &Path, config: &AnalyzerConfig) -> Result<RunSummary> {
    config.validate()?;

    let filter = match &config.filter {
        Some(expr) => BenchmarkFilter::from_expr(expr)?,
        None => BenchmarkFilter::all(),
    };

    fs::create_dir_all(&config.output_dir).map_err(|source| AnalyzerError::Io {
        path: config.output_dir.clone(),
        source,
    })?;

    let benchmarks = discover_benchmarks(root, &filter, Some(&config.output_dir))?;
    if benchmarks.is_empty() {
        tracing::warn!(root = %root.display(), "no benchmarks matched");
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("compare-{}", i));
    if let Some(jobs) = config.jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder
        .build()
        .map_err(|e| AnalyzerError::Config(format!("failed to build worker pool: {}", e)))?;

    let mut summary = RunSummary::new();
    for benchmark in &benchmarks {
        match pool.install(|| analyze_benchmark(benchmark, config)) {
            Ok(report) => {
                tracing::info!(
                    benchmark = %benchmark.name,
                    lines = report.lines_written,
                    skipped = report.skipped_checkpoints.len(),
                    "wrote {}",
                    report.output.display()
                );
                summary.add_benchmark(report);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!(benchmark = %benchmark.name, "Skipping benchmark: {}", e);
                summary.add_failure(&benchmark.name, e.to_string());
            }
        }
    }

    Ok(summary)
}
