//! End-of-run summary of processed benchmarks and skipped input
//!
//! Printed to stderr as a table (like `strace -c`), optionally also written
//! as pretty JSON for scripting.

use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A log file with lines that had to be skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedFile {
    pub path: PathBuf,
    pub lines: u64,
}

/// Outcome of one successfully processed benchmark
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BenchmarkReport {
    pub name: String,
    pub output: PathBuf,
    pub lines_written: usize,
    pub skipped_checkpoints: Vec<PathBuf>,
    pub malformed_files: Vec<MalformedFile>,
}

impl BenchmarkReport {
    pub fn malformed_lines(&self) -> u64 {
        self.malformed_files.iter().map(|f| f.lines).sum()
    }
}

/// A benchmark that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedBenchmark {
    pub name: String,
    pub reason: String,
}

/// Tally for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub benchmarks: Vec<BenchmarkReport>,
    pub failed: Vec<FailedBenchmark>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_benchmark(&mut self, report: BenchmarkReport) {
        self.benchmarks.push(report);
    }

    pub fn add_failure(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.failed.push(FailedBenchmark {
            name: name.into(),
            reason: reason.into(),
        });
    }

    pub fn total_lines_written(&self) -> usize {
        self.benchmarks.iter().map(|b| b.lines_written).sum()
    }

    pub fn total_skipped_checkpoints(&self) -> usize {
        self.benchmarks
            .iter()
            .map(|b| b.skipped_checkpoints.len())
            .sum()
    }

    pub fn total_malformed_lines(&self) -> u64 {
        self.benchmarks.iter().map(BenchmarkReport::malformed_lines).sum()
    }

    /// Render the summary table
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.benchmarks.is_empty() && self.failed.is_empty() {
            writeln!(out, "No benchmarks analyzed.")?;
            return Ok(());
        }

        writeln!(out, "    lines  skipped  malformed benchmark")?;
        writeln!(out, "--------- -------- ---------- ----------------")?;
        for bench in &self.benchmarks {
            writeln!(
                out,
                "{:>9} {:>8} {:>10} {}",
                bench.lines_written,
                bench.skipped_checkpoints.len(),
                bench.malformed_lines(),
                bench.name
            )?;
        }
        writeln!(out, "--------- -------- ---------- ----------------")?;
        writeln!(
            out,
            "{:>9} {:>8} {:>10} total",
            self.total_lines_written(),
            self.total_skipped_checkpoints(),
            self.total_malformed_lines()
        )?;

        let skipped: Vec<&PathBuf> = self
            .benchmarks
            .iter()
            .flat_map(|b| b.skipped_checkpoints.iter())
            .collect();
        if !skipped.is_empty() {
            writeln!(out, "\nSkipped checkpoint files:")?;
            for path in skipped {
                writeln!(out, "  {}", path.display())?;
            }
        }

        let malformed: Vec<&MalformedFile> = self
            .benchmarks
            .iter()
            .flat_map(|b| b.malformed_files.iter())
            .collect();
        if !malformed.is_empty() {
            writeln!(out, "\nMalformed lines:")?;
            for file in malformed {
                writeln!(out, "  {:>6} {}", file.lines, file.path.display())?;
            }
        }

        if !self.failed.is_empty() {
            writeln!(out, "\nFailed benchmarks:")?;
            for failure in &self.failed {
                writeln!(out, "  {}: {}", failure.name, failure.reason)?;
            }
        }

        Ok(())
    }

    /// Print the summary table to stderr
    pub fn print_summary(&self) {
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        if let Err(e) = self.render(&mut handle) {
            tracing::warn!("Failed to print run summary: {}", e);
        }
    }

    /// Write the summary as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;

        let json = serde_json::to_string_pretty(self).context("Failed to serialize run summary")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write run report to: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> BenchmarkReport {
        BenchmarkReport {
            name: "503.bwaves_r".to_string(),
            output: PathBuf::from("page_info/503.bwaves_r"),
            lines_written: 99,
            skipped_checkpoints: vec![PathBuf::from("runs/503.bwaves_r/5700M.csv")],
            malformed_files: vec![MalformedFile {
                path: PathBuf::from("runs/503.bwaves_r/200M.csv"),
                lines: 3,
            }],
        }
    }

    fn render(summary: &RunSummary) -> String {
        let mut buf = Vec::new();
        summary.render(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(render(&RunSummary::new()), "No benchmarks analyzed.\n");
    }

    #[test]
    fn test_totals() {
        let mut summary = RunSummary::new();
        summary.add_benchmark(report());
        summary.add_benchmark(BenchmarkReport {
            name: "505.mcf_r".to_string(),
            lines_written: 100,
            ..Default::default()
        });
        assert_eq!(summary.total_lines_written(), 199);
        assert_eq!(summary.total_skipped_checkpoints(), 1);
        assert_eq!(summary.total_malformed_lines(), 3);
    }

    #[test]
    fn test_render_lists_skips_and_failures() {
        let mut summary = RunSummary::new();
        summary.add_benchmark(report());
        summary.add_failure("519.lbm_r", "Baseline file not found: runs/519.lbm_r/10M.csv");

        let text = render(&summary);
        assert!(text.contains("503.bwaves_r"));
        assert!(text.contains("total"));
        assert!(text.contains("Skipped checkpoint files:"));
        assert!(text.contains("5700M.csv"));
        assert!(text.contains("Malformed lines:"));
        assert!(text.contains("Failed benchmarks:"));
        assert!(text.contains("519.lbm_r: Baseline file not found"));
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let mut summary = RunSummary::new();
        summary.add_benchmark(report());
        summary.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["benchmarks"][0]["name"], "503.bwaves_r");
        assert_eq!(value["benchmarks"][0]["lines_written"], 99);
        assert_eq!(value["failed"].as_array().unwrap().len(), 0);
    }
}
