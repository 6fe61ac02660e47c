//! Result-line output for per-benchmark files
//!
//! One line per checkpoint: `cold_pages cold_accesses total_accesses`,
//! space-separated by default or comma-separated for spreadsheet use.

use crate::compare::CheckpointResult;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Separator style for result lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    /// Space-separated fields (default)
    #[default]
    Text,
    /// Comma-separated fields
    Csv,
}

impl ResultFormat {
    fn separator(self) -> char {
        match self {
            ResultFormat::Text => ' ',
            ResultFormat::Csv => ',',
        }
    }

    /// Format a result tuple as a single line (no terminator)
    pub fn format_line(self, result: &CheckpointResult) -> String {
        let sep = self.separator();
        format!(
            "{}{sep}{}{sep}{}",
            result.cold_pages, result.cold_accesses, result.total_accesses
        )
    }
}

/// Write a sequence of result tuples to a sink, one `\n`-terminated line each
pub fn write_results<'a, W, I>(sink: &mut W, format: ResultFormat, results: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a CheckpointResult>,
{
    let mut written = 0;
    for result in results {
        writeln!(sink, "{}", format.format_line(result))?;
        written += 1;
    }
    sink.flush()?;
    Ok(written)
}
