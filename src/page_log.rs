//! Page-access log parsing
//!
//! Both log kinds are headerless comma-separated text:
//! - baseline (profiling run): `page_id,footprint_tag[,...]`
//! - checkpoint (inference run): `page_id,footprint_tag,access_count`
//!
//! Fields are trimmed, so a trailing newline or `\r` never leaks into a tag.

use crate::error::{AnalyzerError, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Why a single log line was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("invalid access count: {0:?}")]
    InvalidCount(String),

    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

pub type LineResult<T> = std::result::Result<T, LineError>;

/// One line of the profiling baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfilingRecord<'a> {
    pub page_id: &'a str,
    pub footprint_tag: &'a str,
}

/// One line of an inference checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceRecord<'a> {
    pub page_id: &'a str,
    pub footprint_tag: &'a str,
    pub access_count: u64,
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(str::trim)
}

/// Feed every `\n`-terminated line of `reader` to `f` with its 1-based number
///
/// Lines are decoded one at a time, so invalid UTF-8 rejects only that line.
/// Only genuine read errors abort.
pub fn for_each_line<R, F>(mut reader: R, mut f: F) -> io::Result<()>
where
    R: BufRead,
    F: FnMut(usize, LineResult<&str>),
{
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        line_no += 1;
        f(line_no, std::str::from_utf8(&buf).map_err(|_| LineError::InvalidUtf8));
    }
}

/// Parse a baseline line. Blank lines yield `Ok(None)`.
pub fn parse_baseline_line(line: &str) -> LineResult<Option<ProfilingRecord<'_>>> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut fields = split_fields(line);
    match (fields.next(), fields.next()) {
        (Some(page_id), Some(footprint_tag)) => Ok(Some(ProfilingRecord {
            page_id,
            footprint_tag,
        })),
        _ => Err(LineError::TooFewFields {
            expected: 2,
            found: 1,
        }),
    }
}

/// Parse a checkpoint line. Blank lines yield `Ok(None)`.
pub fn parse_checkpoint_line(line: &str) -> LineResult<Option<InferenceRecord<'_>>> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = split_fields(line).take(3).collect();
    if fields.len() < 3 {
        return Err(LineError::TooFewFields {
            expected: 3,
            found: fields.len(),
        });
    }

    let access_count = fields[2]
        .parse::<u64>()
        .map_err(|_| LineError::InvalidCount(fields[2].to_string()))?;

    Ok(Some(InferenceRecord {
        page_id: fields[0],
        footprint_tag: fields[1],
        access_count,
    }))
}

/// Footprint tags observed during the profiling run
///
/// Built once per benchmark and shared read-only across every checkpoint
/// comparison of that benchmark.
#[derive(Debug, Clone, Default)]
pub struct BaselineTags {
    tags: HashSet<String>,
    malformed: u64,
}

impl BaselineTags {
    /// Build the tag set from any line source, skipping malformed lines
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut baseline = Self::default();

        for_each_line(reader, |line_no, line| {
            match line.and_then(parse_baseline_line) {
                Ok(Some(record)) => {
                    // Avoid reallocating for repeated tags
                    if !baseline.tags.contains(record.footprint_tag) {
                        baseline.tags.insert(record.footprint_tag.to_string());
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::trace!(line = line_no, error = %e, "skipping baseline line");
                    baseline.malformed += 1;
                }
            }
        })?;

        Ok(baseline)
    }

    /// Load the baseline for one benchmark
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                AnalyzerError::MissingBaseline {
                    path: path.to_path_buf(),
                }
            } else {
                AnalyzerError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::from_reader(BufReader::new(file)).map_err(|source| AnalyzerError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check whether a footprint tag was seen during profiling
    pub fn contains(&self, footprint_tag: &str) -> bool {
        self.tags.contains(footprint_tag)
    }

    /// Number of distinct footprint tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Lines skipped while reading the baseline
    pub fn malformed_lines(&self) -> u64 {
        self.malformed
    }
}

impl<S: Into<String>> FromIterator<S> for BaselineTags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().map(Into::into).collect(),
            malformed: 0,
        }
    }
}
