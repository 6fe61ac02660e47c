//! Checkpoint comparison against a profiling baseline
//!
//! A page is *cold* when its footprint tag never appeared in the baseline.
//! Every well-formed record adds its access count to the total; cold records
//! also add to the cold volume and bump the cold-page counter.

use crate::error::{AnalyzerError, Result};
use crate::page_log::{for_each_line, parse_checkpoint_line, BaselineTags};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Per-checkpoint result tuple
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckpointResult {
    /// Records whose footprint tag is absent from the baseline
    pub cold_pages: u64,
    /// Accesses to those records
    pub cold_accesses: u64,
    /// Accesses to all well-formed records
    pub total_accesses: u64,
}

impl CheckpointResult {
    /// Fold one record into the accumulators
    pub fn record(&mut self, is_cold: bool, access_count: u64) {
        self.total_accesses = self.total_accesses.saturating_add(access_count);
        if is_cold {
            self.cold_pages = self.cold_pages.saturating_add(1);
            self.cold_accesses = self.cold_accesses.saturating_add(access_count);
        }
    }
}

/// Result of one comparison plus the lines that had to be skipped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Comparison {
    pub result: CheckpointResult,
    pub malformed_lines: u64,
}

/// Compare a checkpoint log (from any line source) against the baseline
pub fn compare_reader<R: BufRead>(baseline: &BaselineTags, reader: R) -> io::Result<Comparison> {
    let mut comparison = Comparison::default();

    for_each_line(reader, |line_no, line| match line.and_then(parse_checkpoint_line) {
        Ok(Some(record)) => {
            let is_cold = !baseline.contains(record.footprint_tag);
            comparison.result.record(is_cold, record.access_count);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::trace!(line = line_no, error = %e, "skipping checkpoint line");
            comparison.malformed_lines += 1;
        }
    })?;

    Ok(comparison)
}

/// Compare one checkpoint file against the baseline
pub fn compare_checkpoint<P: AsRef<Path>>(baseline: &BaselineTags, path: P) -> Result<Comparison> {
    let path = path.as_ref();
    let read_err = |source| AnalyzerError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_err)?;
    compare_reader(baseline, BufReader::new(file)).map_err(read_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn baseline(tags: &[&str]) -> BaselineTags {
        tags.iter().copied().collect()
    }

    fn compare(baseline: &BaselineTags, input: &str) -> Comparison {
        compare_reader(baseline, Cursor::new(input.to_string())).unwrap()
    }

    #[test]
    fn test_compare_mixed_cold_and_warm() {
        let base = BaselineTags::from_reader(Cursor::new("p1,f1\np2,f2\n")).unwrap();
        let cmp = compare(&base, "p1,f1,10\np3,f3,5\np4,f2,7\n");
        assert_eq!(
            cmp.result,
            CheckpointResult {
                cold_pages: 1,
                cold_accesses: 5,
                total_accesses: 22,
            }
        );
        assert_eq!(cmp.malformed_lines, 0);
    }

    #[test]
    fn test_compare_empty_checkpoint() {
        let cmp = compare(&baseline(&["f1"]), "");
        assert_eq!(cmp.result, CheckpointResult::default());
    }

    #[test]
    fn test_compare_all_tags_known() {
        let cmp = compare(&baseline(&["f1", "f2"]), "a,f1,3\nb,f2,4\nc,f1,9\n");
        assert_eq!(cmp.result.cold_pages, 0);
        assert_eq!(cmp.result.cold_accesses, 0);
        assert_eq!(cmp.result.total_accesses, 16);
    }

    #[test]
    fn test_compare_empty_baseline_makes_everything_cold() {
        let cmp = compare(&BaselineTags::default(), "a,f1,3\nb,f2,4\n");
        assert_eq!(cmp.result.cold_pages, 2);
        assert_eq!(cmp.result.cold_accesses, 7);
        assert_eq!(cmp.result.total_accesses, 7);
    }

    #[test]
    fn test_compare_skips_malformed_lines() {
        let cmp = compare(&baseline(&["f1"]), "p1,f1,10\np5,,abc\np6,f9\np7,f9,2\n");
        assert_eq!(cmp.result.total_accesses, 12);
        assert_eq!(cmp.result.cold_pages, 1);
        assert_eq!(cmp.result.cold_accesses, 2);
        assert_eq!(cmp.malformed_lines, 2);
    }

    #[test]
    fn test_compare_invalid_utf8_line_keeps_the_rest() {
        let input: &[u8] = b"p1,f1,10\np2,f9,5\np3,\xff\xfe,1\np4,f1,0\n";
        let cmp = compare_reader(&baseline(&["f1"]), input).unwrap();
        assert_eq!(
            cmp.result,
            CheckpointResult {
                cold_pages: 1,
                cold_accesses: 5,
                total_accesses: 15,
            }
        );
        assert_eq!(cmp.malformed_lines, 1);
    }

    #[test]
    fn test_compare_same_tag_counts_each_page() {
        let cmp = compare(&baseline(&[]), "p1,f7,1\np2,f7,1\n");
        assert_eq!(cmp.result.cold_pages, 2);
    }

    #[test]
    fn test_record_saturates() {
        let mut result = CheckpointResult::default();
        result.record(true, u64::MAX);
        result.record(true, 5);
        assert_eq!(result.total_accesses, u64::MAX);
        assert_eq!(result.cold_accesses, u64::MAX);
        assert_eq!(result.cold_pages, 2);
    }

    #[test]
    fn test_compare_checkpoint_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = compare_checkpoint(&baseline(&[]), dir.path().join("100M.csv")).unwrap_err();
        match err {
            AnalyzerError::Read { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound)
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
