//! The shared, append-only match report.
//!
//! Workers append concurrently, so every block is formatted in memory first
//! and the whole open-append-close sequence runs under one lock:
//!
//! ```text
//! found in part_2.pdf
//! Part 4, Line 17: SMITH JOHN S/O MARY SMITH
//!
//! ```
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, trace};

use crate::errors::{ScoutError, ScoutResult};
use crate::metrics::RunMetrics;
use crate::results::SegmentResult;

/// Handle to the report file for one run
#[derive(Debug)]
pub struct MatchReport {
    path: PathBuf,
    lock: Mutex<()>,
    metrics: RunMetrics,
}

impl MatchReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_metrics(path, RunMetrics::new())
    }

    pub fn with_metrics(path: impl Into<PathBuf>, metrics: RunMetrics) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            metrics,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes any report left by a previous run
    pub fn reset(&self) -> ScoutResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed previous report {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ScoutError::from_io(&self.path, e)),
        }
    }

    /// Appends the block for a matching segment.
    ///
    /// Returns `false` without touching the file when the segment had no
    /// matches.
    pub fn append(&self, result: &SegmentResult) -> ScoutResult<bool> {
        if !result.is_match() {
            return Ok(false);
        }

        let block = format_block(result);
        {
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|e| ScoutError::from_io(&self.path, e))?;
            file.write_all(block.as_bytes())
                .and_then(|()| file.flush())
                .map_err(|e| ScoutError::from_io(&self.path, e))?;
        }

        trace!(
            "Appended {} matches for {} to {}",
            result.matches.len(),
            result.file_name(),
            self.path.display()
        );
        self.metrics.record_report_write(block.len());
        Ok(true)
    }
}

/// Formats one segment's findings: header, one line per match, blank line
pub fn format_block(result: &SegmentResult) -> String {
    let mut block = format!("found in {}\n", result.file_name());
    for m in &result.matches {
        block.push_str(&m.report_line());
        block.push('\n');
    }
    block.push('\n');
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::LineMatch;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    fn result(name: &str, lines: usize) -> SegmentResult {
        SegmentResult::new(
            format!("output/{}", name),
            (1..=lines)
                .map(|i| LineMatch {
                    page_number: 1,
                    line_number: i,
                    line_content: format!("{} line {}", name, i),
                })
                .collect(),
        )
    }

    #[test]
    fn test_format_block() {
        let block = format_block(&result("part_2.pdf", 2));
        assert_eq!(
            block,
            "found in part_2.pdf\nPart 1, Line 1: part_2.pdf line 1\nPart 1, Line 2: part_2.pdf line 2\n\n"
        );
    }

    #[test]
    fn test_append_skips_empty_results() {
        let dir = tempdir().unwrap();
        let report = MatchReport::new(dir.path().join("output.txt"));
        assert!(!report.append(&result("part_1.pdf", 0)).unwrap());
        assert!(!report.path().exists());
    }

    #[test]
    fn test_reset_removes_previous_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.txt");
        fs::write(&path, "stale\n").unwrap();

        let report = MatchReport::new(&path);
        report.reset().unwrap();
        assert!(!path.exists());
        // Resetting twice is fine
        report.reset().unwrap();

        report.append(&result("part_1.pdf", 1)).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "found in part_1.pdf\nPart 1, Line 1: part_1.pdf line 1\n\n"
        );
    }

    #[test]
    fn test_concurrent_blocks_stay_contiguous() {
        let dir = tempdir().unwrap();
        let report = Arc::new(MatchReport::new(dir.path().join("output.txt")));

        let handles: Vec<_> = (1..=16)
            .map(|i| {
                let report = Arc::clone(&report);
                thread::spawn(move || {
                    report
                        .append(&result(&format!("part_{}.pdf", i), 50))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = fs::read_to_string(report.path()).unwrap();
        let blocks: Vec<&str> = content.split("\n\n").filter(|b| !b.is_empty()).collect();
        assert_eq!(blocks.len(), 16);
        for block in blocks {
            let mut lines = block.lines();
            let header = lines.next().unwrap();
            let name = header.strip_prefix("found in ").unwrap();
            let body: Vec<&str> = lines.collect();
            assert_eq!(body.len(), 50);
            for (i, line) in body.iter().enumerate() {
                assert_eq!(*line, format!("Part 1, Line {}: {} line {}", i + 1, name, i + 1));
            }
        }
        assert_eq!(report.metrics.get_stats().report_bytes as usize, content.len());
    }
}
