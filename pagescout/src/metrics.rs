use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Tracks work done during a run. Cloning shares the counters.
#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    pages_scanned: Arc<AtomicU64>,
    lines_scanned: Arc<AtomicU64>,
    lines_matched: Arc<AtomicU64>,

    segments_kept: Arc<AtomicU64>,
    segments_deleted: Arc<AtomicU64>,

    report_bytes: Arc<AtomicU64>,
}

impl RunMetrics {
    /// Creates a new RunMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one page of extracted text
    pub fn record_page(&self, lines: usize, matched: usize) {
        self.pages_scanned.fetch_add(1, Ordering::Relaxed);
        self.lines_scanned.fetch_add(lines as u64, Ordering::Relaxed);
        self.lines_matched.fetch_add(matched as u64, Ordering::Relaxed);
    }

    /// Records the keep/delete decision for a segment
    pub fn record_disposition(&self, kept: bool) {
        if kept {
            self.segments_kept.fetch_add(1, Ordering::Relaxed);
        } else {
            self.segments_deleted.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records a block appended to the match report
    pub fn record_report_write(&self, bytes: usize) {
        let total = self.report_bytes.fetch_add(bytes as u64, Ordering::Relaxed) + bytes as u64;
        debug!("Report block written: {} bytes, total: {} bytes", bytes, total);
    }

    /// Gets a snapshot of the counters
    pub fn get_stats(&self) -> RunStats {
        RunStats {
            pages_scanned: self.pages_scanned.load(Ordering::Relaxed),
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            lines_matched: self.lines_matched.load(Ordering::Relaxed),
            segments_kept: self.segments_kept.load(Ordering::Relaxed),
            segments_deleted: self.segments_deleted.load(Ordering::Relaxed),
            report_bytes: self.report_bytes.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Run statistics: {} pages / {} lines scanned, {} matching lines",
            stats.pages_scanned, stats.lines_scanned, stats.lines_matched
        );
        info!(
            "Segments: {} kept, {} deleted; report {} bytes",
            stats.segments_kept, stats.segments_deleted, stats.report_bytes
        );
    }
}

/// Point-in-time copy of [`RunMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub pages_scanned: u64,
    pub lines_scanned: u64,
    pub lines_matched: u64,
    pub segments_kept: u64,
    pub segments_deleted: u64,
    pub report_bytes: u64,
}
