use std::path::Path;
use tracing::{debug, trace};

use super::matcher::SearchCriteria;
use crate::errors::ScoutResult;
use crate::metrics::RunMetrics;
use crate::pdf;
use crate::results::SegmentResult;

/// Loads segment files and runs the criteria over their text
#[derive(Debug, Clone)]
pub struct SegmentProcessor {
    criteria: SearchCriteria,
    metrics: RunMetrics,
}

impl SegmentProcessor {
    /// Creates a new SegmentProcessor with its own metrics
    pub fn new(criteria: SearchCriteria) -> Self {
        Self::with_metrics(criteria, RunMetrics::new())
    }

    /// Creates a new SegmentProcessor that records into shared metrics
    pub fn with_metrics(criteria: SearchCriteria, metrics: RunMetrics) -> Self {
        Self { criteria, metrics }
    }

    /// Gets the metrics this processor records into
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Searches a segment file. Reads only; never modifies or removes it.
    pub fn process(&self, path: &Path) -> ScoutResult<SegmentResult> {
        trace!("Processing segment: {}", path.display());

        let doc = pdf::load_document(path)?;
        let pages = pdf::page_texts(&doc, path)?;

        let mut matches = Vec::new();
        for (i, text) in pages.iter().enumerate() {
            let (page_matches, lines) = self.criteria.scan_page(i + 1, text);
            self.metrics.record_page(lines, page_matches.len());
            matches.extend(page_matches);
        }

        debug!(
            "Found {} matching lines in {} ({} pages)",
            matches.len(),
            path.display(),
            pages.len()
        );
        Ok(SegmentResult::new(path, matches))
    }
}
