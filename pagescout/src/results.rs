//! Result types produced by the matcher and the coordinator.
//!
//! Ownership flows one way: the processor builds a [`SegmentResult`], the
//! coordinator consumes it into a [`SegmentOutcome`], and the outcomes are
//! folded into a [`RunSummary`] once every worker has finished.
use std::path::{Path, PathBuf};

use crate::splitter::Segment;

/// A single line that contains every search string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    /// 1-based page number within the segment
    pub page_number: usize,
    /// 1-based line number within the page's extracted text
    pub line_number: usize,
    /// The matching line, trimmed
    pub line_content: String,
}

impl LineMatch {
    /// Formats the match the way it appears in the report file
    pub fn report_line(&self) -> String {
        format!(
            "Part {}, Line {}: {}",
            self.page_number, self.line_number, self.line_content
        )
    }
}

/// All matches found in a single segment file
#[derive(Debug, Clone)]
pub struct SegmentResult {
    /// The segment file that was searched
    pub path: PathBuf,
    /// Matches in page order, then line order
    pub matches: Vec<LineMatch>,
}

impl SegmentResult {
    pub fn new(path: impl Into<PathBuf>, matches: Vec<LineMatch>) -> Self {
        Self {
            path: path.into(),
            matches,
        }
    }

    /// Whether at least one line matched
    pub fn is_match(&self) -> bool {
        !self.matches.is_empty()
    }

    /// File name used in the report header and notifications
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// What the coordinator did with a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Kept,
    Deleted,
}

/// Final state of one segment after filtering
#[derive(Debug, Clone)]
pub struct SegmentOutcome {
    pub segment: Segment,
    pub disposition: Disposition,
    pub matches: Vec<LineMatch>,
}

impl SegmentOutcome {
    pub fn is_kept(&self) -> bool {
        self.disposition == Disposition::Kept
    }
}

/// Represents the complete result of a run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Outcomes ordered by part number
    pub outcomes: Vec<SegmentOutcome>,
    /// Total matching lines across all kept segments
    pub total_matches: usize,
    pub segments_kept: usize,
    pub segments_deleted: usize,
}

impl RunSummary {
    /// Creates a new empty summary
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds an outcome, keeping `outcomes` sorted by part number
    pub fn add_outcome(&mut self, outcome: SegmentOutcome) {
        match outcome.disposition {
            Disposition::Kept => {
                self.segments_kept += 1;
                self.total_matches += outcome.matches.len();
            }
            Disposition::Deleted => self.segments_deleted += 1,
        }
        let pos = self
            .outcomes
            .partition_point(|o| o.segment.index < outcome.segment.index);
        self.outcomes.insert(pos, outcome);
    }

    /// Number of segments the run processed
    pub fn segments_processed(&self) -> usize {
        self.outcomes.len()
    }

    /// Paths of the segments that survived filtering
    pub fn kept_paths(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|o| o.is_kept())
            .map(|o| o.segment.path.as_path())
            .collect()
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
