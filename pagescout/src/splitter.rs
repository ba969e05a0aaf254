//! Splits a source PDF into fixed-size page-range segments.
//!
//! Splitting happens in two steps so the arithmetic can be tested without any
//! PDF on disk:
//!
//! ```rust,ignore
//! let ranges = plan_ranges(25, NonZeroUsize::new(10).unwrap());
//! // [1-10], [11-20], [21-25]
//! let segments = split_document(Path::new("roll.pdf"), Path::new("output"), pages_per_split)?;
//! // output/part_1.pdf, output/part_2.pdf, output/part_3.pdf
//! ```
//!
//! Each segment is written to a temporary file inside the output directory and
//! renamed into place once complete. Segment files left over from an earlier
//! run are removed first. A failure part-way through leaves whatever was
//! already written; the source document is never modified.
use std::fs;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::{ScoutError, ScoutResult};
use crate::filters::{list_segment_files, segment_file_name};
use crate::pdf;

/// Inclusive, 1-based range of source pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, page: u32) -> bool {
        (self.start..=self.end).contains(&page)
    }
}

/// A page-range slice of the source document saved as its own PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 1-based part number; the file is `part_<index>.pdf`
    pub index: usize,
    /// First source page in this segment (1-based)
    pub start_page: u32,
    /// Number of pages in this segment
    pub page_count: usize,
    /// Location of the segment file
    pub path: PathBuf,
}

impl Segment {
    /// Source page range covered by this segment
    pub fn range(&self) -> PageRange {
        PageRange {
            start: self.start_page,
            end: self.start_page + self.page_count as u32 - 1,
        }
    }

    pub fn file_name(&self) -> String {
        segment_file_name(self.index)
    }
}

/// Partitions `total_pages` pages into consecutive ranges of at most
/// `pages_per_split` pages. Only the last range may be shorter.
pub fn plan_ranges(total_pages: u32, pages_per_split: NonZeroUsize) -> Vec<PageRange> {
    let step = u32::try_from(pages_per_split.get()).unwrap_or(u32::MAX);
    let mut ranges = Vec::new();
    let mut start = 1u32;

    while start <= total_pages {
        let end = start.saturating_add(step - 1).min(total_pages);
        ranges.push(PageRange { start, end });
        match end.checked_add(1) {
            Some(next) => start = next,
            None => break,
        }
    }
    ranges
}

/// Removes segment files from a previous run
pub fn remove_stale_segments(output_dir: &Path) -> ScoutResult<usize> {
    let stale = list_segment_files(output_dir)?;
    for path in &stale {
        fs::remove_file(path).map_err(|e| ScoutError::from_io(path, e))?;
    }
    if !stale.is_empty() {
        debug!(
            "Removed {} stale segments from {}",
            stale.len(),
            output_dir.display()
        );
    }
    Ok(stale.len())
}

/// Splits `source` into `part_<n>.pdf` files inside `output_dir`.
///
/// A missing source fails with [`ScoutError::InputNotFound`] before the output
/// directory is created. The output directory is created if it does not
/// exist. Returns the segments in part order.
pub fn split_document(
    source: &Path,
    output_dir: &Path,
    pages_per_split: NonZeroUsize,
) -> ScoutResult<Vec<Segment>> {
    if !source.is_file() {
        return Err(ScoutError::input_not_found(source));
    }
    let document = pdf::load_document(source)?;
    let total_pages = pdf::page_count(&document);

    fs::create_dir_all(output_dir).map_err(|e| ScoutError::from_io(output_dir, e))?;
    remove_stale_segments(output_dir)?;

    let ranges = plan_ranges(total_pages, pages_per_split);
    info!(
        "Splitting {} ({} pages) into {} segments of up to {} pages",
        source.display(),
        total_pages,
        ranges.len(),
        pages_per_split
    );

    let mut segments = Vec::with_capacity(ranges.len());
    for (i, range) in ranges.into_iter().enumerate() {
        let index = i + 1;
        let path = output_dir.join(segment_file_name(index));
        let mut part =
            pdf::extract_range(&document, range).map_err(|e| ScoutError::pdf(source, e))?;
        write_segment(&mut part, output_dir, &path)?;

        debug!(
            "Wrote {} (pages {}-{})",
            path.display(),
            range.start,
            range.end
        );
        segments.push(Segment {
            index,
            start_page: range.start,
            page_count: range.len(),
            path,
        });
    }

    Ok(segments)
}

fn write_segment(doc: &mut lopdf::Document, output_dir: &Path, path: &Path) -> ScoutResult<()> {
    let mut tmp = NamedTempFile::new_in(output_dir).map_err(|e| ScoutError::from_io(output_dir, e))?;
    doc.save_to(&mut tmp)
        .map_err(|e| ScoutError::segment_write(path, e))?;
    tmp.flush().map_err(|e| ScoutError::from_io(path, e))?;
    tmp.persist(path)
        .map_err(|e| ScoutError::segment_write(path, e.error))?;
    Ok(())
}
