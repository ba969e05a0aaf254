//! Naming and discovery of segment files inside an output directory.
//!
//! Segments are always called `part_<n>.pdf` with a 1-based `n`. These helpers
//! are free functions rather than a trait; nothing else in the crate needs to
//! plug in a different naming scheme.
use glob::Pattern;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{ScoutError, ScoutResult};

/// Extension used for every segment artifact
pub const SEGMENT_EXTENSION: &str = "pdf";

const SEGMENT_GLOB: &str = "part_*.pdf";

static SEGMENT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^part_([1-9][0-9]*)\.pdf$").expect("segment name regex is valid")
});

/// Returns the file name for the segment with the given 1-based part number
pub fn segment_file_name(index: usize) -> String {
    format!("part_{}.{}", index, SEGMENT_EXTENSION)
}

/// Extracts the part number from a segment path, if it is named like one
pub fn parse_segment_index(path: &Path) -> Option<usize> {
    let name = path.file_name()?.to_str()?;
    SEGMENT_NAME
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Lists the segment files in `dir`, ordered by part number.
///
/// A missing directory yields an empty list.
pub fn list_segment_files(dir: &Path) -> ScoutResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let escaped = Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{}/{}", escaped, SEGMENT_GLOB);
    let entries = glob::glob(&pattern).map_err(|e| {
        ScoutError::config_error(format!("Invalid output directory pattern: {}", e))
    })?;

    let mut segments: Vec<(usize, PathBuf)> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .filter_map(|path| parse_segment_index(&path).map(|index| (index, path)))
        .collect();

    segments.sort_by_key(|(index, _)| *index);
    debug!("Found {} segment files in {}", segments.len(), dir.display());
    Ok(segments.into_iter().map(|(_, path)| path).collect())
}
