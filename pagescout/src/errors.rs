//! Error types shared by every stage of the split/search/filter pipeline.
//!
//! All fallible operations return [`ScoutResult`]. Callers usually only care
//! about a handful of variants:
//!
//! ```rust,ignore
//! match pagescout::run(&config, &reporter) {
//!     Ok(summary) => // report kept segments,
//!     Err(ScoutError::InputNotFound(path)) => // nothing was touched,
//!     Err(ScoutError::Pdf { path, .. }) => // a document could not be parsed,
//!     Err(e) => // IO and everything else
//! }
//! ```
//!
//! An error returned from a worker aborts the run. Segments already deleted and
//! report blocks already written stay as they are.
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for pipeline operations
pub type ScoutResult<T> = Result<T, ScoutError>;

/// Errors that can occur while splitting, searching or filtering
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("The provided PDF file path does not exist: {0}")]
    InputNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("No search text provided: at least one non-empty string is required")]
    EmptyCriteria,
    #[error("Failed to read PDF {path}: {source}")]
    Pdf {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
    #[error("Failed to write segment {path}: {message}")]
    SegmentWrite { path: PathBuf, message: String },
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScoutError {
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn pdf(path: impl Into<PathBuf>, source: lopdf::Error) -> Self {
        Self::Pdf {
            path: path.into(),
            source,
        }
    }

    pub fn segment_write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::SegmentWrite {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn worker_pool(msg: impl Into<String>) -> Self {
        Self::WorkerPool(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Maps an IO failure on `path` to the most specific variant.
    ///
    /// A missing file is an ordinary IO failure here. Only the up-front checks
    /// on the source document raise [`ScoutError::InputNotFound`].
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// Whether the error was raised before the run touched anything on disk.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InputNotFound(_) | Self::EmptyCriteria | Self::ConfigError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let path = Path::new("scan.pdf");
        let err = ScoutError::input_not_found(path);
        assert!(matches!(err, ScoutError::InputNotFound(_)));

        let err = ScoutError::permission_denied(path);
        assert!(matches!(err, ScoutError::PermissionDenied(_)));

        let err = ScoutError::segment_write("output/part_1.pdf", "disk full");
        assert!(matches!(err, ScoutError::SegmentWrite { .. }));

        let err = ScoutError::worker_pool("no threads");
        assert!(matches!(err, ScoutError::WorkerPool(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = ScoutError::input_not_found("missing.pdf");
        assert_eq!(
            err.to_string(),
            "The provided PDF file path does not exist: missing.pdf"
        );

        let err = ScoutError::config_error("worker_count must be at least 1");
        assert_eq!(
            err.to_string(),
            "Configuration error: worker_count must be at least 1"
        );

        let err = ScoutError::segment_write("output/part_3.pdf", "disk full");
        assert_eq!(
            err.to_string(),
            "Failed to write segment output/part_3.pdf: disk full"
        );
    }

    #[test]
    fn test_from_io_kinds() {
        let path = Path::new("segment.pdf");

        let err = ScoutError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(&err, ScoutError::Io { path: p, .. } if p == path));
        assert!(!err.is_input_error());
        assert!(err.to_string().starts_with("IO error on segment.pdf: "));

        let err = ScoutError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, ScoutError::PermissionDenied(_)));

        let err = ScoutError::from_io(path, io::Error::from(io::ErrorKind::WriteZero));
        assert!(matches!(err, ScoutError::Io { .. }));
    }

    #[test]
    fn test_input_errors() {
        assert!(ScoutError::EmptyCriteria.is_input_error());
        assert!(ScoutError::input_not_found("x.pdf").is_input_error());
        assert!(!ScoutError::worker_pool("boom").is_input_error());
    }
}
