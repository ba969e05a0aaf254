//! Searching segments and filtering them.
//!
//! - [`matcher`]: pure line matching over extracted page text
//! - [`processor`]: loads a segment file and feeds its pages to the matcher
//! - [`engine`]: runs the processor over every segment on a bounded pool and
//!   decides keep or delete
//!
//! ```rust,ignore
//! let criteria = SearchCriteria::new(vec!["JOHN", "MARY"])?;
//! let summary = filter_segments(&segments, &criteria, &report, workers, &TracingReporter)?;
//! ```
pub mod engine;
pub mod matcher;
pub mod processor;

pub use engine::{filter_segments, run};
pub use matcher::SearchCriteria;
pub use processor::SegmentProcessor;
