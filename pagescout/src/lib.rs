pub mod config;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod notify;
pub mod pdf;
pub mod report;
pub mod results;
pub mod search;
pub mod splitter;

pub use self::config::{ConfigOverrides, ScoutConfig};
pub use errors::{ScoutError, ScoutResult};
pub use notify::{StatusReporter, TracingReporter};
pub use report::MatchReport;
pub use results::{Disposition, LineMatch, RunSummary, SegmentOutcome, SegmentResult};
pub use search::{filter_segments, run, SearchCriteria};
pub use splitter::{split_document, PageRange, Segment};
