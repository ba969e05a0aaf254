use rayon::prelude::*;
use std::fs;
use std::num::NonZeroUsize;
use tracing::{debug, info};

use super::matcher::SearchCriteria;
use super::processor::SegmentProcessor;
use crate::config::ScoutConfig;
use crate::errors::{ScoutError, ScoutResult};
use crate::metrics::RunMetrics;
use crate::notify::StatusReporter;
use crate::report::MatchReport;
use crate::results::{Disposition, RunSummary, SegmentOutcome};
use crate::splitter::{split_document, Segment};

/// Splits the input document and keeps only the segments that match.
///
/// The input path and criteria are validated before anything on disk is
/// touched. Afterwards the report is reset, the document split, and every
/// segment filtered on a pool of `config.worker_count` threads.
pub fn run(config: &ScoutConfig, reporter: &dyn StatusReporter) -> ScoutResult<RunSummary> {
    let criteria = config.validate()?;
    info!(
        "Starting run on {} with criteria {:?}",
        config.input_path.display(),
        criteria.terms()
    );

    let metrics = RunMetrics::new();
    let report = MatchReport::with_metrics(&config.report_path, metrics.clone());
    report.reset()?;

    let segments = split_document(
        &config.input_path,
        &config.output_dir,
        config.pages_per_split,
    )?;

    let processor = SegmentProcessor::with_metrics(criteria, metrics.clone());
    let summary = filter_with_processor(
        &segments,
        &processor,
        &report,
        config.worker_count,
        reporter,
    )?;

    metrics.log_stats();
    Ok(summary)
}

/// Searches every segment in parallel, keeping matches and deleting the rest.
///
/// The first error from any worker is returned; segments already deleted and
/// report blocks already written are left as they are.
pub fn filter_segments(
    segments: &[Segment],
    criteria: &SearchCriteria,
    report: &MatchReport,
    worker_count: NonZeroUsize,
    reporter: &dyn StatusReporter,
) -> ScoutResult<RunSummary> {
    let processor = SegmentProcessor::new(criteria.clone());
    filter_with_processor(segments, &processor, report, worker_count, reporter)
}

fn filter_with_processor(
    segments: &[Segment],
    processor: &SegmentProcessor,
    report: &MatchReport,
    worker_count: NonZeroUsize,
    reporter: &dyn StatusReporter,
) -> ScoutResult<RunSummary> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count.get())
        .thread_name(|i| format!("pagescout-worker-{}", i))
        .build()
        .map_err(|e| ScoutError::worker_pool(e.to_string()))?;

    debug!(
        "Filtering {} segments with {} workers",
        segments.len(),
        worker_count
    );

    let outcomes: Vec<SegmentOutcome> = pool.install(|| {
        segments
            .par_iter()
            .map(|segment| filter_one(segment, processor, report, reporter))
            .collect::<ScoutResult<Vec<_>>>()
    })?;

    let mut summary = RunSummary::new();
    for outcome in outcomes {
        summary.add_outcome(outcome);
    }

    info!(
        "Filtering complete. Kept {} of {} segments ({} matching lines)",
        summary.segments_kept,
        summary.segments_processed(),
        summary.total_matches
    );
    Ok(summary)
}

fn filter_one(
    segment: &Segment,
    processor: &SegmentProcessor,
    report: &MatchReport,
    reporter: &dyn StatusReporter,
) -> ScoutResult<SegmentOutcome> {
    let result = processor.process(&segment.path)?;

    let disposition = if result.is_match() {
        report.append(&result)?;
        reporter.segment_found(segment, result.matches.len());
        Disposition::Kept
    } else {
        fs::remove_file(&segment.path).map_err(|e| ScoutError::from_io(&segment.path, e))?;
        reporter.segment_deleted(segment);
        Disposition::Deleted
    };
    processor
        .metrics()
        .record_disposition(disposition == Disposition::Kept);

    Ok(SegmentOutcome {
        segment: segment.clone(),
        disposition,
        matches: result.matches,
    })
}
