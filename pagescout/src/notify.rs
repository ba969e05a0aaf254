//! Per-segment status notifications.
//!
//! The coordinator never prints. It calls a [`StatusReporter`] handed in by the
//! caller, so the CLI can colour its console output and tests can record what
//! happened without any global state.
use std::sync::Mutex;
use tracing::info;

use crate::splitter::Segment;

/// Receives the keep/delete decision for every segment.
///
/// Called from worker threads, in completion order.
pub trait StatusReporter: Send + Sync {
    /// The segment matched and was kept
    fn segment_found(&self, segment: &Segment, matches: usize);

    /// The segment did not match and its file was deleted
    fn segment_deleted(&self, segment: &Segment);
}

/// Reports through `tracing` at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl StatusReporter for TracingReporter {
    fn segment_found(&self, segment: &Segment, matches: usize) {
        info!("found in {} ({} matching lines)", segment.file_name(), matches);
    }

    fn segment_deleted(&self, segment: &Segment) {
        info!("Not found in {}. Deleted.", segment.file_name());
    }
}

/// A notification captured by [`RecordingReporter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    Found { index: usize, matches: usize },
    Deleted { index: usize },
}

/// Collects notifications in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<StatusEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events sorted by segment index
    pub fn events(&self) -> Vec<StatusEvent> {
        let mut events = self
            .events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone());
        events.sort_by_key(|event| match event {
            StatusEvent::Found { index, .. } | StatusEvent::Deleted { index } => *index,
        });
        events
    }

    fn push(&self, event: StatusEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl StatusReporter for RecordingReporter {
    fn segment_found(&self, segment: &Segment, matches: usize) {
        self.push(StatusEvent::Found {
            index: segment.index,
            matches,
        });
    }

    fn segment_deleted(&self, segment: &Segment) {
        self.push(StatusEvent::Deleted {
            index: segment.index,
        });
    }
}
