//! # Lifecycle events published by a queue.
//!
//! Every queue publishes [`Event`]s on its bus as tasks move through
//! admission, execution, and completion. Events are observability data only:
//! the scheduling contract is carried by observers and the delegate, never by
//! the bus.
//!
//! ## Ordering
//! Each event carries a globally unique, monotonically increasing `seq`;
//! use it to restore order when events from several receivers interleave.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of queue events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A task entered the admission pipeline.
    ///
    /// Sets: `task`.
    TaskAdmitted,

    /// A task's work is about to run.
    ///
    /// Sets: `task`.
    TaskStarting,

    /// A tracked task's cancellation latch was set.
    ///
    /// Sets: `task`.
    TaskCancelled,

    /// A running task produced a follow-up task.
    ///
    /// Sets: `task` (the producer), `reason` (the produced task's name).
    TaskProduced,

    /// A tracked task completed.
    ///
    /// Sets: `task`, `errors` (count of errors it finished with).
    TaskFinished,

    /// The queue stopped starting new work.
    QueueSuspended,

    /// The queue resumed starting work.
    QueueResumed,
}

/// A queue event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - remaining fields are set depending on [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Free-form detail (produced-task name, suspension source, ...).
    pub reason: Option<Arc<str>>,
    /// Number of errors a finished task carried.
    pub errors: Option<usize>,
}

impl Event {
    /// Creates an event of the given kind, stamped now and sequenced.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, Ordering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            reason: None,
            errors: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches free-form detail.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a finished task's error count.
    #[inline]
    pub fn with_errors(mut self, errors: usize) -> Self {
        self.errors = Some(errors);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::now(EventKind::TaskAdmitted);
        let b = Event::now(EventKind::TaskAdmitted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builder_sets_fields() {
        let ev = Event::now(EventKind::TaskFinished)
            .with_task("job")
            .with_errors(2);
        assert_eq!(ev.kind, EventKind::TaskFinished);
        assert_eq!(ev.task.as_deref(), Some("job"));
        assert_eq!(ev.errors, Some(2));
        assert!(ev.reason.is_none());
    }
}
