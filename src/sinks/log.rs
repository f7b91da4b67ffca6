//! Stdout logging sink for debugging and demos.

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::sinks::sink::EventSink;

/// Prints queue events to stdout in a compact human-readable form.
///
/// Enabled via the `logging` feature; intended for development and the
/// bundled demos, not production — implement your own [`EventSink`] for
/// structured logging or metrics.
///
/// ## Output format
/// ```text
/// [admitted] task=fetch
/// [starting] task=fetch
/// [cancelled] task=fetch
/// [produced] task=fetch -> cleanup
/// [finished] task=fetch errors=0
/// [suspended]
/// [resumed]
/// ```
pub struct LogWriter;

#[async_trait]
impl EventSink for LogWriter {
    async fn on_event(&self, event: &Event) {
        let task = event.task.as_deref().unwrap_or("?");
        match event.kind {
            EventKind::TaskAdmitted => println!("[admitted] task={task}"),
            EventKind::TaskStarting => println!("[starting] task={task}"),
            EventKind::TaskCancelled => println!("[cancelled] task={task}"),
            EventKind::TaskProduced => {
                let produced = event.reason.as_deref().unwrap_or("?");
                println!("[produced] task={task} -> {produced}");
            }
            EventKind::TaskFinished => {
                println!("[finished] task={task} errors={}", event.errors.unwrap_or(0));
            }
            EventKind::QueueSuspended => println!("[suspended]"),
            EventKind::QueueResumed => println!("[resumed]"),
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
