//! # Event sinks.
//!
//! [`EventSink`] is the asynchronous observability extension point: metrics
//! export, structured logging, audit trails. Sinks consume the queue's event
//! bus through a [`SinkSet`](crate::SinkSet), which gives each sink its own
//! bounded queue and worker task so a slow sink never stalls the scheduler
//! or its neighbors.

use async_trait::async_trait;

use crate::events::Event;

/// Asynchronous consumer of queue events.
///
/// ### Isolation
/// - Each sink gets a dedicated worker and a bounded queue
///   (capacity via [`EventSink::queue_capacity`]).
/// - Overflow drops the event for that sink only.
/// - Panics are caught and reported to stderr; other sinks are unaffected.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use taskgate::{Event, EventKind, EventSink};
///
/// struct FailureCounter;
///
/// #[async_trait]
/// impl EventSink for FailureCounter {
///     async fn on_event(&self, event: &Event) {
///         if event.kind == EventKind::TaskFinished && event.errors.unwrap_or(0) > 0 {
///             // bump a metric...
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         "failure-counter"
///     }
/// }
/// ```
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    /// Processes one event. Called from the sink's worker task, in
    /// publication order for this sink.
    async fn on_event(&self, event: &Event);

    /// Name used in drop/panic diagnostics. Prefer short names.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Bounded queue capacity for this sink (clamped to ≥ 1). Default 256.
    fn queue_capacity(&self) -> usize {
        256
    }
}
