//! # Per-queue event bus.
//!
//! [`Bus`] wraps [`tokio::sync::broadcast`]: many publishers (the admission
//! pipeline, runners, the internal observer), any number of independent
//! receivers.
//!
//! ## Rules
//! - `publish` never blocks and never fails; with no active receivers the
//!   event is simply dropped.
//! - Capacity is a ring buffer of recent events. A receiver that falls
//!   behind observes `RecvError::Lagged(n)` and skips the `n` oldest.
//! - A receiver only sees events published after it subscribed.

use tokio::sync::broadcast;

use crate::events::event::Event;

/// Broadcast channel for queue events.
///
/// Cheap to clone (the sender is internally reference-counted).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus with the given ring-buffer capacity (clamped to ≥ 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all current receivers; drops it if there are
    /// none.
    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Creates an independent receiver observing subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
