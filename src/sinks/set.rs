//! Non-blocking fan-out of events to a set of sinks.

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::events::Event;
use crate::sinks::sink::EventSink;

struct Lane {
    name: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
}

/// Fans each event out to every sink without awaiting any of them.
///
/// One worker task per sink drains its bounded lane in FIFO order; a full
/// lane drops the event for that sink only. There is no ordering guarantee
/// *across* sinks.
pub struct SinkSet {
    lanes: Vec<Lane>,
}

impl SinkSet {
    /// Spawns one worker per sink. Must be called within a tokio runtime.
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        let mut lanes = Vec::with_capacity(sinks.len());
        for sink in sinks {
            let name = sink.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sink.queue_capacity().max(1));
            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    let handled = std::panic::AssertUnwindSafe(sink.on_event(&event))
                        .catch_unwind()
                        .await;
                    if let Err(panic) = handled {
                        eprintln!("[taskgate] sink '{}' panicked: {panic:?}", sink.name());
                    }
                }
            });
            lanes.push(Lane { name, tx });
        }
        Self { lanes }
    }

    /// Delivers one event to every lane (non-blocking; full or closed lanes
    /// drop it).
    pub fn emit(&self, event: &Event) {
        let event = Arc::new(event.clone());
        for lane in &self.lanes {
            if let Err(dropped) = lane.tx.try_send(Arc::clone(&event)) {
                let cause = match dropped {
                    mpsc::error::TrySendError::Full(_) => "lane full",
                    mpsc::error::TrySendError::Closed(_) => "worker closed",
                };
                eprintln!("[taskgate] sink '{}' dropped event: {cause}", lane.name);
            }
        }
    }

    /// Number of attached sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// True when no sinks are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}
