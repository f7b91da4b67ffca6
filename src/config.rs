//! # Queue configuration.
//!
//! [`QueueConfig`] controls a single [`TaskQueue`](crate::TaskQueue):
//! concurrency cap, event-bus capacity, and whether the queue starts
//! suspended (a suspended queue admits and evaluates tasks but does not
//! start executing them until resumed).
//!
//! # Example
//! ```
//! use taskgate::QueueConfig;
//!
//! let mut cfg = QueueConfig::default();
//! cfg.max_concurrent = 4;
//! cfg.start_suspended = true;
//!
//! assert_eq!(cfg.max_concurrent, 4);
//! ```

/// Configuration for a single task queue.
#[derive(Clone, Copy, Debug)]
pub struct QueueConfig {
    /// Maximum number of tasks executing concurrently (0 = unlimited).
    ///
    /// The cap gates execution only; dependency waiting and condition
    /// evaluation do not occupy a slot.
    pub max_concurrent: usize,
    /// Capacity of the queue's event bus channel.
    pub bus_capacity: usize,
    /// Whether the queue starts suspended.
    pub start_suspended: bool,
}

impl Default for QueueConfig {
    /// Provides a default configuration:
    /// - `max_concurrent = 0` (unlimited)
    /// - `bus_capacity = 256`
    /// - `start_suspended = false`
    fn default() -> Self {
        Self {
            max_concurrent: 0,
            bus_capacity: 256,
            start_suspended: false,
        }
    }
}
