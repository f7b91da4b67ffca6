//! # Queue delegate.
//!
//! The delegate is the queue's integration seam: a composite task (a group)
//! or any surrounding layer hooks admission and completion without the queue
//! knowing who is listening. The queue holds the delegate weakly — it never
//! keeps its owner alive.

use crate::error::TaskError;
use crate::queue::core::TaskQueue;
use crate::tasks::Task;

/// Hooks into a queue's admission and completion flow.
///
/// Both callbacks are synchronous: `will_admit` runs inside the admission
/// pipeline (before the task is released for readiness evaluation, so
/// dependencies added here are always honored), and `did_finish` runs inside
/// the task's completion notification, strictly before the task reaches
/// `Finished`.
pub trait QueueDelegate: Send + Sync + 'static {
    /// The queue is about to admit `task`. Dependencies and observers may
    /// still be attached here.
    fn will_admit(&self, _queue: &TaskQueue, _task: &Task) {}

    /// A tracked task finished with the given merged error list.
    fn did_finish(&self, _queue: &TaskQueue, _task: &Task, _errors: &[TaskError]) {}
}
