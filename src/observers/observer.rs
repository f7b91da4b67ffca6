//! # Lifecycle observers.
//!
//! [`Observe`] is the per-task callback seam: a fixed set of hooks fired at
//! exact points of the state machine. Callbacks are synchronous because they
//! run *inside* the task's bookkeeping (`cancel`, `finish`, execution start)
//! — they are how the queue wires itself to a task, not a general async
//! processing channel. For asynchronous observability, subscribe to the
//! queue's event bus instead.
//!
//! ## Guarantees
//! - `task_started` fires once, right after the task enters `Executing`.
//! - `task_cancelled` fires at most once, when the latch is first set.
//! - `task_produced` fires for every [`Task::produce`] call.
//! - `task_finished` fires exactly once, after the task has reached
//!   `Finishing`, regardless of how many times `finish`/`cancel` race.
//!
//! ## Rules
//! - Callbacks run on whichever thread drove the lifecycle step; keep them
//!   short and non-blocking. Spawn for anything heavier.
//! - The per-task lock is **not** held during callbacks; calling back into
//!   the task (e.g. `cancel` from `task_started`) is safe.

use crate::error::TaskError;
use crate::tasks::Task;

/// Set of lifecycle callbacks attachable to a task.
///
/// All hooks default to no-ops; implement the ones you care about.
pub trait Observe: Send + Sync + 'static {
    /// The task entered `Executing` and its work is about to run.
    fn task_started(&self, _task: &Task) {}

    /// The task's cancellation latch was set.
    fn task_cancelled(&self, _task: &Task) {}

    /// The running task handed `produced` to its queue for admission.
    fn task_produced(&self, _task: &Task, _produced: &Task) {}

    /// The task completed with the given merged error list.
    fn task_finished(&self, _task: &Task, _errors: &[TaskError]) {}
}
