//! # The work capability carried by a task.
//!
//! [`Work`] is what a [`Task`](crate::Task) actually runs. There is a single
//! concrete `Task` type; everything that differs between tasks — the user
//! logic, a group's nested queue, a retry loop — is a `Work` implementation
//! behind a trait object.
//!
//! ## Contract
//! - `execute` runs only from the `Ready` state, after all dependencies have
//!   finished and all conditions passed.
//! - `execute` must drive the task to `finish`, either directly before it
//!   returns, or through a completion path the work owns (a group finishes
//!   when its finish barrier completes, possibly long after `execute`
//!   returned).
//! - Work that is skipped (the task was cancelled or already carries errors
//!   at dispatch time) never sees `execute` at all.
//!
//! Most callers never implement `Work` by hand: [`WorkFn`] wraps a closure
//! and auto-finishes from its `Result`.

use std::future::Future;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::task::Task;

/// # The polymorphic execute/cancelled/finished capability of a task.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use taskgate::{Task, Work};
///
/// struct Greet;
///
/// #[async_trait]
/// impl Work for Greet {
///     async fn execute(&self, task: &Task) {
///         if task.is_cancelled() {
///             task.finish(Vec::new());
///             return;
///         }
///         println!("hello from {}", task.name());
///         task.finish(Vec::new());
///     }
/// }
/// ```
#[async_trait]
pub trait Work: Send + Sync + 'static {
    /// Runs the task's logic. Must lead to `task.finish(..)` being called,
    /// directly or through a completion path this work owns.
    ///
    /// Implementations should check [`Task::is_cancelled`] at suspension
    /// points and bail out promptly; the scheduler never interrupts running
    /// work.
    async fn execute(&self, task: &Task);

    /// Hook invoked while the task completes, before observers are notified.
    ///
    /// Runs exactly once, with the merged error list the task finishes with.
    fn finished(&self, _task: &Task, _errors: &[TaskError]) {}

    /// Hook invoked when the task's cancellation latch is first set.
    fn cancelled(&self, _task: &Task) {}

    /// Whether this work completes through its own mechanism.
    ///
    /// When false (the default), cancelling a task whose state is already
    /// past `Ready` forces completion immediately. Work that finishes through
    /// a dedicated path — a group completing via its finish barrier — returns
    /// true so cancellation drains through that single path instead.
    fn owns_completion(&self) -> bool {
        false
    }
}

/// Function-backed work.
///
/// Wraps a closure that produces a fresh future per execution. The closure
/// receives the owning [`Task`] handle (for cancellation checks and
/// [`Task::produce`]) and its `Result` finishes the task: `Ok` finishes
/// clean, `Err` finishes with that error. An explicit `task.finish(..)`
/// inside the closure wins; the automatic finish is then a no-op.
///
/// # Example
/// ```no_run
/// use taskgate::{Task, TaskError};
///
/// let task = Task::from_fn("fetch", |task: Task| async move {
///     if task.is_cancelled() {
///         return Err(TaskError::Cancelled);
///     }
///     // do work...
///     Ok(())
/// });
/// ```
pub struct WorkFn<F> {
    f: F,
}

impl<F, Fut> WorkFn<F>
where
    F: Fn(Task) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    /// Creates new function-backed work.
    ///
    /// Prefer [`Task::from_fn`], which wraps this into a task directly.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> Work for WorkFn<F>
where
    F: Fn(Task) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    async fn execute(&self, task: &Task) {
        match (self.f)(task.clone()).await {
            Ok(()) => task.finish(Vec::new()),
            Err(error) => task.finish(vec![error]),
        }
    }
}
