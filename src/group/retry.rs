//! # Retry wrapper built on the group mechanism.
//!
//! A [`RetryTask`] is a [`GroupTask`] seeded with one attempt from a task
//! factory. When an attempt finishes *with errors*, the policy decides
//! whether another attempt is admitted into the still-open group; the finish
//! barrier keeps the group alive across attempts because each new attempt is
//! wired as a barrier dependency synchronously, before the failed attempt
//! reaches `Finished`.
//!
//! The wrapper's own error list is the group aggregate: every failed
//! attempt's errors, in order. A final successful attempt contributes
//! nothing, so "failed twice then succeeded" surfaces exactly the two
//! failures.
//!
//! ## Backoff
//! With a [`RetryBackoff`], each new attempt additionally depends on an
//! internal pace task that sleeps the computed delay. Both are admitted
//! inside the reaction hook, so the pacing never races the barrier.

use std::borrow::Cow;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::error::TaskError;
use crate::group::composite::GroupTask;
use crate::policies::RetryBackoff;
use crate::tasks::Task;

/// # A task that re-runs a factory-produced attempt under a policy.
///
/// The policy receives the failing attempt's errors and the number of
/// attempts made so far (1-based: the seed attempt counts); returning true
/// admits another attempt.
///
/// # Example
/// ```no_run
/// use taskgate::{RetryTask, Task, TaskError, TaskQueue};
///
/// #[tokio::main]
/// async fn main() {
///     let queue = TaskQueue::new("main");
///     let retry = RetryTask::new(
///         "sync",
///         || Task::from_fn("sync-attempt", |_| async { Err(TaskError::failed("offline")) }),
///         |_errors, attempts| attempts < 3,
///     );
///     queue.admit(retry.task().clone());
///     retry.task().finished().await;
/// }
/// ```
pub struct RetryTask {
    group: GroupTask,
}

impl RetryTask {
    /// Creates a retry task with no pacing between attempts.
    pub fn new<F, P>(name: impl Into<Cow<'static, str>>, factory: F, policy: P) -> Self
    where
        F: Fn() -> Task + Send + Sync + 'static,
        P: Fn(&[TaskError], u32) -> bool + Send + Sync + 'static,
    {
        Self::build(name, factory, policy, None)
    }

    /// Creates a retry task that waits `backoff.delay(attempts)` before each
    /// new attempt.
    pub fn with_backoff<F, P>(
        name: impl Into<Cow<'static, str>>,
        factory: F,
        policy: P,
        backoff: RetryBackoff,
    ) -> Self
    where
        F: Fn() -> Task + Send + Sync + 'static,
        P: Fn(&[TaskError], u32) -> bool + Send + Sync + 'static,
    {
        Self::build(name, factory, policy, Some(backoff))
    }

    fn build<F, P>(
        name: impl Into<Cow<'static, str>>,
        factory: F,
        policy: P,
        backoff: Option<RetryBackoff>,
    ) -> Self
    where
        F: Fn() -> Task + Send + Sync + 'static,
        P: Fn(&[TaskError], u32) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let group = GroupTask::new(name.clone(), Vec::new());
        let attempts = AtomicU32::new(1);
        let core = Arc::downgrade(group.core());
        let pace_name = name.clone();

        let seed = factory();
        group.on_child_finish(move |_child, errors| {
            if errors.is_empty() {
                return;
            }
            let Some(core) = core.upgrade() else {
                return;
            };
            if core.is_cancelled() {
                return;
            }
            let so_far = attempts.load(Ordering::Acquire);
            if !policy(errors, so_far) {
                return;
            }
            attempts.store(so_far + 1, Ordering::Release);

            let next = factory();
            if let Some(backoff) = &backoff {
                let delay = backoff.delay(so_far);
                let pace = Task::from_fn(
                    format!("{pace_name}-pace-{so_far}"),
                    move |_| async move {
                        tokio::time::sleep(delay).await;
                        Ok(())
                    },
                );
                next.add_dependency(pace.clone());
                core.queue.admit(pace);
            }
            core.queue.admit(next);
        });
        group.add_child(seed);

        RetryTask { group }
    }

    /// The retry's own task: admit it, observe it, cancel it.
    pub fn task(&self) -> &Task {
        self.group.task()
    }

    /// Consumes the wrapper, leaving just the task handle.
    pub fn into_task(self) -> Task {
        self.group.into_task()
    }
}

impl From<RetryTask> for Task {
    fn from(retry: RetryTask) -> Task {
        retry.into_task()
    }
}
