//! # The readiness-condition protocol.
//!
//! A [`Condition`] is a pure description of "may this task run yet":
//! an asynchronous predicate, an optional mutual-exclusion category, and an
//! optional auto-generated prerequisite task. The scheduling core never
//! inspects *what* a condition checks — this trait is the seam through which
//! capability and permission layers plug in without the core knowing about
//! them.
//!
//! ## How the queue uses a condition
//! 1. At admission, [`Condition::dependency_for`] may hand back a prerequisite
//!    task; the queue adds it as a dependency and admits it through the same
//!    pipeline (conditions included).
//! 2. Also at admission, [`Condition::exclusivity_category`] enrolls the task
//!    in a process-wide mutual-exclusion chain.
//! 3. Once all dependencies have finished, every condition's
//!    [`Condition::evaluate`] runs concurrently; any failure cancels the task
//!    with that error.
//!
//! Conditions that never resolve hang their task — that is a bug in the
//! condition, not something the evaluator defends against.

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::Task;

/// Outcome of evaluating a single condition.
#[derive(Debug)]
pub enum ConditionResult {
    /// The task may proceed.
    Satisfied,
    /// The task must not run; it is cancelled with this error.
    Failed(TaskError),
}

impl ConditionResult {
    /// Shorthand for a failed result.
    pub fn failed(error: TaskError) -> Self {
        ConditionResult::Failed(error)
    }

    /// True if the condition passed.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, ConditionResult::Satisfied)
    }
}

/// # An asynchronous readiness predicate attachable to a task.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use taskgate::{Condition, ConditionResult, Task, TaskError};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// /// Passes only while the feature flag is on.
/// struct FlagEnabled(AtomicBool);
///
/// #[async_trait]
/// impl Condition for FlagEnabled {
///     fn name(&self) -> &str {
///         "flag-enabled"
///     }
///
///     async fn evaluate(&self, _task: &Task) -> ConditionResult {
///         if self.0.load(Ordering::Acquire) {
///             ConditionResult::Satisfied
///         } else {
///             ConditionResult::failed(TaskError::condition("flag-enabled", "flag is off"))
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Condition: Send + Sync + 'static {
    /// Stable, human-readable condition name (used in errors and logs).
    fn name(&self) -> &str;

    /// The mutual-exclusion category this condition enrolls its task in,
    /// or `None` (the default) when the condition is not mutually exclusive.
    ///
    /// Tasks sharing a category never execute concurrently, across all
    /// queues, in admission order.
    fn exclusivity_category(&self) -> Option<String> {
        None
    }

    /// An optional prerequisite task the queue should run before this
    /// condition is evaluated (e.g. a permission prompt). The returned task
    /// becomes a dependency of `task` and goes through the full admission
    /// pipeline itself.
    fn dependency_for(&self, _task: &Task) -> Option<Task> {
        None
    }

    /// Evaluates the predicate for `task`.
    ///
    /// Runs concurrently with the task's other conditions, after every
    /// dependency (including any [`Condition::dependency_for`] task) has
    /// finished.
    async fn evaluate(&self, task: &Task) -> ConditionResult;
}
