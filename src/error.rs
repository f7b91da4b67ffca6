//! Error types produced by tasks, conditions, and the scheduling core.
//!
//! Everything a task can fail with is a [`TaskError`]. There is deliberately
//! no separate error enum per component: condition failures, execution
//! failures, and cancellation all end up merged into one ordered list on the
//! owning task, and group tasks aggregate their children's lists verbatim.
//!
//! Contract violations (illegal state transitions, mutating a frozen list,
//! adding work to a completed group) are **not** errors — they are caller
//! bugs and panic immediately.

use std::time::Duration;
use thiserror::Error;

/// # Errors carried by a task through its lifecycle.
///
/// A task accumulates errors from three sources:
/// - its conditions, when evaluation fails ([`TaskError::ConditionFailed`]);
/// - its own work, via `finish`/`cancel_with_errors`;
/// - the dependency-gate conditions, which report the offending dependencies
///   as structured detail.
///
/// The type is `Clone + PartialEq` so the condition evaluator can
/// de-duplicate equal failures while preserving declaration order.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskError {
    /// A readiness condition reported failure.
    #[error("condition '{condition}' failed: {reason}")]
    ConditionFailed {
        /// Name of the failing condition.
        condition: String,
        /// Condition-specific detail.
        reason: String,
    },

    /// The task's own work reported failure.
    #[error("execution failed: {reason}")]
    Failed {
        /// The underlying error message.
        reason: String,
    },

    /// The task exceeded a deadline imposed by a timeout observer.
    #[error("timed out after {after:?}")]
    Timeout {
        /// The interval that elapsed.
        after: Duration,
    },

    /// The task was cancelled.
    #[error("task was cancelled")]
    Cancelled,

    /// Condition evaluation was still in flight when the task was cancelled
    /// through another path.
    #[error("condition evaluation was interrupted by cancellation")]
    EvaluationCancelled,

    /// One or more dependencies were cancelled
    /// (reported by [`NoCancelledDependencies`](crate::NoCancelledDependencies)).
    #[error("dependencies were cancelled: {dependencies:?}")]
    DependenciesCancelled {
        /// Names of the cancelled dependencies, in dependency order.
        dependencies: Vec<String>,
    },

    /// One or more dependencies finished with errors
    /// (reported by [`NoFailedDependencies`](crate::NoFailedDependencies)).
    #[error("dependencies finished with errors: {dependencies:?}")]
    DependenciesFailed {
        /// Names of the failed dependencies, in dependency order.
        dependencies: Vec<String>,
    },
}

impl TaskError {
    /// Shorthand for a [`TaskError::ConditionFailed`].
    pub fn condition(condition: impl Into<String>, reason: impl Into<String>) -> Self {
        TaskError::ConditionFailed {
            condition: condition.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`TaskError::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        TaskError::Failed {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskgate::TaskError;
    ///
    /// let err = TaskError::failed("boom");
    /// assert_eq!(err.as_label(), "execution_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::ConditionFailed { .. } => "condition_failed",
            TaskError::Failed { .. } => "execution_failed",
            TaskError::Timeout { .. } => "timeout",
            TaskError::Cancelled => "cancelled",
            TaskError::EvaluationCancelled => "evaluation_cancelled",
            TaskError::DependenciesCancelled { .. } => "dependencies_cancelled",
            TaskError::DependenciesFailed { .. } => "dependencies_failed",
        }
    }

    /// True for the cancellation-flavored variants.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TaskError::Cancelled | TaskError::EvaluationCancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(
            TaskError::condition("net", "offline").as_label(),
            "condition_failed"
        );
        assert_eq!(TaskError::Cancelled.as_label(), "cancelled");
        assert_eq!(
            TaskError::Timeout {
                after: Duration::from_secs(1)
            }
            .as_label(),
            "timeout"
        );
    }

    #[test]
    fn equality_supports_dedup() {
        let a = TaskError::condition("net", "offline");
        let b = TaskError::condition("net", "offline");
        let c = TaskError::condition("net", "captive portal");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn cancellation_flavors() {
        assert!(TaskError::Cancelled.is_cancellation());
        assert!(TaskError::EvaluationCancelled.is_cancellation());
        assert!(!TaskError::failed("x").is_cancellation());
    }
}
