//! Dependency-outcome gates.
//!
//! By default a task runs even when a dependency was cancelled or failed —
//! that is intentional, not an oversight. These two conditions are how a
//! task opts in to caring: attach one and the task is cancelled at
//! evaluation time if any dependency had the offending outcome, with the
//! offenders' names carried as structured error detail.

use async_trait::async_trait;

use crate::conditions::condition::{Condition, ConditionResult};
use crate::error::TaskError;
use crate::tasks::Task;

/// Fails when any of the task's dependencies was cancelled.
pub struct NoCancelledDependencies;

#[async_trait]
impl Condition for NoCancelledDependencies {
    fn name(&self) -> &str {
        "no-cancelled-dependencies"
    }

    async fn evaluate(&self, task: &Task) -> ConditionResult {
        let cancelled: Vec<String> = task
            .dependencies()
            .iter()
            .filter(|dependency| dependency.is_cancelled())
            .map(|dependency| dependency.name().to_string())
            .collect();
        if cancelled.is_empty() {
            ConditionResult::Satisfied
        } else {
            ConditionResult::failed(TaskError::DependenciesCancelled {
                dependencies: cancelled,
            })
        }
    }
}

/// Fails when any of the task's dependencies finished with errors.
pub struct NoFailedDependencies;

#[async_trait]
impl Condition for NoFailedDependencies {
    fn name(&self) -> &str {
        "no-failed-dependencies"
    }

    async fn evaluate(&self, task: &Task) -> ConditionResult {
        let failed: Vec<String> = task
            .dependencies()
            .iter()
            .filter(|dependency| !dependency.errors().is_empty())
            .map(|dependency| dependency.name().to_string())
            .collect();
        if failed.is_empty() {
            ConditionResult::Satisfied
        } else {
            ConditionResult::failed(TaskError::DependenciesFailed {
                dependencies: failed,
            })
        }
    }
}
