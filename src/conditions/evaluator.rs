//! # Concurrent condition evaluation.
//!
//! Runs all of a task's conditions at once and reduces their outcomes to an
//! ordered failure list.
//!
//! ## Rules
//! - Every condition is evaluated exactly once, concurrently; completion
//!   order is irrelevant.
//! - The failure list preserves **declaration order**, not completion order.
//! - Equal failures are de-duplicated (first occurrence wins its slot).
//! - If the task was cancelled through another path while evaluation was in
//!   flight, a generic evaluation-cancelled error is appended.
//!
//! The caller (the queue runner) turns a non-empty list into
//! `cancel_with_errors` and then advances the task to `Ready` regardless, so
//! a failed task still drains through the normal completion path.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::conditions::condition::{Condition, ConditionResult};
use crate::error::TaskError;
use crate::tasks::Task;

/// Evaluates `conditions` for `task` and returns the ordered, de-duplicated
/// failure list (empty when every condition passed).
pub(crate) async fn evaluate_conditions(
    task: &Task,
    conditions: Vec<Arc<dyn Condition>>,
) -> Vec<TaskError> {
    let mut set = JoinSet::new();
    for (index, condition) in conditions.into_iter().enumerate() {
        let task = task.clone();
        set.spawn(async move { (index, condition.evaluate(&task).await) });
    }

    let mut results: Vec<Option<ConditionResult>> = (0..set.len()).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        if let Ok((index, result)) = joined {
            results[index] = Some(result);
        }
    }

    let mut failures: Vec<TaskError> = Vec::new();
    for result in results.into_iter().flatten() {
        if let ConditionResult::Failed(error) = result {
            if !failures.contains(&error) {
                failures.push(error);
            }
        }
    }

    if task.is_cancelled() {
        failures.push(TaskError::EvaluationCancelled);
    }

    failures
}
