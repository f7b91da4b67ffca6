//! Negation combinator: satisfied exactly when the wrapped condition fails.

use async_trait::async_trait;

use crate::conditions::condition::{Condition, ConditionResult};
use crate::error::TaskError;
use crate::tasks::Task;

/// Inverts a condition's outcome.
///
/// Inherits the wrapped condition's exclusivity category, but never forwards
/// its auto-generated dependency: negating a condition that would *request*
/// a capability makes no sense (the request would work toward satisfying the
/// very thing being negated).
pub struct Negated<C> {
    condition: C,
    name: String,
}

impl<C: Condition> Negated<C> {
    /// Wraps `condition`, swapping satisfied and failed.
    pub fn new(condition: C) -> Self {
        let name = format!("not-{}", condition.name());
        Self { condition, name }
    }
}

#[async_trait]
impl<C: Condition> Condition for Negated<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn exclusivity_category(&self) -> Option<String> {
        self.condition.exclusivity_category()
    }

    async fn evaluate(&self, task: &Task) -> ConditionResult {
        match self.condition.evaluate(task).await {
            ConditionResult::Satisfied => ConditionResult::failed(TaskError::condition(
                &self.name,
                format!("'{}' was satisfied", self.condition.name()),
            )),
            ConditionResult::Failed(_) => ConditionResult::Satisfied,
        }
    }
}
