//! Silencing combinator: evaluate without triggering the prerequisite.

use async_trait::async_trait;

use crate::conditions::condition::{Condition, ConditionResult};
use crate::tasks::Task;

/// Evaluates the wrapped condition identically but suppresses its
/// auto-generated dependency.
///
/// Use this to *check* a capability's current truth value without the side
/// effect of acquiring it — e.g. fail fast when a permission has not been
/// granted rather than prompting for it.
pub struct Silenced<C> {
    condition: C,
}

impl<C: Condition> Silenced<C> {
    /// Wraps `condition`, dropping its prerequisite task.
    pub fn new(condition: C) -> Self {
        Self { condition }
    }
}

#[async_trait]
impl<C: Condition> Condition for Silenced<C> {
    fn name(&self) -> &str {
        self.condition.name()
    }

    fn exclusivity_category(&self) -> Option<String> {
        self.condition.exclusivity_category()
    }

    // dependency_for stays the default None: that is the whole point.

    async fn evaluate(&self, task: &Task) -> ConditionResult {
        self.condition.evaluate(task).await
    }
}
