//! Pure mutual-exclusion marker.

use async_trait::async_trait;

use crate::conditions::condition::{Condition, ConditionResult};
use crate::tasks::Task;

/// Enrolls a task in a mutual-exclusion category without any readiness
/// predicate: evaluation always passes, there is no prerequisite task.
///
/// Tasks sharing a category execute strictly one at a time, in admission
/// order, across every queue in the process (see
/// [`ExclusivityController`](crate::ExclusivityController)).
///
/// # Example
/// ```
/// use taskgate::{Exclusive, Task};
///
/// let show_dialog = Task::from_fn("show-dialog", |_| async { Ok(()) });
/// show_dialog.add_condition(Exclusive::new("user-dialog"));
/// ```
pub struct Exclusive {
    category: String,
    name: String,
}

impl Exclusive {
    /// Creates a marker for `category`.
    pub fn new(category: impl Into<String>) -> Self {
        let category = category.into();
        let name = format!("exclusive-{category}");
        Self { category, name }
    }
}

#[async_trait]
impl Condition for Exclusive {
    fn name(&self) -> &str {
        &self.name
    }

    fn exclusivity_category(&self) -> Option<String> {
        Some(self.category.clone())
    }

    async fn evaluate(&self, _task: &Task) -> ConditionResult {
        ConditionResult::Satisfied
    }
}
