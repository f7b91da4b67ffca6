//! Cancel-after-interval observer.

use std::time::Duration;

use crate::error::TaskError;
use crate::observers::observer::Observe;
use crate::tasks::Task;

/// Cancels the task with [`TaskError::Timeout`] if it is still unfinished
/// `after` the given interval past execution start.
///
/// The scheduling core has no timeout primitive of its own; this is the
/// observer-based pattern built on top. The timer starts when execution
/// starts (time spent waiting for dependencies or conditions does not
/// count), and cancellation is cooperative as always — the work must notice
/// [`Task::is_cancelled`] to stop promptly.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use taskgate::{Task, TimeoutObserver};
///
/// let slow = Task::from_fn("slow", |_| async { Ok(()) });
/// slow.add_observer(TimeoutObserver::new(Duration::from_secs(5)));
/// ```
pub struct TimeoutObserver {
    after: Duration,
}

impl TimeoutObserver {
    /// Creates a timeout of `after`, measured from execution start.
    pub fn new(after: Duration) -> Self {
        Self { after }
    }
}

impl Observe for TimeoutObserver {
    fn task_started(&self, task: &Task) {
        let task = task.clone();
        let after = self.after;
        tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(after) => {
                    task.cancel_with_errors(vec![TaskError::Timeout { after }]);
                }
                () = task.finished() => {}
            }
        });
    }
}
