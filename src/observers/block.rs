//! Closure-backed observer.

use crate::error::TaskError;
use crate::observers::observer::Observe;
use crate::tasks::Task;

type StartFn = Box<dyn Fn(&Task) + Send + Sync>;
type CancelFn = Box<dyn Fn(&Task) + Send + Sync>;
type ProduceFn = Box<dyn Fn(&Task, &Task) + Send + Sync>;
type FinishFn = Box<dyn Fn(&Task, &[TaskError]) + Send + Sync>;

/// Builds an [`Observe`] out of closures, one per hook.
///
/// Unset hooks are no-ops. The queue itself uses one of these to wire
/// exclusivity deregistration at finish time.
///
/// # Example
/// ```
/// use taskgate::{FnObserver, Task};
///
/// let task = Task::from_fn("job", |_| async { Ok(()) });
/// task.add_observer(
///     FnObserver::new()
///         .on_start(|t| println!("{} started", t.name()))
///         .on_finish(|t, errors| println!("{} finished, {} errors", t.name(), errors.len())),
/// );
/// ```
#[derive(Default)]
pub struct FnObserver {
    start: Option<StartFn>,
    cancel: Option<CancelFn>,
    produce: Option<ProduceFn>,
    finish: Option<FinishFn>,
}

impl FnObserver {
    /// Creates an observer with every hook unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the started hook.
    pub fn on_start(mut self, f: impl Fn(&Task) + Send + Sync + 'static) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    /// Sets the cancelled hook.
    pub fn on_cancel(mut self, f: impl Fn(&Task) + Send + Sync + 'static) -> Self {
        self.cancel = Some(Box::new(f));
        self
    }

    /// Sets the produced hook.
    pub fn on_produce(mut self, f: impl Fn(&Task, &Task) + Send + Sync + 'static) -> Self {
        self.produce = Some(Box::new(f));
        self
    }

    /// Sets the finished hook.
    pub fn on_finish(mut self, f: impl Fn(&Task, &[TaskError]) + Send + Sync + 'static) -> Self {
        self.finish = Some(Box::new(f));
        self
    }
}

impl Observe for FnObserver {
    fn task_started(&self, task: &Task) {
        if let Some(f) = &self.start {
            f(task);
        }
    }

    fn task_cancelled(&self, task: &Task) {
        if let Some(f) = &self.cancel {
            f(task);
        }
    }

    fn task_produced(&self, task: &Task, produced: &Task) {
        if let Some(f) = &self.produce {
            f(task, produced);
        }
    }

    fn task_finished(&self, task: &Task, errors: &[TaskError]) {
        if let Some(f) = &self.finish {
            f(task, errors);
        }
    }
}
