//! # Group task: a composite task running its own sub-queue.
//!
//! A group is an ordinary [`Task`] whose work owns a private, initially
//! suspended [`TaskQueue`]. Two synthetic no-op barrier tasks fence the
//! sub-queue's work:
//!
//! ```text
//! group.execute()
//!   ├─► resume private queue          (start barrier becomes runnable)
//!   └─► admit finish barrier
//!
//! private queue's will_admit(t):
//!   ├─ t ≠ start  → t depends on start barrier
//!   └─ t ≠ finish → finish barrier depends on t
//!
//! private queue's did_finish(t):
//!   ├─ t = finish → suspend queue, group finishes with aggregate
//!   ├─ t = start  → (ignored)
//!   └─ child      → aggregate errors, fire reaction hook
//! ```
//!
//! Consequences:
//! - no sub-task begins (or evaluates conditions) before the group itself
//!   starts executing;
//! - the group completes only after every sub-task — including tasks
//!   produced dynamically during execution — has finished, because each one
//!   is wired as a dependency of the finish barrier *synchronously at
//!   admission*, which happens before its producer finishes;
//! - cancelling the group cancels the sub-queue's work and drains through
//!   the barrier normally (the work owns its completion path), preserving a
//!   single completion drain.
//!
//! Adding a task to an already-completed group is a caller bug and panics.

use std::borrow::Cow;
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;

use crate::error::TaskError;
use crate::queue::{QueueDelegate, TaskQueue};
use crate::tasks::{Task, WeakTask, Work};

/// Hook fired after each sub-task (barriers excluded) finishes.
type ChildReaction = Box<dyn Fn(&Task, &[TaskError]) + Send + Sync>;

/// Shared core of a group: the private queue, the barriers, and the error
/// aggregate. Doubles as the private queue's delegate.
pub(crate) struct GroupCore {
    pub(crate) queue: TaskQueue,
    start: Task,
    finish: Task,
    /// The group's own task; weak to avoid a self-cycle through the work.
    owner: OnceLock<WeakTask>,
    aggregated: Mutex<Vec<TaskError>>,
    reaction: Mutex<Option<ChildReaction>>,
}

impl GroupCore {
    /// True when the group's own task is cancelled (or already gone).
    pub(crate) fn is_cancelled(&self) -> bool {
        self.owner
            .get()
            .and_then(WeakTask::upgrade)
            .map_or(true, |owner| owner.is_cancelled())
    }
}

impl QueueDelegate for GroupCore {
    fn will_admit(&self, _queue: &TaskQueue, task: &Task) {
        assert!(
            !self.finish.is_finished(),
            "queue '{}': tasks may not be added after the group completed",
            self.queue.name()
        );
        if !task.same(&self.start) {
            task.add_dependency(self.start.clone());
        }
        if !task.same(&self.finish) {
            self.finish.add_dependency(task.clone());
        }
    }

    fn did_finish(&self, queue: &TaskQueue, task: &Task, errors: &[TaskError]) {
        if task.same(&self.finish) {
            queue.suspend();
            let aggregated = self
                .aggregated
                .lock()
                .expect("group aggregate lock poisoned")
                .clone();
            if let Some(owner) = self.owner.get().and_then(WeakTask::upgrade) {
                owner.finish(aggregated);
            }
        } else if !task.same(&self.start) {
            self.aggregated
                .lock()
                .expect("group aggregate lock poisoned")
                .extend_from_slice(errors);
            let reaction = self.reaction.lock().expect("group reaction lock poisoned");
            if let Some(reaction) = reaction.as_ref() {
                reaction(task, errors);
            }
        }
    }
}

/// The group's work capability: unblocks the sub-queue and plants the finish
/// barrier. Completion arrives later, through the barrier.
struct GroupWork {
    core: Arc<GroupCore>,
}

#[async_trait]
impl Work for GroupWork {
    async fn execute(&self, _task: &Task) {
        self.core.queue.resume();
        self.core.queue.admit(self.core.finish.clone());
    }

    fn cancelled(&self, _task: &Task) {
        self.core.queue.cancel_all();
    }

    fn owns_completion(&self) -> bool {
        true
    }
}

/// # A task that completes only after all of its sub-tasks have.
///
/// Admit the group's [`task`](GroupTask::task) to any queue like any other
/// task; its children run on the group's private queue once the group itself
/// starts. Children may be supplied up front, added later with
/// [`add_child`](GroupTask::add_child) (until the group completes), or
/// produced dynamically by running children — all of them hold the group
/// open.
///
/// # Example
/// ```no_run
/// use taskgate::{GroupTask, Task, TaskQueue};
///
/// #[tokio::main]
/// async fn main() {
///     let queue = TaskQueue::new("main");
///     let group = GroupTask::new(
///         "import",
///         vec![
///             Task::from_fn("download", |_| async { Ok(()) }),
///             Task::from_fn("parse", |_| async { Ok(()) }),
///         ],
///     );
///     queue.admit(group.task().clone());
///     group.task().finished().await;
/// }
/// ```
pub struct GroupTask {
    task: Task,
    core: Arc<GroupCore>,
}

impl GroupTask {
    /// Creates a group with the given initial children.
    ///
    /// Must be called within a tokio runtime (children are admitted to the
    /// private queue immediately, suspended until the group executes).
    pub fn new(name: impl Into<Cow<'static, str>>, children: Vec<Task>) -> Self {
        let name = name.into();
        let queue = TaskQueue::builder(format!("{name}-queue"))
            .suspended(true)
            .build();
        let start = Task::from_fn(format!("{name}-start"), |_| async { Ok(()) });
        let finish = Task::from_fn(format!("{name}-finish"), |_| async { Ok(()) });
        let core = Arc::new(GroupCore {
            queue,
            start,
            finish,
            owner: OnceLock::new(),
            aggregated: Mutex::new(Vec::new()),
            reaction: Mutex::new(None),
        });
        let delegate: Arc<dyn QueueDelegate> = core.clone();
        core.queue.set_delegate(&delegate);
        core.queue.admit(core.start.clone());
        for child in children {
            core.queue.admit(child);
        }
        let task = Task::new(
            name,
            GroupWork {
                core: Arc::clone(&core),
            },
        );
        let _ = core.owner.set(task.downgrade());
        GroupTask { task, core }
    }

    /// The group's own task: admit it, depend on it, observe it, cancel it.
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Consumes the wrapper, leaving just the task handle.
    pub fn into_task(self) -> Task {
        self.task
    }

    /// Adds a sub-task. Legal until the group completes; the new child keeps
    /// the group open even when added mid-execution.
    ///
    /// # Panics
    /// If the group already completed.
    pub fn add_child(&self, child: Task) {
        self.core.queue.admit(child);
    }

    /// Snapshot of the errors aggregated from finished children so far.
    pub fn aggregated_errors(&self) -> Vec<TaskError> {
        self.core
            .aggregated
            .lock()
            .expect("group aggregate lock poisoned")
            .clone()
    }

    /// Installs a hook fired after each sub-task finishes (barriers
    /// excluded), with that child's error list. This is the reaction seam
    /// composite behaviors build on — the retry wrapper admits its next
    /// attempt from here. Replaces any previously installed hook.
    ///
    /// The hook runs inside the child's completion notification, strictly
    /// before the child reaches `Finished`, so tasks admitted from it always
    /// hold the group open.
    pub fn on_child_finish(&self, hook: impl Fn(&Task, &[TaskError]) + Send + Sync + 'static) {
        *self
            .core
            .reaction
            .lock()
            .expect("group reaction lock poisoned") = Some(Box::new(hook));
    }

    pub(crate) fn core(&self) -> &Arc<GroupCore> {
        &self.core
    }
}

impl From<GroupTask> for Task {
    fn from(group: GroupTask) -> Task {
        group.into_task()
    }
}
