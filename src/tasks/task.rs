//! # Task: the schedulable unit and its state machine.
//!
//! A [`Task`] is a cheap-clone handle (reference identity) over one unit of
//! asynchronous work plus everything the scheduler needs to know about it:
//! readiness conditions, lifecycle observers, dependencies, the cancellation
//! latch, and accumulated errors.
//!
//! ## Locking
//! All mutable bookkeeping lives in one record behind a per-task
//! `std::sync::Mutex`. Critical sections are short and the lock is **never**
//! held across an `.await` or while calling out into observers, conditions,
//! or work hooks. Progress is additionally published on a `tokio::sync::watch`
//! channel so dependents and the queue runner can await state changes without
//! polling.
//!
//! ## Mutation windows
//! - conditions: until evaluation begins (`state < EvaluatingConditions`)
//! - observers: until execution begins (`state < Executing`)
//! - dependencies: until execution begins (`state < Executing`)
//!
//! Mutating outside the window is a caller bug and panics.
//!
//! ## Completion
//! `finish` is guarded by a one-shot latch: the first caller wins, every
//! later call (including concurrent ones) is a no-op. Observer finish
//! callbacks therefore fire exactly once per task, after the state has
//! reached `Finishing`.

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::watch;
use uuid::Uuid;

use crate::conditions::Condition;
use crate::error::TaskError;
use crate::observers::Observe;
use crate::tasks::state::State;
use crate::tasks::work::{Work, WorkFn};

/// Unique identifier for a task, for logs and event correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Uuid);

impl TaskId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time view of a task's progress, published on the watch channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Progress {
    pub state: State,
    pub cancelled: bool,
}

/// The mutable bookkeeping record, guarded by the per-task lock.
struct Record {
    state: State,
    cancelled: bool,
    /// One-shot completion latch; set by the first `finish` caller.
    finish_started: bool,
    conditions: Vec<Arc<dyn Condition>>,
    observers: Vec<Arc<dyn Observe>>,
    dependencies: Vec<Task>,
    /// Internally raised errors, merged with finish-time errors on completion.
    errors: Vec<TaskError>,
}

struct Inner {
    id: TaskId,
    name: Cow<'static, str>,
    work: Arc<dyn Work>,
    record: Mutex<Record>,
    progress: watch::Sender<Progress>,
}

/// # The schedulable unit of work.
///
/// `Task` clones share one underlying unit (reference identity — compare with
/// [`Task::same`]). A task is owned jointly by the queue that admitted it and
/// by any task that depends on it; it is dropped once the last handle goes.
///
/// Construct with [`Task::new`] (a [`Work`] implementation) or
/// [`Task::from_fn`] (a closure), attach conditions/observers/dependencies,
/// then hand it to [`TaskQueue::admit`](crate::TaskQueue::admit). There is no
/// blocking wait: compose through dependencies, observers, or the async
/// [`Task::finished`] future.
#[derive(Clone)]
pub struct Task {
    inner: Arc<Inner>,
}

/// Non-owning task handle, for back-references that must not leak.
#[derive(Clone)]
pub(crate) struct WeakTask {
    inner: Weak<Inner>,
}

impl WeakTask {
    pub(crate) fn upgrade(&self) -> Option<Task> {
        self.inner.upgrade().map(|inner| Task { inner })
    }
}

impl Task {
    /// Creates a task around a [`Work`] implementation.
    pub fn new(name: impl Into<Cow<'static, str>>, work: impl Work) -> Self {
        Self::with_work(name, Arc::new(work))
    }

    /// Creates a task around an already-shared [`Work`] trait object.
    pub fn with_work(name: impl Into<Cow<'static, str>>, work: Arc<dyn Work>) -> Self {
        let (progress, _) = watch::channel(Progress {
            state: State::Initialized,
            cancelled: false,
        });
        Task {
            inner: Arc::new(Inner {
                id: TaskId::new(),
                name: name.into(),
                work,
                record: Mutex::new(Record {
                    state: State::Initialized,
                    cancelled: false,
                    finish_started: false,
                    conditions: Vec::new(),
                    observers: Vec::new(),
                    dependencies: Vec::new(),
                    errors: Vec::new(),
                }),
                progress,
            }),
        }
    }

    /// Creates a function-backed task; the closure's `Result` finishes it.
    ///
    /// # Example
    /// ```no_run
    /// use taskgate::Task;
    ///
    /// let hello = Task::from_fn("hello", |_task| async {
    ///     println!("hello");
    ///     Ok(())
    /// });
    /// ```
    pub fn from_fn<F, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(Task) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        Self::new(name, WorkFn::new(f))
    }

    /// The task's unique id.
    pub fn id(&self) -> TaskId {
        self.inner.id
    }

    /// The task's name, used in logs, events, and fault messages.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Reference identity: true if both handles share one underlying task.
    pub fn same(&self, other: &Task) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn downgrade(&self) -> WeakTask {
        WeakTask {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub(crate) fn work(&self) -> Arc<dyn Work> {
        Arc::clone(&self.inner.work)
    }

    // ---- observation ----

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.lock().state
    }

    /// Whether the cancellation latch is set. Latched: never un-cancels.
    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// Whether the task has reached its terminal state.
    pub fn is_finished(&self) -> bool {
        self.lock().state.is_finished()
    }

    /// Snapshot of the errors accumulated so far (the final list once the
    /// task has finished).
    pub fn errors(&self) -> Vec<TaskError> {
        self.lock().errors.clone()
    }

    /// Snapshot of the current dependency list.
    pub fn dependencies(&self) -> Vec<Task> {
        self.lock().dependencies.clone()
    }

    pub(crate) fn conditions(&self) -> Vec<Arc<dyn Condition>> {
        self.lock().conditions.clone()
    }

    pub(crate) fn has_errors(&self) -> bool {
        !self.lock().errors.is_empty()
    }

    /// Resolves once the task reaches `Finished`.
    ///
    /// This is an async composition point, not a blocking wait; it is safe to
    /// race in `select!` arms and to await from many places at once.
    pub async fn finished(&self) {
        let mut rx = self.inner.progress.subscribe();
        let _ = rx.wait_for(|p| p.state.is_finished()).await;
    }

    /// Resolves once the cancellation latch is set (possibly never).
    pub(crate) async fn cancelled_signal(&self) {
        let mut rx = self.inner.progress.subscribe();
        let _ = rx.wait_for(|p| p.cancelled).await;
    }

    /// Resolves once the task's state is at least `state`.
    pub(crate) async fn reached(&self, state: State) {
        let mut rx = self.inner.progress.subscribe();
        let _ = rx.wait_for(|p| p.state >= state).await;
    }

    // ---- mutation (legal-window asserted) ----

    /// Attaches a readiness condition.
    ///
    /// # Panics
    /// If condition evaluation has already begun.
    pub fn add_condition(&self, condition: impl Condition) {
        let mut r = self.lock();
        assert!(
            r.state < State::EvaluatingConditions,
            "task '{}': conditions are frozen once evaluation begins (state: {:?})",
            self.name(),
            r.state
        );
        r.conditions.push(Arc::new(condition));
    }

    /// Attaches a lifecycle observer.
    ///
    /// # Panics
    /// If execution has already begun.
    pub fn add_observer(&self, observer: impl Observe) {
        let mut r = self.lock();
        assert!(
            r.state < State::Executing,
            "task '{}': observers are frozen once execution begins (state: {:?})",
            self.name(),
            r.state
        );
        r.observers.push(Arc::new(observer));
    }

    /// Adds a dependency: this task will not evaluate conditions or execute
    /// until `dependency` has finished. A dependency's failure or
    /// cancellation does **not** cancel this task by default; gate on it
    /// explicitly with
    /// [`NoCancelledDependencies`](crate::NoCancelledDependencies) /
    /// [`NoFailedDependencies`](crate::NoFailedDependencies).
    ///
    /// # Panics
    /// If execution has already begun.
    pub fn add_dependency(&self, dependency: Task) {
        let mut r = self.lock();
        assert!(
            r.state < State::Executing,
            "task '{}': dependencies are frozen once execution begins (state: {:?})",
            self.name(),
            r.state
        );
        r.dependencies.push(dependency);
    }

    // ---- lifecycle ----

    /// Requests cancellation. Idempotent; the latch never un-cancels.
    ///
    /// Bookkeeping is immediate: observers are notified once, the work's
    /// cancelled hook runs, and a task already past `Ready` is driven to
    /// completion (unless its work owns a dedicated completion path). Running
    /// work is never interrupted — it must observe [`Task::is_cancelled`].
    pub fn cancel(&self) {
        self.cancel_with_errors(Vec::new());
    }

    /// Records `errors`, then cancels.
    pub fn cancel_with_errors(&self, errors: Vec<TaskError>) {
        let observers;
        let force_finish;
        {
            let mut r = self.lock();
            if r.finish_started || r.state.is_finished() {
                return;
            }
            r.errors.extend(errors);
            if r.cancelled {
                return;
            }
            r.cancelled = true;
            observers = r.observers.clone();
            force_finish = r.state > State::Ready && !self.inner.work.owns_completion();
            self.publish(&r);
        }
        for observer in &observers {
            observer.task_cancelled(self);
        }
        self.inner.work.cancelled(self);
        if force_finish {
            self.finish(Vec::new());
        }
    }

    /// Completes the task with `errors` merged after any internally recorded
    /// ones. First caller wins; every later call is a no-op.
    ///
    /// Drives `Finishing` → work finished hook → observer finish callbacks →
    /// `Finished`, in that order, on the caller's thread.
    ///
    /// # Panics
    /// If called before the task was admitted (no legal transition from
    /// `Initialized` to `Finishing`).
    pub fn finish(&self, errors: Vec<TaskError>) {
        let observers;
        let merged;
        {
            let mut r = self.lock();
            if r.finish_started {
                return;
            }
            r.finish_started = true;
            self.transition_locked(&mut r, State::Finishing);
            r.errors.extend(errors);
            merged = r.errors.clone();
            observers = r.observers.clone();
            self.publish(&r);
        }
        self.inner.work.finished(self, &merged);
        for observer in &observers {
            observer.task_finished(self, &merged);
        }
        {
            let mut r = self.lock();
            self.transition_locked(&mut r, State::Finished);
            self.publish(&r);
        }
    }

    /// Hands a follow-up task to whatever admitted this one, without creating
    /// a dependency edge. The admitting queue's internal observer forwards it
    /// into the same admission pipeline.
    pub fn produce(&self, task: Task) {
        let observers = self.lock().observers.clone();
        for observer in &observers {
            observer.task_produced(self, &task);
        }
    }

    // ---- crate-internal state machine driving ----

    /// Marks the task formally enqueued (`Initialized → Pending`), unlocking
    /// readiness evaluation. Admitting a task twice faults here.
    pub(crate) fn enqueue(&self) {
        self.advance(State::Pending);
    }

    /// Performs a single checked transition.
    pub(crate) fn advance(&self, target: State) {
        let mut r = self.lock();
        self.transition_locked(&mut r, target);
        self.publish(&r);
    }

    /// Moves `Ready → Executing` and tells observers execution started.
    pub(crate) fn begin_execution(&self) {
        let observers;
        {
            let mut r = self.lock();
            assert!(
                r.state == State::Ready,
                "task '{}': execution may only begin from Ready (state: {:?})",
                self.name(),
                r.state
            );
            self.transition_locked(&mut r, State::Executing);
            observers = r.observers.clone();
            self.publish(&r);
        }
        for observer in &observers {
            observer.task_started(self);
        }
    }

    fn transition_locked(&self, r: &mut std::sync::MutexGuard<'_, Record>, target: State) {
        assert!(
            r.state.can_transition_to(target, r.cancelled),
            "task '{}': illegal state transition {:?} -> {:?}",
            self.name(),
            r.state,
            target
        );
        r.state = target;
    }

    fn publish(&self, r: &Record) {
        self.inner.progress.send_replace(Progress {
            state: r.state,
            cancelled: r.cancelled,
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Record> {
        self.inner
            .record
            .lock()
            .expect("task record lock poisoned")
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name())
            .field("id", &self.id())
            .field("state", &self.state())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle(name: &'static str) -> Task {
        Task::from_fn(name, |_| async { Ok(()) })
    }

    #[test]
    fn new_task_is_initialized() {
        let t = idle("fresh");
        assert_eq!(t.state(), State::Initialized);
        assert!(!t.is_cancelled());
        assert!(!t.is_finished());
        assert!(t.errors().is_empty());
    }

    #[test]
    fn clones_share_identity() {
        let a = idle("shared");
        let b = a.clone();
        assert!(a.same(&b));
        assert_eq!(a.id(), b.id());
        b.cancel();
        assert!(a.is_cancelled());
    }

    #[test]
    fn distinct_tasks_differ() {
        let a = idle("a");
        let b = idle("b");
        assert!(!a.same(&b));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn cancel_is_latched_and_idempotent() {
        let t = idle("latched");
        t.cancel();
        t.cancel();
        assert!(t.is_cancelled());
        assert_eq!(t.state(), State::Initialized);
    }

    #[test]
    fn cancel_with_errors_records_them() {
        let t = idle("errs");
        t.cancel_with_errors(vec![TaskError::failed("boom")]);
        assert_eq!(t.errors(), vec![TaskError::failed("boom")]);
    }

    #[test]
    #[should_panic(expected = "illegal state transition")]
    fn finish_before_admission_faults() {
        let t = idle("early");
        t.finish(Vec::new());
    }

    #[test]
    #[should_panic(expected = "execution may only begin from Ready")]
    fn executing_from_initialized_faults() {
        let t = idle("eager");
        t.begin_execution();
    }

    #[test]
    fn finish_merges_internal_then_supplied_errors() {
        let t = idle("merge");
        t.enqueue();
        t.cancel_with_errors(vec![TaskError::failed("first")]);
        t.advance(State::Ready);
        t.finish(vec![TaskError::failed("second")]);
        assert_eq!(
            t.errors(),
            vec![TaskError::failed("first"), TaskError::failed("second")]
        );
        assert!(t.is_finished());
    }

    #[test]
    fn finish_is_one_shot() {
        let t = idle("once");
        t.enqueue();
        t.advance(State::Ready);
        t.finish(vec![TaskError::failed("kept")]);
        t.finish(vec![TaskError::failed("dropped")]);
        assert_eq!(t.errors(), vec![TaskError::failed("kept")]);
    }

    #[test]
    #[should_panic(expected = "dependencies are frozen")]
    fn dependency_after_execution_faults() {
        let t = idle("frozen");
        t.enqueue();
        t.advance(State::Ready);
        t.begin_execution();
        t.add_dependency(idle("late"));
    }
}
