//! # TaskQueue: admission and orchestration.
//!
//! The queue is where a task's declarative surface — conditions, observers,
//! dependencies — is turned into concrete wiring, synchronously, before the
//! task is released for readiness evaluation.
//!
//! ## Admission pipeline (`admit`)
//! ```text
//! admit(task)
//!   ├─ 1. attach internal observer
//!   │      ├─ produced  → admit(produced)        (recursive)
//!   │      └─ finished  → delegate.did_finish, untrack, publish
//!   ├─ 2. each condition.dependency_for(task)
//!   │      ├─ task.add_dependency(dep)
//!   │      └─ admit(dep)                          (full pipeline, recursive)
//!   ├─ 3. exclusivity categories from conditions
//!   │      ├─ controller.register(task, cats)     (may add dependencies)
//!   │      └─ attach finish observer → deregister
//!   ├─ 4. delegate.will_admit(queue, task)        (barrier wiring hook)
//!   ├─ 5. track + publish TaskAdmitted
//!   ├─ 6. spawn runner                            (waits for Pending)
//!   └─ 7. task.enqueue()                          (Initialized → Pending)
//! ```
//!
//! Steps 1–5 complete synchronously on the calling thread before step 7
//! releases the task; a task can never be observed ready with an incomplete
//! dependency set.
//!
//! ## Rules
//! - `admit` must be called within a tokio runtime (it spawns the runner).
//! - A task is admitted exactly once; re-admission faults in `enqueue`.
//! - Suspension gates execution only — admission, dependency waiting, and
//!   condition evaluation proceed while suspended.
//! - `cancel_all` cancels tracked tasks; it cannot stop work that is already
//!   running (cancellation is cooperative).

use std::borrow::Cow;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::{watch, Semaphore};

use crate::config::QueueConfig;
use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::exclusivity::ExclusivityController;
use crate::observers::{FnObserver, Observe};
use crate::queue::delegate::QueueDelegate;
use crate::queue::runner;
use crate::sinks::{EventSink, SinkSet};
use crate::tasks::Task;

pub(crate) struct QueueInner {
    name: Cow<'static, str>,
    pub(crate) bus: Bus,
    pub(crate) suspended: watch::Sender<bool>,
    pub(crate) semaphore: Option<Arc<Semaphore>>,
    delegate: Mutex<Option<Weak<dyn QueueDelegate>>>,
    tracked: Mutex<Vec<Task>>,
    /// Keeps sink worker lanes alive for the queue's lifetime.
    _sinks: Option<Arc<SinkSet>>,
}

/// # A task queue that understands conditions, dependencies, and exclusivity.
///
/// Cheap-clone handle; clones share the same queue. Admitted tasks are
/// tracked until they finish, then reported to the delegate and dropped from
/// tracking.
///
/// # Example
/// ```no_run
/// use taskgate::{Task, TaskQueue};
///
/// #[tokio::main]
/// async fn main() {
///     let queue = TaskQueue::new("background");
///     let job = Task::from_fn("job", |_| async { Ok(()) });
///     queue.admit(job.clone());
///     job.finished().await;
/// }
/// ```
#[derive(Clone)]
pub struct TaskQueue {
    inner: Arc<QueueInner>,
}

/// Builder for a [`TaskQueue`].
pub struct QueueBuilder {
    name: Cow<'static, str>,
    config: QueueConfig,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl QueueBuilder {
    /// Replaces the whole configuration.
    pub fn config(mut self, config: QueueConfig) -> Self {
        self.config = config;
        self
    }

    /// Caps concurrent execution (0 = unlimited).
    pub fn max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.config.max_concurrent = max_concurrent;
        self
    }

    /// Starts the queue suspended.
    pub fn suspended(mut self, start_suspended: bool) -> Self {
        self.config.start_suspended = start_suspended;
        self
    }

    /// Attaches an event sink (fan-out worker spawned at build).
    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Builds the queue. Must run within a tokio runtime when sinks are
    /// attached (their workers and the bus listener are spawned here).
    pub fn build(self) -> TaskQueue {
        let bus = Bus::new(self.config.bus_capacity);
        let semaphore = match self.config.max_concurrent {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };
        let (suspended, _) = watch::channel(self.config.start_suspended);
        let sinks = if self.sinks.is_empty() {
            None
        } else {
            let set = Arc::new(SinkSet::new(self.sinks));
            spawn_sink_listener(&bus, Arc::clone(&set));
            Some(set)
        };
        TaskQueue {
            inner: Arc::new(QueueInner {
                name: self.name,
                bus,
                suspended,
                semaphore,
                delegate: Mutex::new(None),
                tracked: Mutex::new(Vec::new()),
                _sinks: sinks,
            }),
        }
    }
}

/// Forwards bus events into the sink fan-out until the bus closes.
fn spawn_sink_listener(bus: &Bus, set: Arc<SinkSet>) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => set.emit(&event),
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
            }
        }
    });
}

impl TaskQueue {
    /// Creates a queue with default configuration.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self::builder(name).build()
    }

    /// Starts building a queue.
    pub fn builder(name: impl Into<Cow<'static, str>>) -> QueueBuilder {
        QueueBuilder {
            name: name.into(),
            config: QueueConfig::default(),
            sinks: Vec::new(),
        }
    }

    /// The queue's name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Sets the delegate (held weakly; the caller keeps it alive).
    pub fn set_delegate(&self, delegate: &Arc<dyn QueueDelegate>) {
        *self.inner.delegate.lock().expect("queue delegate lock poisoned") =
            Some(Arc::downgrade(delegate));
    }

    pub(crate) fn delegate(&self) -> Option<Arc<dyn QueueDelegate>> {
        self.inner
            .delegate
            .lock()
            .expect("queue delegate lock poisoned")
            .as_ref()
            .and_then(Weak::upgrade)
    }

    /// Admits `task`: wires condition dependencies and exclusivity, notifies
    /// the delegate, and releases the task into readiness evaluation. See
    /// the module docs for the exact pipeline.
    ///
    /// # Panics
    /// If the task was already admitted (here or on another queue), or if
    /// called outside a tokio runtime.
    pub fn admit(&self, task: Task) {
        // 1. Internal observer: produced tasks re-enter admission; completion
        //    notifies the delegate and drops the task from tracking.
        task.add_observer(QueueObserver {
            queue: Arc::downgrade(&self.inner),
        });

        // 2. Condition-generated prerequisites, each through the full
        //    pipeline (their own conditions included).
        for condition in task.conditions() {
            if let Some(dependency) = condition.dependency_for(&task) {
                task.add_dependency(dependency.clone());
                self.admit(dependency);
            }
        }

        // 3. Mutual-exclusion categories. Registration is synchronous and
        //    may add dependencies; deregistration rides the finish observer.
        let mut categories: Vec<String> = Vec::new();
        for condition in task.conditions() {
            if let Some(category) = condition.exclusivity_category() {
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
        }
        if !categories.is_empty() {
            ExclusivityController::global().register(&task, &categories);
            task.add_observer(FnObserver::new().on_finish(move |finished, _errors| {
                ExclusivityController::global().deregister(finished, &categories);
            }));
        }

        // 4. Delegate hook (a group wires its barriers here).
        if let Some(delegate) = self.delegate() {
            delegate.will_admit(self, &task);
        }

        // 5-7. Track, spawn the runner, and only then release the task.
        self.inner
            .tracked
            .lock()
            .expect("queue tracking lock poisoned")
            .push(task.clone());
        self.inner
            .bus
            .publish(Event::now(EventKind::TaskAdmitted).with_task(task.name().to_string()));
        tokio::spawn(runner::drive(Arc::clone(&self.inner), task.clone()));
        task.enqueue();
    }

    /// Builds a bare function-backed task and admits it. With no conditions
    /// attached, no condition or exclusivity logic applies — this is the
    /// plain-unit-of-work path.
    pub fn admit_fn<F, Fut>(&self, name: impl Into<Cow<'static, str>>, f: F) -> Task
    where
        F: Fn(Task) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let task = Task::from_fn(name, f);
        self.admit(task.clone());
        task
    }

    /// Admits a batch; optionally awaits every task's completion.
    ///
    /// The wait is async composition (the same future as
    /// [`Task::finished`]), not a thread-blocking wait.
    pub async fn admit_all(&self, tasks: Vec<Task>, wait_until_finished: bool) {
        for task in &tasks {
            self.admit(task.clone());
        }
        if wait_until_finished {
            for task in &tasks {
                task.finished().await;
            }
        }
    }

    /// Cancels every tracked task. Pending work is reaped; running work must
    /// observe cancellation itself.
    pub fn cancel_all(&self) {
        let tracked: Vec<Task> = self
            .inner
            .tracked
            .lock()
            .expect("queue tracking lock poisoned")
            .clone();
        for task in tracked {
            task.cancel();
        }
    }

    /// Stops starting new work. Running work is unaffected.
    pub fn suspend(&self) {
        if !*self.inner.suspended.borrow() {
            self.inner.suspended.send_replace(true);
            self.inner.bus.publish(Event::now(EventKind::QueueSuspended));
        }
    }

    /// Resumes starting work.
    pub fn resume(&self) {
        if *self.inner.suspended.borrow() {
            self.inner.suspended.send_replace(false);
            self.inner.bus.publish(Event::now(EventKind::QueueResumed));
        }
    }

    /// Whether the queue is currently suspended.
    pub fn is_suspended(&self) -> bool {
        *self.inner.suspended.borrow()
    }

    /// Number of admitted, not-yet-finished tasks.
    pub fn tracked(&self) -> usize {
        self.inner
            .tracked
            .lock()
            .expect("queue tracking lock poisoned")
            .len()
    }

    /// True when no admitted task is still in flight.
    pub fn is_idle(&self) -> bool {
        self.tracked() == 0
    }

    /// Subscribes to the queue's event bus.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }

    pub(crate) fn from_inner(inner: Arc<QueueInner>) -> Self {
        TaskQueue { inner }
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("name", &self.name())
            .field("tracked", &self.tracked())
            .field("suspended", &self.is_suspended())
            .finish()
    }
}

/// The observer the queue attaches to every admitted task.
struct QueueObserver {
    queue: Weak<QueueInner>,
}

impl Observe for QueueObserver {
    fn task_produced(&self, task: &Task, produced: &Task) {
        if let Some(inner) = self.queue.upgrade() {
            inner.bus.publish(
                Event::now(EventKind::TaskProduced)
                    .with_task(task.name().to_string())
                    .with_reason(produced.name().to_string()),
            );
            TaskQueue::from_inner(inner).admit(produced.clone());
        }
    }

    fn task_cancelled(&self, task: &Task) {
        if let Some(inner) = self.queue.upgrade() {
            inner
                .bus
                .publish(Event::now(EventKind::TaskCancelled).with_task(task.name().to_string()));
        }
    }

    fn task_finished(&self, task: &Task, errors: &[TaskError]) {
        if let Some(inner) = self.queue.upgrade() {
            let queue = TaskQueue::from_inner(inner);
            if let Some(delegate) = queue.delegate() {
                delegate.did_finish(&queue, task, errors);
            }
            queue
                .inner
                .tracked
                .lock()
                .expect("queue tracking lock poisoned")
                .retain(|tracked| !tracked.same(task));
            queue.inner.bus.publish(
                Event::now(EventKind::TaskFinished)
                    .with_task(task.name().to_string())
                    .with_errors(errors.len()),
            );
        }
    }
}
