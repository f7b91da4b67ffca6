//! Condition protocol scenarios: failure-to-cancellation, auto-generated
//! prerequisites, combinators, and the dependency-outcome gates.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use taskgate::{
    Condition, ConditionResult, FnObserver, Negated, NoCancelledDependencies,
    NoFailedDependencies, Silenced, State, Task, TaskError, TaskQueue,
};

/// Counts evaluations; passes or fails after a configurable delay.
struct Probe {
    name: &'static str,
    delay: Duration,
    fail_with: Option<&'static str>,
    evaluations: Arc<AtomicUsize>,
}

impl Probe {
    fn passing(name: &'static str, evaluations: &Arc<AtomicUsize>) -> Self {
        Self {
            name,
            delay: Duration::from_millis(1),
            fail_with: None,
            evaluations: Arc::clone(evaluations),
        }
    }

    fn failing(
        name: &'static str,
        reason: &'static str,
        delay_ms: u64,
        evaluations: &Arc<AtomicUsize>,
    ) -> Self {
        Self {
            name,
            delay: Duration::from_millis(delay_ms),
            fail_with: Some(reason),
            evaluations: Arc::clone(evaluations),
        }
    }
}

#[async_trait]
impl Condition for Probe {
    fn name(&self) -> &str {
        self.name
    }

    async fn evaluate(&self, _task: &Task) -> ConditionResult {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        match self.fail_with {
            Some(reason) => ConditionResult::failed(TaskError::condition(self.name, reason)),
            None => ConditionResult::Satisfied,
        }
    }
}

/// A condition whose prerequisite task flips a flag when it runs.
struct Prompt {
    fired: Arc<AtomicBool>,
}

#[async_trait]
impl Condition for Prompt {
    fn name(&self) -> &str {
        "prompt"
    }

    fn dependency_for(&self, _task: &Task) -> Option<Task> {
        let fired = Arc::clone(&self.fired);
        Some(Task::from_fn("prompt-request", move |_| {
            let fired = Arc::clone(&fired);
            async move {
                fired.store(true, Ordering::SeqCst);
                Ok(())
            }
        }))
    }

    async fn evaluate(&self, _task: &Task) -> ConditionResult {
        ConditionResult::Satisfied
    }
}

#[tokio::test]
async fn failing_condition_cancels_with_its_error() {
    let queue = TaskQueue::new("conditions");
    let evaluations = Arc::new(AtomicUsize::new(0));
    let started = Arc::new(AtomicBool::new(false));

    let task = Task::from_fn("denied", |_| async { Ok(()) });
    task.add_condition(Probe::failing("perm", "perm-denied", 1, &evaluations));
    let flag = Arc::clone(&started);
    task.add_observer(FnObserver::new().on_start(move |_| flag.store(true, Ordering::SeqCst)));

    queue.admit(task.clone());
    task.finished().await;

    assert!(!started.load(Ordering::SeqCst));
    assert!(task.is_cancelled());
    assert_eq!(task.state(), State::Finished);
    assert_eq!(task.errors(), vec![TaskError::condition("perm", "perm-denied")]);
}

#[tokio::test]
async fn every_condition_evaluates_once_and_failures_keep_declaration_order() {
    let queue = TaskQueue::new("conditions");
    let evaluations = Arc::new(AtomicUsize::new(0));

    let task = Task::from_fn("checked", |_| async { Ok(()) });
    // The first declared failure resolves last; order must still hold.
    task.add_condition(Probe::failing("first", "a", 40, &evaluations));
    task.add_condition(Probe::passing("ok", &evaluations));
    task.add_condition(Probe::failing("second", "b", 1, &evaluations));

    queue.admit(task.clone());
    task.finished().await;

    assert_eq!(evaluations.load(Ordering::SeqCst), 3);
    assert_eq!(
        task.errors(),
        vec![
            TaskError::condition("first", "a"),
            TaskError::condition("second", "b"),
        ]
    );
}

#[tokio::test]
async fn condition_prerequisite_runs_before_the_task() {
    let queue = TaskQueue::new("conditions");
    let fired = Arc::new(AtomicBool::new(false));
    let saw_prompt = Arc::new(AtomicBool::new(false));

    let fired_in = Arc::clone(&fired);
    let saw = Arc::clone(&saw_prompt);
    let task = Task::from_fn("wants-prompt", move |_| {
        let fired = Arc::clone(&fired_in);
        let saw = Arc::clone(&saw);
        async move {
            // By execution time the prerequisite must have completed.
            saw.store(fired.load(Ordering::SeqCst), Ordering::SeqCst);
            Ok(())
        }
    });
    task.add_condition(Prompt {
        fired: Arc::clone(&fired),
    });

    queue.admit(task.clone());
    task.finished().await;

    assert!(fired.load(Ordering::SeqCst));
    assert!(saw_prompt.load(Ordering::SeqCst));
    assert!(queue.is_idle());
}

#[tokio::test]
async fn silenced_condition_suppresses_the_prerequisite() {
    let queue = TaskQueue::new("conditions");
    let fired = Arc::new(AtomicBool::new(false));

    let task = Task::from_fn("quiet", |_| async { Ok(()) });
    task.add_condition(Silenced::new(Prompt {
        fired: Arc::clone(&fired),
    }));

    queue.admit(task.clone());
    task.finished().await;

    assert!(!fired.load(Ordering::SeqCst));
    assert!(!task.is_cancelled());
}

#[tokio::test]
async fn negated_condition_swaps_outcomes() {
    let queue = TaskQueue::new("conditions");
    let evaluations = Arc::new(AtomicUsize::new(0));

    // Negated failure: the task runs.
    let runs = Task::from_fn("runs", |_| async { Ok(()) });
    runs.add_condition(Negated::new(Probe::failing("down", "down", 1, &evaluations)));

    // Negated success: the task is cancelled.
    let blocked = Task::from_fn("blocked", |_| async { Ok(()) });
    blocked.add_condition(Negated::new(Probe::passing("up", &evaluations)));

    queue
        .admit_all(vec![runs.clone(), blocked.clone()], true)
        .await;

    assert!(!runs.is_cancelled());
    assert!(runs.errors().is_empty());
    assert!(blocked.is_cancelled());
    assert_eq!(blocked.errors().len(), 1);
    assert_eq!(blocked.errors()[0].as_label(), "condition_failed");
}

#[tokio::test]
async fn dependents_run_regardless_of_dependency_outcome_by_default() {
    let queue = TaskQueue::new("conditions");
    let ran = Arc::new(AtomicBool::new(false));

    let cancelled_dep = Task::from_fn("cancelled-dep", |_| async { Ok(()) });
    cancelled_dep.cancel();

    let flag = Arc::clone(&ran);
    let dependent = Task::from_fn("tolerant", move |_| {
        let flag = Arc::clone(&flag);
        async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        }
    });
    dependent.add_dependency(cancelled_dep.clone());

    queue
        .admit_all(vec![cancelled_dep, dependent.clone()], true)
        .await;
    assert!(ran.load(Ordering::SeqCst));
    assert!(!dependent.is_cancelled());
}

#[tokio::test]
async fn no_cancelled_dependencies_gate_blocks() {
    let queue = TaskQueue::new("conditions");

    let dep = Task::from_fn("doomed-dep", |_| async { Ok(()) });
    dep.cancel();

    let strict = Task::from_fn("strict", |_| async { Ok(()) });
    strict.add_dependency(dep.clone());
    strict.add_condition(NoCancelledDependencies);

    queue.admit_all(vec![dep, strict.clone()], true).await;

    assert!(strict.is_cancelled());
    assert_eq!(
        strict.errors(),
        vec![TaskError::DependenciesCancelled {
            dependencies: vec!["doomed-dep".to_string()]
        }]
    );
}

#[tokio::test]
async fn no_failed_dependencies_gate_blocks() {
    let queue = TaskQueue::new("conditions");

    let dep = Task::from_fn("broken-dep", |_| async { Err(TaskError::failed("oops")) });

    let strict = Task::from_fn("strict", |_| async { Ok(()) });
    strict.add_dependency(dep.clone());
    strict.add_condition(NoFailedDependencies);

    queue.admit_all(vec![dep, strict.clone()], true).await;

    assert!(strict.is_cancelled());
    assert_eq!(
        strict.errors(),
        vec![TaskError::DependenciesFailed {
            dependencies: vec!["broken-dep".to_string()]
        }]
    );
}
