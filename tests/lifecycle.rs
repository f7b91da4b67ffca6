//! Task lifecycle scenarios: exactly-once completion, cancellation shortcuts,
//! dependency ordering, and the plain admission paths.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use taskgate::{FnObserver, State, Task, TaskError, TaskQueue, TimeoutObserver};

#[tokio::test]
async fn finish_notifies_exactly_once() {
    let queue = TaskQueue::new("lifecycle");
    let finishes = Arc::new(AtomicUsize::new(0));

    // The work finishes explicitly, then cancels, then returns an error the
    // auto-finish would report; the latch must swallow everything after the
    // first finish.
    let task = Task::from_fn("multi-finish", |task: Task| async move {
        task.finish(Vec::new());
        task.cancel();
        Err(TaskError::failed("must be ignored"))
    });
    let counter = Arc::clone(&finishes);
    task.add_observer(FnObserver::new().on_finish(move |_task, _errors| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    queue.admit(task.clone());
    task.finished().await;

    assert_eq!(finishes.load(Ordering::SeqCst), 1);
    assert!(task.errors().is_empty());
    assert_eq!(task.state(), State::Finished);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_finish_and_cancel_notify_once() {
    let queue = TaskQueue::new("lifecycle");
    let finishes = Arc::new(AtomicUsize::new(0));

    let task = Task::from_fn("racy", |task: Task| async move {
        let by_finish = task.clone();
        let by_cancel = task.clone();
        let a = tokio::spawn(async move { by_finish.finish(vec![TaskError::failed("a")]) });
        let b = tokio::spawn(async move {
            by_cancel.cancel_with_errors(vec![TaskError::failed("b")])
        });
        let _ = tokio::join!(a, b);
        Ok(())
    });
    let counter = Arc::clone(&finishes);
    task.add_observer(FnObserver::new().on_finish(move |_task, _errors| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    queue.admit(task.clone());
    task.finished().await;

    assert_eq!(finishes.load(Ordering::SeqCst), 1);
    assert!(!task.errors().is_empty());
}

#[tokio::test]
async fn cancel_before_admission_never_executes() {
    let queue = TaskQueue::new("lifecycle");
    let started = Arc::new(AtomicBool::new(false));

    let ran = Arc::clone(&started);
    let task = Task::from_fn("doomed", move |_| {
        let ran = Arc::clone(&ran);
        async move {
            ran.store(true, Ordering::SeqCst);
            Ok(())
        }
    });
    task.cancel();
    queue.admit(task.clone());
    task.finished().await;

    assert!(!started.load(Ordering::SeqCst));
    assert!(task.is_cancelled());
    assert_eq!(task.state(), State::Finished);
}

#[tokio::test]
async fn cancel_while_pending_reaps_task() {
    let queue = TaskQueue::new("lifecycle");

    // The dependency is never admitted anywhere, so it never finishes;
    // only cancellation can unblock the dependent.
    let gated = Task::from_fn("gated", |_| async { Ok(()) });
    gated.add_dependency(Task::from_fn("never-admitted", |_| async { Ok(()) }));

    queue.admit(gated.clone());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(gated.state(), State::Pending);

    gated.cancel();
    gated.finished().await;
    assert_eq!(gated.state(), State::Finished);
    assert!(queue.is_idle());
}

#[tokio::test]
async fn dependency_completion_precedes_dependent_start() {
    let queue = TaskQueue::new("lifecycle");
    let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let a = Task::from_fn("a", |_| async { Ok(()) });
    let b = Task::from_fn("b", |_| async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(())
    });
    a.add_dependency(b.clone());

    let marks = Arc::clone(&log);
    b.add_observer(FnObserver::new().on_finish(move |_task, _errors| {
        marks.lock().unwrap().push("b-finished");
    }));
    let marks = Arc::clone(&log);
    a.add_observer(FnObserver::new().on_start(move |_task| {
        marks.lock().unwrap().push("a-started");
    }));

    // Admission order must not matter; only the dependency edge does.
    queue.admit(a.clone());
    queue.admit(b);
    a.finished().await;

    assert_eq!(*log.lock().unwrap(), vec!["b-finished", "a-started"]);
}

#[tokio::test]
async fn produced_task_is_admitted_and_holds_tracking() {
    let queue = TaskQueue::new("lifecycle");
    let follow_ran = Arc::new(AtomicBool::new(false));
    let follow_slot: Arc<Mutex<Option<Task>>> = Arc::new(Mutex::new(None));

    let ran = Arc::clone(&follow_ran);
    let slot = Arc::clone(&follow_slot);
    let producer = Task::from_fn("producer", move |task: Task| {
        let ran = Arc::clone(&ran);
        let slot = Arc::clone(&slot);
        async move {
            let follow = Task::from_fn("follow-up", move |_| {
                let ran = Arc::clone(&ran);
                async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    ran.store(true, Ordering::SeqCst);
                    Ok(())
                }
            });
            *slot.lock().unwrap() = Some(follow.clone());
            task.produce(follow);
            Ok(())
        }
    });

    queue.admit(producer.clone());
    producer.finished().await;

    let follow = follow_slot.lock().unwrap().clone().expect("produced task");
    follow.finished().await;
    assert!(follow_ran.load(Ordering::SeqCst));
    assert!(queue.is_idle());
}

#[tokio::test]
async fn admit_all_waits_for_every_task() {
    let queue = TaskQueue::new("lifecycle");
    let tasks: Vec<Task> = (0..3u64)
        .map(|i| {
            Task::from_fn(format!("batch-{i}"), move |_| async move {
                tokio::time::sleep(Duration::from_millis(5 * (i + 1))).await;
                Ok(())
            })
        })
        .collect();

    queue.admit_all(tasks.clone(), true).await;
    assert!(tasks.iter().all(Task::is_finished));
    assert!(queue.is_idle());
}

#[tokio::test]
async fn admit_fn_runs_plain_work() {
    let queue = TaskQueue::new("lifecycle");
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    let task = queue.admit_fn("plain", move |_| {
        let flag = Arc::clone(&flag);
        async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        }
    });
    task.finished().await;
    assert!(ran.load(Ordering::SeqCst));
}

#[tokio::test]
async fn suspended_queue_defers_execution_but_not_readiness() {
    let queue = TaskQueue::builder("lifecycle").suspended(true).build();
    let ran = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&ran);
    let task = Task::from_fn("deferred", move |_| {
        let flag = Arc::clone(&flag);
        async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        }
    });
    queue.admit(task.clone());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!ran.load(Ordering::SeqCst));
    // Readiness already happened; only execution is gated.
    assert_eq!(task.state(), State::Ready);

    queue.resume();
    task.finished().await;
    assert!(ran.load(Ordering::SeqCst));
}

#[tokio::test]
async fn timeout_observer_cancels_slow_task() {
    let queue = TaskQueue::new("lifecycle");
    let slow = Task::from_fn("slow", |task: Task| async move {
        while !task.is_cancelled() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        Ok(())
    });
    slow.add_observer(TimeoutObserver::new(Duration::from_millis(50)));

    queue.admit(slow.clone());
    slow.finished().await;

    assert!(slow.is_cancelled());
    assert_eq!(
        slow.errors(),
        vec![TaskError::Timeout {
            after: Duration::from_millis(50)
        }]
    );
}

#[tokio::test]
async fn queue_publishes_lifecycle_events() {
    use taskgate::EventKind;

    let queue = TaskQueue::new("events");
    let mut rx = queue.subscribe();

    let task = Task::from_fn("observed", |_| async { Ok(()) });
    queue.admit(task.clone());
    task.finished().await;

    let mut kinds = Vec::new();
    while let Ok(event) = rx.try_recv() {
        assert_eq!(event.task.as_deref(), Some("observed"));
        kinds.push(event.kind);
    }
    assert_eq!(
        kinds,
        vec![
            EventKind::TaskAdmitted,
            EventKind::TaskStarting,
            EventKind::TaskFinished
        ]
    );
}
