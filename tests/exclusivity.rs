//! Cross-queue mutual exclusion: tasks sharing a category never overlap and
//! execute in admission order, even on concurrent queues.
//!
//! Category names are unique per test: the controller is process-global and
//! the test binary runs tests in parallel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use taskgate::{Exclusive, ExclusivityController, Task, TaskQueue};

fn contender(
    name: &'static str,
    category: &str,
    running: &Arc<AtomicUsize>,
    peak: &Arc<AtomicUsize>,
    order: &Arc<Mutex<Vec<&'static str>>>,
) -> Task {
    let running = Arc::clone(running);
    let peak = Arc::clone(peak);
    let order = Arc::clone(order);
    let task = Task::from_fn(name, move |_| {
        let running = Arc::clone(&running);
        let peak = Arc::clone(&peak);
        let order = Arc::clone(&order);
        async move {
            let now = running.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            order.lock().unwrap().push(name);
            tokio::time::sleep(Duration::from_millis(30)).await;
            running.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    });
    task.add_condition(Exclusive::new(category));
    task
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn category_serializes_across_queues() {
    let q1 = TaskQueue::builder("ex-one").max_concurrent(4).build();
    let q2 = TaskQueue::builder("ex-two").max_concurrent(4).build();

    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let order = Arc::new(Mutex::new(Vec::new()));

    let first = contender("first", "itest-cross-queue", &running, &peak, &order);
    let second = contender("second", "itest-cross-queue", &running, &peak, &order);

    // Admission order defines execution order, regardless of target queue.
    q1.admit(first.clone());
    q2.admit(second.clone());

    first.finished().await;
    second.finished().await;

    assert_eq!(peak.load(Ordering::SeqCst), 1);
    assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn category_serializes_within_a_wide_queue() {
    let queue = TaskQueue::builder("ex-wide").max_concurrent(8).build();

    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let order = Arc::new(Mutex::new(Vec::new()));

    let names: [&'static str; 4] = ["one", "two", "three", "four"];
    let tasks: Vec<Task> = names
        .into_iter()
        .map(|name| contender(name, "itest-wide-queue", &running, &peak, &order))
        .collect();

    queue.admit_all(tasks, true).await;

    assert_eq!(peak.load(Ordering::SeqCst), 1);
    assert_eq!(*order.lock().unwrap(), vec!["one", "two", "three", "four"]);
}

#[tokio::test]
async fn chains_are_cleaned_up_after_completion() {
    let queue = TaskQueue::new("ex-cleanup");

    let a = Task::from_fn("a", |_| async { Ok(()) });
    a.add_condition(Exclusive::new("itest-cleanup"));
    let b = Task::from_fn("b", |_| async { Ok(()) });
    b.add_condition(Exclusive::new("itest-cleanup"));

    queue.admit_all(vec![a, b], true).await;

    assert_eq!(
        ExclusivityController::global().chain_len("itest-cleanup"),
        0
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unrelated_categories_run_concurrently() {
    let queue = TaskQueue::builder("ex-parallel").max_concurrent(4).build();

    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let order = Arc::new(Mutex::new(Vec::new()));

    let left = contender("left", "itest-left", &running, &peak, &order);
    let right = contender("right", "itest-right", &running, &peak, &order);

    queue.admit_all(vec![left, right], true).await;

    // Different categories put nothing between the two; with two slots free
    // they overlap.
    assert_eq!(peak.load(Ordering::SeqCst), 2);
}
