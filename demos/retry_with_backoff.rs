//! Retrying a flaky task with exponential backoff.
//!
//! Run with:
//! ```bash
//! cargo run --example retry_with_backoff
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use taskgate::{Jitter, RetryBackoff, RetryTask, Task, TaskError, TaskQueue};

#[tokio::main]
async fn main() {
    let queue = TaskQueue::new("main");
    let calls = Arc::new(AtomicU32::new(0));

    let counter = Arc::clone(&calls);
    let retry = RetryTask::with_backoff(
        "flaky-sync",
        move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Task::from_fn(format!("sync-attempt-{n}"), move |_| async move {
                println!("attempt {n}...");
                if n < 3 {
                    Err(TaskError::failed("connection reset"))
                } else {
                    println!("attempt {n} succeeded");
                    Ok(())
                }
            })
        },
        |errors, attempts| {
            println!("attempt {attempts} failed ({})", errors[errors.len() - 1]);
            attempts < 5
        },
        RetryBackoff {
            base: Duration::from_millis(100),
            cap: Duration::from_secs(2),
            growth: 2.0,
            jitter: Jitter::Equal,
        },
    );

    queue.admit(retry.task().clone());
    retry.task().finished().await;

    println!(
        "done after {} attempt(s), {} recorded failure(s)",
        calls.load(Ordering::SeqCst),
        retry.task().errors().len()
    );
}
