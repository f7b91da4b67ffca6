//! # The per-task runner.
//!
//! Every admitted task gets one runner, spawned during admission. The runner
//! drives the task through readiness and execution:
//!
//! ```text
//! drive(task)
//!   ├─► await Pending                  (admission releases the task)
//!   ├─► await dependencies             (re-snapshot after each completion;
//!   │                                   abandoned when cancelled)
//!   ├─► conditions
//!   │     ├─ cancelled or none  → Ready (direct)
//!   │     └─ otherwise          → EvaluatingConditions
//!   │                              ├─ failures → cancel_with_errors
//!   │                              └─ always   → Ready
//!   └─► dispatch
//!         ├─ cancelled or errored → finish immediately (never executes)
//!         └─ otherwise
//!              ├─ await gates: queue not suspended + semaphore permit
//!              │               (abandoned when cancelled)
//!              ├─ Ready → Executing, observers told, TaskStarting published
//!              ├─ work.execute()
//!              └─ await task finished (permit held until completion)
//! ```
//!
//! ## Rules
//! - A task never begins executing before every dependency — explicit,
//!   condition-generated, or exclusivity-derived — has finished.
//! - A cancelled task skips the gates entirely so suspended or saturated
//!   queues can still reap it.
//! - The concurrency permit is held until the task finishes, even when the
//!   work completes through its own path after `execute` returns.

use std::sync::Arc;

use tokio::sync::OwnedSemaphorePermit;

use crate::conditions::evaluate_conditions;
use crate::events::{Event, EventKind};
use crate::queue::core::QueueInner;
use crate::tasks::{State, Task};

/// Drives one admitted task to completion.
pub(crate) async fn drive(queue: Arc<QueueInner>, task: Task) {
    task.reached(State::Pending).await;
    wait_for_dependencies(&task).await;

    let conditions = task.conditions();
    if task.is_cancelled() || conditions.is_empty() {
        task.advance(State::Ready);
    } else {
        task.advance(State::EvaluatingConditions);
        let failures = evaluate_conditions(&task, conditions).await;
        if !failures.is_empty() {
            task.cancel_with_errors(failures);
        }
        // A failed or cancelled task must still reach Ready so the queue
        // reaps it through the one completion drain.
        task.advance(State::Ready);
    }

    if task.is_cancelled() || task.has_errors() {
        task.finish(Vec::new());
        return;
    }

    let permit = tokio::select! {
        permit = acquire_gates(&queue) => permit,
        () = task.cancelled_signal() => None,
    };
    if task.is_cancelled() {
        task.finish(Vec::new());
        return;
    }

    let _permit = permit;
    task.begin_execution();
    queue
        .bus
        .publish(Event::now(EventKind::TaskStarting).with_task(task.name().to_string()));

    let work = task.work();
    work.execute(&task).await;
    // Work may complete through its own path after execute returns (groups
    // finish via their barrier); the permit stays held until then.
    task.finished().await;
}

/// Waits until every dependency has finished, re-snapshotting the list after
/// each completion so edges added while waiting (produced sub-tasks wired by
/// a group, late exclusivity tails) are honored. Returns early when the task
/// is cancelled — its readiness is then immediate by definition.
async fn wait_for_dependencies(task: &Task) {
    loop {
        if task.is_cancelled() {
            return;
        }
        let snapshot = task.dependencies();
        match snapshot.iter().find(|d| !d.is_finished()).cloned() {
            Some(pending) => {
                tokio::select! {
                    () = pending.finished() => {}
                    () = task.cancelled_signal() => return,
                }
            }
            None => {
                // The list may have grown while we scanned it.
                if task.dependencies().len() == snapshot.len() {
                    return;
                }
            }
        }
    }
}

/// Waits for the queue to be unsuspended and acquires a concurrency permit
/// (None when the queue is uncapped). Re-checks suspension after acquiring,
/// since the queue may have been suspended while we waited for a slot.
async fn acquire_gates(queue: &Arc<QueueInner>) -> Option<OwnedSemaphorePermit> {
    loop {
        let mut gate = queue.suspended.subscribe();
        let _ = gate.wait_for(|suspended| !*suspended).await;
        let permit = match &queue.semaphore {
            Some(semaphore) => match Arc::clone(semaphore).acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(_closed) => return None,
            },
            None => None,
        };
        if !*queue.suspended.borrow() {
            return permit;
        }
    }
}
