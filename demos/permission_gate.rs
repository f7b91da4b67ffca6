//! A condition that injects a prerequisite "permission prompt" task, plus
//! the built-in logging sink watching the queue's events.
//!
//! Run with:
//! ```bash
//! cargo run --example permission_gate --features logging
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use taskgate::{
    Condition, ConditionResult, Exclusive, LogWriter, Silenced, Task, TaskError, TaskQueue,
};

/// Grants access the first time its prompt task runs.
struct CameraAccess {
    granted: Arc<AtomicBool>,
}

#[async_trait]
impl Condition for CameraAccess {
    fn name(&self) -> &str {
        "camera-access"
    }

    fn dependency_for(&self, _task: &Task) -> Option<Task> {
        let granted = Arc::clone(&self.granted);
        Some(Task::from_fn("camera-prompt", move |_| {
            let granted = Arc::clone(&granted);
            async move {
                println!("(prompting the user for camera access...)");
                tokio::time::sleep(Duration::from_millis(150)).await;
                granted.store(true, Ordering::SeqCst);
                Ok(())
            }
        }))
    }

    async fn evaluate(&self, _task: &Task) -> ConditionResult {
        if self.granted.load(Ordering::SeqCst) {
            ConditionResult::Satisfied
        } else {
            ConditionResult::failed(TaskError::condition("camera-access", "not granted"))
        }
    }
}

#[tokio::main]
async fn main() {
    let queue = TaskQueue::builder("main").sink(Arc::new(LogWriter)).build();
    let granted = Arc::new(AtomicBool::new(false));

    // The capture task prompts (via the injected prerequisite), then runs.
    let capture = Task::from_fn("capture", |_| async {
        println!("capturing!");
        Ok(())
    });
    capture.add_condition(CameraAccess {
        granted: Arc::clone(&granted),
    });
    capture.add_condition(Exclusive::new("camera"));

    // The probe only *checks* — silenced, it never triggers the prompt.
    let probe = Task::from_fn("probe", |_| async { Ok(()) });
    probe.add_condition(Silenced::new(CameraAccess {
        granted: Arc::new(AtomicBool::new(false)),
    }));

    queue.admit_all(vec![probe.clone(), capture.clone()], true).await;

    println!(
        "probe: cancelled={} errors={:?}",
        probe.is_cancelled(),
        probe.errors()
    );
    println!(
        "capture: cancelled={} errors={:?}",
        capture.is_cancelled(),
        capture.errors()
    );

    // Give the logging sink a beat to drain.
    tokio::time::sleep(Duration::from_millis(50)).await;
}
