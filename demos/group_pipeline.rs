//! A group task running a small pipeline on its private queue.
//!
//! Run with:
//! ```bash
//! cargo run --example group_pipeline
//! ```

use std::time::Duration;

use taskgate::{FnObserver, GroupTask, Task, TaskError, TaskQueue};

#[tokio::main]
async fn main() {
    let queue = TaskQueue::builder("main").max_concurrent(4).build();

    let download = Task::from_fn("download", |_| async {
        println!("downloading...");
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(())
    });

    let parse = Task::from_fn("parse", |task: Task| async move {
        println!("parsing...");
        // Hand follow-up work to the group without a dependency edge; the
        // group stays open until it finishes too.
        task.produce(Task::from_fn("index", |_| async {
            println!("indexing...");
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(())
        }));
        Ok(())
    });
    // parse waits for download even though both are group children.
    parse.add_dependency(download.clone());

    let broken = Task::from_fn("notify", |_| async {
        Err(TaskError::failed("notification service unreachable"))
    });

    let group = GroupTask::new("import", vec![download, parse, broken]);
    group.task().add_observer(FnObserver::new().on_finish(|task, errors| {
        println!("group '{}' finished, {} error(s):", task.name(), errors.len());
        for error in errors {
            println!("  - {error}");
        }
    }));

    queue.admit(group.task().clone());
    group.task().finished().await;
}
