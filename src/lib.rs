//! # taskgate
//!
//! **Taskgate** is a cooperative task-scheduling core for Rust.
//!
//! A unit of work ([`Task`]) carries its own readiness preconditions
//! ([`Condition`]), lifecycle observers ([`Observe`]), and dependency graph;
//! a [`TaskQueue`] understands those semantics beyond plain ordering. The
//! crate is designed as the scheduling substrate for layers that plug in
//! capability checks, permission prompts, and composite workflows without
//! the core knowing about any of them.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    Task    │      │    Task    │      │ GroupTask  │
//!     │ conditions │      │ conditions │      │ (own queue)│
//!     │ observers  │      │ observers  │      │            │
//!     └─────┬──────┘      └─────┬──────┘      └─────┬──────┘
//!           ▼                   ▼                   ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  TaskQueue (admission pipeline)                                 │
//! │  - extract condition prerequisites  → admit as dependencies     │
//! │  - register exclusivity categories  → chain dependencies        │
//! │  - delegate.will_admit              → barrier wiring seam       │
//! │  - spawn runner, release task       → Initialized → Pending     │
//! └──────┬───────────────────────┬──────────────────────────┬───────┘
//!        ▼                       ▼                          │
//! ┌──────────────┐      ┌─────────────────────┐             │
//! │    runner    │      │ Exclusivity         │             │
//! │ deps → conds │      │ Controller (global) │             │
//! │ → execute    │      │ category → FIFO     │             │
//! └──────┬───────┘      └─────────────────────┘             ▼
//!        │  publishes Events                     ┌────────────────────┐
//!        └──────────────────────────────────────►│ Bus ─► EventSinks  │
//!                                                │ (observability)    │
//!                                                └────────────────────┘
//! ```
//!
//! ### Task lifecycle
//! ```text
//! Initialized ─► Pending ─► EvaluatingConditions ─► Ready ─► Executing ─► Finishing ─► Finished
//!
//! admit():   conditions may inject prerequisite tasks (dependencies)
//! Pending:   waits for every dependency (explicit + injected + exclusivity)
//! Evaluate:  all conditions concurrently; any failure cancels the task
//! Ready:     cancelled/errored tasks finish here without executing
//! Executing: Work::execute runs; must drive the task to finish()
//! Finished:  observers' finish callback fired exactly once
//! ```
//!
//! ## Features
//! | Area             | Description                                                      | Key types / traits                       |
//! |------------------|------------------------------------------------------------------|------------------------------------------|
//! | **Tasks**        | Schedulable units with a polymorphic work capability.            | [`Task`], [`Work`], [`WorkFn`]           |
//! | **Conditions**   | Pluggable async readiness predicates + combinators.              | [`Condition`], [`Negated`], [`Silenced`] |
//! | **Observers**    | Lifecycle callbacks at exact state-machine points.               | [`Observe`], [`FnObserver`]              |
//! | **Queues**       | Admission, dependency wiring, suspension, concurrency caps.      | [`TaskQueue`], [`QueueDelegate`]         |
//! | **Exclusivity**  | Cross-queue mutual-exclusion categories.                         | [`Exclusive`], [`ExclusivityController`] |
//! | **Groups**       | Composite tasks that drain a private sub-queue.                  | [`GroupTask`], [`RetryTask`]             |
//! | **Observability**| Per-queue event bus with pluggable sinks.                        | [`Event`], [`Bus`], [`EventSink`]        |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] sink _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use taskgate::{FnObserver, Task, TaskQueue};
//!
//! #[tokio::main]
//! async fn main() {
//!     let queue = TaskQueue::builder("background").max_concurrent(4).build();
//!
//!     let fetch = Task::from_fn("fetch", |task| async move {
//!         if task.is_cancelled() {
//!             return Ok(());
//!         }
//!         // do work...
//!         Ok(())
//!     });
//!     let parse = Task::from_fn("parse", |_| async { Ok(()) });
//!
//!     // parse runs only after fetch has finished.
//!     parse.add_dependency(fetch.clone());
//!     parse.add_observer(FnObserver::new().on_finish(|task, errors| {
//!         println!("{} finished with {} errors", task.name(), errors.len());
//!     }));
//!
//!     queue.admit(fetch);
//!     queue.admit(parse.clone());
//!     parse.finished().await;
//! }
//! ```

mod conditions;
mod config;
mod error;
mod events;
mod exclusivity;
mod group;
mod observers;
mod policies;
mod queue;
mod sinks;
mod tasks;

// ---- Public re-exports ----

pub use conditions::{
    Condition, ConditionResult, Exclusive, Negated, NoCancelledDependencies,
    NoFailedDependencies, Silenced,
};
pub use config::QueueConfig;
pub use error::TaskError;
pub use events::{Bus, Event, EventKind};
pub use exclusivity::ExclusivityController;
pub use group::{GroupTask, RetryTask};
pub use observers::{FnObserver, Observe, TimeoutObserver};
pub use policies::{Jitter, RetryBackoff};
pub use queue::{QueueBuilder, QueueDelegate, TaskQueue};
pub use sinks::{EventSink, SinkSet};
pub use tasks::{State, Task, TaskId, Work, WorkFn};

// Optional: expose the built-in stdout sink.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use sinks::LogWriter;
