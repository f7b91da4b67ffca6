//! # Process-wide mutual-exclusion controller.
//!
//! Tasks declaring the same exclusivity category (via their conditions) must
//! never execute concurrently — regardless of which queue each was admitted
//! to. The controller enforces this as a *dependency-graph property*, not a
//! run-time lock: each category holds a FIFO chain of in-flight tasks, and
//! every newly registered task gains a dependency on the chain's previous
//! tail. Execution order within a category therefore equals admission order.
//!
//! ## Serialization
//! One mutex-protected map is the single serialization mechanism. Chain
//! append and dependency insertion happen under the same lock acquisition,
//! so two queues registering concurrently cannot interleave between "read
//! tail" and "append self" — the atomicity the chain invariant requires.
//!
//! ## Lifecycle
//! The controller is a process-wide singleton: constructed on first use,
//! never torn down. Registration happens synchronously during admission
//! (before the task is released for readiness evaluation); deregistration is
//! best-effort at finish time, since a stale finished tail only ever costs a
//! dependency that is already satisfied.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use crate::tasks::Task;

static CONTROLLER: OnceLock<ExclusivityController> = OnceLock::new();

/// Process-wide registry of mutual-exclusion category chains.
pub struct ExclusivityController {
    chains: Mutex<HashMap<String, Vec<Task>>>,
}

impl ExclusivityController {
    /// The singleton instance.
    pub fn global() -> &'static ExclusivityController {
        CONTROLLER.get_or_init(|| ExclusivityController {
            chains: Mutex::new(HashMap::new()),
        })
    }

    /// Appends `task` to every category chain, adding a dependency on each
    /// chain's previous tail.
    ///
    /// Must be called before the task is released for readiness evaluation;
    /// the queue's admission pipeline does this synchronously.
    pub(crate) fn register(&self, task: &Task, categories: &[String]) {
        let mut chains = self.chains.lock().expect("exclusivity lock poisoned");
        for category in categories {
            let chain = chains.entry(category.clone()).or_default();
            if let Some(tail) = chain.last() {
                task.add_dependency(tail.clone());
            }
            chain.push(task.clone());
        }
    }

    /// Removes `task` from every category chain (order-preserving removal of
    /// that single entry).
    pub(crate) fn deregister(&self, task: &Task, categories: &[String]) {
        let mut chains = self.chains.lock().expect("exclusivity lock poisoned");
        for category in categories {
            let emptied = match chains.get_mut(category) {
                Some(chain) => {
                    if let Some(position) = chain.iter().position(|entry| entry.same(task)) {
                        chain.remove(position);
                    }
                    chain.is_empty()
                }
                None => false,
            };
            if emptied {
                chains.remove(category);
            }
        }
    }

    /// Number of in-flight tasks currently chained under `category`.
    pub fn chain_len(&self, category: &str) -> usize {
        self.chains
            .lock()
            .expect("exclusivity lock poisoned")
            .get(category)
            .map_or(0, Vec::len)
    }
}
