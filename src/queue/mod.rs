//! Queue: the admission/orchestration component.
//!
//! ## Contents
//! - [`TaskQueue`], [`QueueBuilder`]: admission, suspension, tracking
//! - [`QueueDelegate`]: the integration seam for groups and outer layers
//! - `runner`: the crate-internal per-task driver

mod core;
mod delegate;
mod runner;

pub use self::core::{QueueBuilder, TaskQueue};
pub use delegate::QueueDelegate;
