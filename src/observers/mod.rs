//! Lifecycle observers: the callback seam, a closure-backed builder, and the
//! timeout pattern.

mod block;
mod observer;
mod timeout;

pub use block::FnObserver;
pub use observer::Observe;
pub use timeout::TimeoutObserver;
