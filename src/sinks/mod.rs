//! Event sinks: asynchronous observability consumers fed from a queue's bus.

mod set;
mod sink;

#[cfg(feature = "logging")]
mod log;

pub use set::SinkSet;
pub use sink::EventSink;

#[cfg(feature = "logging")]
pub use log::LogWriter;
