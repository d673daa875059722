//! Search Event Sink
//!
//! Progress reporting for a node's search is routed through the `EventSink` trait
//! rather than straight to a log file, so the search core stays independent of how
//! events are persisted.
//!
//! - `EventSink`: the interface the coordinator and workers emit into.
//! - `TracingEventSink`: production adapter writing structured `tracing` records.
//! - `NoOpEventSink`: discards everything (tests, benchmarks).

mod noop;
mod sink;
mod tracing_adapter;

pub use noop::NoOpEventSink;
pub use sink::{EventSink, SearchEvent, WorkerExit};
pub use tracing_adapter::TracingEventSink;
