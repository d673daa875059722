use super::sink::{EventSink, SearchEvent};

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    #[inline]
    fn emit(&self, _event: SearchEvent) {}
}
