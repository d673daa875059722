use super::sink::{EventSink, SearchEvent, WorkerExit};

/// Writes search events as `tracing` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: SearchEvent) {
        match event {
            SearchEvent::SearchStarted {
                node,
                length,
                workers,
                range,
            } => {
                tracing::info!(
                    node = %node,
                    length,
                    workers,
                    "Search started on range {}",
                    range
                );
            }
            SearchEvent::WorkerStarted {
                worker_id,
                length,
                range,
            } => match range {
                Some(range) => {
                    tracing::debug!("Worker {} started (length {}) on {}", worker_id, length, range)
                }
                None => tracing::debug!(
                    "Worker {} started (length {}) on shared cursor",
                    worker_id,
                    length
                ),
            },
            SearchEvent::WorkerStopped {
                worker_id,
                exit,
                checked,
            } => {
                let reason = match exit {
                    WorkerExit::Found => "match found",
                    WorkerExit::Exhausted => "range exhausted, not found",
                    WorkerExit::Cancelled => "stopped by coordinator",
                };
                tracing::debug!(
                    "Worker {} stopped after {} candidates: {}",
                    worker_id,
                    checked,
                    reason
                );
            }
            SearchEvent::WorkerFault { worker_id, reason } => {
                tracing::error!("Worker {} faulted: {}", worker_id, reason);
            }
            SearchEvent::CandidateFound {
                worker_id,
                candidate,
            } => {
                tracing::info!("Worker {} found match: {}", worker_id, candidate);
            }
            SearchEvent::LostRace { worker_id } => {
                tracing::trace!("Worker {} reported after the search was already won", worker_id);
            }
            SearchEvent::StopRequested => {
                tracing::info!("Stopping all worker threads");
            }
            SearchEvent::SearchCompleted { found, elapsed_ms } => {
                tracing::info!(found, elapsed_ms, "Search completed");
            }
        }
    }
}
