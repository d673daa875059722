//! Worker Pool
//!
//! Executes worker tasks on dedicated OS threads and waits for all of them.
//! The search loop is CPU bound, so each task gets a full thread rather than a
//! slot on an async runtime.

use crate::error::SearchError;
use crate::events::{EventSink, SearchEvent, WorkerExit};

use std::any::Any;
use std::thread;

/// A unit of work handed to the pool.
pub type WorkerTask = Box<dyn FnOnce() -> Result<WorkerExit, SearchError> + Send + 'static>;

/// How each worker of one batch ended.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PoolReport {
    pub exits: Vec<(usize, WorkerExit)>,
    pub faults: Vec<(usize, String)>,
}

impl PoolReport {
    pub fn count(&self, exit: WorkerExit) -> usize {
        self.exits.iter().filter(|(_, e)| *e == exit).count()
    }
}

/// Spawns named threads for a batch of workers.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    thread_prefix: String,
}

impl WorkerPool {
    pub fn new(thread_prefix: impl Into<String>) -> Self {
        Self {
            thread_prefix: thread_prefix.into(),
        }
    }

    /// Starts every task, then blocks until all of them have terminated.
    ///
    /// A task that returns an error, panics, or cannot be spawned is recorded as a
    /// fault and reported to `events`; the remaining tasks keep running.
    pub fn run_to_completion(
        &self,
        tasks: Vec<(usize, WorkerTask)>,
        events: &dyn EventSink,
    ) -> PoolReport {
        let mut report = PoolReport::default();
        let mut handles = Vec::with_capacity(tasks.len());

        for (worker_id, task) in tasks {
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", self.thread_prefix, worker_id))
                .spawn(task);

            match spawned {
                Ok(handle) => handles.push((worker_id, handle)),
                Err(e) => {
                    tracing::error!("Failed to spawn worker {}: {}", worker_id, e);
                    record_fault(&mut report, events, worker_id, e.to_string());
                }
            }
        }

        for (worker_id, handle) in handles {
            match handle.join() {
                Ok(Ok(exit)) => report.exits.push((worker_id, exit)),
                Ok(Err(e)) => record_fault(&mut report, events, worker_id, e.to_string()),
                Err(panic) => {
                    record_fault(&mut report, events, worker_id, panic_message(panic.as_ref()))
                }
            }
        }

        report
    }
}

fn record_fault(report: &mut PoolReport, events: &dyn EventSink, worker_id: usize, reason: String) {
    tracing::warn!("Worker {} terminated abnormally: {}", worker_id, reason);
    events.emit(SearchEvent::WorkerFault {
        worker_id,
        reason: reason.clone(),
    });
    report.faults.push((worker_id, reason));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {}", msg)
    } else {
        "panicked".to_string()
    }
}
