use crate::keyspace::SearchRange;

/// Why a worker left its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The worker matched the target digest.
    Found,
    /// Its assigned work ran out without a match.
    Exhausted,
    /// It observed the cancellation signal.
    Cancelled,
}

/// Observable milestones of a node-local search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    SearchStarted {
        node: String,
        length: usize,
        workers: usize,
        range: SearchRange,
    },
    WorkerStarted {
        worker_id: usize,
        length: usize,
        /// `None` when the worker pulls chunks from a shared cursor.
        range: Option<SearchRange>,
    },
    WorkerStopped {
        worker_id: usize,
        exit: WorkerExit,
        checked: u64,
    },
    WorkerFault {
        worker_id: usize,
        reason: String,
    },
    CandidateFound {
        worker_id: usize,
        candidate: String,
    },
    /// A match reported after another worker had already won.
    LostRace {
        worker_id: usize,
    },
    StopRequested,
    SearchCompleted {
        found: bool,
        elapsed_ms: u64,
    },
}

/// Destination for search events.
///
/// Implementations must be cheap and non-blocking: workers call `emit` from
/// their own threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SearchEvent);
}
