//! Search Worker
//!
//! Drives the enumerate -> hash -> compare loop over the indices it is given.
//!
//! ## Work Sources
//! - **Fixed**: one range decided by the partitioner before the worker starts. No
//!   coordination at runtime; a worker whose slice runs out early simply idles.
//! - **Shared**: a cursor shared by every worker of the node. Each claim is a single
//!   `fetch_add` of `chunk_size`; a claim past the end of the node's range ends the
//!   worker's contribution.
//!
//! The cancellation flag is polled every `poll_interval` candidates, so a stop is
//! observed within a bounded number of iterations rather than instantly.

use super::coordinator::LocalCoordinator;
use super::digest::DigestMatcher;
use crate::error::SearchError;
use crate::events::WorkerExit;
use crate::keyspace::{Keyspace, SearchRange};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Where a worker gets its next block of indices from.
#[derive(Debug)]
pub enum WorkSource {
    Fixed(Option<SearchRange>),
    Shared {
        cursor: Arc<AtomicU64>,
        range: SearchRange,
        chunk_size: u64,
    },
}

impl WorkSource {
    pub fn fixed(range: SearchRange) -> Self {
        Self::Fixed(Some(range))
    }

    pub fn shared(cursor: Arc<AtomicU64>, range: SearchRange, chunk_size: u64) -> Self {
        Self::Shared {
            cursor,
            range,
            chunk_size: chunk_size.max(1),
        }
    }

    /// The worker's own range, when it has one.
    pub fn assigned_range(&self) -> Option<SearchRange> {
        match self {
            Self::Fixed(range) => *range,
            Self::Shared { .. } => None,
        }
    }

    /// Next block of indices, or `None` once this source is drained.
    ///
    /// The shared cursor holds an offset into `range`; it only ever grows.
    fn next_chunk(&mut self) -> Option<SearchRange> {
        match self {
            Self::Fixed(range) => range.take().filter(|r| !r.is_empty()),
            Self::Shared {
                cursor,
                range,
                chunk_size,
            } => {
                let offset = cursor.fetch_add(*chunk_size, Ordering::Relaxed);
                if offset >= range.len() {
                    return None;
                }
                let start = range.start + offset;
                let end = start.saturating_add(*chunk_size).min(range.end);
                Some(SearchRange::new(start, end))
            }
        }
    }
}

/// Enumerates, hashes and compares the indices handed out by its `WorkSource`.
pub struct SearchWorker {
    worker_id: usize,
    keyspace: Keyspace,
    source: WorkSource,
    matcher: DigestMatcher,
    coordinator: Arc<LocalCoordinator>,
    poll_interval: u64,
    checked: u64,
    done: bool,
}

impl SearchWorker {
    pub fn new(
        worker_id: usize,
        keyspace: Keyspace,
        source: WorkSource,
        matcher: DigestMatcher,
        coordinator: Arc<LocalCoordinator>,
        poll_interval: u64,
    ) -> Self {
        Self {
            worker_id,
            keyspace,
            source,
            matcher,
            coordinator,
            poll_interval: poll_interval.max(1),
            checked: 0,
            done: false,
        }
    }

    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    /// Candidates hashed so far.
    pub fn checked(&self) -> u64 {
        self.checked
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Runs until a match, exhaustion, or cancellation.
    ///
    /// A match is reported to the coordinator and ends the loop at once, without
    /// finishing the current chunk. An `Err` means this worker faulted; siblings
    /// are unaffected.
    pub fn run(&mut self) -> Result<WorkerExit, SearchError> {
        let exit = self.search();
        self.done = true;
        exit
    }

    fn search(&mut self) -> Result<WorkerExit, SearchError> {
        let mut candidate = vec![0u8; self.keyspace.length()];

        loop {
            if self.coordinator.is_cancelled() {
                return Ok(WorkerExit::Cancelled);
            }

            let Some(chunk) = self.source.next_chunk() else {
                return Ok(WorkerExit::Exhausted);
            };

            for index in chunk.start..chunk.end {
                if self.checked % self.poll_interval == 0 && self.coordinator.is_cancelled() {
                    return Ok(WorkerExit::Cancelled);
                }

                self.keyspace
                    .encode_into(index, &mut candidate)
                    .map_err(|e| SearchError::WorkerFault {
                        worker_id: self.worker_id,
                        reason: e.to_string(),
                    })?;
                self.checked += 1;

                if self.matcher.matches(&candidate) {
                    // A lost race means another worker already stopped the session.
                    return Ok(if self.coordinator.report_found(&candidate, self.worker_id) {
                        WorkerExit::Found
                    } else {
                        WorkerExit::Cancelled
                    });
                }
            }
        }
    }
}
