//! Local Coordinator
//!
//! Owns the state of one search session on one node and arbitrates the race between
//! its workers.
//!
//! ## Session State
//! - **Winner**: candidate + worker id, published as a single unit through a `OnceLock`.
//!   The first `report_found` to set it wins; every later call is a silent no-op. A reader
//!   either sees no winner or a complete one, never half of it.
//! - **Cancellation**: an `AtomicBool` every worker polls. Setting it does not wait for
//!   workers to stop.
//! - **Cursors**: one shared offset per candidate length for dynamic distribution.
//!
//! A coordinator is created per search. Reusing one requires `reset`, which takes
//! `&mut self`: while any worker still holds an `Arc` to it, exclusive access is impossible.

use super::digest::DigestMatcher;
use super::pool::{WorkerPool, WorkerTask};
use super::types::{Distribution, SearchConfig, SearchResult, SearchTuning};
use super::worker::{SearchWorker, WorkSource};
use crate::error::SearchError;
use crate::events::{EventSink, SearchEvent};
use crate::keyspace::{Keyspace, SearchRange, node_range, split_range};

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// The worker that won a session and what it found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    pub candidate: String,
    pub worker_id: usize,
}

pub struct LocalCoordinator {
    node_name: String,
    tuning: SearchTuning,
    winner: OnceLock<Winner>,
    cancelled: AtomicBool,
    /// Password length -> offset of the next unclaimed chunk.
    cursors: DashMap<usize, Arc<AtomicU64>>,
    events: Arc<dyn EventSink>,
}

impl LocalCoordinator {
    pub fn new(
        node_name: impl Into<String>,
        tuning: SearchTuning,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            tuning,
            winner: OnceLock::new(),
            cancelled: AtomicBool::new(false),
            cursors: DashMap::new(),
            events,
        }
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn tuning(&self) -> SearchTuning {
        self.tuning
    }

    pub fn events(&self) -> &dyn EventSink {
        self.events.as_ref()
    }

    /// Records a match. Only the first caller of a session succeeds.
    ///
    /// On success every worker is told to stop. Returns `false` for a lost race,
    /// including reports that arrive after the session was cancelled.
    pub fn report_found(&self, candidate: &[u8], worker_id: usize) -> bool {
        if self.is_cancelled() && self.winner.get().is_none() {
            self.events.emit(SearchEvent::LostRace { worker_id });
            return false;
        }

        let winner = Winner {
            candidate: String::from_utf8_lossy(candidate).into_owned(),
            worker_id,
        };

        match self.winner.set(winner) {
            Ok(()) => {
                self.events.emit(SearchEvent::CandidateFound {
                    worker_id,
                    candidate: String::from_utf8_lossy(candidate).into_owned(),
                });
                self.stop_all();
                true
            }
            Err(_) => {
                self.events.emit(SearchEvent::LostRace { worker_id });
                false
            }
        }
    }

    /// Raises the cancellation signal. Idempotent, never blocks.
    pub fn stop_all(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            self.events.emit(SearchEvent::StopRequested);
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn is_found(&self) -> bool {
        self.winner.get().is_some()
    }

    pub fn winner(&self) -> Option<&Winner> {
        self.winner.get()
    }

    /// Clears the winner, the cancellation signal and all cursors.
    pub fn reset(&mut self) {
        self.winner = OnceLock::new();
        *self.cancelled.get_mut() = false;
        self.cursors.clear();
    }

    /// Shared dynamic cursor for `length`, created on first use.
    pub fn cursor(&self, length: usize) -> Arc<AtomicU64> {
        self.cursors
            .entry(length)
            .or_insert_with(|| Arc::new(AtomicU64::new(0)))
            .clone()
    }

    /// Searches this node's share of the keyspace and blocks until every worker
    /// has terminated.
    ///
    /// The node's range is entry `this_node_index` of the keyspace split across
    /// `total_nodes`; it is then split again across `workers_per_node` workers (or
    /// served through a shared cursor in dynamic mode). An empty node range returns
    /// "not found" without starting any worker.
    pub fn execute_search(
        self: &Arc<Self>,
        config: &SearchConfig,
    ) -> Result<SearchResult, SearchError> {
        let started = Instant::now();
        let target = config.validate()?;
        let pool = WorkerPool::new(format!("{}-worker", self.node_name));

        for length in config.lengths() {
            if self.is_cancelled() {
                break;
            }

            let keyspace = Keyspace::new(config.alphabet.clone(), length)?;
            let range = node_range(keyspace.size(), config.total_nodes, config.this_node_index)?;
            if range.is_empty() {
                tracing::debug!("No work assigned to {} for length {}", self.node_name, length);
                continue;
            }

            self.events.emit(SearchEvent::SearchStarted {
                node: self.node_name.clone(),
                length,
                workers: config.workers_per_node,
                range,
            });

            let tasks = self.build_tasks(&keyspace, range, config, &target)?;
            let report = pool.run_to_completion(tasks, self.events.as_ref());

            if !report.faults.is_empty() {
                tracing::warn!(
                    "{} of {} workers faulted at length {}",
                    report.faults.len(),
                    config.workers_per_node,
                    length
                );
            }

            if self.is_found() {
                break;
            }
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let result = match self.winner() {
            Some(winner) => SearchResult::found(
                winner.candidate.clone(),
                self.node_name.clone(),
                config.this_node_index,
                winner.worker_id,
                elapsed_ms,
            ),
            None => SearchResult::not_found(
                self.node_name.clone(),
                config.this_node_index,
                elapsed_ms,
            ),
        };

        self.events.emit(SearchEvent::SearchCompleted {
            found: result.found,
            elapsed_ms,
        });

        Ok(result)
    }

    /// One task per worker for a single candidate length.
    fn build_tasks(
        self: &Arc<Self>,
        keyspace: &Keyspace,
        range: SearchRange,
        config: &SearchConfig,
        target: &[u8],
    ) -> Result<Vec<(usize, WorkerTask)>, SearchError> {
        let workers = config.workers_per_node;
        let sources: Vec<WorkSource> = match self.tuning.distribution {
            Distribution::Static => split_range(range, workers)?
                .into_iter()
                .map(WorkSource::fixed)
                .collect(),
            Distribution::Dynamic { chunk_size } => {
                let cursor = self.cursor(keyspace.length());
                (0..workers)
                    .map(|_| WorkSource::shared(cursor.clone(), range, chunk_size))
                    .collect()
            }
        };

        let mut tasks = Vec::with_capacity(workers);
        for (worker_id, source) in sources.into_iter().enumerate() {
            let matcher = DigestMatcher::new(config.algorithm, target)?;
            let coordinator = Arc::clone(self);
            let keyspace = keyspace.clone();
            let length = keyspace.length();

            let task: WorkerTask = Box::new(move || {
                coordinator.events().emit(SearchEvent::WorkerStarted {
                    worker_id,
                    length,
                    range: source.assigned_range(),
                });

                let mut worker = SearchWorker::new(
                    worker_id,
                    keyspace,
                    source,
                    matcher,
                    Arc::clone(&coordinator),
                    coordinator.tuning().poll_interval,
                );
                let exit = worker.run()?;

                coordinator.events().emit(SearchEvent::WorkerStopped {
                    worker_id,
                    exit,
                    checked: worker.checked(),
                });
                Ok(exit)
            });

            tasks.push((worker_id, task));
        }

        Ok(tasks)
    }
}
