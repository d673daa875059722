use crate::error::SearchError;
use crate::events::EventSink;
use crate::search::{LocalCoordinator, SearchConfig, SearchResult, SearchTuning};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// How many stopped session ids a node remembers.
pub const MAX_STOPPED_SESSIONS: usize = 256;

struct ActiveSearch {
    session_id: Option<String>,
    coordinator: Arc<LocalCoordinator>,
}

#[derive(Default)]
struct NodeState {
    active: Option<ActiveSearch>,
    /// Sessions stopped on this node, oldest first.
    stopped_sessions: VecDeque<String>,
}

impl NodeState {
    fn remember_stopped(&mut self, session_id: &str) {
        if self.is_stopped(session_id) {
            return;
        }
        if self.stopped_sessions.len() >= MAX_STOPPED_SESSIONS {
            self.stopped_sessions.pop_front();
        }
        self.stopped_sessions.push_back(session_id.to_string());
    }

    fn is_stopped(&self, session_id: &str) -> bool {
        self.stopped_sessions.iter().any(|s| s == session_id)
    }
}

/// One search node: the four remote operations over a local coordinator.
///
/// Each `start_search` gets a fresh `LocalCoordinator`, so no session state
/// leaks from one search into the next. At most one search is active; starting
/// another stops the previous one first.
pub struct SearchNode {
    name: String,
    tuning: SearchTuning,
    events: Arc<dyn EventSink>,
    state: Mutex<NodeState>,
}

impl SearchNode {
    pub fn new(name: impl Into<String>, tuning: SearchTuning, events: Arc<dyn EventSink>) -> Self {
        Self {
            name: name.into(),
            tuning,
            events,
            state: Mutex::new(NodeState::default()),
        }
    }

    pub fn node_name(&self) -> &str {
        &self.name
    }

    pub fn tuning(&self) -> SearchTuning {
        self.tuning
    }

    /// Always true for a node that can answer at all.
    pub fn is_alive(&self) -> bool {
        true
    }

    pub fn is_searching(&self) -> bool {
        self.lock_state().active.is_some()
    }

    /// Runs a search to completion on the calling thread.
    ///
    /// Invalid input is rejected before anything else happens, including the
    /// stop of a previous search. A search whose session was already stopped
    /// here answers "not found" without starting any worker.
    pub fn start_search(&self, config: &SearchConfig) -> Result<SearchResult, SearchError> {
        config.validate()?;

        let coordinator = Arc::new(LocalCoordinator::new(
            self.name.clone(),
            self.tuning,
            Arc::clone(&self.events),
        ));

        {
            let mut state = self.lock_state();
            if let Some(session_id) = config.session_id.as_deref() {
                if state.is_stopped(session_id) {
                    tracing::info!(
                        "{}: session {} was already stopped, not starting",
                        self.name,
                        session_id
                    );
                    return Ok(SearchResult::not_found(
                        self.name.clone(),
                        config.this_node_index,
                        0,
                    ));
                }
            }

            let next = ActiveSearch {
                session_id: config.session_id.clone(),
                coordinator: Arc::clone(&coordinator),
            };
            if let Some(previous) = state.active.replace(next) {
                tracing::info!("{}: new search requested, stopping the active one", self.name);
                previous.coordinator.stop_all();
            }
        }

        tracing::info!("{}: starting {}", self.name, config);
        let result = coordinator.execute_search(config);

        {
            let mut state = self.lock_state();
            if state
                .active
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(&current.coordinator, &coordinator))
            {
                state.active = None;
            }
        }

        match &result {
            Ok(r) => tracing::info!("{}: {}", self.name, r),
            Err(e) => tracing::error!("{}: search failed: {}", self.name, e),
        }
        result
    }

    /// Cancels the active search, if any. Returns whether there was one.
    pub fn stop_search(&self) -> bool {
        match self.lock_state().active.as_ref() {
            Some(active) => {
                tracing::info!("{}: stop requested", self.name);
                active.coordinator.stop_all();
                true
            }
            None => {
                tracing::debug!("{}: stop requested but no search is running", self.name);
                false
            }
        }
    }

    /// Cancels the search of `session_id` and refuses any later start for it.
    ///
    /// A search of another session keeps running. Returns whether a search was
    /// cancelled.
    pub fn stop_session(&self, session_id: &str) -> bool {
        let mut state = self.lock_state();
        state.remember_stopped(session_id);

        match state.active.as_ref() {
            Some(active) if active.session_id.as_deref() == Some(session_id) => {
                tracing::info!("{}: stop requested for session {}", self.name, session_id);
                active.coordinator.stop_all();
                true
            }
            _ => {
                tracing::debug!(
                    "{}: session {} is not running here, remembered as stopped",
                    self.name,
                    session_id
                );
                false
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, NodeState> {
        // The guarded value holds plain handles; a panic elsewhere cannot leave it torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
