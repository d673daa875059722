use super::client::SearchClient;
use super::types::{SESSION_NODE_ID, SessionRequest, SessionState};
use crate::error::SessionError;
use crate::search::SearchResult;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::task::JoinSet;

/// Drives one search across every node of a cluster.
///
/// Sessions are serialized: a second `run_session` while one is in flight fails
/// with `SessionError::Busy`.
pub struct SessionCoordinator<C: SearchClient> {
    client: Arc<C>,
    state: Mutex<SessionState>,
}

impl<C: SearchClient> SessionCoordinator<C> {
    pub fn new(client: C) -> Self {
        Self::with_client(Arc::new(client))
    }

    pub fn with_client(client: Arc<C>) -> Self {
        Self {
            client,
            state: Mutex::new(SessionState::Idle),
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: SessionState) {
        let mut current = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!("Session state {} -> {}", *current, state);
        *current = state;
    }

    /// Claims the coordinator for a new session.
    fn begin(&self) -> Result<(), SessionError> {
        let mut current = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if current.is_running() {
            return Err(SessionError::Busy);
        }
        *current = SessionState::Dispatching;
        Ok(())
    }

    /// Runs a full session: validate, probe every node, dispatch, collect.
    ///
    /// The first node to answer `found` wins; every other node is told to stop
    /// and the outstanding calls are abandoned. When every node answers "not
    /// found" the result carries the wall-clock time from dispatch to the last
    /// answer. Any node that cannot be reached fails the whole session with
    /// `ConnectionFailed`, never with "not found".
    pub async fn run_session(&self, request: &SessionRequest) -> Result<SearchResult, SessionError> {
        request.validate()?;
        self.begin()?;
        let _abandoned = ResetOnDrop(&self.state);

        if let Err(e) = self.probe(&request.nodes).await {
            tracing::error!("Probe failed, nothing dispatched: {}", e);
            self.set_state(Self::failure_state(&e));
            return Err(e);
        }

        let session_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        let mut pending = JoinSet::new();
        for (index, node) in request.nodes.iter().enumerate() {
            let client = Arc::clone(&self.client);
            let node = node.clone();
            let config = request.config_for(index).with_session_id(session_id.clone());
            tracing::info!("Dispatching session {} to node {} ({}): {}", session_id, index, node, config);

            pending.spawn(async move {
                let outcome = client.start_search(&node, config).await;
                (index, outcome)
            });
        }
        self.set_state(SessionState::AwaitingResults);

        let mut answered = 0usize;
        while let Some(joined) = pending.join_next().await {
            let (index, outcome) = match joined {
                Ok(entry) => entry,
                Err(e) => {
                    pending.abort_all();
                    self.stop_nodes(&request.nodes, None, &session_id).await;
                    self.set_state(SessionState::ConnectionFailed);
                    return Err(SessionError::connection(SESSION_NODE_ID, e));
                }
            };

            match outcome {
                Ok(result) if result.found => {
                    tracing::info!("Node {} won: {}", index, result);
                    pending.abort_all();
                    self.stop_nodes(&request.nodes, Some(index), &session_id).await;
                    self.set_state(SessionState::Found);
                    return Ok(result);
                }
                Ok(result) => {
                    answered += 1;
                    tracing::info!(
                        "Node {} exhausted its range ({}/{} answered): {}",
                        index,
                        answered,
                        request.nodes.len(),
                        result
                    );
                }
                Err(e) => {
                    tracing::error!("Node {} failed: {}", index, e);
                    pending.abort_all();
                    self.stop_nodes(&request.nodes, Some(index), &session_id).await;
                    self.set_state(Self::failure_state(&e));
                    return Err(e);
                }
            }
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!("No node found a match in {}ms", elapsed_ms);
        self.set_state(SessionState::Exhausted);
        Ok(SearchResult::not_found(SESSION_NODE_ID, 0, elapsed_ms))
    }

    /// Checks that every node answers before any work is sent out.
    async fn probe(&self, nodes: &[String]) -> Result<(), SessionError> {
        for node in nodes {
            if !self.client.is_alive(node).await? {
                return Err(SessionError::connection(node.as_str(), "node reports not alive"));
            }
            let name = self.client.node_name(node).await?;
            tracing::info!("Connected to {} at {}", name, node);
        }
        Ok(())
    }

    /// Best-effort stop of `session_id` on every node except `skip`. Failures are
    /// only logged.
    ///
    /// A node that has not received its start yet remembers the session as
    /// stopped and answers the late start with "not found" right away.
    async fn stop_nodes(&self, nodes: &[String], skip: Option<usize>, session_id: &str) {
        let mut stops = JoinSet::new();
        for (index, node) in nodes.iter().enumerate() {
            if Some(index) == skip {
                continue;
            }
            let client = Arc::clone(&self.client);
            let node = node.clone();
            let session_id = session_id.to_string();
            stops.spawn(async move {
                let outcome = client.stop_search(&node, Some(&session_id)).await;
                (node, outcome)
            });
        }

        while let Some(joined) = stops.join_next().await {
            match joined {
                Ok((node, Ok(stopped))) => {
                    tracing::debug!("Stop sent to {} (was running: {})", node, stopped)
                }
                Ok((node, Err(e))) => tracing::warn!("Failed to stop {}: {}", node, e),
                Err(e) => tracing::warn!("Stop task failed: {}", e),
            }
        }
    }

    /// Terminal state for a failed session. A rejection commits nothing.
    fn failure_state(error: &SessionError) -> SessionState {
        if error.is_connection_failure() {
            SessionState::ConnectionFailed
        } else {
            SessionState::Idle
        }
    }
}

/// Puts a running session back to `Idle` if its future is dropped mid-flight.
struct ResetOnDrop<'a>(&'a Mutex<SessionState>);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        let mut state = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_running() {
            *state = SessionState::Idle;
        }
    }
}
