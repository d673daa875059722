//! Error Types
//!
//! `SearchError` covers everything that can go wrong inside one node (bad input,
//! a faulting worker). `SessionError` covers the coordinator side, where a
//! transport failure must stay distinguishable from a legitimate "not found".

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Malformed digest, out-of-range length, worker or node counts, bad alphabet.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An unexpected failure inside a single worker's loop.
    #[error("worker {worker_id} faulted: {reason}")]
    WorkerFault { worker_id: usize, reason: String },
}

impl SearchError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The node is unreachable, not answering, or the call timed out.
    #[error("connection to node {node} failed: {reason}")]
    ConnectionFailed { node: String, reason: String },

    /// The node answered but refused the request (e.g. it failed validation).
    #[error("node {node} rejected the request ({status}): {message}")]
    Rejected {
        node: String,
        status: u16,
        message: String,
    },

    /// `run_session` was called while another session was still in flight.
    #[error("a session is already running")]
    Busy,
}

impl SessionError {
    pub fn connection(node: impl Into<String>, reason: impl ToString) -> Self {
        Self::ConnectionFailed {
            node: node.into(),
            reason: reason.to_string(),
        }
    }

    /// True for the transport-level failure class.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. })
    }
}

impl From<SearchError> for SessionError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidInput(msg) => Self::InvalidInput(msg),
            other => Self::InvalidInput(other.to_string()),
        }
    }
}
