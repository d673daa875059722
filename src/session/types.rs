use crate::error::SessionError;
use crate::keyspace::Alphabet;
use crate::search::{DigestAlgorithm, LengthMode, SearchConfig};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node id reported in a session-level "not found" result.
pub const SESSION_NODE_ID: &str = "session";

/// Lifecycle of a distributed session.
///
/// A terminal state (`Found`, `Exhausted`, `ConnectionFailed`) stays observable
/// until the next session starts, which treats it as `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Dispatching,
    AwaitingResults,
    Found,
    Exhausted,
    ConnectionFailed,
}

impl SessionState {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Dispatching | Self::AwaitingResults)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Dispatching => "dispatching",
            Self::AwaitingResults => "awaiting_results",
            Self::Found => "found",
            Self::Exhausted => "exhausted",
            Self::ConnectionFailed => "connection_failed",
        };
        f.write_str(s)
    }
}

/// What an operator asks the cluster to crack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub target_digest_hex: String,
    pub password_length: usize,
    /// `host:port` of every node, in node index order.
    pub nodes: Vec<String>,
    pub workers_per_node: usize,
    #[serde(default)]
    pub alphabet: Alphabet,
    #[serde(default)]
    pub algorithm: DigestAlgorithm,
    #[serde(default)]
    pub length_mode: LengthMode,
}

impl SessionRequest {
    pub fn new(
        target_digest_hex: impl Into<String>,
        password_length: usize,
        nodes: Vec<String>,
        workers_per_node: usize,
    ) -> Self {
        Self {
            target_digest_hex: target_digest_hex.into(),
            password_length,
            nodes,
            workers_per_node,
            alphabet: Alphabet::default(),
            algorithm: DigestAlgorithm::default(),
            length_mode: LengthMode::default(),
        }
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_length_mode(mut self, length_mode: LengthMode) -> Self {
        self.length_mode = length_mode;
        self
    }

    /// The request body sent to the node at `node_index`.
    pub fn config_for(&self, node_index: usize) -> SearchConfig {
        SearchConfig::new(
            self.target_digest_hex.clone(),
            self.password_length,
            self.nodes.len(),
            node_index,
            self.workers_per_node,
        )
        .with_alphabet(self.alphabet.clone())
        .with_algorithm(self.algorithm)
        .with_length_mode(self.length_mode)
    }

    /// Same checks a node would apply, done before contacting anyone.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.nodes.is_empty() {
            return Err(SessionError::InvalidInput(
                "at least one node address is required".to_string(),
            ));
        }
        if let Some(blank) = self.nodes.iter().position(|n| n.trim().is_empty()) {
            return Err(SessionError::InvalidInput(format!(
                "node address {} is empty",
                blank
            )));
        }

        self.config_for(0).validate()?;
        Ok(())
    }
}
