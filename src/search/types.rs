use crate::error::SearchError;
use crate::keyspace::Alphabet;
use crate::keyspace::Keyspace;
use crate::search::digest::parse_target_hex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Upper bound on worker threads a single node will start for one search.
pub const MAX_WORKERS_PER_NODE: usize = 256;

/// Upper bound on the number of nodes one search can be split across.
pub const MAX_TOTAL_NODES: usize = 1024;

/// Default number of loop iterations between two cancellation checks.
pub const DEFAULT_POLL_INTERVAL: u64 = 1024;

/// Default number of indices a dynamic worker claims per cursor bump.
pub const DEFAULT_CHUNK_SIZE: u64 = 65_536;

/// One-way hash function the target digest was produced with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl DigestAlgorithm {
    /// Digest size in bytes.
    pub fn output_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha256 => 32,
        }
    }

    /// Expected length of the digest written as hex.
    pub fn hex_len(self) -> usize {
        self.output_len() * 2
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => f.write_str("md5"),
            Self::Sha256 => f.write_str("sha256"),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(SearchError::invalid(format!(
                "unknown digest algorithm: {}",
                other
            ))),
        }
    }
}

/// Which candidate lengths a search covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthMode {
    /// Only strings of exactly `password_length` symbols.
    #[default]
    Exact,
    /// Every length from 1 up to `password_length`, shortest first.
    UpTo,
}

/// How a node hands its range to its workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Distribution {
    /// Each worker owns a fixed slice computed up front.
    #[default]
    Static,
    /// Workers claim `chunk_size` indices at a time from a shared cursor.
    Dynamic { chunk_size: u64 },
}

/// Per-deployment knobs of the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTuning {
    pub distribution: Distribution,
    /// Iterations between cancellation checks. Values below 1 are treated as 1.
    pub poll_interval: u64,
}

impl Default for SearchTuning {
    fn default() -> Self {
        Self {
            distribution: Distribution::Static,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Everything a node needs to search its share of the keyspace.
///
/// This is the request body of the remote `startSearch` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Hex encoded target digest. Case-insensitive, no surrounding whitespace.
    pub target_digest_hex: String,
    pub password_length: usize,
    pub total_nodes: usize,
    /// 0-based, must be `< total_nodes`.
    pub this_node_index: usize,
    pub workers_per_node: usize,
    #[serde(default)]
    pub alphabet: Alphabet,
    #[serde(default)]
    pub algorithm: DigestAlgorithm,
    #[serde(default)]
    pub length_mode: LengthMode,
    /// Distributed session this search belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl SearchConfig {
    pub fn new(
        target_digest_hex: impl Into<String>,
        password_length: usize,
        total_nodes: usize,
        this_node_index: usize,
        workers_per_node: usize,
    ) -> Self {
        Self {
            target_digest_hex: target_digest_hex.into(),
            password_length,
            total_nodes,
            this_node_index,
            workers_per_node,
            alphabet: Alphabet::default(),
            algorithm: DigestAlgorithm::default(),
            length_mode: LengthMode::default(),
            session_id: None,
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
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

    /// Candidate lengths covered, in search order.
    pub fn lengths(&self) -> RangeInclusive<usize> {
        match self.length_mode {
            LengthMode::Exact => self.password_length..=self.password_length,
            LengthMode::UpTo => 1..=self.password_length,
        }
    }

    /// Checks every field and returns the decoded target digest.
    ///
    /// Nothing is started before this succeeds.
    pub fn validate(&self) -> Result<Vec<u8>, SearchError> {
        // Rejects zero, too long, and keyspaces that overflow u64.
        Keyspace::new(self.alphabet.clone(), self.password_length)?;

        if self.total_nodes == 0 || self.total_nodes > MAX_TOTAL_NODES {
            return Err(SearchError::invalid(format!(
                "total nodes must be between 1 and {}, got {}",
                MAX_TOTAL_NODES, self.total_nodes
            )));
        }
        if self.this_node_index >= self.total_nodes {
            return Err(SearchError::invalid(format!(
                "node index {} out of range for {} nodes",
                self.this_node_index, self.total_nodes
            )));
        }
        if self.workers_per_node == 0 || self.workers_per_node > MAX_WORKERS_PER_NODE {
            return Err(SearchError::invalid(format!(
                "workers per node must be between 1 and {}, got {}",
                MAX_WORKERS_PER_NODE, self.workers_per_node
            )));
        }

        parse_target_hex(self.algorithm, &self.target_digest_hex)
    }
}

impl fmt::Display for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.target_digest_hex.chars().take(8).collect();
        write!(
            f,
            "SearchConfig[{} {}..., length={} ({:?}), nodes={}, node={}, workers={}, alphabet={}]",
            self.algorithm,
            prefix,
            self.password_length,
            self.length_mode,
            self.total_nodes,
            self.this_node_index,
            self.workers_per_node,
            self.alphabet.len()
        )
    }
}

/// Outcome of a node search, and of a whole session.
///
/// `candidate` and `worker_id` are present exactly when `found` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<String>,
    pub node_id: String,
    pub node_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<usize>,
    pub elapsed_millis: u64,
}

impl SearchResult {
    pub fn found(
        candidate: impl Into<String>,
        node_id: impl Into<String>,
        node_index: usize,
        worker_id: usize,
        elapsed_millis: u64,
    ) -> Self {
        Self {
            found: true,
            candidate: Some(candidate.into()),
            node_id: node_id.into(),
            node_index,
            worker_id: Some(worker_id),
            elapsed_millis,
        }
    }

    pub fn not_found(node_id: impl Into<String>, node_index: usize, elapsed_millis: u64) -> Self {
        Self {
            found: false,
            candidate: None,
            node_id: node_id.into(),
            node_index,
            worker_id: None,
            elapsed_millis,
        }
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.candidate, self.worker_id) {
            (Some(candidate), Some(worker_id)) if self.found => write!(
                f,
                "FOUND '{}' by {} worker-{} in {}ms",
                candidate, self.node_id, worker_id, self.elapsed_millis
            ),
            _ => write!(f, "NOT FOUND by {} in {}ms", self.node_id, self.elapsed_millis),
        }
    }
}
