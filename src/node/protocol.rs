//! Network Protocol Definitions
//!
//! Endpoints and DTOs of the remote search service. `startSearch` takes a
//! `SearchConfig` body and answers with a `SearchResult`; both live in
//! `search::types` since the node and the session share them.

use serde::{Deserialize, Serialize};

pub const ENDPOINT_START_SEARCH: &str = "/search/start";
pub const ENDPOINT_STOP_SEARCH: &str = "/search/stop";
pub const ENDPOINT_ALIVE: &str = "/alive";
pub const ENDPOINT_NODE_NAME: &str = "/name";

/// Optional body of `stopSearch`. Without a session id the node stops whatever runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopResponse {
    /// False when no search was running.
    pub stopped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliveResponse {
    pub alive: bool,
    pub node_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeNameResponse {
    pub node_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
