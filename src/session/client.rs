use crate::error::SessionError;
use crate::node::protocol::*;
use crate::search::{SearchConfig, SearchResult};

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Typed stub for the four remote operations of a search node.
///
/// `node` is the address the implementation knows the node by. Every failure
/// to get an answer maps to `SessionError::ConnectionFailed`; an answer that
/// refuses the request maps to `SessionError::Rejected`.
pub trait SearchClient: Send + Sync + 'static {
    fn start_search(
        &self,
        node: &str,
        config: SearchConfig,
    ) -> impl Future<Output = Result<SearchResult, SessionError>> + Send;

    /// Stops the node's active search. With a `session_id` the node only stops a
    /// search of that session, and refuses any later start for it.
    fn stop_search(
        &self,
        node: &str,
        session_id: Option<&str>,
    ) -> impl Future<Output = Result<bool, SessionError>> + Send;

    fn is_alive(&self, node: &str) -> impl Future<Output = Result<bool, SessionError>> + Send;

    fn node_name(&self, node: &str) -> impl Future<Output = Result<String, SessionError>> + Send;
}

/// Default per-attempt timeout of probe and stop calls.
pub const DEFAULT_CONTROL_TIMEOUT: Duration = Duration::from_secs(2);

/// Attempts for idempotent calls (probe, stop).
const CONTROL_ATTEMPTS: usize = 3;

/// `SearchClient` over the node's HTTP/JSON API.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    http_client: reqwest::Client,
    /// Upper bound on one `start_search` call; `None` waits as long as the node searches.
    request_timeout: Option<Duration>,
    control_timeout: Duration,
}

impl HttpSearchClient {
    pub fn new(
        connect_timeout: Duration,
        request_timeout: Option<Duration>,
    ) -> Result<Self, SessionError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| SessionError::connection("<client>", e))?;

        Ok(Self {
            http_client,
            request_timeout,
            control_timeout: DEFAULT_CONTROL_TIMEOUT,
        })
    }

    pub fn with_control_timeout(mut self, timeout: Duration) -> Self {
        self.control_timeout = timeout;
        self
    }

    fn url(node: &str, endpoint: &str) -> String {
        format!("http://{}{}", node, endpoint)
    }

    /// Sends the request built by `build` until it gets any HTTP answer.
    ///
    /// Only transport errors are retried, with exponential backoff from 150ms
    /// capped at 1200ms plus up to 50ms of jitter. Use for idempotent calls only.
    async fn send_with_retry<F>(&self, build: F, attempts: usize) -> Result<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut delay_ms = 150u64;
        let mut attempt = 1;

        loop {
            match build().timeout(self.control_timeout).send().await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt >= attempts => return Err(anyhow::anyhow!(e)),
                Err(e) => {
                    tracing::debug!("Attempt {}/{} failed: {}", attempt, attempts, e);
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                    attempt += 1;
                }
            }
        }
    }

    /// Decodes a 2xx body as `T`, anything else as a rejection.
    async fn decode<T: serde::de::DeserializeOwned>(
        node: &str,
        response: reqwest::Response,
    ) -> Result<T, SessionError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| SessionError::connection(node, format!("malformed response: {}", e)));
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        Err(SessionError::Rejected {
            node: node.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}

impl SearchClient for HttpSearchClient {
    async fn start_search(
        &self,
        node: &str,
        config: SearchConfig,
    ) -> Result<SearchResult, SessionError> {
        // Not retried: a resent start would replace the search already running there.
        let mut request = self
            .http_client
            .post(Self::url(node, ENDPOINT_START_SEARCH))
            .json(&config);
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SessionError::connection(node, e))?;
        Self::decode(node, response).await
    }

    async fn stop_search(&self, node: &str, session_id: Option<&str>) -> Result<bool, SessionError> {
        let url = Self::url(node, ENDPOINT_STOP_SEARCH);
        let body = StopRequest {
            session_id: session_id.map(str::to_string),
        };

        let response = self
            .send_with_retry(|| self.http_client.post(&url).json(&body), CONTROL_ATTEMPTS)
            .await
            .map_err(|e| SessionError::connection(node, e))?;

        let body: StopResponse = Self::decode(node, response).await?;
        Ok(body.stopped)
    }

    async fn is_alive(&self, node: &str) -> Result<bool, SessionError> {
        let url = Self::url(node, ENDPOINT_ALIVE);
        let response = self
            .send_with_retry(|| self.http_client.get(&url), CONTROL_ATTEMPTS)
            .await
            .map_err(|e| SessionError::connection(node, e))?;

        let body: AliveResponse = Self::decode(node, response).await?;
        Ok(body.alive)
    }

    async fn node_name(&self, node: &str) -> Result<String, SessionError> {
        let url = Self::url(node, ENDPOINT_NODE_NAME);
        let response = self
            .send_with_retry(|| self.http_client.get(&url), CONTROL_ATTEMPTS)
            .await
            .map_err(|e| SessionError::connection(node, e))?;

        let body: NodeNameResponse = Self::decode(node, response).await?;
        Ok(body.node_name)
    }
}
