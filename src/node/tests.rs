//! Node Module Tests
//!
//! ## Test Scopes
//! - **Service**: `SearchNode` lifecycle: start, stop, restart while active,
//!   per-session stops that overtake their start.
//! - **HTTP**: The axum router served on an ephemeral port, driven with raw reqwest calls.

#[cfg(test)]
mod tests {
    use crate::events::NoOpEventSink;
    use crate::keyspace::Alphabet;
    use crate::node::protocol::*;
    use crate::node::{SearchNode, router};
    use crate::search::digest::hex_digest;
    use crate::search::{DigestAlgorithm, SearchConfig, SearchResult, SearchTuning};

    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn test_node(name: &str) -> Arc<SearchNode> {
        Arc::new(SearchNode::new(
            name,
            SearchTuning::default(),
            Arc::new(NoOpEventSink),
        ))
    }

    fn cat_config() -> SearchConfig {
        SearchConfig::new(hex_digest(DigestAlgorithm::Md5, b"cat"), 3, 1, 0, 2)
            .with_alphabet(Alphabet::lower_alphanumeric())
    }

    /// Printable length 5 with a target outside the keyspace: runs until stopped.
    fn endless_config() -> SearchConfig {
        SearchConfig::new(hex_digest(DigestAlgorithm::Md5, b"toolong!"), 5, 1, 0, 2)
    }

    fn wait_until_searching(node: &SearchNode) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !node.is_searching() {
            assert!(Instant::now() < deadline, "search never became active");
            thread::sleep(Duration::from_millis(5));
        }
    }

    async fn serve(node: Arc<SearchNode>) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(node)).await.unwrap();
        });
        addr
    }

    // ============================================================
    // SERVICE TESTS
    // ============================================================

    #[test]
    fn test_idle_node_reports_name_and_liveness() {
        let node = test_node("node-a");

        assert_eq!(node.node_name(), "node-a");
        assert!(node.is_alive());
        assert!(!node.is_searching());
        assert!(!node.stop_search(), "nothing to stop");
    }

    #[test]
    fn test_start_search_finds_and_clears_active_session() {
        let node = test_node("node-a");

        let result = node.start_search(&cat_config()).unwrap();

        assert!(result.found);
        assert_eq!(result.candidate.as_deref(), Some("cat"));
        assert_eq!(result.node_id, "node-a");
        assert!(!node.is_searching());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let node = test_node("node-a");
        let config = SearchConfig::new("xyz", 3, 1, 0, 2);

        assert!(node.start_search(&config).is_err());
        assert!(!node.is_searching());
    }

    #[test]
    fn test_stop_search_ends_running_search() {
        // ARRANGE
        let node = test_node("node-a");
        let runner = {
            let node = node.clone();
            thread::spawn(move || node.start_search(&endless_config()))
        };
        wait_until_searching(&node);

        // ACT
        let stopped = node.stop_search();
        let result = runner.join().unwrap().unwrap();

        // ASSERT
        assert!(stopped);
        assert!(!result.found);
        assert!(!node.is_searching());
    }

    #[test]
    fn test_new_search_stops_previous_one() {
        let node = test_node("node-a");
        let first = {
            let node = node.clone();
            thread::spawn(move || node.start_search(&endless_config()))
        };
        wait_until_searching(&node);

        let second = node.start_search(&cat_config()).unwrap();
        let first = first.join().unwrap().unwrap();

        assert!(!first.found, "the replaced search is cancelled");
        assert_eq!(second.candidate.as_deref(), Some("cat"));
    }

    #[test]
    fn test_stopped_session_never_starts() {
        // ARRANGE: the stop arrives before its start.
        let node = test_node("node-a");
        assert!(!node.stop_session("s-1"));

        // ACT
        let started = Instant::now();
        let result = node
            .start_search(&endless_config().with_session_id("s-1"))
            .unwrap();

        // ASSERT
        assert!(!result.found);
        assert_eq!(result.node_id, "node-a");
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(!node.is_searching());
    }

    #[test]
    fn test_stop_session_leaves_other_sessions_running() {
        // ARRANGE
        let node = test_node("node-a");
        let runner = {
            let node = node.clone();
            thread::spawn(move || node.start_search(&endless_config().with_session_id("s-1")))
        };
        wait_until_searching(&node);

        // ACT + ASSERT: a stale stop for another session does nothing.
        assert!(!node.stop_session("s-2"));
        assert!(node.is_searching());

        assert!(node.stop_session("s-1"));
        let result = runner.join().unwrap().unwrap();
        assert!(!result.found);
        assert!(!node.is_searching());
    }

    #[test]
    fn test_untagged_search_is_not_affected_by_tombstones() {
        let node = test_node("node-a");
        node.stop_session("s-1");

        let result = node.start_search(&cat_config()).unwrap();

        assert_eq!(result.candidate.as_deref(), Some("cat"));
    }

    // ============================================================
    // HTTP TESTS
    // ============================================================

    #[tokio::test]
    async fn test_http_alive_and_name() {
        let addr = serve(test_node("node-http")).await;
        let client = reqwest::Client::new();

        let alive: AliveResponse = client
            .get(format!("http://{}{}", addr, ENDPOINT_ALIVE))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let name: NodeNameResponse = client
            .get(format!("http://{}{}", addr, ENDPOINT_NODE_NAME))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert!(alive.alive);
        assert_eq!(alive.node_name, "node-http");
        assert_eq!(name.node_name, "node-http");
    }

    #[tokio::test]
    async fn test_http_start_search_returns_result() {
        let addr = serve(test_node("node-http")).await;

        let response = reqwest::Client::new()
            .post(format!("http://{}{}", addr, ENDPOINT_START_SEARCH))
            .json(&cat_config())
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let result: SearchResult = response.json().await.unwrap();
        assert_eq!(result.candidate.as_deref(), Some("cat"));
    }

    #[tokio::test]
    async fn test_http_invalid_config_is_bad_request() {
        let addr = serve(test_node("node-http")).await;
        let config = SearchConfig::new(hex_digest(DigestAlgorithm::Md5, b"cat"), 3, 2, 5, 2);

        let response = reqwest::Client::new()
            .post(format!("http://{}{}", addr, ENDPOINT_START_SEARCH))
            .json(&config)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json().await.unwrap();
        assert!(body.error.contains("node index"));
    }

    #[tokio::test]
    async fn test_http_stop_without_search() {
        let addr = serve(test_node("node-http")).await;

        let response: StopResponse = reqwest::Client::new()
            .post(format!("http://{}{}", addr, ENDPOINT_STOP_SEARCH))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert!(!response.stopped);
    }

    #[tokio::test]
    async fn test_http_stop_with_session_refuses_late_start() {
        let addr = serve(test_node("node-http")).await;
        let client = reqwest::Client::new();

        let stop: StopResponse = client
            .post(format!("http://{}{}", addr, ENDPOINT_STOP_SEARCH))
            .json(&StopRequest {
                session_id: Some("s-9".to_string()),
            })
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(!stop.stopped);

        let result: SearchResult = client
            .post(format!("http://{}{}", addr, ENDPOINT_START_SEARCH))
            .json(&endless_config().with_session_id("s-9"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert!(!result.found);
    }

    #[tokio::test]
    async fn test_http_padded_digest_is_bad_request() {
        let addr = serve(test_node("node-http")).await;
        let padded = format!(" {}\n", hex_digest(DigestAlgorithm::Md5, b"cat"));
        let config = SearchConfig::new(padded, 3, 1, 0, 2)
            .with_alphabet(Alphabet::lower_alphanumeric());

        let response = reqwest::Client::new()
            .post(format!("http://{}{}", addr, ENDPOINT_START_SEARCH))
            .json(&config)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }
}
