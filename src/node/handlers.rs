use super::protocol::*;
use super::service::SearchNode;
use crate::error::SearchError;
use crate::search::{SearchConfig, SearchResult};

use axum::{
    Extension, Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;

/// All routes of the remote search service, bound to `node`.
pub fn router(node: Arc<SearchNode>) -> Router {
    Router::new()
        .route(ENDPOINT_START_SEARCH, post(handle_start_search))
        .route(ENDPOINT_STOP_SEARCH, post(handle_stop_search))
        .route(ENDPOINT_ALIVE, get(handle_alive))
        .route(ENDPOINT_NODE_NAME, get(handle_node_name))
        .layer(Extension(node))
}

pub async fn handle_start_search(
    Extension(node): Extension<Arc<SearchNode>>,
    Json(config): Json<SearchConfig>,
) -> Result<(StatusCode, Json<SearchResult>), (StatusCode, Json<ErrorResponse>)> {
    tracing::debug!("Received start request: {}", config);

    // Worker threads are joined inside; keep them off the async executor.
    let outcome = tokio::task::spawn_blocking(move || node.start_search(&config)).await;

    match outcome {
        Ok(Ok(result)) => Ok((StatusCode::OK, Json(result))),
        Ok(Err(e @ SearchError::InvalidInput(_))) => {
            tracing::warn!("Rejected search request: {}", e);
            Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e))))
        }
        Ok(Err(e)) => {
            tracing::error!("Search failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(e))))
        }
        Err(e) => {
            tracing::error!("Search task did not complete: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(e))))
        }
    }
}

pub async fn handle_stop_search(
    Extension(node): Extension<Arc<SearchNode>>,
    body: Option<Json<StopRequest>>,
) -> (StatusCode, Json<StopResponse>) {
    let stopped = match body.and_then(|Json(req)| req.session_id) {
        Some(session_id) => node.stop_session(&session_id),
        None => node.stop_search(),
    };
    (StatusCode::OK, Json(StopResponse { stopped }))
}

pub async fn handle_alive(
    Extension(node): Extension<Arc<SearchNode>>,
) -> (StatusCode, Json<AliveResponse>) {
    (
        StatusCode::OK,
        Json(AliveResponse {
            alive: node.is_alive(),
            node_name: node.node_name().to_string(),
        }),
    )
}

pub async fn handle_node_name(
    Extension(node): Extension<Arc<SearchNode>>,
) -> (StatusCode, Json<NodeNameResponse>) {
    (
        StatusCode::OK,
        Json(NodeNameResponse {
            node_name: node.node_name().to_string(),
        }),
    )
}
