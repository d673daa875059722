//! Remote Search Service Module
//!
//! Exposes a node's local search to session coordinators over HTTP/JSON.
//!
//! ## Core Concepts
//! - **Single active search**: A node runs at most one search at a time. A new
//!   `startSearch` stops the previous one before starting.
//! - **Blocking start**: `startSearch` answers only once every worker of the node has
//!   terminated, with either the winning candidate or "not found".
//! - **Out-of-band stop**: `stopSearch` arrives on a separate request and only raises
//!   the cancellation signal; the pending `startSearch` then completes on its own.
//!
//! ## Submodules
//! - **`service`**: `SearchNode`, the transport-independent implementation.
//! - **`handlers`**: Axum handlers and the router wiring them to `SearchNode`.
//! - **`protocol`**: Endpoint paths and response DTOs.

pub mod handlers;
pub mod protocol;
pub mod service;

pub use handlers::router;
pub use service::SearchNode;

#[cfg(test)]
mod tests;
