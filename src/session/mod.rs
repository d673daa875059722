//! Distributed Session Module
//!
//! The client side of the cluster: splits one cracking request across every node,
//! waits for the first winner, and cancels the rest.
//!
//! ## Core Concepts
//! - **Probe before dispatch**: Every node must answer `isAlive` and `getNodeName`
//!   before any `startSearch` goes out, so an unreachable address fails fast with
//!   nothing left running on the others.
//! - **Completion order**: Results are consumed as nodes finish, not in node order.
//! - **Failure is not absence**: A transport failure surfaces as `ConnectionFailed`
//!   and never as "not found".
//!
//! ## Submodules
//! - **`client`**: `SearchClient`, the typed remote interface, and its HTTP implementation.
//! - **`coordinator`**: `SessionCoordinator`, the session state machine.
//! - **`types`**: Session requests and states.

pub mod client;
pub mod coordinator;
pub mod types;

pub use client::{HttpSearchClient, SearchClient};
pub use coordinator::SessionCoordinator;
pub use types::{SessionRequest, SessionState};
