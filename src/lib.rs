//! Distributed Password Search Library
//!
//! This library crate defines the core modules of a distributed brute-force search
//! that recovers the plaintext behind a digest by enumerating a fixed-length keyspace.
//! It serves as the foundation for the node binary (`main.rs`) and the `cracker-client`
//! session driver.
//!
//! ## Architecture Modules
//! - **`keyspace`**: Alphabets, index <-> candidate enumeration and range partitioning.
//! - **`search`**: Digest matching, search workers, the worker pool and the per-node
//!   local coordinator that arbitrates the first-match-wins race.
//! - **`node`**: The remote search service (`startSearch`, `stopSearch`, `isAlive`,
//!   `getNodeName`) exposed over HTTP.
//! - **`session`**: The client side: dispatches one search per node and cancels the
//!   rest once a node reports a match.
//! - **`events`**: The event sink search progress is reported through.
//! - **`error`**: Typed errors shared by all of the above.

pub mod error;
pub mod events;
pub mod keyspace;
pub mod node;
pub mod search;
pub mod session;
