//! Search Module
//!
//! The node-local half of the system: hashing candidates, racing workers over a range,
//! and deciding a single winner.
//!
//! ## Overview
//! A `LocalCoordinator` receives a `SearchConfig`, derives this node's slice of the
//! keyspace, hands sub-slices (or a shared cursor) to `SearchWorker`s, and runs them on
//! the `WorkerPool`. Workers stop at the first match anywhere on the node, when their
//! work runs out, or when the coordinator is told to stop.
//!
//! ## Submodules
//! - **`types`**: `SearchConfig`, `SearchResult` and the tuning knobs of a deployment.
//! - **`digest`**: Allocation-free digest computation and comparison.
//! - **`worker`**: The enumerate -> hash -> compare loop and its work sources.
//! - **`pool`**: Thread-per-worker execution with fault isolation.
//! - **`coordinator`**: First-match-wins arbitration, cancellation and `execute_search`.

pub mod coordinator;
pub mod digest;
pub mod pool;
pub mod types;
pub mod worker;

pub use coordinator::{LocalCoordinator, Winner};
pub use types::{
    DigestAlgorithm, Distribution, LengthMode, SearchConfig, SearchResult, SearchTuning,
};
