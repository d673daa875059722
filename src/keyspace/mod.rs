//! Keyspace Module
//!
//! Maps integer indices onto fixed-length candidate strings and splits index
//! intervals into contiguous work ranges.
//!
//! ## Core Concepts
//! - **Alphabet**: An ordered set of single-byte symbols. Digit `d` of an index maps to the `d`-th symbol.
//! - **Keyspace**: Every string of exactly `length` symbols. Its size is `alphabet.len()^length`.
//! - **Enumeration**: `encode`/`decode` form a bijection between `[0, size)` and the keyspace.
//! - **Partitioning**: `split` divides an interval into `n` near-equal contiguous ranges. The same
//!   function is used to split the keyspace across nodes and a node's range across workers.
//!
//! ## Submodules
//! - **`alphabet`**: Symbol set definition, presets and validation.
//! - **`enumerator`**: Index <-> candidate conversion and keyspace sizing.
//! - **`partitioner`**: `SearchRange` and the range splitting algorithm.

pub mod alphabet;
pub mod enumerator;
pub mod partitioner;

pub use alphabet::Alphabet;
pub use enumerator::Keyspace;
pub use partitioner::{SearchRange, node_range, split, split_range};

#[cfg(test)]
mod tests;
