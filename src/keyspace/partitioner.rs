use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open interval `[start, end)` of keyspace indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchRange {
    pub start: u64,
    pub end: u64,
}

impl SearchRange {
    /// Creates a range. An inverted pair collapses to the empty range at `start`.
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: u64) -> bool {
        self.start <= index && index < self.end
    }
}

impl fmt::Display for SearchRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) (size: {})", self.start, self.end, self.len())
    }
}

/// Splits `[0, total)` into `n` contiguous ranges.
///
/// Range `i` has `total / n + 1` indices when `i < total % n`, otherwise
/// `total / n`. Exactly `n` ranges are returned, empty ones included, so
/// `split(3, 5)` yields three single-index ranges followed by two empty ones.
pub fn split(total: u64, n: usize) -> Result<Vec<SearchRange>, SearchError> {
    split_range(SearchRange::new(0, total), n)
}

/// Same as [`split`] for an arbitrary base range.
pub fn split_range(range: SearchRange, n: usize) -> Result<Vec<SearchRange>, SearchError> {
    if n == 0 {
        return Err(SearchError::invalid(
            "cannot split a range into zero partitions",
        ));
    }

    let parts = n as u64;
    let base = range.len() / parts;
    let remainder = range.len() % parts;

    let mut ranges = Vec::with_capacity(n);
    let mut cursor = range.start;
    for i in 0..parts {
        let size = base + u64::from(i < remainder);
        ranges.push(SearchRange::new(cursor, cursor + size));
        cursor += size;
    }

    debug_assert_eq!(cursor, range.end);
    Ok(ranges)
}

/// The slice of a keyspace of `size` indices owned by node `node_index` out of
/// `total_nodes`.
///
/// Computes the single entry `split(size, total_nodes)[node_index]` would hold,
/// without materializing the other ranges.
pub fn node_range(
    size: u64,
    total_nodes: usize,
    node_index: usize,
) -> Result<SearchRange, SearchError> {
    if total_nodes == 0 {
        return Err(SearchError::invalid(
            "cannot split a range into zero partitions",
        ));
    }
    if node_index >= total_nodes {
        return Err(SearchError::invalid(format!(
            "node index {} out of range for {} nodes",
            node_index, total_nodes
        )));
    }

    let parts = total_nodes as u64;
    let index = node_index as u64;
    let base = size / parts;
    let remainder = size % parts;

    // base * index + min(index, remainder) <= size, so neither step overflows.
    let start = base * index + index.min(remainder);
    let len = base + u64::from(index < remainder);
    Ok(SearchRange::new(start, start + len))
}
