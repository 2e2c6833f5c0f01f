//! Tests for single-level cache storage.

/// Block and set bookkeeping.
pub mod block;


/// LRU, LFU, and LRFU replacement.
pub mod policies;
