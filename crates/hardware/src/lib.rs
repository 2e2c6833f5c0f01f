//! Trace-driven CPU cache hierarchy simulator library.
//!
//! This crate replays a stream of memory accesses against a configurable cache hierarchy:
//! 1. **Cache:** Set-associative block storage with LRU, LFU, and LRFU replacement.
//! 2. **Hierarchy:** L1, an optional fully-associative victim cache, and an optional L2,
//!    wired together with write-back/write-allocate or write-through/no-allocate policies.
//! 3. **Simulation:** Trace parsing, configuration validation, and the replay driver.
//! 4. **Statistics:** Per-level counters, derived miss rate, traffic, and access time.

/// Common types and constants (address layout, access types, errors).
pub mod common;
/// Simulator configuration (defaults, policies, validation).
pub mod config;
/// Cache level storage and replacement policies.
pub mod cache;
/// Hierarchy controller and victim-cache exchange protocol.
pub mod hierarchy;
/// Trace parsing and the replay driver.
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Arena of cache levels; the entry point for individual accesses.
pub use crate::hierarchy::Hierarchy;
/// Replays whole traces against a hierarchy.
pub use crate::sim::Simulator;
