//! Shared helpers for building hierarchies and replaying short traces.

/// Hierarchy construction and inspection helpers.
pub mod harness;

pub use harness::*;
