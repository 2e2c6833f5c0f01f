//! # Unit Components
//!
//! This module organizes the tests for each layer of the simulator, from
//! address decomposition up to the rendered report.

/// Address layout, configuration, and error tests.
pub mod common;

/// Block storage, replacement policies, and single-level behavior.
pub mod cache;



/// Counters, derived metrics, and report rendering.
pub mod stats;
