//! Trace replay.
//!
//! This module connects a trace stream to a [`Hierarchy`](crate::hierarchy::Hierarchy). It provides:
//! 1. **Trace parsing:** `<r|w> <hex address>` lines into [`TraceEvent`]s.
//! 2. **Simulator:** Replays a whole trace and produces a [`Report`](crate::stats::Report).

/// Simulator driver.
pub mod simulator;

/// Trace line parsing and streaming.
pub mod trace;

pub use simulator::{RunSummary, Simulator};
pub use trace::{TraceEvent, TraceReader};
