//! Simulator: owns the configuration and the hierarchy built from it.
//!
//! Events are replayed strictly in order, each to completion, so the result
//! is fully determined by the configuration and the trace.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use super::trace::{TraceEvent, TraceReader};
use crate::common::error::{ConfigError, SimError, TraceError};
use crate::config::Config;
use crate::hierarchy::Hierarchy;
use crate::stats::Report;

/// Outcome of replaying one trace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Events applied to the hierarchy.
    pub events: u64,
    /// Lines rejected as malformed or out of range.
    pub skipped_lines: u64,
}

/// Top-level simulator: configuration plus cache hierarchy.
#[derive(Debug)]
pub struct Simulator {
    config: Config,
    hierarchy: Hierarchy,
    totals: RunSummary,
}

impl Simulator {
    /// Validates `config` and builds an empty hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is rejected.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let hierarchy = Hierarchy::new(&config)?;
        Ok(Self {
            config,
            hierarchy,
            totals: RunSummary::default(),
        })
    }

    /// Applies a single event.
    pub fn step(&mut self, event: TraceEvent) {
        self.hierarchy.access(event.addr, event.op);
        self.totals.events += 1;
    }

    /// Replays every event from `reader`.
    ///
    /// Malformed and out-of-range lines are logged and skipped without
    /// touching any counter.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`] if reading fails; events before the failure
    /// have already been applied.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<RunSummary, TraceError> {
        let mut summary = RunSummary::default();
        for item in TraceReader::new(reader, self.config.address_width) {
            match item {
                Ok(event) => {
                    self.step(event);
                    summary.events += 1;
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("skipping trace line: {e}");
                    summary.skipped_lines += 1;
                    self.totals.skipped_lines += 1;
                }
            }
        }
        info!(
            events = summary.events,
            skipped = summary.skipped_lines,
            "trace replay complete"
        );
        Ok(summary)
    }

    /// Opens and replays the trace file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be opened or read.
    pub fn run_file(&mut self, path: &Path) -> Result<RunSummary, SimError> {
        let io_error = |source| SimError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        self.run(BufReader::new(file)).map_err(|e| match e {
            TraceError::Io(source) => io_error(source),
            other => io_error(std::io::Error::other(other.to_string())),
        })
    }

    /// Configuration being simulated.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Cache hierarchy in its current state.
    pub const fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Events applied and lines skipped since construction.
    pub const fn totals(&self) -> RunSummary {
        self.totals
    }

    /// Snapshots the hierarchy into a report.
    pub fn report(&self, trace_file: &str) -> Report {
        Report::new(
            &self.hierarchy,
            &self.config,
            trace_file,
            self.totals.skipped_lines,
        )
    }
}
