//! Error definitions.
//!
//! This module defines the error taxonomy of the simulator. It provides:
//! 1. **Configuration Errors:** Geometry and policy parameters rejected before any trace is replayed.
//! 2. **Trace Errors:** Malformed or out-of-range trace lines, and read failures on the trace stream.
//! 3. **Simulation Errors:** Top-level failures surfaced to the command line.
//!
//! Nothing here is retried: the simulator is an offline replay tool, so every
//! error is a configuration or input problem.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A cache configuration that cannot be simulated.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A size or count that must be non-zero was zero.
    #[error("{field} must be non-zero")]
    Zero {
        /// Configuration field that was zero.
        field: &'static str,
    },

    /// A size or count that must be a power of two was not.
    #[error("{field} must be a power of two, got {value}")]
    NotPowerOfTwo {
        /// Configuration field that was rejected.
        field: &'static str,
        /// Offending value.
        value: usize,
    },

    /// The cache size is not a whole number of sets.
    #[error(
        "{level} size {size} is not a multiple of block_size ({block_size}) x associativity ({assoc})"
    )]
    Geometry {
        /// Level whose geometry is inconsistent.
        level: &'static str,
        /// Total size in bytes.
        size: usize,
        /// Block size in bytes.
        block_size: usize,
        /// Blocks per set.
        assoc: usize,
    },

    /// The victim cache cannot hold a single block.
    #[error("victim cache size {size} is smaller than one block ({block_size} bytes)")]
    VictimTooSmall {
        /// Victim cache size in bytes.
        size: usize,
        /// Block size in bytes.
        block_size: usize,
    },

    /// The LRFU decay parameter is unusable.
    #[error("LRFU lambda must be finite, got {0}")]
    InvalidLambda(f64),

    /// The address width is outside the supported range.
    #[error("address width must be between 1 and 64 bits, got {0}")]
    UnsupportedAddressWidth(u32),

    /// The geometry needs more index bits than the address provides.
    #[error("{level} needs {required} set/offset bits but addresses are only {width} bits wide")]
    AddressTooNarrow {
        /// Level whose geometry does not fit.
        level: &'static str,
        /// Bits needed for set index plus block offset.
        required: u32,
        /// Configured address width.
        width: u32,
    },

    /// A JSON configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A problem with the trace stream.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The line does not have the `<r|w> <hex address>` shape.
    #[error("line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Human-readable description of the defect.
        reason: String,
    },

    /// The address has bits set above the configured address width.
    #[error("line {line}: address {addr:#x} does not fit in {width} bits")]
    AddressOutOfRange {
        /// 1-based line number.
        line: usize,
        /// Parsed address.
        addr: u64,
        /// Configured address width.
        width: u32,
    },

    /// The underlying reader failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] io::Error),
}

impl TraceError {
    /// Returns `true` if the replay must stop.
    ///
    /// Malformed and out-of-range lines are skipped; read failures are fatal.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Top-level simulation failure.
#[derive(Debug, Error)]
pub enum SimError {
    /// The configuration was rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A file could not be opened or read.
    #[error("{}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}
