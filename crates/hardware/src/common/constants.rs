//! Global Simulator Constants.
//!
//! This module defines constants shared across the simulator. It includes:
//! 1. **Address Constants:** The default width of a trace address.
//! 2. **Timing Constants:** Coefficients of the empirical hit-time and miss-penalty model.

/// Default number of significant bits in a trace address.
pub const DEFAULT_ADDRESS_WIDTH: u32 = 32;

/// Widest address the simulator can represent.
pub const MAX_ADDRESS_WIDTH: u32 = 64;

/// Cache size (bytes) the hit-time model is normalized against (512 KiB).
pub const TIMING_REFERENCE_SIZE: f64 = 524_288.0;

/// Block size (bytes) the timing model is normalized against.
pub const TIMING_REFERENCE_BLOCK: f64 = 16.0;

/// Fixed part of the miss penalty in nanoseconds.
pub const MISS_PENALTY_BASE_NS: f64 = 20.0;

/// Miss penalty added per reference block transferred, in nanoseconds.
pub const MISS_PENALTY_PER_BLOCK_NS: f64 = 0.5;

/// Fixed hit time of a first-level (L1 or victim) cache in nanoseconds.
pub const L1_HIT_TIME_BASE_NS: f64 = 0.25;

/// Fixed hit time of a second-level cache in nanoseconds.
pub const L2_HIT_TIME_BASE_NS: f64 = 2.5;

/// Hit time added per reference size of capacity, in nanoseconds.
pub const HIT_TIME_PER_SIZE_NS: f64 = 2.5;

/// Hit time added per reference block of line size, in nanoseconds.
pub const HIT_TIME_PER_BLOCK_NS: f64 = 0.025;

/// Hit time added per way of associativity, in nanoseconds.
pub const HIT_TIME_PER_WAY_NS: f64 = 0.025;
