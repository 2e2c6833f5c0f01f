//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by every cache level. It includes:
//! 1. **Address Layout:** Splitting addresses into tag, set, and offset fields.
//! 2. **Constants:** Address-width defaults and timing-model coefficients.
//! 3. **Access Types:** Read/write classification of trace events.
//! 4. **Error Handling:** Configuration, trace, and top-level simulation errors.

/// Address decomposition for a cache geometry.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{AddressLayout, Decoded};
pub use data::AccessType;
pub use error::{ConfigError, SimError, TraceError};
