//! Memory Access Types.
//!
//! This module defines the classification of trace events used throughout the simulator.
//! These types are used for the following:
//! 1. **Dispatch:** Selecting the read or write path through a cache level.
//! 2. **Write Policy:** Deciding whether a fill dirties its block.
//! 3. **Statistics Tracking:** Splitting access and miss counters by direction.

use serde::{Deserialize, Serialize};

/// Direction of a memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Data read; on a miss the line is fetched from the next level.
    Read,

    /// Data write; handling depends on the level's write policy.
    Write,
}

impl AccessType {
    /// Returns `true` for [`AccessType::Write`].
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }

    /// Maps a dirty bit to the access that carries it into another level.
    ///
    /// Blocks moved between levels travel as a write when dirty and as a read
    /// when clean, so the receiving level installs them in the right state.
    #[inline]
    pub const fn carrying(dirty: bool) -> Self {
        if dirty { Self::Write } else { Self::Read }
    }

    /// Trace-file mnemonic for the access (`r` or `w`).
    pub const fn mnemonic(self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
        }
    }
}

impl std::fmt::Display for AccessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
