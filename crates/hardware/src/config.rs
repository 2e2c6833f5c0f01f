//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures and enums used to parameterize
//! a cache hierarchy. It provides:
//! 1. **Defaults:** Baseline geometry (block size, L1 size and associativity, address width).
//! 2. **Structures:** Per-level size, associativity, and write policy, plus the victim cache.
//! 3. **Enums:** Replacement and write policies.
//! 4. **Validation:** Power-of-two and consistency checks run before any trace is replayed.
//!
//! Configuration is supplied either from the positional command line (see
//! [`Config::from_args`]) or as a JSON document.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::constants::{DEFAULT_ADDRESS_WIDTH, MAX_ADDRESS_WIDTH};
use crate::common::error::{ConfigError, SimError};

/// Default configuration constants for the simulator.
mod defaults {
    /// Default block (line) size in bytes.
    pub const BLOCK_SIZE: usize = 16;

    /// Default L1 capacity in bytes.
    pub const L1_SIZE: usize = 1024;

    /// Default L1 associativity.
    pub const L1_ASSOC: usize = 2;

    /// Default associativity of an enabled lower level.
    pub const L2_ASSOC: usize = 4;

    /// Replacement-policy selector for LRU on the command line.
    pub const SELECTOR_LRU: f64 = 2.0;

    /// Replacement-policy selector for LFU on the command line.
    pub const SELECTOR_LFU: f64 = 3.0;
}

/// Cache replacement policy algorithms.
///
/// Specifies how a victim block is chosen in a full set and how block
/// metadata is refreshed on a hit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used: evicts the block with the largest age.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Least Frequently Used: evicts the block with the smallest reference count.
    #[serde(alias = "Lfu")]
    Lfu,
    /// Least Recently/Frequently Used: evicts the block with the smallest
    /// decayed combined recency-frequency score.
    #[serde(alias = "Lrfu")]
    Lrfu {
        /// Decay rate; larger values weigh recency more heavily.
        lambda: f64,
    },
}

impl ReplacementPolicy {
    /// Decodes the numeric command-line selector.
    ///
    /// `2` selects LRU, `3` selects LFU, and any other value selects LRFU
    /// with that value as λ.
    pub fn from_selector(selector: f64) -> Self {
        if selector == defaults::SELECTOR_LRU {
            Self::Lru
        } else if selector == defaults::SELECTOR_LFU {
            Self::Lfu
        } else {
            Self::Lrfu { lambda: selector }
        }
    }

    /// Policy used by the levels below a cache running `self`.
    ///
    /// LRU and LFU propagate unchanged; an LRFU hierarchy runs LRU below L1.
    pub const fn lower_level(self) -> Self {
        match self {
            Self::Lfu => Self::Lfu,
            Self::Lru | Self::Lrfu { .. } => Self::Lru,
        }
    }

    /// Short human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lru => "LRU",
            Self::Lfu => "LFU",
            Self::Lrfu { .. } => "LRFU",
        }
    }
}

/// Write handling policy of a cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WritePolicy {
    /// Write-back, write-allocate: writes dirty the block; dirty blocks are
    /// written to the next level only on eviction; write misses allocate.
    #[default]
    #[serde(rename = "WBWA", alias = "WriteBack")]
    WriteBackAllocate,
    /// Write-through, no-allocate: every write goes straight to the next
    /// level; write misses do not allocate and blocks are never dirty.
    #[serde(rename = "WTNA", alias = "WriteThrough")]
    WriteThroughNoAllocate,
}

impl WritePolicy {
    /// Returns `true` if write misses allocate (and writes dirty blocks).
    #[inline]
    pub const fn allocates(self) -> bool {
        matches!(self, Self::WriteBackAllocate)
    }
}

/// Root configuration structure for a cache hierarchy.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{Config, ReplacementPolicy};
///
/// let json = r#"{
///     "block_size": 32,
///     "l1": { "size": 8192, "assoc": 4 },
///     "victim": { "size": 256 },
///     "l2": { "size": 65536, "assoc": 8 },
///     "policy": { "LRFU": { "lambda": 0.5 } }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.l1.num_sets(config.block_size), 64);
/// assert_eq!(config.victim.blocks(config.block_size), 8);
/// assert_eq!(config.policy, ReplacementPolicy::Lrfu { lambda: 0.5 });
/// assert_eq!(config.l2_policy(), ReplacementPolicy::Lru);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Block size in bytes, shared by every level.
    #[serde(default = "Config::default_block_size")]
    pub block_size: usize,

    /// First-level cache; always present.
    #[serde(default = "LevelConfig::default_l1")]
    pub l1: LevelConfig,

    /// Victim cache attached to L1; size 0 disables it.
    #[serde(default)]
    pub victim: VictimConfig,

    /// Second-level cache; size 0 disables it.
    #[serde(default)]
    pub l2: LevelConfig,

    /// Replacement policy of L1 (lower levels follow [`ReplacementPolicy::lower_level`]).
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Significant bits of a trace address.
    #[serde(default = "Config::default_address_width")]
    pub address_width: u32,
}

impl Config {
    fn default_block_size() -> usize {
        defaults::BLOCK_SIZE
    }

    fn default_address_width() -> u32 {
        DEFAULT_ADDRESS_WIDTH
    }

    /// Builds a configuration from the positional command-line parameters.
    ///
    /// All levels use write-back/write-allocate. A zero `victim_size` or
    /// `l2_size` disables that level.
    pub fn from_args(
        block_size: usize,
        l1_size: usize,
        l1_assoc: usize,
        victim_size: usize,
        l2_size: usize,
        l2_assoc: usize,
        selector: f64,
    ) -> Self {
        Self {
            block_size,
            l1: LevelConfig::new(l1_size, l1_assoc),
            victim: VictimConfig { size: victim_size },
            l2: LevelConfig::new(l2_size, l2_assoc),
            policy: ReplacementPolicy::from_selector(selector),
            address_width: DEFAULT_ADDRESS_WIDTH,
        }
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid JSON or
    /// does not match the schema. The result is not validated.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read and
    /// [`SimError::Config`] if it cannot be parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json_str(&text)?)
    }

    /// Replacement policy of the L2.
    pub const fn l2_policy(&self) -> ReplacementPolicy {
        self.policy.lower_level()
    }

    /// Checks the configuration for geometry and parameter errors.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: zero or non-power-of-two
    /// sizes, sizes that are not a whole number of sets, a victim cache
    /// smaller than one block, a non-finite λ, or an address width that cannot
    /// hold the set and offset fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address_width == 0 || self.address_width > MAX_ADDRESS_WIDTH {
            return Err(ConfigError::UnsupportedAddressWidth(self.address_width));
        }
        check_pow2("block_size", self.block_size)?;
        let offset_bits = self.block_size.trailing_zeros();

        self.l1.validate("l1", self.block_size, self.address_width)?;

        if self.victim.enabled() {
            check_pow2("victim.size", self.victim.size)?;
            if self.victim.size < self.block_size {
                return Err(ConfigError::VictimTooSmall {
                    size: self.victim.size,
                    block_size: self.block_size,
                });
            }
            check_width("victim", offset_bits, self.address_width)?;
        }

        if self.l2.enabled() {
            self.l2.validate("l2", self.block_size, self.address_width)?;
        }

        if let ReplacementPolicy::Lrfu { lambda } = self.policy {
            if !lambda.is_finite() {
                return Err(ConfigError::InvalidLambda(lambda));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: defaults::BLOCK_SIZE,
            l1: LevelConfig::default_l1(),
            victim: VictimConfig::default(),
            l2: LevelConfig::default(),
            policy: ReplacementPolicy::default(),
            address_width: DEFAULT_ADDRESS_WIDTH,
        }
    }
}

/// Configuration of one set-associative cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Total capacity in bytes; 0 disables the level (not allowed for L1).
    #[serde(default)]
    pub size: usize,

    /// Blocks per set.
    #[serde(default = "LevelConfig::default_assoc")]
    pub assoc: usize,

    /// Write handling policy.
    #[serde(default)]
    pub write_policy: WritePolicy,
}

impl LevelConfig {
    /// Creates a write-back/write-allocate level.
    pub const fn new(size: usize, assoc: usize) -> Self {
        Self {
            size,
            assoc,
            write_policy: WritePolicy::WriteBackAllocate,
        }
    }

    fn default_assoc() -> usize {
        defaults::L2_ASSOC
    }

    fn default_l1() -> Self {
        Self::new(defaults::L1_SIZE, defaults::L1_ASSOC)
    }

    /// Returns `true` if the level has any capacity.
    #[inline]
    pub const fn enabled(&self) -> bool {
        self.size > 0
    }

    /// Number of sets for the given block size.
    ///
    /// Only meaningful for a validated configuration.
    pub const fn num_sets(&self, block_size: usize) -> usize {
        match block_size.checked_mul(self.assoc) {
            Some(set_bytes) if set_bytes > 0 => self.size / set_bytes,
            _ => 0,
        }
    }

    fn validate(
        &self,
        level: &'static str,
        block_size: usize,
        address_width: u32,
    ) -> Result<(), ConfigError> {
        let (size_field, assoc_field, sets_field) = match level {
            "l1" => ("l1.size", "l1.assoc", "l1.sets"),
            _ => ("l2.size", "l2.assoc", "l2.sets"),
        };
        check_pow2(size_field, self.size)?;
        if self.assoc == 0 {
            return Err(ConfigError::Zero { field: assoc_field });
        }
        let whole_sets = block_size
            .checked_mul(self.assoc)
            .is_some_and(|set_bytes| self.size % set_bytes == 0);
        if !whole_sets {
            return Err(ConfigError::Geometry {
                level,
                size: self.size,
                block_size,
                assoc: self.assoc,
            });
        }
        let sets = self.num_sets(block_size);
        check_pow2(sets_field, sets)?;
        let required = block_size.trailing_zeros() + sets.trailing_zeros();
        check_width(level, required, address_width)
    }
}

impl Default for LevelConfig {
    /// A disabled level.
    fn default() -> Self {
        Self::new(0, defaults::L2_ASSOC)
    }
}

/// Configuration of the fully-associative victim cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VictimConfig {
    /// Capacity in bytes; 0 disables the victim cache.
    #[serde(default)]
    pub size: usize,
}

impl VictimConfig {
    /// Returns `true` if the victim cache has any capacity.
    #[inline]
    pub const fn enabled(&self) -> bool {
        self.size > 0
    }

    /// Number of blocks (and therefore ways of its single set).
    pub const fn blocks(&self, block_size: usize) -> usize {
        if block_size == 0 { 0 } else { self.size / block_size }
    }
}

fn check_pow2(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::Zero { field })
    } else if !value.is_power_of_two() {
        Err(ConfigError::NotPowerOfTwo { field, value })
    } else {
        Ok(())
    }
}

const fn check_width(level: &'static str, required: u32, width: u32) -> Result<(), ConfigError> {
    if required > width {
        Err(ConfigError::AddressTooNarrow {
            level,
            required,
            width,
        })
    } else {
        Ok(())
    }
}
