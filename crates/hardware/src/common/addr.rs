//! Address decomposition.
//!
//! This module splits flat trace addresses into the fields a cache indexes by. It provides:
//! 1. **Geometry:** Offset, set, and tag bit widths derived from block size and set count.
//! 2. **Decomposition:** `tag ‖ set ‖ offset` extraction for lookups.
//! 3. **Reconstruction:** Rebuilding a block address from a resident tag and its set, used
//!    when an evicted block is written back or handed to the victim cache.
//!
//! A fully-associative cache is simply a layout with one set: its tag is the
//! address shifted right by the offset bits, i.e. the block number.

use super::error::ConfigError;

/// Fields of a decomposed address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// Line identifier within the set.
    pub tag: u64,
    /// Set index.
    pub set: usize,
    /// Byte offset within the block.
    pub offset: u64,
}

/// Bit layout of an address for one cache geometry.
///
/// Invariant: `tag_bits + set_bits + offset_bits == address_width`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressLayout {
    offset_bits: u32,
    set_bits: u32,
    tag_bits: u32,
}

impl AddressLayout {
    /// Derives the layout for a cache.
    ///
    /// # Arguments
    ///
    /// * `block_size` - Block size in bytes (power of two).
    /// * `num_sets` - Number of sets (power of two).
    /// * `address_width` - Significant bits of a trace address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either size is zero or not a power of two, or
    /// if the set and offset fields do not fit in `address_width`.
    pub fn new(block_size: usize, num_sets: usize, address_width: u32) -> Result<Self, ConfigError> {
        let offset_bits = log2_exact("block_size", block_size)?;
        let set_bits = log2_exact("num_sets", num_sets)?;
        let required = offset_bits + set_bits;
        if required > address_width {
            return Err(ConfigError::AddressTooNarrow {
                level: "cache",
                required,
                width: address_width,
            });
        }
        Ok(Self {
            offset_bits,
            set_bits,
            tag_bits: address_width - required,
        })
    }

    /// Width of the block-offset field.
    #[inline]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Width of the set-index field.
    #[inline]
    pub const fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Width of the tag field.
    #[inline]
    pub const fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// Total address width covered by the layout.
    #[inline]
    pub const fn address_width(&self) -> u32 {
        self.tag_bits + self.set_bits + self.offset_bits
    }

    /// Number of sets the layout indexes.
    #[inline]
    pub const fn num_sets(&self) -> usize {
        1 << self.set_bits
    }

    /// Extracts the tag (`A / (B * S)`).
    #[inline]
    pub fn tag(&self, addr: u64) -> u64 {
        addr.checked_shr(self.set_bits + self.offset_bits).unwrap_or(0)
    }

    /// Extracts the set index (`(A / B) mod S`).
    #[inline]
    pub fn set_index(&self, addr: u64) -> usize {
        let mask = (1u64 << self.set_bits) - 1;
        (addr.checked_shr(self.offset_bits).unwrap_or(0) & mask) as usize
    }

    /// Extracts the byte offset (`A mod B`).
    #[inline]
    pub fn offset(&self, addr: u64) -> u64 {
        addr & ((1u64 << self.offset_bits) - 1)
    }

    /// Splits an address into all three fields.
    pub fn decode(&self, addr: u64) -> Decoded {
        Decoded {
            tag: self.tag(addr),
            set: self.set_index(addr),
            offset: self.offset(addr),
        }
    }

    /// Reassembles `tag ‖ set ‖ offset` into a flat address.
    pub fn compose(&self, tag: u64, set: usize, offset: u64) -> u64 {
        let tag_part = tag.checked_shl(self.set_bits + self.offset_bits).unwrap_or(0);
        tag_part | ((set as u64) << self.offset_bits) | offset
    }

    /// Address of the first byte of the block holding `tag` in `set`.
    #[inline]
    pub fn block_address(&self, tag: u64, set: usize) -> u64 {
        self.compose(tag, set, 0)
    }
}

/// Returns `log2(value)` for a non-zero power of two.
fn log2_exact(field: &'static str, value: usize) -> Result<u32, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Zero { field });
    }
    if !value.is_power_of_two() {
        return Err(ConfigError::NotPowerOfTwo { field, value });
    }
    Ok(value.trailing_zeros())
}
