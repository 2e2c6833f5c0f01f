//! Cache blocks and sets.
//!
//! A [`CacheSet`] is a fixed array of [`Block`] slots plus the running
//! reference counter LFU seeds new blocks from. Blocks are never freed: an
//! eviction overwrites the slot in place with the incoming line.

use serde::Serialize;

/// Lifecycle state of a block slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BlockState {
    /// Slot has never been filled.
    Invalid,
    /// Holds a line identical to the next level's copy.
    Clean,
    /// Holds a line modified since it was filled.
    Dirty,
}

/// One cache line slot.
///
/// `age` is interpreted by the replacement policy: the recency rank under
/// LRU and the reference count under LFU. `recency` tracks most-recently-used
/// order for the contents dump only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    /// Identifies the resident line.
    pub tag: u64,
    /// Slot holds a line.
    pub valid: bool,
    /// Line was modified since it was filled.
    pub dirty: bool,
    /// Policy counter (LRU rank or LFU frequency).
    pub age: u64,
    /// Display recency rank; 0 is most recently used.
    pub recency: u64,
    /// Combined recency-frequency score (LRFU).
    pub crf: f64,
    /// Access clock value of the last reference (LRFU).
    pub last_ref: u64,
}

impl Block {
    /// Current lifecycle state.
    pub const fn state(&self) -> BlockState {
        match (self.valid, self.dirty) {
            (false, _) => BlockState::Invalid,
            (true, false) => BlockState::Clean,
            (true, true) => BlockState::Dirty,
        }
    }

    /// Returns `true` if the slot holds `tag`.
    #[inline]
    pub fn holds(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }
}

/// A set of `ways` block slots.
#[derive(Clone, Debug)]
pub struct CacheSet {
    blocks: Vec<Block>,
    counter: u64,
}

impl CacheSet {
    /// Creates a set of invalid blocks.
    pub fn new(ways: usize) -> Self {
        Self {
            blocks: vec![Block::default(); ways],
            counter: 0,
        }
    }

    /// Associativity of the set.
    #[inline]
    pub fn ways(&self) -> usize {
        self.blocks.len()
    }

    /// All slots in way order.
    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Slot at `way`.
    #[inline]
    pub fn block(&self, way: usize) -> &Block {
        &self.blocks[way]
    }

    /// Mutable slot at `way`.
    #[inline]
    pub fn block_mut(&mut self, way: usize) -> &mut Block {
        &mut self.blocks[way]
    }

    /// Mutable access to every slot.
    #[inline]
    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    /// Way holding `tag`, if resident. First match wins.
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.blocks.iter().position(|b| b.holds(tag))
    }

    /// Lowest-indexed invalid slot.
    pub fn first_invalid(&self) -> Option<usize> {
        self.blocks.iter().position(|b| !b.valid)
    }

    /// Number of valid slots.
    pub fn occupancy(&self) -> usize {
        self.blocks.iter().filter(|b| b.valid).count()
    }

    /// LFU running counter: the frequency of the last block evicted here.
    #[inline]
    pub const fn counter(&self) -> u64 {
        self.counter
    }

    /// Overwrites the LFU running counter.
    #[inline]
    pub const fn set_counter(&mut self, value: u64) {
        self.counter = value;
    }

    /// Moves `way` to the front of the display recency order.
    ///
    /// Valid blocks that were more recent than `way` shift back by one.
    pub fn promote_recency(&mut self, way: usize) {
        let old = self.blocks[way].recency;
        self.blocks[way].recency = 0;
        for (i, block) in self.blocks.iter_mut().enumerate() {
            if i != way && block.valid && block.recency < old {
                block.recency += 1;
            }
        }
    }

    /// Valid blocks ordered most-recently-used first; ties keep way order.
    pub fn by_recency(&self) -> Vec<&Block> {
        let mut resident: Vec<&Block> = self.blocks.iter().filter(|b| b.valid).collect();
        resident.sort_by_key(|b| b.recency);
        resident
    }
}
