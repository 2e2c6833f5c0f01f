//! Least Recently Used (LRU) Replacement Policy.
//!
//! Each valid block carries an integer age: 0 for the most recently used
//! block, growing as other blocks in the set are referenced. The victim is
//! the block with the largest age. Ages emulate a recency stack without
//! keeping one.
//!
//! # Performance
//!
//! - **Time Complexity:** O(W) for every operation, W being the associativity
//! - **Space Complexity:** One counter per block

use super::ReplacementPolicy;
use crate::cache::block::CacheSet;

/// LRU policy; stateless, all ranks live in the blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LruPolicy;

impl LruPolicy {
    /// Ages every valid block other than `way` by one.
    fn age_others(set: &mut CacheSet, way: usize) {
        for (i, block) in set.blocks_mut().iter_mut().enumerate() {
            if i != way && block.valid {
                block.age += 1;
                block.recency += 1;
            }
        }
    }

    fn install(set: &mut CacheSet, way: usize) {
        let block = set.block_mut(way);
        block.age = 0;
        block.recency = 0;
        Self::age_others(set, way);
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Resets the hit block's age to 0.
    ///
    /// Only blocks younger than the hit block age, so the relative order of
    /// the older blocks is preserved.
    fn on_hit(&self, set: &mut CacheSet, way: usize, _now: u64) {
        let old_age = set.block(way).age;
        set.promote_recency(way);
        set.block_mut(way).age = 0;
        for (i, block) in set.blocks_mut().iter_mut().enumerate() {
            if i != way && block.valid && block.age < old_age {
                block.age += 1;
            }
        }
    }

    /// Returns the oldest block; the lowest way wins a tie.
    fn select_victim(&self, set: &CacheSet, _now: u64) -> usize {
        let mut victim = 0;
        let mut oldest = set.block(0).age;
        for (i, block) in set.blocks().iter().enumerate() {
            if block.age > oldest {
                oldest = block.age;
                victim = i;
            }
        }
        victim
    }

    fn on_fill(&self, set: &mut CacheSet, way: usize, _now: u64) {
        Self::install(set, way);
    }

    fn on_replace(&self, set: &mut CacheSet, way: usize, _now: u64) {
        Self::install(set, way);
    }
}
