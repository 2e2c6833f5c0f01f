//! Least Frequently Used (LFU) Replacement Policy.
//!
//! Each valid block counts its references. The victim is the block with the
//! smallest count. A block brought in by eviction starts one above the count
//! of the block it replaced (kept in the set's running counter), so a new
//! line is not immediately the next victim.

use super::ReplacementPolicy;
use crate::cache::block::CacheSet;

/// LFU policy; stateless, all counts live in the blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LfuPolicy;

impl ReplacementPolicy for LfuPolicy {
    fn on_hit(&self, set: &mut CacheSet, way: usize, _now: u64) {
        set.promote_recency(way);
        set.block_mut(way).age += 1;
    }

    /// Returns the least-referenced block; the lowest way wins a tie.
    fn select_victim(&self, set: &CacheSet, _now: u64) -> usize {
        let mut victim = 0;
        let mut least = set.block(0).age;
        for (i, block) in set.blocks().iter().enumerate() {
            if block.age < least {
                least = block.age;
                victim = i;
            }
        }
        victim
    }

    /// A set with vacancies has never evicted, so its counter is still 0.
    fn on_fill(&self, set: &mut CacheSet, way: usize, _now: u64) {
        let block = set.block_mut(way);
        block.recency = 0;
        block.age = 1;
    }

    fn on_replace(&self, set: &mut CacheSet, way: usize, _now: u64) {
        let evicted_count = set.block(way).age;
        set.set_counter(evicted_count);
        set.block_mut(way).age = evicted_count + 1;
        set.promote_recency(way);
    }
}
