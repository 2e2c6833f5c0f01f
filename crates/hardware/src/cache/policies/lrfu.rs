//! Least Recently/Frequently Used (LRFU) Replacement Policy.
//!
//! Every block carries a combined recency-frequency score (CRF). A reference
//! adds 1 to the score after decaying it by `(1/2)^(λ·Δt)`, where `Δt` is the
//! number of accesses since the block's previous reference. λ = 0 degenerates
//! to LFU; large λ approaches LRU.
//!
//! Victim selection decays every block's score to the current time first, so
//! stale scores of long-idle blocks are never compared directly.

use super::ReplacementPolicy;
use crate::cache::block::{Block, CacheSet};

/// LRFU policy parameterized by its decay rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LrfuPolicy {
    lambda: f64,
}

impl LrfuPolicy {
    /// Creates a policy with decay rate `lambda`.
    pub const fn new(lambda: f64) -> Self {
        Self { lambda }
    }

    /// Decay rate.
    pub const fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Weight `(1/2)^(λ·Δt)` of a reference made `elapsed` accesses ago.
    pub fn weight(&self, elapsed: u64) -> f64 {
        0.5_f64.powf(elapsed as f64 * self.lambda)
    }

    /// Score of `block` decayed to time `now`.
    pub fn decayed(&self, block: &Block, now: u64) -> f64 {
        self.weight(now.saturating_sub(block.last_ref)) * block.crf
    }

    fn install(set: &mut CacheSet, way: usize, now: u64) {
        let block = set.block_mut(way);
        block.crf = 1.0;
        block.last_ref = now;
    }
}

impl ReplacementPolicy for LrfuPolicy {
    fn on_hit(&self, set: &mut CacheSet, way: usize, now: u64) {
        let block = set.block_mut(way);
        block.crf = 1.0 + self.decayed(block, now);
        block.last_ref = now;
    }

    /// Returns the block with the smallest decayed score; the lowest way wins a tie.
    fn select_victim(&self, set: &CacheSet, now: u64) -> usize {
        let mut victim = 0;
        let mut lowest = self.decayed(set.block(0), now);
        for (i, block) in set.blocks().iter().enumerate() {
            let score = self.decayed(block, now);
            if score < lowest {
                lowest = score;
                victim = i;
            }
        }
        victim
    }

    fn on_fill(&self, set: &mut CacheSet, way: usize, now: u64) {
        Self::install(set, way, now);
    }

    fn on_replace(&self, set: &mut CacheSet, way: usize, now: u64) {
        Self::install(set, way, now);
    }
}
