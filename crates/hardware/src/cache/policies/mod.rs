//! Cache Replacement Policies.
//!
//! Implements the algorithms that pick an eviction victim in a full set and
//! refresh block metadata on hits and fills.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used, via integer recency ranks.
//! - `Lfu`: Least Frequently Used, seeded from the set's running counter.
//! - `Lrfu`: Least Recently/Frequently Used, via an exponentially decaying score.
//!
//! All three break ties in favour of the lowest-indexed way.

/// Least Frequently Used replacement policy.
pub mod lfu;

/// Least Recently Used replacement policy.
pub mod lru;

/// Least Recently/Frequently Used replacement policy.
pub mod lrfu;

pub use lfu::LfuPolicy;
pub use lrfu::LrfuPolicy;
pub use lru::LruPolicy;

use super::block::CacheSet;
use crate::config::ReplacementPolicy as PolicyType;

/// Trait for cache replacement policies.
///
/// Policies keep their state in the blocks of the set they are handed, so a
/// single policy value serves every set of a cache. `now` is the owning
/// level's access clock.
pub trait ReplacementPolicy {
    /// Updates metadata when `way` hits.
    fn on_hit(&self, set: &mut CacheSet, way: usize, now: u64);

    /// Selects the way to evict from a full set.
    fn select_victim(&self, set: &CacheSet, now: u64) -> usize;

    /// Initializes metadata for a line just placed into a previously invalid `way`.
    fn on_fill(&self, set: &mut CacheSet, way: usize, now: u64);

    /// Initializes metadata for a line that just replaced the block in `way`.
    ///
    /// Called after the new tag is installed but before the slot's old policy
    /// counters are overwritten.
    fn on_replace(&self, set: &mut CacheSet, way: usize, now: u64);
}

/// Policy selected for a cache level at configuration time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Policy {
    /// See [`LruPolicy`].
    Lru(LruPolicy),
    /// See [`LfuPolicy`].
    Lfu(LfuPolicy),
    /// See [`LrfuPolicy`].
    Lrfu(LrfuPolicy),
}

impl Policy {
    /// Configuration-level description of the policy.
    pub const fn kind(&self) -> PolicyType {
        match self {
            Self::Lru(_) => PolicyType::Lru,
            Self::Lfu(_) => PolicyType::Lfu,
            Self::Lrfu(p) => PolicyType::Lrfu { lambda: p.lambda() },
        }
    }
}

impl From<PolicyType> for Policy {
    fn from(kind: PolicyType) -> Self {
        match kind {
            PolicyType::Lru => Self::Lru(LruPolicy),
            PolicyType::Lfu => Self::Lfu(LfuPolicy),
            PolicyType::Lrfu { lambda } => Self::Lrfu(LrfuPolicy::new(lambda)),
        }
    }
}

impl ReplacementPolicy for Policy {
    fn on_hit(&self, set: &mut CacheSet, way: usize, now: u64) {
        match self {
            Self::Lru(p) => p.on_hit(set, way, now),
            Self::Lfu(p) => p.on_hit(set, way, now),
            Self::Lrfu(p) => p.on_hit(set, way, now),
        }
    }

    fn select_victim(&self, set: &CacheSet, now: u64) -> usize {
        match self {
            Self::Lru(p) => p.select_victim(set, now),
            Self::Lfu(p) => p.select_victim(set, now),
            Self::Lrfu(p) => p.select_victim(set, now),
        }
    }

    fn on_fill(&self, set: &mut CacheSet, way: usize, now: u64) {
        match self {
            Self::Lru(p) => p.on_fill(set, way, now),
            Self::Lfu(p) => p.on_fill(set, way, now),
            Self::Lrfu(p) => p.on_fill(set, way, now),
        }
    }

    fn on_replace(&self, set: &mut CacheSet, way: usize, now: u64) {
        match self {
            Self::Lru(p) => p.on_replace(set, way, now),
            Self::Lfu(p) => p.on_replace(set, way, now),
            Self::Lrfu(p) => p.on_replace(set, way, now),
        }
    }
}
