//! Set-Associative Cache Level.
//!
//! This module implements the storage side of one cache level: its geometry,
//! its array of sets, its replacement policy, and its counters. Movement of
//! lines between levels (fills, write-backs, victim swaps) is driven by the
//! [`Hierarchy`](crate::hierarchy::Hierarchy) controller, which owns every
//! level and links them through [`LevelId`](crate::hierarchy::LevelId) handles.

/// Block and set storage.
pub mod block;

/// Cache replacement policy implementations (LRU, LFU, LRFU).
pub mod policies;

use self::block::{Block, CacheSet};
use self::policies::{Policy, ReplacementPolicy};
use crate::common::addr::AddressLayout;
use crate::common::constants::{
    HIT_TIME_PER_BLOCK_NS, HIT_TIME_PER_SIZE_NS, HIT_TIME_PER_WAY_NS, L1_HIT_TIME_BASE_NS,
    L2_HIT_TIME_BASE_NS, MISS_PENALTY_BASE_NS, MISS_PENALTY_PER_BLOCK_NS, TIMING_REFERENCE_BLOCK,
    TIMING_REFERENCE_SIZE,
};
use crate::common::error::ConfigError;
use crate::config::{ReplacementPolicy as PolicyType, WritePolicy};
use crate::hierarchy::LevelId;
use crate::stats::LevelStats;

/// Role of a level within the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelKind {
    /// First-level cache receiving trace events.
    L1,
    /// Fully-associative buffer absorbing L1 evictions.
    Victim,
    /// Second-level cache behind L1 and the victim cache.
    L2,
}

impl LevelKind {
    /// Display name used in reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::L1 => "L1",
            Self::Victim => "Victim",
            Self::L2 => "L2",
        }
    }
}

/// Geometry and policies of a level, as resolved from the configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelSpec {
    /// Role in the hierarchy.
    pub kind: LevelKind,
    /// Total capacity in bytes.
    pub size: usize,
    /// Block size in bytes.
    pub block_size: usize,
    /// Blocks per set.
    pub assoc: usize,
    /// Write handling.
    pub write_policy: WritePolicy,
    /// Replacement algorithm.
    pub policy: PolicyType,
    /// Significant address bits.
    pub address_width: u32,
}

/// Empirical access-time model of a level, in nanoseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    /// Time to service a hit.
    pub hit_time: f64,
    /// Additional time to service a miss.
    pub miss_penalty: f64,
}

impl Timing {
    /// Computes the hit time and miss penalty of a level.
    ///
    /// Both grow linearly with block size; hit time also grows with capacity
    /// and associativity. L2 pays a larger fixed hit time than L1 and the
    /// victim cache.
    pub fn for_level(kind: LevelKind, size: usize, block_size: usize, assoc: usize) -> Self {
        let blocks = block_size as f64 / TIMING_REFERENCE_BLOCK;
        let base = match kind {
            LevelKind::L1 | LevelKind::Victim => L1_HIT_TIME_BASE_NS,
            LevelKind::L2 => L2_HIT_TIME_BASE_NS,
        };
        Self {
            hit_time: base
                + HIT_TIME_PER_SIZE_NS * (size as f64 / TIMING_REFERENCE_SIZE)
                + HIT_TIME_PER_BLOCK_NS * blocks
                + HIT_TIME_PER_WAY_NS * assoc as f64,
            miss_penalty: MISS_PENALTY_BASE_NS + MISS_PENALTY_PER_BLOCK_NS * blocks,
        }
    }

    /// Average access time for a given miss rate.
    #[inline]
    pub fn average_access_time(&self, miss_rate: f64) -> f64 {
        self.hit_time + miss_rate * self.miss_penalty
    }
}

/// One cache level: block store, policy, counters, and links.
#[derive(Debug)]
pub struct CacheLevel {
    kind: LevelKind,
    size: usize,
    block_size: usize,
    assoc: usize,
    layout: AddressLayout,
    write_policy: WritePolicy,
    policy: Policy,
    sets: Vec<CacheSet>,
    timing: Timing,
    clock: u64,
    pub(crate) next: Option<LevelId>,
    pub(crate) victim: Option<LevelId>,
    /// Access, miss, and write-back counters.
    pub stats: LevelStats,
}

impl CacheLevel {
    /// Creates an empty level with every block invalid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the block size or the derived set count is
    /// zero or not a power of two, or if the geometry does not fit the
    /// address width.
    pub fn new(spec: &LevelSpec) -> Result<Self, ConfigError> {
        if spec.assoc == 0 {
            return Err(ConfigError::Zero { field: "assoc" });
        }
        let num_sets = spec.size / spec.block_size.max(1).saturating_mul(spec.assoc);
        let layout = AddressLayout::new(spec.block_size, num_sets, spec.address_width)?;
        Ok(Self {
            kind: spec.kind,
            size: spec.size,
            block_size: spec.block_size,
            assoc: spec.assoc,
            layout,
            write_policy: spec.write_policy,
            policy: Policy::from(spec.policy),
            sets: vec![CacheSet::new(spec.assoc); num_sets],
            timing: Timing::for_level(spec.kind, spec.size, spec.block_size, spec.assoc),
            clock: 0,
            next: None,
            victim: None,
            stats: LevelStats::default(),
        })
    }

    /// Role in the hierarchy.
    #[inline]
    pub const fn kind(&self) -> LevelKind {
        self.kind
    }

    /// Display name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Returns `true` for a victim cache, which never fetches lines itself.
    #[inline]
    pub const fn is_victim(&self) -> bool {
        matches!(self.kind, LevelKind::Victim)
    }

    /// Capacity in bytes.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Block size in bytes.
    #[inline]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Blocks per set.
    #[inline]
    pub const fn assoc(&self) -> usize {
        self.assoc
    }

    /// Number of sets.
    #[inline]
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Address layout of this level.
    #[inline]
    pub const fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    /// Write handling policy.
    #[inline]
    pub const fn write_policy(&self) -> WritePolicy {
        self.write_policy
    }

    /// Replacement policy.
    #[inline]
    pub const fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Timing model.
    #[inline]
    pub const fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Accesses delivered to this level so far; the LRFU "now".
    #[inline]
    pub const fn clock(&self) -> u64 {
        self.clock
    }

    /// All sets in index order.
    #[inline]
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// Set at `index`.
    #[inline]
    pub fn set(&self, index: usize) -> &CacheSet {
        &self.sets[index]
    }

    /// Block in `way` of set `set`.
    #[inline]
    pub fn block(&self, set: usize, way: usize) -> &Block {
        self.sets[set].block(way)
    }

    /// Level this one forwards fills and write-backs to.
    #[inline]
    pub const fn next_level(&self) -> Option<LevelId> {
        self.next
    }

    /// Attached victim cache.
    #[inline]
    pub const fn victim_cache(&self) -> Option<LevelId> {
        self.victim
    }

    /// Way in `set` holding `tag`, or `None` on a miss.
    pub fn hit_or_miss(&self, tag: u64, set: usize) -> Option<usize> {
        self.sets[set].find(tag)
    }

    /// Set and way of the line containing `addr`, if resident.
    pub fn lookup(&self, addr: u64) -> Option<(usize, usize)> {
        let set = self.layout.set_index(addr);
        self.hit_or_miss(self.layout.tag(addr), set)
            .map(|way| (set, way))
    }

    /// Returns `true` if the line containing `addr` is resident.
    pub fn contains(&self, addr: u64) -> bool {
        self.lookup(addr).is_some()
    }

    /// Address of the block resident in `way` of `set`.
    pub fn block_address(&self, set: usize, way: usize) -> u64 {
        self.layout.block_address(self.sets[set].block(way).tag, set)
    }

    /// Average access time given the current counters.
    pub fn average_access_time(&self) -> f64 {
        self.timing.average_access_time(self.stats.miss_rate())
    }

    /// Memory traffic generated below this level.
    pub const fn memory_traffic(&self) -> u64 {
        self.stats.memory_traffic(self.write_policy)
    }

    /// Advances the access clock and returns the new time.
    pub(crate) const fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    pub(crate) fn set_mut(&mut self, index: usize) -> &mut CacheSet {
        &mut self.sets[index]
    }

    /// Applies the policy's hit update to `way` of `set`.
    pub(crate) fn touch(&mut self, set: usize, way: usize, now: u64) {
        let policy = self.policy;
        policy.on_hit(&mut self.sets[set], way, now);
    }

    /// Writes `tag` into an invalid slot and initializes its metadata.
    pub(crate) fn fill(&mut self, set: usize, way: usize, tag: u64, dirty: bool, now: u64) {
        let policy = self.policy;
        let target = &mut self.sets[set];
        let block = target.block_mut(way);
        block.tag = tag;
        block.valid = true;
        block.dirty = dirty;
        policy.on_fill(target, way, now);
    }

    /// Overwrites the block in `way` with `tag` and resets its metadata.
    pub(crate) fn install(&mut self, set: usize, way: usize, tag: u64, dirty: bool, now: u64) {
        let policy = self.policy;
        let target = &mut self.sets[set];
        let block = target.block_mut(way);
        block.tag = tag;
        block.valid = true;
        block.dirty = dirty;
        policy.on_replace(target, way, now);
    }

    /// Chooses the way to evict from a full `set`.
    pub(crate) fn select_victim(&self, set: usize, now: u64) -> usize {
        self.policy.select_victim(&self.sets[set], now)
    }
}
