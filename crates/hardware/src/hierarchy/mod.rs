//! Cache hierarchy controller.
//!
//! The [`Hierarchy`] owns every cache level in an arena and links them with
//! [`LevelId`] handles: L1 forwards to the L2 (or to main memory when there is
//! none) and pushes its evictions into the victim cache when one is attached.
//! One call to [`Hierarchy::access`] runs an event to completion, including
//! every fill, write-back, and victim exchange it causes further down.
//!
//! Main memory is not modelled: a level with no next level drops forwarded
//! requests, which terminates the recursion.

/// Victim-cache probe, swap, and eviction absorption.
mod victim;

use tracing::{debug, trace};

use crate::cache::{CacheLevel, LevelKind, LevelSpec};
use crate::common::data::AccessType;
use crate::common::error::ConfigError;
use crate::config::{Config, ReplacementPolicy, WritePolicy};

/// Non-owning handle to a level inside a [`Hierarchy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(usize);

impl LevelId {
    /// Position of the level in the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One access being serviced by one level.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Request {
    pub(crate) addr: u64,
    pub(crate) tag: u64,
    pub(crate) set: usize,
    pub(crate) op: AccessType,
    pub(crate) now: u64,
}

/// Arena of cache levels wired into an L1 / victim / L2 hierarchy.
#[derive(Debug)]
pub struct Hierarchy {
    levels: Vec<CacheLevel>,
    l1: LevelId,
    victim: Option<LevelId>,
    l2: Option<LevelId>,
}

impl Hierarchy {
    /// Validates `config` and builds the hierarchy it describes, every block invalid.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found by [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut levels = Vec::with_capacity(3);

        let l2 = if config.l2.enabled() {
            Some(push_level(
                &mut levels,
                LevelSpec {
                    kind: LevelKind::L2,
                    size: config.l2.size,
                    block_size: config.block_size,
                    assoc: config.l2.assoc,
                    write_policy: config.l2.write_policy,
                    policy: config.l2_policy(),
                    address_width: config.address_width,
                },
            )?)
        } else {
            None
        };

        let victim = if config.victim.enabled() {
            Some(push_level(
                &mut levels,
                LevelSpec {
                    kind: LevelKind::Victim,
                    size: config.victim.size,
                    block_size: config.block_size,
                    assoc: config.victim.blocks(config.block_size),
                    write_policy: WritePolicy::WriteBackAllocate,
                    policy: ReplacementPolicy::Lru,
                    address_width: config.address_width,
                },
            )?)
        } else {
            None
        };

        let l1 = push_level(
            &mut levels,
            LevelSpec {
                kind: LevelKind::L1,
                size: config.l1.size,
                block_size: config.block_size,
                assoc: config.l1.assoc,
                write_policy: config.l1.write_policy,
                policy: config.policy,
                address_width: config.address_width,
            },
        )?;

        if let Some(v) = victim {
            levels[v.0].next = l2;
        }
        levels[l1.0].next = l2;
        levels[l1.0].victim = victim;

        debug!(
            l1_sets = levels[l1.0].num_sets(),
            victim_blocks = victim.map_or(0, |v| levels[v.0].assoc()),
            l2_sets = l2.map_or(0, |id| levels[id.0].num_sets()),
            policy = config.policy.name(),
            "cache hierarchy constructed"
        );

        Ok(Self {
            levels,
            l1,
            victim,
            l2,
        })
    }

    /// Replays one trace event against L1.
    pub fn access(&mut self, addr: u64, op: AccessType) {
        self.cache_in(self.l1, addr, op);
    }

    /// Handle of the L1.
    #[inline]
    pub const fn l1_id(&self) -> LevelId {
        self.l1
    }

    /// Handle of the victim cache, if configured.
    #[inline]
    pub const fn victim_id(&self) -> Option<LevelId> {
        self.victim
    }

    /// Handle of the L2, if configured.
    #[inline]
    pub const fn l2_id(&self) -> Option<LevelId> {
        self.l2
    }

    /// Level behind `id`.
    #[inline]
    pub fn level(&self, id: LevelId) -> &CacheLevel {
        &self.levels[id.0]
    }

    /// The L1.
    #[inline]
    pub fn l1(&self) -> &CacheLevel {
        self.level(self.l1)
    }

    /// The victim cache, if configured.
    #[inline]
    pub fn victim(&self) -> Option<&CacheLevel> {
        self.victim.map(|id| self.level(id))
    }

    /// The L2, if configured.
    #[inline]
    pub fn l2(&self) -> Option<&CacheLevel> {
        self.l2.map(|id| self.level(id))
    }

    /// Configured levels in report order: L1, victim, L2.
    pub fn levels(&self) -> impl Iterator<Item = &CacheLevel> + '_ {
        std::iter::once(self.l1()).chain(self.victim()).chain(self.l2())
    }

    /// Accesses that reached main memory.
    ///
    /// With an L2 this is the L2's traffic. Without one it is L1's traffic
    /// plus the dirty blocks the victim cache wrote back.
    pub fn total_memory_traffic(&self) -> u64 {
        if let Some(l2) = self.l2() {
            return l2.memory_traffic();
        }
        let victim_write_backs = self.victim().map_or(0, |v| v.stats.write_backs);
        self.l1().memory_traffic() + victim_write_backs
    }

    /// Average access time of the whole hierarchy in nanoseconds.
    ///
    /// With an L2, an L1 miss costs the L2's average access time instead of
    /// the L1's flat miss penalty.
    pub fn average_access_time(&self) -> f64 {
        let l1 = self.l1();
        match self.l2() {
            Some(l2) => l1.timing().hit_time + l1.stats.miss_rate() * l2.average_access_time(),
            None => l1.average_access_time(),
        }
    }

    /// Services one access at level `id`.
    ///
    /// The victim cache is probed before the level's own sets; a victim hit
    /// swaps the line back in without touching the next level.
    pub(crate) fn cache_in(&mut self, id: LevelId, addr: u64, op: AccessType) {
        let level = &mut self.levels[id.0];
        level.stats.record_access(op);
        let decoded = level.layout().decode(addr);
        let victim = level.victim;
        let hit = level.hit_or_miss(decoded.tag, decoded.set);
        let now = level.tick();
        trace!(level = level.name(), addr, %op, now, hit = hit.is_some(), "access");

        let req = Request {
            addr,
            tag: decoded.tag,
            set: decoded.set,
            op,
            now,
        };

        let victim_hit = victim.and_then(|v| self.probe_victim(v, addr).map(|way| (v, way)));
        if let Some((v, victim_way)) = victim_hit {
            self.swap_in(id, v, victim_way, &req);
            return;
        }

        match hit {
            Some(way) => self.on_hit(id, way, &req),
            None => self.on_miss(id, &req),
        }
    }

    fn on_hit(&mut self, id: LevelId, way: usize, req: &Request) {
        let level = &mut self.levels[id.0];
        let write_through = req.op.is_write() && !level.write_policy().allocates();
        if req.op.is_write() && !write_through {
            level.set_mut(req.set).block_mut(way).dirty = true;
        }
        level.touch(req.set, way, req.now);
        if write_through {
            self.forward(id, req.addr, AccessType::Write);
        }
    }

    fn on_miss(&mut self, id: LevelId, req: &Request) {
        let level = &mut self.levels[id.0];
        level.stats.record_miss(req.op);
        if req.op.is_write() && !level.write_policy().allocates() {
            self.forward(id, req.addr, AccessType::Write);
        } else {
            self.replace(id, req, None);
        }
    }

    /// Brings the requested line into level `id`.
    ///
    /// An invalid slot is filled directly. Otherwise the policy picks a
    /// victim, which goes to the attached victim cache, or is written back
    /// if dirty when there is none. In swap mode (`swap` holds the victim
    /// cache way that hit) nothing is fetched or written back: the evicted
    /// block trades places with the victim cache's copy of the request.
    pub(crate) fn replace(&mut self, id: LevelId, req: &Request, swap: Option<usize>) {
        let level = &self.levels[id.0];
        let dirty_on_fill = req.op.is_write() && level.write_policy().allocates();
        let fetches = !level.is_victim();
        let victim = level.victim;
        let swap = swap.zip(victim);

        if let Some(way) = level.set(req.set).first_invalid() {
            let dirty = match swap {
                Some((victim_way, v)) => self.take_from_victim(v, victim_way) || dirty_on_fill,
                None => {
                    if fetches {
                        self.forward(id, req.addr, AccessType::Read);
                    }
                    dirty_on_fill
                }
            };
            self.levels[id.0].fill(req.set, way, req.tag, dirty, req.now);
            return;
        }

        let way = level.select_victim(req.set, req.now);
        let evicted_dirty = level.block(req.set, way).dirty;
        let evicted_addr = level.block_address(req.set, way);
        trace!(
            level = level.name(),
            evicted = evicted_addr,
            dirty = evicted_dirty,
            way,
            "evict"
        );

        let dirty = match swap {
            Some((victim_way, v)) => {
                self.exchange_with_victim(v, victim_way, evicted_addr, evicted_dirty)
                    || dirty_on_fill
            }
            None => {
                if let Some(v) = victim {
                    self.absorb_eviction(v, evicted_addr, evicted_dirty);
                } else if evicted_dirty {
                    self.write_back(id, evicted_addr);
                }
                if fetches {
                    self.forward(id, req.addr, AccessType::Read);
                }
                dirty_on_fill
            }
        };
        self.levels[id.0].install(req.set, way, req.tag, dirty, req.now);
    }

    fn write_back(&mut self, id: LevelId, addr: u64) {
        self.levels[id.0].stats.write_backs += 1;
        trace!(level = self.levels[id.0].name(), addr, "write-back");
        self.forward(id, addr, AccessType::Write);
    }

    /// Sends a request to the level below `id`; dropped at main memory.
    fn forward(&mut self, id: LevelId, addr: u64, op: AccessType) {
        if let Some(next) = self.levels[id.0].next {
            self.cache_in(next, addr, op);
        }
    }
}

fn push_level(levels: &mut Vec<CacheLevel>, spec: LevelSpec) -> Result<LevelId, ConfigError> {
    levels.push(CacheLevel::new(&spec)?);
    Ok(LevelId(levels.len() - 1))
}
