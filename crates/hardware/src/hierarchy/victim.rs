//! Victim-cache exchange protocol.
//!
//! A victim cache is a single fully-associative set that only ever receives
//! blocks evicted from its owning level. It is probed at block granularity on
//! every access to the owner. On a hit the line moves back into the owner and
//! the block the owner evicts to make room takes over the victim slot, so
//! nothing is fetched from or written to the next level. The victim cache
//! writes back dirty blocks it evicts itself; the owner never does.

use tracing::trace;

use super::{Hierarchy, LevelId, Request};
use crate::common::data::AccessType;

impl Hierarchy {
    /// Way of victim cache `v` holding the line containing `addr`.
    pub(super) fn probe_victim(&self, v: LevelId, addr: u64) -> Option<usize> {
        self.levels[v.0].lookup(addr).map(|(_, way)| way)
    }

    /// Services a victim-cache hit for `req` at level `id`.
    ///
    /// A write-through owner still sends the write below once the line is back.
    pub(super) fn swap_in(&mut self, id: LevelId, v: LevelId, victim_way: usize, req: &Request) {
        let owner = &mut self.levels[id.0];
        owner.stats.swaps += 1;
        let write_through = req.op.is_write() && !owner.write_policy().allocates();
        let victim = &mut self.levels[v.0];
        let now = victim.clock();
        victim.touch(0, victim_way, now);
        trace!(addr = req.addr, victim_way, "victim swap");
        self.replace(id, req, Some(victim_way));
        if write_through {
            self.forward(id, req.addr, AccessType::Write);
        }
    }

    /// Places the victim slot's line into the owner's evicted block and the
    /// evicted block into the victim slot.
    ///
    /// Returns the dirty bit of the line moving into the owner.
    pub(super) fn exchange_with_victim(
        &mut self,
        v: LevelId,
        victim_way: usize,
        evicted_addr: u64,
        evicted_dirty: bool,
    ) -> bool {
        let victim = &mut self.levels[v.0];
        let tag = victim.layout().tag(evicted_addr);
        let block = victim.set_mut(0).block_mut(victim_way);
        let incoming_dirty = block.dirty;
        block.tag = tag;
        block.dirty = evicted_dirty;
        incoming_dirty
    }

    /// Moves the victim slot's line out of the victim cache into a vacant
    /// owner slot, leaving the victim slot invalid.
    ///
    /// Returns the dirty bit of the moved line.
    pub(super) fn take_from_victim(&mut self, v: LevelId, victim_way: usize) -> bool {
        let block = self.levels[v.0].set_mut(0).block_mut(victim_way);
        let dirty = block.dirty;
        block.valid = false;
        block.dirty = false;
        dirty
    }

    /// Inserts a block evicted from the owner into victim cache `v`.
    ///
    /// The block travels as a write when dirty so the victim copy stays
    /// dirty; the victim's own eviction, if any, is written back from there.
    pub(super) fn absorb_eviction(&mut self, v: LevelId, addr: u64, dirty: bool) {
        let victim = &self.levels[v.0];
        let decoded = victim.layout().decode(addr);
        let req = Request {
            addr,
            tag: decoded.tag,
            set: decoded.set,
            op: AccessType::carrying(dirty),
            now: victim.clock(),
        };
        self.replace(v, &req, None);
    }
}
