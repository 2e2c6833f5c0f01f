//! Simulation statistics collection and reporting.
//!
//! This module tracks per-level performance counters and turns a finished
//! hierarchy into a report. It provides:
//! 1. **Counters:** Reads, writes, and their misses; write-backs; victim swaps.
//! 2. **Derived metrics:** Miss rate, memory traffic, and average access time.
//! 3. **Contents dump:** Resident tags per set, most recently used first, with dirty markers.
//! 4. **Rendering:** A plain-text layout via `Display` and a JSON form via `serde`.

use std::fmt;

use serde::Serialize;

use crate::cache::CacheLevel;
use crate::common::data::AccessType;
use crate::config::{Config, ReplacementPolicy, WritePolicy};
use crate::hierarchy::Hierarchy;

/// Raw counters of one cache level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// Read requests received.
    pub reads: u64,
    /// Reads that missed (victim-cache swaps are not misses).
    pub read_misses: u64,
    /// Write requests received.
    pub writes: u64,
    /// Writes that missed.
    pub write_misses: u64,
    /// Dirty blocks written to the next level on eviction.
    pub write_backs: u64,
    /// Lines swapped back in from the attached victim cache.
    pub swaps: u64,
}

impl LevelStats {
    /// Counts a request.
    #[inline]
    pub const fn record_access(&mut self, op: AccessType) {
        match op {
            AccessType::Read => self.reads += 1,
            AccessType::Write => self.writes += 1,
        }
    }

    /// Counts a miss.
    #[inline]
    pub const fn record_miss(&mut self, op: AccessType) {
        match op {
            AccessType::Read => self.read_misses += 1,
            AccessType::Write => self.write_misses += 1,
        }
    }

    /// Total requests received.
    #[inline]
    pub const fn accesses(&self) -> u64 {
        self.reads + self.writes
    }

    /// Total misses.
    #[inline]
    pub const fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    /// `(read_misses + write_misses) / (reads + writes)`; 0 for an idle level.
    pub fn miss_rate(&self) -> f64 {
        let accesses = self.accesses();
        if accesses == 0 {
            0.0
        } else {
            self.misses() as f64 / accesses as f64
        }
    }

    /// Requests this level sent to the next one.
    ///
    /// Write-back levels send misses and write-backs; write-through levels
    /// send read misses and every write.
    pub const fn memory_traffic(&self, policy: WritePolicy) -> u64 {
        match policy {
            WritePolicy::WriteBackAllocate => {
                self.read_misses + self.write_misses + self.write_backs
            }
            WritePolicy::WriteThroughNoAllocate => self.read_misses + self.writes,
        }
    }
}

/// A resident block in a contents dump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ResidentBlock {
    /// Tag of the line.
    pub tag: u64,
    /// Line is modified.
    pub dirty: bool,
}

/// Final state and metrics of one level.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelReport {
    /// Level name.
    pub name: &'static str,
    /// Per set: resident blocks most recently used first, then `None` per invalid slot.
    pub contents: Vec<Vec<Option<ResidentBlock>>>,
    /// Raw counters.
    pub stats: LevelStats,
    /// Miss rate.
    pub miss_rate: f64,
    /// Requests sent to the next level.
    pub memory_traffic: u64,
    /// Hit time in nanoseconds.
    pub hit_time: f64,
    /// Miss penalty in nanoseconds.
    pub miss_penalty: f64,
    /// Average access time in nanoseconds.
    pub average_access_time: f64,
}

impl LevelReport {
    /// Snapshots a level.
    pub fn new(level: &CacheLevel) -> Self {
        let contents = level
            .sets()
            .iter()
            .map(|set| {
                let mut row: Vec<Option<ResidentBlock>> = set
                    .by_recency()
                    .into_iter()
                    .map(|b| {
                        Some(ResidentBlock {
                            tag: b.tag,
                            dirty: b.dirty,
                        })
                    })
                    .collect();
                row.resize(set.ways(), None);
                row
            })
            .collect();
        Self {
            name: level.name(),
            contents,
            stats: level.stats,
            miss_rate: level.stats.miss_rate(),
            memory_traffic: level.memory_traffic(),
            hit_time: level.timing().hit_time,
            miss_penalty: level.timing().miss_penalty,
            average_access_time: level.average_access_time(),
        }
    }
}

/// Hierarchy-wide results.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Summary {
    /// Victim-cache swaps performed by L1.
    pub swaps: u64,
    /// Dirty blocks the victim cache wrote back.
    pub victim_write_backs: u64,
    /// Requests that reached main memory.
    pub total_memory_traffic: u64,
    /// Average access time in nanoseconds.
    pub average_access_time: f64,
    /// Trace lines skipped as malformed.
    pub skipped_lines: u64,
}

/// Complete simulation report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    /// Configuration that was simulated.
    pub config: Config,
    /// Trace that was replayed.
    pub trace_file: String,
    /// Levels in order L1, victim, L2 (absent levels omitted).
    pub levels: Vec<LevelReport>,
    /// Hierarchy-wide results.
    pub summary: Summary,
}

impl Report {
    /// Snapshots a hierarchy after its trace has been replayed.
    pub fn new(hierarchy: &Hierarchy, config: &Config, trace_file: &str, skipped_lines: u64) -> Self {
        Self {
            config: config.clone(),
            trace_file: trace_file.to_owned(),
            levels: hierarchy.levels().map(LevelReport::new).collect(),
            summary: Summary {
                swaps: hierarchy.l1().stats.swaps,
                victim_write_backs: hierarchy.victim().map_or(0, |v| v.stats.write_backs),
                total_memory_traffic: hierarchy.total_memory_traffic(),
                average_access_time: hierarchy.average_access_time(),
                skipped_lines,
            },
        }
    }

    /// Report of the named level, if it was configured.
    pub fn level(&self, name: &str) -> Option<&LevelReport> {
        self.levels.iter().find(|l| l.name == name)
    }

    fn write_config(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.config;
        writeln!(f, "===== Simulator configuration =====")?;
        writeln!(f, "{:<22}{}", "L1_BLOCKSIZE:", c.block_size)?;
        writeln!(f, "{:<22}{}", "L1_SIZE:", c.l1.size)?;
        writeln!(f, "{:<22}{}", "L1_ASSOC:", c.l1.assoc)?;
        writeln!(f, "{:<22}{}", "Victim_Cache_SIZE:", c.victim.size)?;
        writeln!(f, "{:<22}{}", "L2_SIZE:", c.l2.size)?;
        writeln!(f, "{:<22}{}", "L2_ASSOC:", c.l2.assoc)?;
        writeln!(f, "{:<22}{}", "trace_file:", self.trace_file)?;
        writeln!(f, "{:<22}{}", "Replacement Policy:", c.policy.name())?;
        if let ReplacementPolicy::Lrfu { lambda } = c.policy {
            writeln!(f, "{:<22}{lambda}", "lambda:")?;
        }
        writeln!(f, "===================================")
    }

    fn write_contents(level: &LevelReport, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = if level.name == "Victim" { "Victim Cache" } else { level.name };
        writeln!(f, "===== {title} contents =====")?;
        for (i, row) in level.contents.iter().enumerate() {
            write!(f, "set     {i}:   ")?;
            for slot in row {
                match slot {
                    Some(b) => {
                        write!(f, " {:X}   ", b.tag)?;
                        if b.dirty {
                            write!(f, "  D  ")?;
                        }
                    }
                    None => write!(f, "  -   ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_config(f)?;
        writeln!(f)?;
        for level in &self.levels {
            Self::write_contents(level, f)?;
        }

        let l1 = self.level("L1").map(|l| l.stats).unwrap_or_default();
        let l1_miss_rate = self.level("L1").map_or(0.0, |l| l.miss_rate);
        let l2 = self.level("L2");
        let l2_stats = l2.map(|l| l.stats).unwrap_or_default();

        writeln!(f)?;
        writeln!(f, "====== Simulation results (raw) ======")?;
        writeln!(f)?;
        writeln!(f, "{:<40}{}", "a. number of L1 reads:", l1.reads)?;
        writeln!(f, "{:<40}{}", "b. number of L1 read misses:", l1.read_misses)?;
        writeln!(f, "{:<40}{}", "c. number of L1 writes:", l1.writes)?;
        writeln!(f, "{:<40}{}", "d. number of L1 write misses:", l1.write_misses)?;
        writeln!(f, "{:<40}{l1_miss_rate:.4}", "e. L1 miss rate:")?;
        writeln!(f, "{:<40}{}", "f. number of swaps:", self.summary.swaps)?;
        writeln!(
            f,
            "{:<40}{}",
            "g. number of victim cache writeback:", self.summary.victim_write_backs
        )?;
        writeln!(f, "{:<40}{}", "h. number of L2 reads:", l2_stats.reads)?;
        writeln!(f, "{:<40}{}", "i. number of L2 read misses:", l2_stats.read_misses)?;
        writeln!(f, "{:<40}{}", "j. number of L2 writes:", l2_stats.writes)?;
        writeln!(f, "{:<40}{}", "k. number of L2 write misses:", l2_stats.write_misses)?;
        match l2 {
            Some(l) => writeln!(f, "{:<40}{:.4}", "l. L2 miss rate:", l.miss_rate)?,
            None => writeln!(f, "{:<40}0", "l. L2 miss rate:")?,
        }
        writeln!(f, "{:<40}{}", "m. number of L2 writeback:", l2_stats.write_backs)?;
        writeln!(
            f,
            "{:<40}{}",
            "n. total memory traffic:", self.summary.total_memory_traffic
        )?;
        writeln!(f)?;
        writeln!(f, "==== Simulation results (performance) ====")?;
        writeln!(
            f,
            "{:<40}{:.4} ns",
            "1. average access time:", self.summary.average_access_time
        )
    }
}
