//! # Replacement Policy Tests
//!
//! Exercises each policy twice: directly against a [`CacheSet`], and through
//! a single-set L1 so the hierarchy's fill and replace paths are covered.

use cachesim_core::cache::block::CacheSet;
use cachesim_core::cache::policies::{
    LfuPolicy, LrfuPolicy, LruPolicy, Policy, ReplacementPolicy as _,
};
use cachesim_core::config::ReplacementPolicy;
use rstest::rstest;

use crate::common::{ConfigBuilder, read_all, tags};

const A: u64 = 0x00;
const B: u64 = 0x10;
const C: u64 = 0x20;
const D: u64 = 0x30;
const E: u64 = 0x40;
const F: u64 = 0x50;

/// Marks `way` valid with `tag` and runs the policy's fill hook.
fn fill(policy: &Policy, set: &mut CacheSet, way: usize, tag: u64, now: u64) {
    let block = set.block_mut(way);
    block.tag = tag;
    block.valid = true;
    policy.on_fill(set, way, now);
}

fn ages(set: &CacheSet) -> Vec<u64> {
    set.blocks().iter().map(|b| b.age).collect()
}

// ══════════════════════════════════════════════════════════
// 1. LRU
// ══════════════════════════════════════════════════════════

#[test]
fn test_lru_fill_ages_existing_blocks() {
    let policy = Policy::Lru(LruPolicy);
    let mut set = CacheSet::new(4);
    for way in 0..4 {
        fill(&policy, &mut set, way, way as u64, 0);
    }
    assert_eq!(ages(&set), vec![3, 2, 1, 0]);
    assert_eq!(policy.select_victim(&set, 0), 0);
}

/// Only blocks younger than the hit block age.
#[test]
fn test_lru_hit_preserves_older_order() {
    let policy = Policy::Lru(LruPolicy);
    let mut set = CacheSet::new(4);
    for way in 0..4 {
        fill(&policy, &mut set, way, way as u64, 0);
    }
    policy.on_hit(&mut set, 2, 0);
    assert_eq!(ages(&set), vec![3, 2, 0, 1]);
    policy.on_hit(&mut set, 0, 0);
    assert_eq!(ages(&set), vec![0, 3, 1, 2]);
    assert_eq!(policy.select_victim(&set, 0), 1);
}

#[test]
fn test_lru_tie_goes_to_lowest_way() {
    let set = CacheSet::new(4);
    assert_eq!(LruPolicy.select_victim(&set, 0), 0);
}

#[test]
fn test_lru_evicts_least_recent_through_cache() {
    let mut h = ConfigBuilder::l1(16, 64, 4).hierarchy();
    read_all(&mut h, &[A, B, C, D, A, B, C, D, E]);
    assert_eq!(tags(h.l1(), 0), vec![Some(4), Some(1), Some(2), Some(3)]);
    assert_eq!(h.l1().stats.reads, 9);
    assert_eq!(h.l1().stats.read_misses, 5);
}

#[test]
fn test_lru_hit_protects_block() {
    let mut h = ConfigBuilder::l1(16, 64, 4).hierarchy();
    read_all(&mut h, &[A, B, C, D, A, E]);
    assert!(h.l1().contains(A));
    assert!(!h.l1().contains(B));
}

// ══════════════════════════════════════════════════════════
// 2. LFU
// ══════════════════════════════════════════════════════════

#[test]
fn test_lfu_fill_starts_at_one() {
    let policy = Policy::Lfu(LfuPolicy);
    let mut set = CacheSet::new(2);
    fill(&policy, &mut set, 0, 7, 0);
    assert_eq!(set.block(0).age, 1);
    assert_eq!(set.counter(), 0);
    policy.on_hit(&mut set, 0, 0);
    assert_eq!(set.block(0).age, 2);
}

/// A replacing block starts one above the count it displaced.
#[test]
fn test_lfu_replace_seeds_from_counter() {
    let mut h = ConfigBuilder::l1(16, 64, 4)
        .policy(ReplacementPolicy::Lfu)
        .hierarchy();
    read_all(&mut h, &[A, B, C, D, E]);
    assert_eq!(tags(h.l1(), 0), vec![Some(4), Some(1), Some(2), Some(3)]);
    assert_eq!(h.l1().set(0).counter(), 1);
    assert_eq!(h.l1().block(0, 0).age, 2);

    read_all(&mut h, &[F]);
    assert_eq!(tags(h.l1(), 0), vec![Some(4), Some(5), Some(2), Some(3)]);
}

#[test]
fn test_lfu_evicts_least_frequent() {
    let mut h = ConfigBuilder::l1(16, 64, 4)
        .policy(ReplacementPolicy::Lfu)
        .hierarchy();
    read_all(&mut h, &[A, B, C, D, A, B, C, E]);
    assert_eq!(tags(h.l1(), 0), vec![Some(0), Some(1), Some(2), Some(4)]);
    assert_eq!(h.l1().block(0, 3).age, 2);
}

#[test]
fn test_lfu_tie_goes_to_lowest_way() {
    let policy = Policy::Lfu(LfuPolicy);
    let mut set = CacheSet::new(3);
    for way in 0..3 {
        fill(&policy, &mut set, way, way as u64, 0);
    }
    assert_eq!(policy.select_victim(&set, 0), 0);
    policy.on_hit(&mut set, 0, 0);
    assert_eq!(policy.select_victim(&set, 0), 1);
}

// ══════════════════════════════════════════════════════════
// 3. LRFU
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(1.0, 0, 1.0)]
#[case(1.0, 1, 0.5)]
#[case(1.0, 3, 0.125)]
#[case(0.5, 2, 0.5)]
#[case(0.0, 100, 1.0)]
#[case(-1.0, 2, 4.0)]
fn test_lrfu_weight(#[case] lambda: f64, #[case] elapsed: u64, #[case] expected: f64) {
    let policy = LrfuPolicy::new(lambda);
    assert!((policy.weight(elapsed) - expected).abs() < 1e-12);
}

#[test]
fn test_lrfu_hit_accumulates_decayed_score() {
    let policy = Policy::Lrfu(LrfuPolicy::new(1.0));
    let mut set = CacheSet::new(1);
    fill(&policy, &mut set, 0, 1, 1);
    policy.on_hit(&mut set, 0, 2);
    assert!((set.block(0).crf - 1.5).abs() < 1e-12);
    assert_eq!(set.block(0).last_ref, 2);
    policy.on_hit(&mut set, 0, 4);
    assert!((set.block(0).crf - 1.375).abs() < 1e-12);
}

/// A small λ weighs frequency: the hot block survives.
#[test]
fn test_lrfu_small_lambda_keeps_frequent_block() {
    let mut h = ConfigBuilder::l1(16, 32, 2)
        .policy(ReplacementPolicy::Lrfu { lambda: 0.01 })
        .hierarchy();
    read_all(&mut h, &[A, A, A, B, C]);
    assert_eq!(tags(h.l1(), 0), vec![Some(0), Some(2)]);
}

/// A large λ weighs recency: the stale hot block goes.
#[test]
fn test_lrfu_large_lambda_evicts_stale_block() {
    let mut h = ConfigBuilder::l1(16, 32, 2)
        .policy(ReplacementPolicy::Lrfu { lambda: 2.0 })
        .hierarchy();
    read_all(&mut h, &[A, A, A, B, C]);
    assert_eq!(tags(h.l1(), 0), vec![Some(2), Some(1)]);
}

/// A negative λ lets old references gain weight, so the block referenced
/// most and earliest is the last to go.
#[test]
fn test_lrfu_negative_lambda_favours_old_references() {
    let mut h = ConfigBuilder::l1(16, 32, 2)
        .policy(ReplacementPolicy::Lrfu { lambda: -1.0 })
        .hierarchy();
    read_all(&mut h, &[A, A, A, B, C]);
    assert_eq!(tags(h.l1(), 0), vec![Some(0), Some(2)]);
    assert!((h.l1().block(0, 0).crf - 7.0).abs() < 1e-12);
}

#[test]
fn test_lrfu_zero_lambda_counts_references() {
    let mut h = ConfigBuilder::l1(16, 32, 2)
        .policy(ReplacementPolicy::Lrfu { lambda: 0.0 })
        .hierarchy();
    read_all(&mut h, &[A, B, B, A, A, C]);
    assert_eq!(tags(h.l1(), 0), vec![Some(0), Some(2)]);
}

#[test]
fn test_lrfu_clock_counts_every_access() {
    let mut h = ConfigBuilder::l1(16, 32, 2)
        .policy(ReplacementPolicy::Lrfu { lambda: 1.0 })
        .hierarchy();
    read_all(&mut h, &[A, B, A]);
    assert_eq!(h.l1().clock(), 3);
    assert_eq!(h.l1().block(0, 0).last_ref, 3);
    assert_eq!(h.l1().block(0, 1).last_ref, 2);
}
