//! # Block and Set Tests

use cachesim_core::cache::block::{Block, BlockState, CacheSet};

fn valid(tag: u64, dirty: bool, recency: u64) -> Block {
    Block {
        tag,
        valid: true,
        dirty,
        recency,
        ..Block::default()
    }
}

#[test]
fn test_block_states() {
    assert_eq!(Block::default().state(), BlockState::Invalid);
    assert_eq!(valid(1, false, 0).state(), BlockState::Clean);
    assert_eq!(valid(1, true, 0).state(), BlockState::Dirty);
}

#[test]
fn test_invalid_block_never_holds_its_stale_tag() {
    let block = Block {
        tag: 9,
        ..Block::default()
    };
    assert!(!block.holds(9));
    assert!(valid(9, false, 0).holds(9));
}

#[test]
fn test_first_invalid_and_occupancy() {
    let mut set = CacheSet::new(3);
    *set.block_mut(0) = valid(4, false, 0);
    *set.block_mut(2) = valid(5, false, 1);
    assert_eq!(set.occupancy(), 2);
    assert_eq!(set.first_invalid(), Some(1));
    assert_eq!(set.find(5), Some(2));
    assert_eq!(set.find(6), None);
}

/// Contents are listed most recently used first.
#[test]
fn test_by_recency_orders_valid_blocks() {
    let mut set = CacheSet::new(4);
    *set.block_mut(0) = valid(10, false, 2);
    *set.block_mut(1) = valid(11, true, 0);
    *set.block_mut(3) = valid(13, false, 1);
    let tags: Vec<u64> = set.by_recency().iter().map(|b| b.tag).collect();
    assert_eq!(tags, vec![11, 13, 10]);
}

#[test]
fn test_counter_starts_at_zero() {
    let mut set = CacheSet::new(2);
    assert_eq!(set.counter(), 0);
    set.set_counter(5);
    assert_eq!(set.counter(), 5);
}
