//! # Statistics and Report Tests
//!
//! Counter arithmetic, contents snapshots, and the text and JSON renderings
//! of a finished run.

use cachesim_core::Hierarchy;
use cachesim_core::common::AccessType;
use cachesim_core::config::{Config, ReplacementPolicy, WritePolicy};
use cachesim_core::stats::{LevelStats, Report, ResidentBlock};
use pretty_assertions::assert_eq;

use crate::common::{ConfigBuilder, read_all, replay};

/// Value printed after `label` on its report line.
fn value_of<'a>(text: &'a str, label: &str) -> &'a str {
    text.lines()
        .find_map(|line| line.strip_prefix(label))
        .map(str::trim)
        .unwrap_or_else(|| panic!("no line labelled {label:?} in:\n{text}"))
}

fn run(config: &Config, trace: &[(char, u64)]) -> Report {
    let mut h = Hierarchy::new(config).unwrap();
    replay(&mut h, trace);
    Report::new(&h, config, "trace.txt", 0)
}

// ══════════════════════════════════════════════════════════
// 1. Counters
// ══════════════════════════════════════════════════════════

#[test]
fn test_record_splits_by_direction() {
    let mut stats = LevelStats::default();
    stats.record_access(AccessType::Read);
    stats.record_access(AccessType::Read);
    stats.record_access(AccessType::Write);
    stats.record_miss(AccessType::Write);
    assert_eq!(stats.reads, 2);
    assert_eq!(stats.writes, 1);
    assert_eq!(stats.accesses(), 3);
    assert_eq!(stats.misses(), 1);
    assert!((stats.miss_rate() - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_idle_miss_rate_is_zero() {
    assert_eq!(LevelStats::default().miss_rate(), 0.0);
}

#[test]
fn test_memory_traffic_by_write_policy() {
    let stats = LevelStats {
        reads: 10,
        read_misses: 3,
        writes: 6,
        write_misses: 2,
        write_backs: 4,
        swaps: 1,
    };
    assert_eq!(stats.memory_traffic(WritePolicy::WriteBackAllocate), 9);
    assert_eq!(stats.memory_traffic(WritePolicy::WriteThroughNoAllocate), 9);

    let stats = LevelStats {
        writes: 20,
        ..stats
    };
    assert_eq!(stats.memory_traffic(WritePolicy::WriteThroughNoAllocate), 23);
}

// ══════════════════════════════════════════════════════════
// 2. Snapshots
// ══════════════════════════════════════════════════════════

#[test]
fn test_contents_list_most_recent_first() {
    let mut h = ConfigBuilder::l1(16, 64, 4).hierarchy();
    read_all(&mut h, &[0x00, 0x10, 0x20, 0x00]);
    let config = ConfigBuilder::l1(16, 64, 4).build();
    let report = Report::new(&h, &config, "t", 0);
    let tags: Vec<Option<u64>> = report.levels[0].contents[0]
        .iter()
        .map(|slot| slot.map(|b| b.tag))
        .collect();
    assert_eq!(tags, vec![Some(0), Some(2), Some(1), None]);
}

#[test]
fn test_level_report_metrics() {
    let config = ConfigBuilder::l1(16, 32, 1).build();
    let report = run(&config, &[('r', 0x00), ('w', 0x10)]);
    let l1 = report.level("L1").unwrap();
    assert_eq!(
        l1.contents,
        vec![
            vec![Some(ResidentBlock {
                tag: 0,
                dirty: false
            })],
            vec![Some(ResidentBlock {
                tag: 0,
                dirty: true
            })],
        ]
    );
    assert_eq!(l1.memory_traffic, 2);
    assert!((l1.miss_rate - 1.0).abs() < 1e-12);
    assert!((l1.miss_penalty - 20.5).abs() < 1e-12);
    assert!(report.level("L2").is_none());
    assert_eq!(report.summary.total_memory_traffic, 2);
}

#[test]
fn test_summary_collects_victim_counters() {
    let config = ConfigBuilder::l1(16, 32, 1).victim(32).l2(256, 2).build();
    let report = run(
        &config,
        &[('w', 0x00), ('r', 0x20), ('r', 0x00), ('r', 0x40), ('r', 0x60), ('r', 0x20)],
    );
    assert_eq!(report.summary.swaps, 1);
    assert_eq!(report.summary.victim_write_backs, 1);
    assert_eq!(report.summary.total_memory_traffic, 4);
    let names: Vec<&str> = report.levels.iter().map(|l| l.name).collect();
    assert_eq!(names, vec!["L1", "Victim", "L2"]);
}

// ══════════════════════════════════════════════════════════
// 3. Rendering
// ══════════════════════════════════════════════════════════

#[test]
fn test_text_report_raw_results() {
    let config = ConfigBuilder::l1(16, 32, 1).build();
    let text = run(&config, &[('r', 0x00), ('w', 0x10)]).to_string();

    assert_eq!(value_of(&text, "L1_SIZE:"), "32");
    assert_eq!(value_of(&text, "trace_file:"), "trace.txt");
    assert_eq!(value_of(&text, "Replacement Policy:"), "LRU");
    assert!(!text.contains("lambda:"));

    assert_eq!(value_of(&text, "a. number of L1 reads:"), "1");
    assert_eq!(value_of(&text, "b. number of L1 read misses:"), "1");
    assert_eq!(value_of(&text, "c. number of L1 writes:"), "1");
    assert_eq!(value_of(&text, "d. number of L1 write misses:"), "1");
    assert_eq!(value_of(&text, "e. L1 miss rate:"), "1.0000");
    assert_eq!(value_of(&text, "f. number of swaps:"), "0");
    assert_eq!(value_of(&text, "g. number of victim cache writeback:"), "0");
    assert_eq!(value_of(&text, "h. number of L2 reads:"), "0");
    assert_eq!(value_of(&text, "l. L2 miss rate:"), "0");
    assert_eq!(value_of(&text, "n. total memory traffic:"), "2");
    assert_eq!(value_of(&text, "1. average access time:"), "20.8002 ns");
}

#[test]
fn test_text_report_contents_rows() {
    let config = ConfigBuilder::l1(16, 64, 2).build();
    let text = run(&config, &[('r', 0x140), ('w', 0x3E0)]).to_string();
    let rows: Vec<&str> = text
        .lines()
        .filter(|l| l.starts_with("set "))
        .map(str::trim_end)
        .collect();
    assert_eq!(
        rows,
        vec!["set     0:    1F     D   A", "set     1:     -     -"]
    );
    assert!(text.contains("===== L1 contents ====="));
    assert!(!text.contains("Victim Cache contents"));
}

#[test]
fn test_text_report_lists_every_level() {
    let config = ConfigBuilder::l1(16, 32, 1)
        .victim(32)
        .l2(256, 2)
        .policy(ReplacementPolicy::Lrfu { lambda: 0.5 })
        .build();
    let text = run(&config, &[('r', 0x00), ('r', 0x20)]).to_string();
    assert!(text.contains("===== Victim Cache contents ====="));
    assert!(text.contains("===== L2 contents ====="));
    assert_eq!(value_of(&text, "Replacement Policy:"), "LRFU");
    assert_eq!(value_of(&text, "lambda:"), "0.5");
    assert_eq!(value_of(&text, "h. number of L2 reads:"), "2");
    assert_eq!(value_of(&text, "l. L2 miss rate:"), "1.0000");
}

#[test]
fn test_json_report_shape() {
    let config = ConfigBuilder::l1(16, 32, 1).build();
    let report = run(&config, &[('r', 0x00), ('w', 0x10)]);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["trace_file"], "trace.txt");
    assert_eq!(json["config"]["policy"], "LRU");
    assert_eq!(json["config"]["l1"]["write_policy"], "WBWA");
    assert_eq!(json["levels"][0]["name"], "L1");
    assert_eq!(json["levels"][0]["stats"]["write_misses"], 1);
    assert_eq!(json["levels"][0]["contents"][1][0]["dirty"], true);
    assert_eq!(json["summary"]["total_memory_traffic"], 2);
}
