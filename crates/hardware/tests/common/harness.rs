use cachesim_core::Hierarchy;
use cachesim_core::cache::CacheLevel;
use cachesim_core::common::AccessType;
use cachesim_core::config::{Config, LevelConfig, ReplacementPolicy, VictimConfig, WritePolicy};

/// Installs a test-writer tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("cachesim_core=trace")
        .try_init();
}

/// Fluent builder over [`Config`] for tests.
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// L1 only, write-back, LRU, 32-bit addresses.
    pub fn l1(block_size: usize, size: usize, assoc: usize) -> Self {
        Self {
            config: Config {
                block_size,
                l1: LevelConfig::new(size, assoc),
                victim: VictimConfig::default(),
                l2: LevelConfig::new(0, 1),
                policy: ReplacementPolicy::Lru,
                address_width: 32,
            },
        }
    }

    pub fn victim(mut self, size: usize) -> Self {
        self.config.victim.size = size;
        self
    }

    pub fn l2(mut self, size: usize, assoc: usize) -> Self {
        self.config.l2 = LevelConfig::new(size, assoc);
        self
    }

    pub fn policy(mut self, policy: ReplacementPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn l1_write_policy(mut self, policy: WritePolicy) -> Self {
        self.config.l1.write_policy = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }

    pub fn hierarchy(self) -> Hierarchy {
        init_tracing();
        Hierarchy::new(&self.config).expect("test configuration must be valid")
    }
}

/// Replays `(op, addr)` pairs where `op` is `'r'` or `'w'`.
pub fn replay(h: &mut Hierarchy, trace: &[(char, u64)]) {
    for &(op, addr) in trace {
        let op = match op {
            'r' => AccessType::Read,
            'w' => AccessType::Write,
            other => panic!("bad op {other}"),
        };
        h.access(addr, op);
    }
}

/// Replays reads of every address in order.
pub fn read_all(h: &mut Hierarchy, addrs: &[u64]) {
    for &addr in addrs {
        h.access(addr, AccessType::Read);
    }
}

/// Tags of `set` in way order; `None` for invalid slots.
pub fn tags(level: &CacheLevel, set: usize) -> Vec<Option<u64>> {
    level
        .set(set)
        .blocks()
        .iter()
        .map(|b| b.valid.then_some(b.tag))
        .collect()
}

/// Dirty bits of `set` in way order (invalid slots report `false`).
pub fn dirty_bits(level: &CacheLevel, set: usize) -> Vec<bool> {
    level
        .set(set)
        .blocks()
        .iter()
        .map(|b| b.valid && b.dirty)
        .collect()
}
