use dcpt_core::AccessStat;
use dcpt_core::config::{Config, PredictorMode};
use dcpt_core::prefetch::AdaptivePredictor;
use tracing_subscriber::EnvFilter;

use crate::common::mocks::host::FakeHost;

/// Routes `tracing` output to the test writer, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Default configuration with the selection mode and window overridden.
pub fn config(mode: PredictorMode, window: u64) -> Config {
    let mut config = Config::default();
    config.adaptive.mode = mode;
    config.adaptive.window = window;
    config
}

/// Builds a miss for every address in `addresses`, all from `pc`.
pub fn misses(pc: u64, addresses: &[u64]) -> Vec<AccessStat> {
    addresses.iter().map(|&a| AccessStat::miss(pc, a)).collect()
}

/// Predictor and host wired together for trace replay.
pub struct TestContext {
    pub predictor: AdaptivePredictor,
    pub host: FakeHost,
}

impl TestContext {
    pub fn new(config: &Config) -> Self {
        init_tracing();
        Self {
            predictor: AdaptivePredictor::new(config).expect("valid test config"),
            host: FakeHost::new(config.host.block_size),
        }
    }

    /// Feeds one access and returns what was issued for it.
    pub fn access(&mut self, stat: AccessStat) -> Vec<u64> {
        self.predictor.on_access(&stat, &mut self.host)
    }

    /// Feeds every access in order and returns everything issued.
    pub fn replay(&mut self, trace: &[AccessStat]) -> Vec<u64> {
        trace.iter().flat_map(|&s| self.access(s)).collect()
    }

    /// Completes every outstanding prefetch and reports each completion.
    pub fn complete_all(&mut self) -> usize {
        let done = self.host.complete_all();
        for &addr in &done {
            self.predictor.on_prefetch_completed(addr);
        }
        done.len()
    }
}
