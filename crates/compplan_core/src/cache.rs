//! Advisory memoization of simulation results
//!
//! The key is exactly the input value tuple: the plan type plus the bit
//! pattern of every parameter. A cache never changes an answer; dropping it
//! or clearing it at any time yields the same results, only recomputed.

use rustc_hash::FxHashMap;

use crate::config::EngineConfig;
use crate::domain::PARAMETER_COUNT;
use crate::model::PlanType;
use crate::simulation::{SimulationInput, SimulationResult, simulate_with};

/// Hashable identity of a `SimulationInput`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputKey {
    plan: PlanType,
    bits: [u64; PARAMETER_COUNT],
}

impl From<&SimulationInput> for InputKey {
    fn from(input: &SimulationInput) -> Self {
        let values = input.to_vector();
        let mut bits = [0u64; PARAMETER_COUNT];
        for (slot, value) in bits.iter_mut().zip(values) {
            // Adding zero folds -0.0 into 0.0
            *slot = (value + 0.0).to_bits();
        }
        Self {
            plan: input.plan_type(),
            bits,
        }
    }
}

/// Hit and miss counters for a cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
}

impl CacheMetrics {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    #[must_use]
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups answered from the cache
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.lookups() == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups() as f64
        }
    }
}

/// Memo table bound to one engine configuration
#[derive(Debug, Clone, Default)]
pub struct SimulationCache {
    config: EngineConfig,
    entries: FxHashMap<InputKey, SimulationResult>,
    metrics: CacheMetrics,
}

impl SimulationCache {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            entries: FxHashMap::default(),
            metrics: CacheMetrics::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Return the cached result for `input`, simulating it on first use
    pub fn get_or_simulate(&mut self, input: &SimulationInput) -> &SimulationResult {
        let key = InputKey::from(input);
        if self.entries.contains_key(&key) {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }
        let config = &self.config;
        self.entries
            .entry(key)
            .or_insert_with(|| simulate_with(input, config))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.metrics
    }

    /// Drop every entry; counters are kept
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
