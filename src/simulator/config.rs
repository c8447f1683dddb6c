//! Simulation configuration.

use crate::core::config::EngineConfig;
use crate::core::constants::DEFAULT_SEED;
use crate::policy::PolicyKind;

/// Configuration for a batch of episodes.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of episodes to run
    pub episodes: u32,

    /// Episode `i` is reset with `seed + i`
    pub seed: u64,

    pub engine: EngineConfig,

    /// Policy used for every agent
    pub policy: PolicyKind,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per episode)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            seed: DEFAULT_SEED,
            engine: EngineConfig::default(),
            policy: PolicyKind::Random,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// A handful of greedy episodes; enough to see the final boss fall.
    pub fn greedy_check(episodes: u32) -> Self {
        Self {
            episodes,
            policy: PolicyKind::Greedy,
            ..Default::default()
        }
    }
}
