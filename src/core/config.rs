//! Engine configuration.

use super::constants::*;
use super::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Reward paid out for each kind of outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Defeating any boss other than the final one
    pub kill: f64,
    /// Defeating the final boss (ends that agent's episode)
    pub final_boss: f64,
    /// A successful weapon upgrade
    pub upgrade: f64,
    /// Being knocked out in battle (agent respawns)
    pub loss: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            kill: KILL_REWARD,
            final_boss: FINAL_BOSS_REWARD,
            upgrade: UPGRADE_REWARD,
            loss: LOSS_REWARD,
        }
    }
}

/// Options recognized at engine construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub num_agents: usize,

    /// Health at reset. Also the cap, and what an agent respawns with.
    pub starting_health: u32,

    pub max_weapon_level: u8,

    /// Steps after which every live agent is truncated.
    pub step_budget: u64,

    /// Seeds the shared random stream on every `reset()`.
    pub seed: u64,

    pub rewards: RewardConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_agents: DEFAULT_NUM_AGENTS,
            starting_health: DEFAULT_MAX_HEALTH,
            max_weapon_level: DEFAULT_MAX_WEAPON_LEVEL,
            step_budget: DEFAULT_STEP_BUDGET,
            seed: DEFAULT_SEED,
            rewards: RewardConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.num_agents == 0 {
            return Err(EngineError::InvalidConfig("num_agents must be at least 1".into()));
        }
        if self.starting_health == 0 {
            return Err(EngineError::InvalidConfig(
                "starting_health must be positive".into(),
            ));
        }
        if self.max_weapon_level == 0 {
            return Err(EngineError::InvalidConfig(
                "max_weapon_level must be at least 1".into(),
            ));
        }
        if self.step_budget == 0 {
            return Err(EngineError::InvalidConfig("step_budget must be positive".into()));
        }
        Ok(())
    }
}
