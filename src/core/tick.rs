//! Per-tick results: events, observations and the batched step output.

use crate::agent::{AgentId, AgentState};
use crate::catalog::{BossId, Material, WeaponId};
use crate::crafting::UpgradeOutcome;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single thing that happened to one agent during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// Idle in the world.
    Idled,

    /// Idle while in battle. No combat happens.
    Hesitated { boss: BossId },

    BattleStarted { boss: BossId, boss_health: f64 },

    Attacked {
        boss: BossId,
        damage: f64,
        boss_health: f64,
    },

    /// The final boss ignores agents without a max-level weapon.
    AttackBlocked { boss: BossId },

    BossDefeated {
        boss: BossId,
        loot: BTreeMap<Material, u32>,
    },

    FinalBossDefeated { boss: BossId },

    Retaliated {
        boss: BossId,
        damage: u32,
        health: u32,
    },

    /// Knocked out in battle and respawned at full health.
    AgentDefeated { boss: BossId },

    Upgrade {
        weapon: WeaponId,
        outcome: UpgradeOutcome,
    },

    /// The step budget ran out.
    Truncated,
}

/// Auxiliary per-agent data returned from `step`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    pub events: Vec<TickEvent>,
}

/// What an agent (or its policy) gets to see.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub health: u32,
    pub in_battle: bool,
    pub inventory: BTreeMap<Material, u32>,
    /// Level per weapon in catalog order.
    pub weapon_levels: Vec<u8>,
    pub battle_boss: Option<BossId>,
    /// Remaining health of the active battle's boss, 0 outside battle.
    pub battle_boss_health: f64,
}

impl Observation {
    pub fn of(agent: &AgentState) -> Self {
        let battle = agent.battle();
        Self {
            health: agent.health,
            in_battle: battle.is_some(),
            inventory: agent.inventory.clone(),
            weapon_levels: agent.weapons.clone(),
            battle_boss: battle.map(|b| b.boss),
            battle_boss_health: battle.map(|b| b.current_health).unwrap_or(0.0),
        }
    }
}

/// The batch returned by one call to `step`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutput {
    pub observations: BTreeMap<AgentId, Observation>,
    pub rewards: BTreeMap<AgentId, f64>,
    pub terminations: BTreeMap<AgentId, bool>,
    pub truncations: BTreeMap<AgentId, bool>,
    pub infos: BTreeMap<AgentId, StepInfo>,
}

impl StepOutput {
    pub fn reward(&self, agent: AgentId) -> f64 {
        self.rewards.get(&agent).copied().unwrap_or(0.0)
    }

    pub fn terminated(&self, agent: AgentId) -> bool {
        self.terminations.get(&agent).copied().unwrap_or(false)
    }

    pub fn truncated(&self, agent: AgentId) -> bool {
        self.truncations.get(&agent).copied().unwrap_or(false)
    }

    pub fn events(&self, agent: AgentId) -> &[TickEvent] {
        self.infos
            .get(&agent)
            .map(|info| info.events.as_slice())
            .unwrap_or(&[])
    }
}
