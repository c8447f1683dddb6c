use crate::catalog::{BossId, Material, WeaponId};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Stable agent identifier. Agents are processed in ascending id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(pub usize);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player_{}", self.0)
    }
}

impl Serialize for AgentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An agent's private copy of a boss fight.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleInstance {
    pub boss: BossId,
    pub current_health: f64,
}

/// World or battle. Battle carries the instance, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    #[default]
    World,
    Battle(BattleInstance),
}

/// Lifetime counters, kept for reporting only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    pub kills: u32,
    pub losses: u32,
    pub upgrades: u32,
    pub final_boss_kills: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    pub health: u32,
    pub inventory: BTreeMap<Material, u32>,
    /// Level per weapon, indexed by `WeaponId`.
    pub weapons: Vec<u8>,
    pub mode: Mode,
    pub stats: AgentStats,
}

impl AgentState {
    /// Full health, empty pockets, every weapon at level 0, in the world.
    pub fn new(health: u32, weapon_count: usize) -> Self {
        Self {
            health,
            inventory: Material::ALL.iter().map(|&m| (m, 0)).collect(),
            weapons: vec![0; weapon_count],
            mode: Mode::World,
            stats: AgentStats::default(),
        }
    }

    pub fn in_battle(&self) -> bool {
        matches!(self.mode, Mode::Battle(_))
    }

    pub fn battle(&self) -> Option<&BattleInstance> {
        match &self.mode {
            Mode::Battle(instance) => Some(instance),
            Mode::World => None,
        }
    }

    pub fn battle_mut(&mut self) -> Option<&mut BattleInstance> {
        match &mut self.mode {
            Mode::Battle(instance) => Some(instance),
            Mode::World => None,
        }
    }

    /// Drops any active battle and returns to the world.
    pub fn leave_battle(&mut self) -> Option<BattleInstance> {
        match std::mem::take(&mut self.mode) {
            Mode::Battle(instance) => Some(instance),
            Mode::World => None,
        }
    }

    pub fn weapon_level(&self, weapon: WeaponId) -> u8 {
        self.weapons.get(weapon.0).copied().unwrap_or(0)
    }

    pub fn set_weapon_level(&mut self, weapon: WeaponId, level: u8) {
        if let Some(l) = self.weapons.get_mut(weapon.0) {
            *l = level;
        }
    }

    /// First weapon with level > 0 in catalog order.
    pub fn held_weapon(&self) -> Option<(WeaponId, u8)> {
        self.weapons
            .iter()
            .enumerate()
            .find(|&(_, &level)| level > 0)
            .map(|(idx, &level)| (WeaponId(idx), level))
    }

    pub fn has_weapon_at(&self, level: u8) -> bool {
        self.weapons.iter().any(|&l| l >= level)
    }

    pub fn count(&self, material: Material) -> u32 {
        self.inventory.get(&material).copied().unwrap_or(0)
    }

    pub fn add_material(&mut self, material: Material, amount: u32) {
        let held = self.inventory.entry(material).or_insert(0);
        *held = held.saturating_add(amount);
    }

    pub fn add_loot(&mut self, loot: &BTreeMap<Material, u32>) {
        for (&material, &amount) in loot {
            self.add_material(material, amount);
        }
    }

    /// Panics if the state is malformed. A violation here is a bug in the engine.
    pub fn check_invariants(&self, max_health: u32, max_level: u8) {
        assert!(
            self.health > 0 && self.health <= max_health,
            "agent health {} outside 1..={}",
            self.health,
            max_health
        );
        assert!(
            self.weapons.iter().all(|&l| l <= max_level),
            "weapon level above {}: {:?}",
            max_level,
            self.weapons
        );
        if let Mode::Battle(instance) = &self.mode {
            assert!(
                instance.current_health > 0.0,
                "battle left open against a dead boss"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Element;

    #[test]
    fn test_new_agent_defaults() {
        let agent = AgentState::new(100, 5);
        assert_eq!(agent.health, 100);
        assert_eq!(agent.weapons, vec![0; 5]);
        assert_eq!(agent.inventory.len(), Material::ALL.len());
        assert!(agent.inventory.values().all(|&n| n == 0));
        assert!(!agent.in_battle());
        assert!(agent.held_weapon().is_none());
    }

    #[test]
    fn test_held_weapon_is_first_in_catalog_order() {
        let mut agent = AgentState::new(100, 5);
        agent.set_weapon_level(WeaponId(3), 2);
        agent.set_weapon_level(WeaponId(1), 4);
        assert_eq!(agent.held_weapon(), Some((WeaponId(1), 4)));
    }

    #[test]
    fn test_leave_battle_returns_instance() {
        let mut agent = AgentState::new(100, 5);
        agent.mode = Mode::Battle(BattleInstance {
            boss: BossId(2),
            current_health: 7.0,
        });
        assert!(agent.in_battle());
        let instance = agent.leave_battle();
        assert_eq!(instance.map(|i| i.boss), Some(BossId(2)));
        assert!(!agent.in_battle());
        assert!(agent.leave_battle().is_none());
    }

    #[test]
    fn test_add_loot_stacks() {
        let mut agent = AgentState::new(100, 5);
        let loot = BTreeMap::from([
            (Material::Common, 5),
            (Material::Stone(Element::Fire), 2),
        ]);
        agent.add_loot(&loot);
        agent.add_loot(&loot);
        assert_eq!(agent.count(Material::Common), 10);
        assert_eq!(agent.count(Material::Stone(Element::Fire)), 4);
        assert_eq!(agent.count(Material::Stone(Element::Water)), 0);
    }

    #[test]
    #[should_panic]
    fn test_invariant_check_rejects_zero_health() {
        let mut agent = AgentState::new(100, 5);
        agent.health = 0;
        agent.check_invariants(100, 5);
    }

    #[test]
    fn test_agent_id_display() {
        assert_eq!(AgentId(3).to_string(), "player_3");
    }
}
