use crate::agent::AgentState;
use crate::catalog::{BossDef, BossId, Catalog, Material};
use crate::core::constants::UNARMED_DAMAGE;
use rand::Rng;
use std::collections::BTreeMap;

/// True when `boss` refuses to take damage from this agent: the final boss
/// only yields to an agent holding a weapon at `max_level`.
pub fn attack_blocked(agent: &AgentState, boss: &BossDef, max_level: u8) -> bool {
    boss.is_final && !agent.has_weapon_at(max_level)
}

/// Damage one attack by `agent` deals to `boss`.
///
/// Uses the first weapon with level > 0 in catalog order, or bare fists.
/// Fists ignore elements and upgrade bonuses.
pub fn compute_damage(agent: &AgentState, boss: BossId, catalog: &Catalog, max_level: u8) -> f64 {
    let boss = catalog.boss(boss);
    if attack_blocked(agent, boss, max_level) {
        return 0.0;
    }

    match agent.held_weapon() {
        None => UNARMED_DAMAGE,
        Some((weapon_id, level)) => {
            let weapon = catalog.weapon(weapon_id);
            let raw = weapon.base_damage.saturating_add(catalog.upgrade_bonus(level));
            raw as f64 * catalog.matrix.multiplier(weapon.element, boss.element)
        }
    }
}

/// Rolls every loot entry of `boss` independently. Repeated materials stack.
pub fn roll_loot<R: Rng>(boss: &BossDef, rng: &mut R) -> BTreeMap<Material, u32> {
    let mut loot = BTreeMap::new();
    for entry in &boss.loot {
        if rng.gen::<f64>() < entry.probability {
            let held = loot.entry(entry.material).or_insert(0u32);
            *held = held.saturating_add(entry.quantity);
        }
    }
    loot
}

/// Applies the boss's counterattack. Returns the damage taken.
pub fn apply_retaliation(agent: &mut AgentState, boss: &BossDef) -> u32 {
    let damage = boss.retaliation.min(agent.health);
    agent.health -= damage;
    damage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Element, LootEntry, WeaponId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const MAX_LEVEL: u8 = 5;

    fn catalog() -> Catalog {
        Catalog::standard()
    }

    fn boss_id(catalog: &Catalog, name: &str) -> BossId {
        catalog.boss_by_name(name).unwrap()
    }

    fn armed(catalog: &Catalog, weapon: &str, level: u8) -> AgentState {
        let mut agent = AgentState::new(100, catalog.weapons.len());
        agent.set_weapon_level(catalog.weapon_by_name(weapon).unwrap(), level);
        agent
    }

    #[test]
    fn test_unarmed_deals_one() {
        let catalog = catalog();
        let agent = AgentState::new(100, catalog.weapons.len());
        let earth = boss_id(&catalog, "earth_boss");
        assert_eq!(compute_damage(&agent, earth, &catalog, MAX_LEVEL), 1.0);
    }

    #[test]
    fn test_weapon_damage_includes_upgrade_bonus() {
        let catalog = catalog();
        let agent = armed(&catalog, "wind_sword", 3);
        let wind = boss_id(&catalog, "wind_boss");
        // (10 + 15) * 1.0
        assert_eq!(compute_damage(&agent, wind, &catalog, MAX_LEVEL), 25.0);
    }

    #[test]
    fn test_element_advantage_and_resistance() {
        let catalog = catalog();
        let agent = armed(&catalog, "fire_sword", 1);
        let earth = boss_id(&catalog, "earth_boss");
        let water = boss_id(&catalog, "water_boss");
        assert_eq!(compute_damage(&agent, earth, &catalog, MAX_LEVEL), 22.5);
        assert_eq!(compute_damage(&agent, water, &catalog, MAX_LEVEL), 7.5);
    }

    #[test]
    fn test_first_weapon_in_catalog_order_is_used() {
        let catalog = catalog();
        let mut agent = armed(&catalog, "earth_sword", 1);
        agent.set_weapon_level(WeaponId(4), 5);
        let fire = boss_id(&catalog, "fire_boss");
        // earth_sword comes before light_sword: (10 + 5) * 0.5
        assert_eq!(compute_damage(&agent, fire, &catalog, MAX_LEVEL), 7.5);
    }

    #[test]
    fn test_final_boss_requires_max_level_weapon() {
        let catalog = catalog();
        let final_boss = catalog.final_boss().unwrap();

        let unarmed = AgentState::new(100, catalog.weapons.len());
        assert_eq!(compute_damage(&unarmed, final_boss, &catalog, MAX_LEVEL), 0.0);

        for level in 1..MAX_LEVEL {
            let agent = armed(&catalog, "fire_sword", level);
            assert_eq!(compute_damage(&agent, final_boss, &catalog, MAX_LEVEL), 0.0);
        }

        let maxed = armed(&catalog, "fire_sword", MAX_LEVEL);
        assert_eq!(compute_damage(&maxed, final_boss, &catalog, MAX_LEVEL), 60.0);
    }

    #[test]
    fn test_roll_loot_certain_drops() {
        let catalog = catalog();
        let fire = catalog.boss(boss_id(&catalog, "fire_boss"));
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let loot = roll_loot(fire, &mut rng);
        assert_eq!(loot.get(&Material::Common), Some(&5));
        assert_eq!(loot.get(&Material::Stone(Element::Fire)), Some(&2));
        assert_eq!(loot.len(), 2);
    }

    #[test]
    fn test_roll_loot_stacks_repeated_entries_and_skips_impossible() {
        let mut boss = Catalog::standard().bosses[0].clone();
        boss.loot = vec![
            LootEntry {
                material: Material::Common,
                probability: 1.0,
                quantity: 3,
            },
            LootEntry {
                material: Material::Common,
                probability: 1.0,
                quantity: 4,
            },
            LootEntry {
                material: Material::Stone(Element::Light),
                probability: 0.0,
                quantity: 9,
            },
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let loot = roll_loot(&boss, &mut rng);
        assert_eq!(loot.get(&Material::Common), Some(&7));
        assert!(!loot.contains_key(&Material::Stone(Element::Light)));
    }

    #[test]
    fn test_huge_values_saturate() {
        let mut catalog = catalog();
        catalog.weapons[0].base_damage = u32::MAX;
        assert!(catalog.validate(MAX_LEVEL).is_ok());
        let agent = armed(&catalog, "fire_sword", 1);
        let wind = boss_id(&catalog, "wind_boss");
        assert_eq!(
            compute_damage(&agent, wind, &catalog, MAX_LEVEL),
            u32::MAX as f64
        );

        let mut boss = catalog.bosses[0].clone();
        boss.loot = vec![
            LootEntry {
                material: Material::Common,
                probability: 1.0,
                quantity: u32::MAX,
            },
            LootEntry {
                material: Material::Common,
                probability: 1.0,
                quantity: 1,
            },
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(roll_loot(&boss, &mut rng).get(&Material::Common), Some(&u32::MAX));
    }

    #[test]
    fn test_roll_loot_is_reproducible() {
        let mut boss = Catalog::standard().bosses[0].clone();
        for entry in &mut boss.loot {
            entry.probability = 0.5;
        }
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(roll_loot(&boss, &mut a), roll_loot(&boss, &mut b));
        }
    }

    #[test]
    fn test_retaliation_never_underflows() {
        let catalog = catalog();
        let final_boss = catalog.boss(catalog.final_boss().unwrap());
        let mut agent = AgentState::new(100, catalog.weapons.len());
        agent.health = 4;
        assert_eq!(apply_retaliation(&mut agent, final_boss), 4);
        assert_eq!(agent.health, 0);
    }
}
