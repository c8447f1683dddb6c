//! Stock boss, weapon and upgrade data.

use super::types::*;
use std::collections::BTreeMap;

pub const FINAL_BOSS_NAME: &str = "final_boss";

const ELEMENTAL_BOSS_HEALTH: u32 = 10;
const FINAL_BOSS_HEALTH: u32 = 100;
const FINAL_BOSS_RETALIATION: u32 = 10;
const SWORD_BASE_DAMAGE: u32 = 10;

// Flat bonus per weapon level, level 0 first
const UPGRADE_DAMAGE: [u32; 6] = [0, 5, 10, 15, 30, 50];

// Attribute stones needed for levels 2..=5 (level 1 costs common stone)
const ATTRIBUTE_STONE_LADDER: [u32; 4] = [5, 10, 20, 50];

const LEVEL_ONE_COMMON_STONES: u32 = 10;

fn elemental_boss(element: Element) -> BossDef {
    BossDef {
        name: format!("{}_boss", element),
        max_health: ELEMENTAL_BOSS_HEALTH,
        element,
        retaliation: 0,
        is_final: false,
        loot: vec![
            LootEntry {
                material: Material::Common,
                probability: 1.0,
                quantity: 5,
            },
            LootEntry {
                material: Material::Stone(element),
                probability: 1.0,
                quantity: 2,
            },
        ],
    }
}

fn final_boss() -> BossDef {
    BossDef {
        name: FINAL_BOSS_NAME.to_string(),
        max_health: FINAL_BOSS_HEALTH,
        element: Element::None,
        retaliation: FINAL_BOSS_RETALIATION,
        is_final: true,
        loot: vec![LootEntry {
            material: Material::Common,
            probability: 1.0,
            quantity: 50,
        }],
    }
}

fn sword(element: Element) -> WeaponDef {
    WeaponDef {
        name: format!("{}_sword", element),
        base_damage: SWORD_BASE_DAMAGE,
        element,
    }
}

/// Fire beats earth, water beats fire, earth beats water; wind and light are neutral.
pub fn standard_matrix() -> ElementMatrix {
    ElementMatrix::neutral()
        .with(Element::Fire, Element::Water, 0.5)
        .with(Element::Fire, Element::Earth, 1.5)
        .with(Element::Water, Element::Fire, 1.5)
        .with(Element::Water, Element::Earth, 0.5)
        .with(Element::Earth, Element::Fire, 0.5)
        .with(Element::Earth, Element::Water, 1.5)
}

fn standard_upgrade_costs() -> Vec<UpgradeCost> {
    let mut costs = vec![BTreeMap::from([(
        CostItem::Material(Material::Common),
        LEVEL_ONE_COMMON_STONES,
    )])];
    costs.extend(
        ATTRIBUTE_STONE_LADDER
            .iter()
            .map(|&amount| BTreeMap::from([(CostItem::AttributeStone, amount)])),
    );
    costs
}

impl Catalog {
    /// Five elemental bosses and swords plus the final boss.
    pub fn standard() -> Self {
        let mut bosses: Vec<BossDef> = Element::ATTRIBUTES
            .iter()
            .map(|&e| elemental_boss(e))
            .collect();
        bosses.push(final_boss());

        Self {
            bosses,
            weapons: Element::ATTRIBUTES.iter().map(|&e| sword(e)).collect(),
            matrix: standard_matrix(),
            upgrade_costs: standard_upgrade_costs(),
            upgrade_damage: UPGRADE_DAMAGE.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = Catalog::standard();
        assert!(catalog.validate(5).is_ok());
        assert_eq!(catalog.bosses.len(), 6);
        assert_eq!(catalog.weapons.len(), 5);
        assert_eq!(catalog.action_count(), 12);
    }

    #[test]
    fn test_boss_order_matches_elements() {
        let catalog = Catalog::standard();
        let names: Vec<&str> = catalog.bosses.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "fire_boss",
                "water_boss",
                "earth_boss",
                "wind_boss",
                "light_boss",
                "final_boss"
            ]
        );
        assert_eq!(catalog.final_boss(), Some(BossId(5)));
    }

    #[test]
    fn test_fire_boss_loot() {
        let catalog = Catalog::standard();
        let fire = catalog.boss(BossId(0));
        assert_eq!(fire.loot.len(), 2);
        assert_eq!(fire.loot[0].material, Material::Common);
        assert_eq!(fire.loot[0].quantity, 5);
        assert_eq!(fire.loot[1].material, Material::Stone(Element::Fire));
        assert_eq!(fire.loot[1].quantity, 2);
    }

    #[test]
    fn test_matrix_counters() {
        let m = standard_matrix();
        assert_eq!(m.multiplier(Element::Fire, Element::Earth), 1.5);
        assert_eq!(m.multiplier(Element::Fire, Element::Water), 0.5);
        assert_eq!(m.multiplier(Element::Wind, Element::Fire), 1.0);
        for e in Element::ALL {
            assert_eq!(m.multiplier(e, Element::None), 1.0);
            assert_eq!(m.multiplier(Element::None, e), 1.0);
        }
    }

    #[test]
    fn test_upgrade_ladder() {
        let catalog = Catalog::standard();
        assert!(catalog.upgrade_cost(0).is_none());
        assert_eq!(
            catalog.upgrade_cost(1).and_then(|c| c.get(&CostItem::Material(Material::Common))),
            Some(&10)
        );
        assert_eq!(
            catalog.upgrade_cost(5).and_then(|c| c.get(&CostItem::AttributeStone)),
            Some(&50)
        );
        assert!(catalog.upgrade_cost(6).is_none());
        assert_eq!(catalog.upgrade_bonus(0), 0);
        assert_eq!(catalog.upgrade_bonus(3), 15);
        assert_eq!(catalog.upgrade_bonus(5), 50);
    }
}
