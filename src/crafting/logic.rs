use super::types::*;
use crate::agent::AgentState;
use crate::catalog::{Catalog, WeaponId};

/// Recipe for raising `weapon` to `level`, with `attribute_stone` resolved
/// to the weapon's own stone.
pub fn resolved_cost(catalog: &Catalog, weapon: WeaponId, level: u8) -> Option<ResolvedCost> {
    let element = catalog.weapon(weapon).element;
    let recipe = catalog.upgrade_cost(level)?;
    let mut cost = ResolvedCost::new();
    for (&item, &amount) in recipe {
        let total = cost.entry(item.resolve(element)).or_insert(0u32);
        *total = total.saturating_add(amount);
    }
    Some(cost)
}

/// First shortfall against `cost`, if any.
pub fn shortfall(agent: &AgentState, cost: &ResolvedCost) -> Option<UpgradeOutcome> {
    cost.iter().find_map(|(&material, &required)| {
        let held = agent.count(material);
        (held < required).then_some(UpgradeOutcome::Unaffordable {
            material,
            required,
            held,
        })
    })
}

/// True when the next level of `weapon` is both below the cap and affordable.
pub fn can_upgrade(agent: &AgentState, weapon: WeaponId, catalog: &Catalog, max_level: u8) -> bool {
    let level = agent.weapon_level(weapon);
    if level >= max_level {
        return false;
    }
    resolved_cost(catalog, weapon, level + 1)
        .map(|cost| shortfall(agent, &cost).is_none())
        .unwrap_or(false)
}

/// Attempt to raise `weapon` by exactly one level.
///
/// Checks every material before touching the inventory, so the attempt
/// either consumes the whole recipe and levels up, or changes nothing.
pub fn try_upgrade(
    agent: &mut AgentState,
    weapon: WeaponId,
    catalog: &Catalog,
    max_level: u8,
) -> UpgradeOutcome {
    let current_level = agent.weapon_level(weapon);
    if current_level >= max_level {
        return UpgradeOutcome::AtMaxLevel;
    }

    let target_level = current_level + 1;
    let Some(cost) = resolved_cost(catalog, weapon, target_level) else {
        return UpgradeOutcome::AtMaxLevel;
    };

    if let Some(missing) = shortfall(agent, &cost) {
        return missing;
    }

    for (material, amount) in cost {
        if let Some(held) = agent.inventory.get_mut(&material) {
            *held -= amount;
        }
    }
    agent.set_weapon_level(weapon, target_level);
    UpgradeOutcome::Upgraded {
        level: target_level,
    }
}
