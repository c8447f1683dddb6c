use super::{Policy, PolicyContext};
use crate::catalog::{BossId, WeaponId};
use crate::core::action::Action;
use crate::crafting::resolved_cost;
use rand::RngCore;

/// Always submits the same code.
#[derive(Debug, Clone, Copy)]
pub struct FixedPolicy(pub usize);

impl Policy for FixedPolicy {
    fn choose_action(&mut self, _ctx: &PolicyContext<'_>, _rng: &mut dyn RngCore) -> usize {
        self.0
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Scripted farmer: levels one focus weapon as fast as loot allows, then
/// goes after the final boss.
#[derive(Debug, Clone, Copy)]
pub struct GreedyPolicy {
    pub focus: WeaponId,
}

impl Default for GreedyPolicy {
    fn default() -> Self {
        Self {
            focus: WeaponId(0),
        }
    }
}

impl GreedyPolicy {
    pub fn new(focus: WeaponId) -> Self {
        Self { focus }
    }

    /// Non-final boss sharing the focus weapon's element, else the first non-final boss.
    fn farm_target(&self, ctx: &PolicyContext<'_>) -> Option<BossId> {
        let catalog = ctx.catalog;
        let element = catalog.weapon(self.focus).element;
        let farmable: Vec<BossId> = catalog
            .boss_ids()
            .filter(|&id| !catalog.boss(id).is_final)
            .collect();
        farmable
            .iter()
            .copied()
            .find(|&id| catalog.boss(id).element == element)
            .or_else(|| farmable.first().copied())
    }

    fn can_afford_next(&self, ctx: &PolicyContext<'_>, level: u8) -> bool {
        let Some(cost) = resolved_cost(ctx.catalog, self.focus, level + 1) else {
            return false;
        };
        cost.iter().all(|(material, &required)| {
            ctx.observation
                .inventory
                .get(material)
                .is_some_and(|&held| held >= required)
        })
    }
}

impl Policy for GreedyPolicy {
    fn choose_action(&mut self, ctx: &PolicyContext<'_>, _rng: &mut dyn RngCore) -> usize {
        let catalog = ctx.catalog;
        let obs = ctx.observation;

        if let Some(boss) = obs.battle_boss {
            return Action::Attack(boss).code(catalog);
        }

        let level = obs.weapon_levels.get(self.focus.0).copied().unwrap_or(0);
        if level >= ctx.max_weapon_level {
            if let Some(final_boss) = catalog.final_boss() {
                return Action::Attack(final_boss).code(catalog);
            }
        } else if self.can_afford_next(ctx, level) {
            return Action::Craft(self.focus).code(catalog);
        }

        self.farm_target(ctx)
            .map(|boss| Action::Attack(boss).code(catalog))
            .unwrap_or(0)
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}
