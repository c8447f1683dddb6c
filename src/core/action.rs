use crate::catalog::{BossId, Catalog, WeaponId};

/// A decoded action code.
///
/// Codes are laid out as `0` idle, `1..=bosses` attack, then one craft code per weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Idle,
    Attack(BossId),
    Craft(WeaponId),
}

impl Action {
    /// `None` when `code` falls outside the catalog's action space.
    pub fn decode(code: usize, catalog: &Catalog) -> Option<Action> {
        let bosses = catalog.bosses.len();
        match code {
            0 => Some(Action::Idle),
            c if c <= bosses => Some(Action::Attack(BossId(c - 1))),
            c if c < catalog.action_count() => Some(Action::Craft(WeaponId(c - 1 - bosses))),
            _ => None,
        }
    }

    pub fn code(self, catalog: &Catalog) -> usize {
        match self {
            Action::Idle => 0,
            Action::Attack(boss) => 1 + boss.0,
            Action::Craft(weapon) => 1 + catalog.bosses.len() + weapon.0,
        }
    }

    /// Human readable label, e.g. `attack fire_boss`.
    pub fn describe(self, catalog: &Catalog) -> String {
        match self {
            Action::Idle => "idle".to_string(),
            Action::Attack(boss) => format!("attack {}", catalog.boss(boss).name),
            Action::Craft(weapon) => format!("craft {}", catalog.weapon(weapon).name),
        }
    }
}
