use crate::catalog::Material;
use std::collections::BTreeMap;

/// Materials (already resolved from `attribute_stone`) needed for one upgrade.
pub type ResolvedCost = BTreeMap<Material, u32>;

/// Result of an upgrade attempt. Only `Upgraded` changes any state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    Upgraded { level: u8 },
    /// Weapon already sits at the top of the ladder.
    AtMaxLevel,
    /// First material found short; nothing was consumed.
    Unaffordable {
        material: Material,
        required: u32,
        held: u32,
    },
}

impl UpgradeOutcome {
    pub fn applied(&self) -> bool {
        matches!(self, UpgradeOutcome::Upgraded { .. })
    }
}
