use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Elemental tag carried by bosses and weapons.
///
/// `None` is the neutral tag. Only bosses may carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire = 0,
    Water = 1,
    Earth = 2,
    Wind = 3,
    Light = 4,
    None = 5,
}

impl Element {
    pub const COUNT: usize = 6;

    pub const ALL: [Element; Element::COUNT] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Wind,
        Element::Light,
        Element::None,
    ];

    /// The five tags a weapon (and an elemental stone) can carry.
    pub const ATTRIBUTES: [Element; 5] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Wind,
        Element::Light,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Earth => "earth",
            Element::Wind => "wind",
            Element::Light => "light",
            Element::None => "none",
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Element::None
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Element {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| CatalogError::UnknownElement(s.to_string()))
    }
}

/// A crafting material held in an agent's inventory.
///
/// Renders as `common_stone` or `<element>_stone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Material {
    Stone(Element),
    Common,
}

impl Material {
    /// Every material in inventory order: the five elemental stones, then common stone.
    pub const ALL: [Material; 6] = [
        Material::Stone(Element::Fire),
        Material::Stone(Element::Water),
        Material::Stone(Element::Earth),
        Material::Stone(Element::Wind),
        Material::Stone(Element::Light),
        Material::Common,
    ];

    /// The stone matching a weapon's element.
    pub fn stone_for(element: Element) -> Material {
        Material::Stone(element)
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Material::Stone(element) => write!(f, "{}_stone", element),
            Material::Common => f.write_str("common_stone"),
        }
    }
}

impl FromStr for Material {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "common_stone" {
            return Ok(Material::Common);
        }
        let element = s
            .strip_suffix("_stone")
            .and_then(|prefix| prefix.parse::<Element>().ok())
            .filter(|e| !e.is_neutral())
            .ok_or_else(|| CatalogError::UnknownMaterial(s.to_string()))?;
        Ok(Material::Stone(element))
    }
}

impl From<Material> for String {
    fn from(material: Material) -> Self {
        material.to_string()
    }
}

impl TryFrom<String> for Material {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One line of an upgrade recipe.
///
/// `AttributeStone` stands for the stone matching the upgraded weapon's element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CostItem {
    Material(Material),
    AttributeStone,
}

impl CostItem {
    pub fn resolve(self, weapon_element: Element) -> Material {
        match self {
            CostItem::Material(material) => material,
            CostItem::AttributeStone => Material::stone_for(weapon_element),
        }
    }
}

impl fmt::Display for CostItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostItem::Material(material) => material.fmt(f),
            CostItem::AttributeStone => f.write_str("attribute_stone"),
        }
    }
}

impl From<CostItem> for String {
    fn from(item: CostItem) -> Self {
        item.to_string()
    }
}

impl TryFrom<String> for CostItem {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "attribute_stone" {
            Ok(CostItem::AttributeStone)
        } else {
            value.parse().map(CostItem::Material)
        }
    }
}

/// Index of a boss in its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BossId(pub usize);

/// Index of a weapon in its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeaponId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub material: Material,
    pub probability: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossDef {
    pub name: String,
    pub max_health: u32,
    pub element: Element,
    pub retaliation: u32,
    /// Beating this boss ends the defeating agent's episode.
    #[serde(default)]
    pub is_final: bool,
    /// Rolled independently, entry by entry, on every defeat.
    #[serde(default)]
    pub loot: Vec<LootEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDef {
    pub name: String,
    pub base_damage: u32,
    pub element: Element,
}

/// Attacker × defender damage multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementMatrix {
    rows: [[f64; Element::COUNT]; Element::COUNT],
}

impl Default for ElementMatrix {
    fn default() -> Self {
        Self::neutral()
    }
}

impl ElementMatrix {
    /// Every pairing at 1.0.
    pub fn neutral() -> Self {
        Self {
            rows: [[1.0; Element::COUNT]; Element::COUNT],
        }
    }

    pub fn multiplier(&self, attacker: Element, defender: Element) -> f64 {
        self.rows[attacker.index()][defender.index()]
    }

    pub fn set(&mut self, attacker: Element, defender: Element, multiplier: f64) {
        self.rows[attacker.index()][defender.index()] = multiplier;
    }

    /// Builder form of [`ElementMatrix::set`].
    pub fn with(mut self, attacker: Element, defender: Element, multiplier: f64) -> Self {
        self.set(attacker, defender, multiplier);
        self
    }

    fn entries(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flat_map(|row| row.iter().copied())
    }
}

/// Recipe for reaching one weapon level.
pub type UpgradeCost = BTreeMap<CostItem, u32>;

/// Immutable game data injected into an engine at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub bosses: Vec<BossDef>,
    pub weapons: Vec<WeaponDef>,
    #[serde(default)]
    pub matrix: ElementMatrix,
    /// Entry `i` is the recipe for reaching level `i + 1`.
    pub upgrade_costs: Vec<UpgradeCost>,
    /// Entry `i` is the flat bonus damage at level `i`; entry 0 is level 0.
    pub upgrade_damage: Vec<u32>,
}

impl Catalog {
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(CatalogError::Parse)
    }

    pub fn boss(&self, id: BossId) -> &BossDef {
        &self.bosses[id.0]
    }

    pub fn weapon(&self, id: WeaponId) -> &WeaponDef {
        &self.weapons[id.0]
    }

    pub fn boss_ids(&self) -> impl Iterator<Item = BossId> {
        (0..self.bosses.len()).map(BossId)
    }

    pub fn weapon_ids(&self) -> impl Iterator<Item = WeaponId> {
        (0..self.weapons.len()).map(WeaponId)
    }

    pub fn boss_by_name(&self, name: &str) -> Option<BossId> {
        self.bosses.iter().position(|b| b.name == name).map(BossId)
    }

    pub fn weapon_by_name(&self, name: &str) -> Option<WeaponId> {
        self.weapons.iter().position(|w| w.name == name).map(WeaponId)
    }

    pub fn final_boss(&self) -> Option<BossId> {
        self.bosses.iter().position(|b| b.is_final).map(BossId)
    }

    /// Recipe for raising a weapon to `level`. `None` for level 0 or past the ladder.
    pub fn upgrade_cost(&self, level: u8) -> Option<&UpgradeCost> {
        (level as usize)
            .checked_sub(1)
            .and_then(|idx| self.upgrade_costs.get(idx))
    }

    pub fn upgrade_bonus(&self, level: u8) -> u32 {
        self.upgrade_damage
            .get(level as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Size of the per-tick action space: idle, one attack per boss, one craft per weapon.
    pub fn action_count(&self) -> usize {
        1 + self.bosses.len() + self.weapons.len()
    }

    /// Checks the data is usable with weapons capped at `max_level`.
    pub fn validate(&self, max_level: u8) -> Result<(), CatalogError> {
        if self.bosses.is_empty() {
            return Err(CatalogError::Invalid("catalog has no bosses".into()));
        }
        if self.weapons.is_empty() {
            return Err(CatalogError::Invalid("catalog has no weapons".into()));
        }
        for boss in &self.bosses {
            if boss.max_health == 0 {
                return Err(CatalogError::Invalid(format!(
                    "boss {} has zero health",
                    boss.name
                )));
            }
            for entry in &boss.loot {
                if !(0.0..=1.0).contains(&entry.probability) {
                    return Err(CatalogError::Invalid(format!(
                        "boss {} drops {} with probability {}",
                        boss.name, entry.material, entry.probability
                    )));
                }
            }
        }
        if self.bosses.iter().filter(|b| b.is_final).count() > 1 {
            return Err(CatalogError::Invalid("more than one final boss".into()));
        }
        for weapon in &self.weapons {
            if weapon.element.is_neutral() {
                return Err(CatalogError::Invalid(format!(
                    "weapon {} has no element",
                    weapon.name
                )));
            }
            if weapon.base_damage == 0 {
                return Err(CatalogError::Invalid(format!(
                    "weapon {} deals no damage",
                    weapon.name
                )));
            }
        }
        if self.matrix.entries().any(|m| !m.is_finite() || m < 0.0) {
            return Err(CatalogError::Invalid(
                "element multipliers must be finite and non-negative".into(),
            ));
        }
        if self.upgrade_costs.len() < max_level as usize {
            return Err(CatalogError::Invalid(format!(
                "upgrade costs cover {} levels, need {}",
                self.upgrade_costs.len(),
                max_level
            )));
        }
        if self.upgrade_damage.len() <= max_level as usize {
            return Err(CatalogError::Invalid(format!(
                "upgrade damage covers levels 0..{}, need 0..={}",
                self.upgrade_damage.len(),
                max_level
            )));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown element: {0}")]
    UnknownElement(String),

    #[error("unknown material: {0}")]
    UnknownMaterial(String),

    #[error("invalid catalog: {0}")]
    Invalid(String),

    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[source] serde_json::Error),
}
