//! Language-model driven policy.
//!
//! The observation is rendered to text, a generator is asked for a JSON
//! object `{"thought": ..., "action_id": ...}`, and anything unusable in the
//! reply turns into the idle action.

use super::{Policy, PolicyContext, PolicyError};
use crate::catalog::{Catalog, CostItem};
use crate::core::action::Action;
use crate::core::constants::IDLE_ACTION;
use rand::RngCore;
use serde::Deserialize;
use tracing::{debug, warn};

/// Something that turns a prompt pair into raw model text.
pub trait TextGenerator {
    fn generate(&mut self, system_prompt: &str, user_prompt: &str) -> Result<String, PolicyError>;
}

#[derive(Debug, Deserialize)]
struct ActionResponse {
    #[serde(default)]
    thought: Option<String>,
    #[serde(default)]
    action_id: i64,
}

/// A parsed model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmDecision {
    pub action: usize,
    pub thought: Option<String>,
}

/// Parses a model reply. Out-of-range ids become idle; malformed JSON is an error.
pub fn parse_action_response(text: &str, action_count: usize) -> Result<LlmDecision, PolicyError> {
    let body = strip_code_fence(text);
    let response: ActionResponse = serde_json::from_str(body)?;
    let action = usize::try_from(response.action_id)
        .ok()
        .filter(|&code| code < action_count)
        .unwrap_or_else(|| {
            warn!(action_id = response.action_id, "Model chose an invalid action, idling");
            IDLE_ACTION
        });
    Ok(LlmDecision {
        action,
        thought: response.thought,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// One line per action code, with boss elements and drops and weapon elements and first-level cost.
pub fn action_list(catalog: &Catalog) -> String {
    let mut lines = vec![format!("{}: idle", IDLE_ACTION)];
    for boss_id in catalog.boss_ids() {
        let boss = catalog.boss(boss_id);
        let drops: Vec<String> = boss.loot.iter().map(|e| e.material.to_string()).collect();
        lines.push(format!(
            "{}: attack {} (element: {}, drops: {})",
            Action::Attack(boss_id).code(catalog),
            boss.name,
            boss.element,
            drops.join(", ")
        ));
    }
    for weapon_id in catalog.weapon_ids() {
        let weapon = catalog.weapon(weapon_id);
        let first_cost: Vec<String> = catalog
            .upgrade_cost(1)
            .map(|cost| {
                cost.iter()
                    .map(|(item, amount)| format!("{} {}", amount, describe_cost_item(*item)))
                    .collect()
            })
            .unwrap_or_default();
        lines.push(format!(
            "{}: craft/upgrade {} (element: {}, level 1 cost: {})",
            Action::Craft(weapon_id).code(catalog),
            weapon.name,
            weapon.element,
            first_cost.join(", ")
        ));
    }
    lines.join("\n")
}

fn describe_cost_item(item: CostItem) -> String {
    match item {
        CostItem::AttributeStone => "stone matching the weapon's element".to_string(),
        CostItem::Material(material) => material.to_string(),
    }
}

pub fn system_prompt(catalog: &Catalog, max_weapon_level: u8) -> String {
    let final_boss = catalog
        .final_boss()
        .map(|id| catalog.boss(id).name.clone())
        .unwrap_or_else(|| "the strongest boss".to_string());
    format!(
        "You are an expert player of a boss-rush RPG. Your goal is to defeat {final_boss}.\n\
         {final_boss} only takes damage from a player holding a weapon at level {max_weapon_level}.\n\
         \n\
         Rules:\n\
         1. Collect crafting materials by defeating the other bosses.\n\
         2. Bosses may hit back. If you are knocked out you respawn at full health.\n\
         3. While in a battle, any action other than 0 attacks the boss you are fighting; 0 holds back.\n\
         4. Crafting consumes materials from your inventory and raises the weapon one level.\n\
         \n\
         Actions (choose exactly one):\n\
         {actions}\n\
         \n\
         Reply with a JSON object holding your reasoning and chosen action id, for example:\n\
         {{\"thought\": \"My inventory is empty, I need common_stone, so I attack fire_boss.\", \"action_id\": 1}}",
        actions = action_list(catalog)
    )
}

pub fn user_prompt(ctx: &PolicyContext<'_>) -> String {
    let obs = ctx.observation;
    let catalog = ctx.catalog;

    let inventory: Vec<String> = obs
        .inventory
        .iter()
        .filter(|&(_, &count)| count > 0)
        .map(|(material, count)| format!("{}: {}", material, count))
        .collect();
    let inventory = if inventory.is_empty() {
        "empty".to_string()
    } else {
        inventory.join(", ")
    };

    let weapons: Vec<String> = catalog
        .weapon_ids()
        .filter_map(|id| {
            let level = obs.weapon_levels.get(id.0).copied().unwrap_or(0);
            (level > 0).then(|| format!("{}: Lv.{}", catalog.weapon(id).name, level))
        })
        .collect();
    let weapons = if weapons.is_empty() {
        "none (bare fists, 1 damage)".to_string()
    } else {
        weapons.join(", ")
    };

    let state = match obs.battle_boss {
        Some(boss) => format!(
            "in battle vs {} (boss health left: {})",
            catalog.boss(boss).name,
            obs.battle_boss_health
        ),
        None => "in the world (free to act)".to_string(),
    };

    format!(
        "Current state for {agent}:\n\
         Step: {step}\n\
         Health: {health}\n\
         State: {state}\n\
         Inventory: {inventory}\n\
         Weapons: {weapons}\n\
         \n\
         Decide your next action and reply in JSON.",
        agent = ctx.agent,
        step = ctx.step,
        health = obs.health,
    )
}

/// Policy backed by a [`TextGenerator`].
pub struct LlmPolicy<G> {
    generator: G,
    last_thought: Option<String>,
}

impl<G: TextGenerator> LlmPolicy<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            last_thought: None,
        }
    }

    /// Reasoning attached to the most recent successful decision.
    pub fn last_thought(&self) -> Option<&str> {
        self.last_thought.as_deref()
    }

    pub fn into_inner(self) -> G {
        self.generator
    }
}

impl<G: TextGenerator> Policy for LlmPolicy<G> {
    fn choose_action(&mut self, ctx: &PolicyContext<'_>, _rng: &mut dyn RngCore) -> usize {
        let system = system_prompt(ctx.catalog, ctx.max_weapon_level);
        let user = user_prompt(ctx);

        let decision = self
            .generator
            .generate(&system, &user)
            .and_then(|text| parse_action_response(&text, ctx.catalog.action_count()));

        match decision {
            Ok(decision) => {
                debug!(
                    agent = %ctx.agent,
                    action = decision.action,
                    thought = decision.thought.as_deref().unwrap_or(""),
                    "Model decision"
                );
                self.last_thought = decision.thought;
                decision.action
            }
            Err(e) => {
                warn!(agent = %ctx.agent, error = %e, "Model decision failed, idling");
                IDLE_ACTION
            }
        }
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}
