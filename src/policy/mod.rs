//! Action-producing policies that drive the engine from outside.
//!
//! The engine never calls into this module; a driver (see `simulator`)
//! asks one policy per agent for an action code every tick.

pub mod gemini;
pub mod llm;
pub mod random;
pub mod scripted;

pub use gemini::GeminiGenerator;
pub use llm::{parse_action_response, LlmPolicy, TextGenerator};
pub use random::RandomPolicy;
pub use scripted::{FixedPolicy, GreedyPolicy};

use crate::agent::AgentId;
use crate::catalog::Catalog;
use crate::core::tick::Observation;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Everything a policy may look at when choosing.
pub struct PolicyContext<'a> {
    pub agent: AgentId,
    pub observation: &'a Observation,
    pub step: u64,
    pub catalog: &'a Catalog,
    pub max_weapon_level: u8,
}

pub trait Policy {
    /// Returns an action code. Policies are expected to stay inside
    /// `0..catalog.action_count()`; the engine rejects anything else.
    fn choose_action(&mut self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> usize;

    fn name(&self) -> &'static str;
}

/// Policy selection for the simulator and CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "action")]
pub enum PolicyKind {
    Random,
    Greedy,
    Fixed(usize),
    Llm,
}

impl PolicyKind {
    /// Parses `random`, `greedy`, `llm` or `fixed:<code>`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "random" => Some(PolicyKind::Random),
            "greedy" => Some(PolicyKind::Greedy),
            "llm" => Some(PolicyKind::Llm),
            other => other
                .strip_prefix("fixed:")
                .and_then(|code| code.parse().ok())
                .map(PolicyKind::Fixed),
        }
    }

    /// Builds a policy instance. `Llm` needs a generator and is built by the caller.
    pub fn build(self) -> Option<Box<dyn Policy>> {
        match self {
            PolicyKind::Random => Some(Box::new(RandomPolicy)),
            PolicyKind::Greedy => Some(Box::new(GreedyPolicy::default())),
            PolicyKind::Fixed(code) => Some(Box::new(FixedPolicy(code))),
            PolicyKind::Llm => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("text generation request failed: {0}")]
    Transport(String),

    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response has no text")]
    EmptyResponse,

    #[error("missing environment variable {0}")]
    MissingApiKey(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy_kind() {
        assert_eq!(PolicyKind::parse("random"), Some(PolicyKind::Random));
        assert_eq!(PolicyKind::parse("greedy"), Some(PolicyKind::Greedy));
        assert_eq!(PolicyKind::parse("llm"), Some(PolicyKind::Llm));
        assert_eq!(PolicyKind::parse("fixed:3"), Some(PolicyKind::Fixed(3)));
        assert_eq!(PolicyKind::parse("fixed:x"), None);
        assert_eq!(PolicyKind::parse("smart"), None);
    }

    #[test]
    fn test_build_all_but_llm() {
        assert_eq!(PolicyKind::Random.build().map(|p| p.name()), Some("random"));
        assert_eq!(PolicyKind::Greedy.build().map(|p| p.name()), Some("greedy"));
        assert_eq!(PolicyKind::Fixed(1).build().map(|p| p.name()), Some("fixed"));
        assert!(PolicyKind::Llm.build().is_none());
    }
}
