//! Episode runner.
//!
//! Statistics are read from the engine's step output and the agents' own
//! counters; the runner never touches game state directly.

use super::config::SimConfig;
use super::report::SimReport;
use crate::agent::AgentId;
use crate::catalog::Catalog;
use crate::core::{EngineError, SimulationEngine};
use crate::policy::{GeminiGenerator, LlmPolicy, Policy, PolicyContext, PolicyError, PolicyKind};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("fixed action {code} is out of range (0..{action_count})")]
    FixedActionOutOfRange { code: usize, action_count: usize },
}

/// One agent's totals for an episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentTally {
    pub reward: f64,
    pub kills: u32,
    pub losses: u32,
    pub upgrades: u32,
    pub final_boss_kills: u32,
    pub terminated: bool,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeStats {
    pub seed: u64,
    pub ticks: u64,
    pub agents: BTreeMap<AgentId, AgentTally>,
}

impl EpisodeStats {
    pub fn total_reward(&self) -> f64 {
        self.agents.values().map(|a| a.reward).sum()
    }

    /// True when at least one agent beat the final boss.
    pub fn won(&self) -> bool {
        self.agents.values().any(|a| a.final_boss_kills > 0)
    }

    pub fn truncated(&self) -> bool {
        self.agents.values().any(|a| a.truncated)
    }
}

/// One policy per agent, as selected by `kind`.
pub fn build_policies(
    kind: PolicyKind,
    num_agents: usize,
    catalog: &Catalog,
) -> Result<Vec<Box<dyn Policy>>, SimError> {
    if let PolicyKind::Fixed(code) = kind {
        let action_count = catalog.action_count();
        if code >= action_count {
            return Err(SimError::FixedActionOutOfRange { code, action_count });
        }
    }

    let mut policies = Vec::with_capacity(num_agents);
    for _ in 0..num_agents {
        let policy: Box<dyn Policy> = match kind.build() {
            Some(policy) => policy,
            None => Box::new(LlmPolicy::new(GeminiGenerator::from_env()?)),
        };
        policies.push(policy);
    }
    Ok(policies)
}

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig, catalog: Catalog) -> Result<SimReport, SimError> {
    let policies = build_policies(config.policy, config.engine.num_agents, &catalog)?;
    run_with_policies(config, catalog, policies)
}

/// Like [`run_simulation`] with caller-supplied policies, indexed by agent.
pub fn run_with_policies(
    config: &SimConfig,
    catalog: Catalog,
    mut policies: Vec<Box<dyn Policy>>,
) -> Result<SimReport, SimError> {
    let policy_name = policies.first().map(|p| p.name()).unwrap_or("none");
    let mut engine = SimulationEngine::new(config.engine.clone(), catalog)?;
    let mut episodes = Vec::with_capacity(config.episodes as usize);

    for episode in 0..config.episodes {
        let seed = config.seed.wrapping_add(episode as u64);
        let stats = run_episode(&mut engine, &mut policies, seed)?;

        if config.verbosity >= 2 {
            println!(
                "Episode {}/{} - seed {}, {} ticks, reward {:.0}, {}",
                episode + 1,
                config.episodes,
                stats.seed,
                stats.ticks,
                stats.total_reward(),
                if stats.won() { "final boss down" } else { "no win" }
            );
        }
        episodes.push(stats);
    }

    let report = SimReport::from_episodes(policy_name, &config.engine, episodes);
    info!(
        episodes = report.episodes,
        wins = report.wins,
        "Simulation finished"
    );
    Ok(report)
}

/// Plays one episode to completion. Policies are consulted in agent order and
/// draw from the engine's random stream.
pub fn run_episode(
    engine: &mut SimulationEngine,
    policies: &mut [Box<dyn Policy>],
    seed: u64,
) -> Result<EpisodeStats, SimError> {
    let mut observations = engine.reset_with_seed(seed);
    let catalog = engine.catalog().clone();
    let max_weapon_level = engine.config().max_weapon_level;

    let mut agents: BTreeMap<AgentId, AgentTally> = engine
        .agent_ids()
        .map(|id| (id, AgentTally::default()))
        .collect();

    while !engine.is_done() {
        let step = engine.current_step();
        let mut actions = BTreeMap::new();
        for (&id, observation) in &observations {
            let Some(policy) = policies.get_mut(id.0) else {
                continue;
            };
            let ctx = PolicyContext {
                agent: id,
                observation,
                step,
                catalog: &catalog,
                max_weapon_level,
            };
            actions.insert(id, policy.choose_action(&ctx, engine.rng_mut()));
        }

        let output = engine.step(&actions)?;
        for (id, tally) in agents.iter_mut() {
            tally.reward += output.reward(*id);
            tally.terminated |= output.terminated(*id);
            tally.truncated |= output.truncated(*id);
        }
        observations = output.observations;
    }

    for (id, tally) in agents.iter_mut() {
        if let Some(agent) = engine.agent(*id) {
            tally.kills = agent.stats.kills;
            tally.losses = agent.stats.losses;
            tally.upgrades = agent.stats.upgrades;
            tally.final_boss_kills = agent.stats.final_boss_kills;
        }
    }

    Ok(EpisodeStats {
        seed,
        ticks: engine.current_step(),
        agents,
    })
}
