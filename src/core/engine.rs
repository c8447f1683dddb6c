//! The simulation engine: owns every agent and advances them one tick at a time.

use super::action::Action;
use super::config::EngineConfig;
use super::error::EngineError;
use super::tick::{Observation, StepInfo, StepOutput, TickEvent};
use crate::agent::{AgentId, AgentState};
use crate::battle::apply_action;
use crate::catalog::Catalog;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Multi-agent boss-rush simulation.
///
/// Agents are processed in ascending id order and share one seeded random
/// stream, so an episode is fully reproducible from its seed and actions.
pub struct SimulationEngine {
    config: EngineConfig,
    catalog: Catalog,
    agents: Vec<AgentState>,
    live: BTreeSet<AgentId>,
    current_step: u64,
    rng: ChaCha8Rng,
}

impl SimulationEngine {
    /// Validates `config` and `catalog` and starts a fresh episode.
    pub fn new(config: EngineConfig, catalog: Catalog) -> Result<Self, EngineError> {
        config.validate()?;
        catalog.validate(config.max_weapon_level)?;

        let seed = config.seed;
        let mut engine = Self {
            config,
            catalog,
            agents: Vec::new(),
            live: BTreeSet::new(),
            current_step: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        engine.reset();
        Ok(engine)
    }

    /// Standard catalog with the given config.
    pub fn standard(config: EngineConfig) -> Result<Self, EngineError> {
        Self::new(config, Catalog::standard())
    }

    /// Starts a new episode, reseeding from the configured seed.
    pub fn reset(&mut self) -> BTreeMap<AgentId, Observation> {
        self.reset_with_seed(self.config.seed)
    }

    /// Starts a new episode with an explicit seed.
    pub fn reset_with_seed(&mut self, seed: u64) -> BTreeMap<AgentId, Observation> {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.current_step = 0;
        self.agents = (0..self.config.num_agents)
            .map(|_| AgentState::new(self.config.starting_health, self.catalog.weapons.len()))
            .collect();
        self.live = (0..self.config.num_agents).map(AgentId).collect();
        debug!(seed, agents = self.config.num_agents, "Episode reset");
        self.observe_live()
    }

    /// Advances every live agent by one tick.
    ///
    /// Every submitted code for a live agent is range-checked first; one bad
    /// code rejects the whole tick and leaves the engine untouched. Codes for
    /// agents that are no longer live are ignored.
    pub fn step(&mut self, actions: &BTreeMap<AgentId, usize>) -> Result<StepOutput, EngineError> {
        let mut decoded = Vec::with_capacity(self.live.len());
        for &id in &self.live {
            let Some(&code) = actions.get(&id) else {
                continue;
            };
            let action =
                Action::decode(code, &self.catalog).ok_or(EngineError::InvalidAction {
                    agent: id,
                    code,
                    action_count: self.catalog.action_count(),
                })?;
            decoded.push((id, action));
        }

        self.current_step += 1;
        let processed: Vec<AgentId> = self.live.iter().copied().collect();

        let mut output = StepOutput::default();
        for &id in &processed {
            output.rewards.insert(id, 0.0);
            output.terminations.insert(id, false);
            output.truncations.insert(id, false);
            output.infos.insert(id, StepInfo::default());
        }

        let mut terminated = Vec::new();
        for (id, action) in decoded {
            let agent = &mut self.agents[id.0];
            let transition = apply_action(agent, action, &self.catalog, &self.config, &mut self.rng);
            agent.check_invariants(self.config.starting_health, self.config.max_weapon_level);

            output.rewards.insert(id, transition.reward);
            if transition.terminated {
                output.terminations.insert(id, true);
                terminated.push(id);
            }
            output.infos.insert(
                id,
                StepInfo {
                    events: transition.events,
                },
            );
        }

        if !processed.is_empty() && self.current_step >= self.config.step_budget {
            info!(
                step = self.current_step,
                live = processed.len(),
                "Step budget reached, truncating episode"
            );
            for &id in &processed {
                self.agents[id.0].leave_battle();
                output.truncations.insert(id, true);
                if let Some(info) = output.infos.get_mut(&id) {
                    info.events.push(TickEvent::Truncated);
                }
            }
            self.live.clear();
        }

        for id in terminated {
            self.live.remove(&id);
        }

        output.observations = self.observe_live();
        Ok(output)
    }

    fn observe_live(&self) -> BTreeMap<AgentId, Observation> {
        self.live
            .iter()
            .map(|&id| (id, Observation::of(&self.agents[id.0])))
            .collect()
    }

    /// Observation for any agent, live or not.
    pub fn observe(&self, id: AgentId) -> Option<Observation> {
        self.agents.get(id.0).map(Observation::of)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> {
        (0..self.agents.len()).map(AgentId)
    }

    pub fn live_agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.live.iter().copied()
    }

    pub fn is_live(&self, id: AgentId) -> bool {
        self.live.contains(&id)
    }

    /// No agent is left to act.
    pub fn is_done(&self) -> bool {
        self.live.is_empty()
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentState> {
        self.agents.get(id.0)
    }

    /// Direct access for setting up scenarios.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut AgentState> {
        self.agents.get_mut(id.0)
    }

    /// The shared random stream. Drivers sample policy actions from it so a
    /// whole episode replays from one seed.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}
