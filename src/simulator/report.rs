//! Simulation report generation.

use super::runner::{AgentTally, EpisodeStats};
use crate::core::config::EngineConfig;
use serde::Serialize;

/// Aggregated results from a batch of episodes.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub policy: String,
    pub episodes: u32,
    pub agents_per_episode: usize,
    pub step_budget: u64,

    /// Episodes in which some agent beat the final boss
    pub wins: u32,
    pub truncated_episodes: u32,

    // Per-agent averages
    pub avg_ticks: f64,
    pub avg_reward: f64,
    pub avg_kills: f64,
    pub avg_losses: f64,
    pub avg_upgrades: f64,

    pub total_final_boss_kills: u32,
    pub best_episode_reward: f64,
    /// Mean tick count of winning episodes, 0 when none won
    pub avg_ticks_to_win: f64,

    pub episode_stats: Vec<EpisodeStats>,
}

impl SimReport {
    pub fn from_episodes(policy: &str, engine: &EngineConfig, episodes: Vec<EpisodeStats>) -> Self {
        let num_episodes = episodes.len() as u32;
        let wins = episodes.iter().filter(|e| e.won()).count() as u32;
        let truncated_episodes = episodes.iter().filter(|e| e.truncated()).count() as u32;

        let agent_samples = episodes
            .iter()
            .map(|e| e.agents.len())
            .sum::<usize>()
            .max(1) as f64;
        let per_agent = |f: &dyn Fn(&AgentTally) -> f64| {
            episodes
                .iter()
                .flat_map(|e| e.agents.values())
                .map(f)
                .sum::<f64>()
                / agent_samples
        };

        let avg_reward = per_agent(&|a| a.reward);
        let avg_kills = per_agent(&|a| a.kills as f64);
        let avg_losses = per_agent(&|a| a.losses as f64);
        let avg_upgrades = per_agent(&|a| a.upgrades as f64);

        let avg_ticks =
            episodes.iter().map(|e| e.ticks as f64).sum::<f64>() / num_episodes.max(1) as f64;
        let avg_ticks_to_win = episodes
            .iter()
            .filter(|e| e.won())
            .map(|e| e.ticks as f64)
            .sum::<f64>()
            / wins.max(1) as f64;

        let total_final_boss_kills = episodes
            .iter()
            .flat_map(|e| e.agents.values())
            .map(|a| a.final_boss_kills)
            .sum();
        let best_episode_reward = episodes
            .iter()
            .map(EpisodeStats::total_reward)
            .fold(0.0, f64::max);

        Self {
            policy: policy.to_string(),
            episodes: num_episodes,
            agents_per_episode: engine.num_agents,
            step_budget: engine.step_budget,
            wins,
            truncated_episodes,
            avg_ticks,
            avg_reward,
            avg_kills,
            avg_losses,
            avg_upgrades,
            total_final_boss_kills,
            best_episode_reward,
            avg_ticks_to_win,
            episode_stats: episodes,
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.wins as f64 / self.episodes as f64 * 100.0
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Episodes: {} ({} agents, {} step budget, policy: {})\n",
            self.episodes, self.agents_per_episode, self.step_budget, self.policy
        ));
        report.push_str(&format!(
            "Wins: {} ({:.1}%), truncated: {}\n\n",
            self.wins,
            self.win_rate(),
            self.truncated_episodes
        ));

        report.push_str("── PER AGENT ────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Reward:      {:.1}\n", self.avg_reward));
        report.push_str(&format!("  Avg Boss Kills:  {:.1}\n", self.avg_kills));
        report.push_str(&format!("  Avg Knockouts:   {:.2}\n", self.avg_losses));
        report.push_str(&format!("  Avg Upgrades:    {:.2}\n\n", self.avg_upgrades));

        report.push_str("── EPISODES ─────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Ticks:         {:.1}\n", self.avg_ticks));
        report.push_str(&format!("  Avg Ticks to Win:  {:.1}\n", self.avg_ticks_to_win));
        report.push_str(&format!(
            "  Final Boss Kills:  {}\n",
            self.total_final_boss_kills
        ));
        report.push_str(&format!(
            "  Best Reward:       {:.0}\n",
            self.best_episode_reward
        ));

        if self.wins == 0 && self.episodes > 0 {
            report.push_str("\n  ⚠️  Final boss never fell - raise the step budget?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentId;
    use std::collections::BTreeMap;

    fn episode(seed: u64, ticks: u64, tallies: Vec<AgentTally>) -> EpisodeStats {
        EpisodeStats {
            seed,
            ticks,
            agents: tallies
                .into_iter()
                .enumerate()
                .map(|(i, t)| (AgentId(i), t))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn sample() -> SimReport {
        let winner = AgentTally {
            reward: 1600.0,
            kills: 43,
            upgrades: 5,
            final_boss_kills: 1,
            terminated: true,
            ..Default::default()
        };
        let idler = AgentTally {
            truncated: true,
            ..Default::default()
        };
        let episodes = vec![
            episode(1, 112, vec![winner.clone(), winner]),
            episode(2, 200, vec![idler.clone(), idler]),
        ];
        SimReport::from_episodes("greedy", &EngineConfig::default(), episodes)
    }

    #[test]
    fn test_report_aggregates() {
        let report = sample();
        assert_eq!(report.episodes, 2);
        assert_eq!(report.wins, 1);
        assert_eq!(report.truncated_episodes, 1);
        assert_eq!(report.total_final_boss_kills, 2);
        assert!((report.avg_reward - 800.0).abs() < 1e-9);
        assert!((report.avg_ticks - 156.0).abs() < 1e-9);
        assert!((report.avg_ticks_to_win - 112.0).abs() < 1e-9);
        assert_eq!(report.best_episode_reward, 3200.0);
        assert!((report.win_rate() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_report() {
        let report = SimReport::from_episodes("random", &EngineConfig::default(), Vec::new());
        assert_eq!(report.avg_reward, 0.0);
        assert_eq!(report.win_rate(), 0.0);
    }

    #[test]
    fn test_text_and_json() {
        let report = sample();
        let text = report.to_text();
        assert!(text.contains("SIMULATION REPORT"));
        assert!(text.contains("policy: greedy"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["wins"], 1);
        assert_eq!(json["episode_stats"][0]["agents"]["player_0"]["kills"], 43);
    }
}
