//! Batch episode runner for balance analysis.
//!
//! Drives `SimulationEngine` with one policy per agent for many seeded
//! episodes and aggregates the results into a `SimReport`.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::{build_policies, run_episode, run_simulation, run_with_policies, AgentTally, EpisodeStats, SimError};
