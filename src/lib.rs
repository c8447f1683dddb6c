//! Boss Rush - multi-agent boss fighting and weapon crafting simulation.
//!
//! `core::SimulationEngine` is the entry point: it owns every agent, decodes
//! integer action codes and advances all live agents one tick per `step`.
//! `policy` and `simulator` drive the engine from outside.

pub mod agent;
pub mod battle;
pub mod build_info;
pub mod catalog;
pub mod combat;
pub mod core;
pub mod crafting;
pub mod policy;
pub mod simulator;

pub use agent::{AgentId, AgentState};
pub use catalog::Catalog;
pub use self::core::{EngineConfig, EngineError, SimulationEngine, StepOutput};
