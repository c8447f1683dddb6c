//! Engine configuration, action decoding and the tick loop.

pub mod action;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod tick;

pub use action::Action;
pub use config::{EngineConfig, RewardConfig};
pub use constants::*;
pub use engine::SimulationEngine;
pub use error::EngineError;
pub use tick::{Observation, StepInfo, StepOutput, TickEvent};
