//! Per-agent WORLD/BATTLE state machine.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
