//! Weapon crafting and the upgrade ladder.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
