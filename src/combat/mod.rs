//! Damage, element multipliers, retaliation and loot.

pub mod logic;

pub use logic::*;
