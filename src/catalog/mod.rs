//! Static game data: bosses, weapons, loot, element multipliers and the upgrade ladder.

pub mod data;
pub mod types;

pub use data::*;
pub use types::*;
