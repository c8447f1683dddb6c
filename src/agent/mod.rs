//! Per-agent mutable state.

pub mod types;

pub use types::*;
