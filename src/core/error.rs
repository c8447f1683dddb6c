use crate::agent::AgentId;
use crate::catalog::CatalogError;

/// Errors surfaced by engine construction and stepping.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An action code outside `0..action_count` was submitted. The whole tick is rejected.
    #[error("invalid action {code} for {agent}: valid codes are 0..{action_count}")]
    InvalidAction {
        agent: AgentId,
        code: usize,
        action_count: usize,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
