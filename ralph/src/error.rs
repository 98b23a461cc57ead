use ralph_core::error::{CycleError, StoreError};
use thiserror::Error;

/// Errors surfaced by the `ralph` binary.
#[derive(Debug, Error)]
pub enum RalphError {
    /// Bad flag, file or environment value.
    #[error("config error: {0}")]
    Config(String),

    /// Filesystem or socket failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file or report could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store failed while preparing the agent.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A one-shot cycle could not run.
    #[error("cycle error: {0}")]
    Cycle(#[from] CycleError),
}
