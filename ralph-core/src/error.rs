//! Error types for each protocol.

use crate::id::StrategyName;
use thiserror::Error;

/// Strategy execution errors. The agent catches these; they never
/// abort a cycle.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StrategyError {
    /// The chain connection failed.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// The strategy ran and reported a failure.
    #[error("strategy failed: {0}")]
    Failed(String),

    /// Catch-all. Include context.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Belief-rewrite errors. Isolated by the agent: the previous scores
/// are kept and the cycle continues.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The rewrite rule could not produce scores.
    #[error("rewrite failed: {0}")]
    Failed(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Persistence errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// No registry row exists for the strategy.
    #[error("strategy not found: {0}")]
    NotFound(StrategyName),

    /// A registry row already exists for the strategy.
    #[error("strategy already exists: {0}")]
    AlreadyExists(StrategyName),

    /// A read operation failed.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// A write operation failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Notification delivery errors. Recorded, never retried.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The request never reached the channel.
    #[error("transport error: {0}")]
    Transport(String),

    /// The channel answered with a non-success status.
    #[error("rejected ({status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Cycle-level errors. The loop driver logs these and keeps going.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CycleError {
    /// Loading the registry before the first cycle failed.
    #[error("initialization failed: {0}")]
    Initialize(#[from] StoreError),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
