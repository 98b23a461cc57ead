//! The Store protocol: strategy registry and execution log.

use crate::{
    belief::DEFAULT_BELIEF_SCORE,
    error::StoreError,
    id::StrategyName,
    result::ExecutionRecord,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the strategy registry.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecord {
    /// Unique key.
    pub name: StrategyName,
    /// Disabled strategies are skipped (except the belief strategy).
    pub enabled: bool,
    /// Gate probability for this strategy.
    pub belief_score: f64,
    /// Attempts logged, successful or not.
    pub total_executions: u64,
    /// Attempts that reported success.
    pub successful_executions: u64,
    /// Sum of reported `profit_loss`.
    pub total_profit: f64,
    /// Time of the most recent attempt.
    pub last_executed: Option<DateTime<Utc>>,
}

impl StrategyRecord {
    /// A fresh, enabled row with the default belief and zeroed counters.
    pub fn new(name: impl Into<StrategyName>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            belief_score: DEFAULT_BELIEF_SCORE,
            total_executions: 0,
            successful_executions: 0,
            total_profit: 0.0,
            last_executed: None,
        }
    }

    /// Set the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the belief score.
    #[must_use]
    pub fn with_belief_score(mut self, score: f64) -> Self {
        self.belief_score = score;
        self
    }
}

/// Partial update of a registry row. Counter fields are increments,
/// the remaining fields overwrite when set.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyUpdate {
    /// Added to `total_executions`.
    pub total_executions: u64,
    /// Added to `successful_executions`.
    pub successful_executions: u64,
    /// Added to `total_profit`.
    pub total_profit: Option<f64>,
    /// Overwrites `last_executed`.
    pub last_executed: Option<DateTime<Utc>>,
    /// Overwrites `belief_score`.
    pub belief_score: Option<f64>,
    /// Overwrites `enabled`.
    pub enabled: Option<bool>,
}

impl StrategyUpdate {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The counter update for one logged attempt: one more execution,
    /// one more success if it succeeded, profit added if reported,
    /// `last_executed` stamped with `at`.
    pub fn execution(success: bool, profit_loss: Option<f64>, at: DateTime<Utc>) -> Self {
        Self {
            total_executions: 1,
            successful_executions: u64::from(success),
            total_profit: profit_loss,
            last_executed: Some(at),
            ..Self::default()
        }
    }

    /// Overwrite the belief score.
    #[must_use]
    pub fn belief_score(mut self, score: f64) -> Self {
        self.belief_score = Some(score);
        self
    }

    /// Overwrite the enabled flag.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Apply this update to a row in place. Stores call this so every
    /// backend shares the same increment semantics.
    pub fn apply(&self, record: &mut StrategyRecord) {
        record.total_executions = record.total_executions.saturating_add(self.total_executions);
        record.successful_executions = record
            .successful_executions
            .saturating_add(self.successful_executions);
        if let Some(profit) = self.total_profit {
            record.total_profit += profit;
        }
        if let Some(at) = self.last_executed {
            record.last_executed = Some(at);
        }
        if let Some(score) = self.belief_score {
            record.belief_score = score;
        }
        if let Some(enabled) = self.enabled {
            record.enabled = enabled;
        }
    }
}

/// Filter for reading the execution log.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionQuery {
    /// Only rows for this strategy, if set.
    pub strategy: Option<StrategyName>,
    /// Maximum rows returned.
    pub limit: usize,
}

impl ExecutionQuery {
    /// Default row limit.
    pub const DEFAULT_LIMIT: usize = 50;

    /// Newest rows across all strategies.
    pub fn all() -> Self {
        Self {
            strategy: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Only rows for one strategy.
    #[must_use]
    pub fn strategy(mut self, name: impl Into<StrategyName>) -> Self {
        self.strategy = Some(name.into());
        self
    }

    /// Override the row limit.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// True if the record passes the strategy filter.
    pub fn matches(&self, record: &ExecutionRecord) -> bool {
        self.strategy
            .as_ref()
            .is_none_or(|name| &record.result.strategy == name)
    }
}

impl Default for ExecutionQuery {
    fn default() -> Self {
        Self::all()
    }
}

/// Protocol ③: Store
///
/// Two tables: the strategy registry (keyed by name) and an append-only
/// execution log. The agent re-syncs belief scores from the registry only
/// at initialization; after that it writes through.
///
/// Implementations:
/// - MemoryStore (`ralph-store-memory`): ephemeral, for tests and demos
/// - FsStore (`ralph-store-fs`): JSON files, survives restarts
///
/// No transaction discipline is implied. Each call is atomic only as far
/// as the backend makes it so.
#[async_trait]
pub trait StrategyStore: Send + Sync {
    /// Read one registry row.
    async fn find(&self, name: &StrategyName) -> Result<Option<StrategyRecord>, StoreError>;

    /// Read every registry row, in creation order.
    async fn find_many(&self) -> Result<Vec<StrategyRecord>, StoreError>;

    /// Insert a new row. Fails with [`StoreError::AlreadyExists`] if the
    /// name is taken.
    async fn create(&self, record: StrategyRecord) -> Result<(), StoreError>;

    /// Apply a partial update and return the updated row. Fails with
    /// [`StoreError::NotFound`] if the row does not exist.
    async fn update(
        &self,
        name: &StrategyName,
        update: StrategyUpdate,
    ) -> Result<StrategyRecord, StoreError>;

    /// Append one row to the execution log.
    async fn append_execution(&self, record: ExecutionRecord) -> Result<(), StoreError>;

    /// Read log rows matching the query, newest first.
    async fn executions(&self, query: &ExecutionQuery) -> Result<Vec<ExecutionRecord>, StoreError>;
}
