#![deny(missing_docs)]
//! In-memory implementation of ralph-core's StrategyStore trait.
//!
//! Registry rows and the execution log live in `Vec`s behind a single
//! tokio `RwLock`, so rows keep their creation order and each call is
//! atomic with respect to every other call. Nothing survives the process.

use async_trait::async_trait;
use ralph_core::error::StoreError;
use ralph_core::id::StrategyName;
use ralph_core::result::ExecutionRecord;
use ralph_core::store::{ExecutionQuery, StrategyRecord, StrategyStore, StrategyUpdate};
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    strategies: Vec<StrategyRecord>,
    executions: Vec<ExecutionRecord>,
}

impl Tables {
    fn position(&self, name: &StrategyName) -> Option<usize> {
        self.strategies.iter().position(|r| &r.name == name)
    }
}

/// In-memory strategy store.
///
/// Suitable for tests, demos and single-process runs where losing the
/// registry on restart is acceptable.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with registry rows.
    pub fn with_strategies(records: impl IntoIterator<Item = StrategyRecord>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                strategies: records.into_iter().collect(),
                executions: Vec::new(),
            }),
        }
    }
}

#[async_trait]
impl StrategyStore for MemoryStore {
    async fn find(&self, name: &StrategyName) -> Result<Option<StrategyRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.strategies.iter().find(|r| &r.name == name).cloned())
    }

    async fn find_many(&self) -> Result<Vec<StrategyRecord>, StoreError> {
        Ok(self.tables.read().await.strategies.clone())
    }

    async fn create(&self, record: StrategyRecord) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.position(&record.name).is_some() {
            return Err(StoreError::AlreadyExists(record.name));
        }
        tables.strategies.push(record);
        Ok(())
    }

    async fn update(
        &self,
        name: &StrategyName,
        update: StrategyUpdate,
    ) -> Result<StrategyRecord, StoreError> {
        let mut tables = self.tables.write().await;
        let idx = tables
            .position(name)
            .ok_or_else(|| StoreError::NotFound(name.clone()))?;
        let record = &mut tables.strategies[idx];
        update.apply(record);
        Ok(record.clone())
    }

    async fn append_execution(&self, record: ExecutionRecord) -> Result<(), StoreError> {
        self.tables.write().await.executions.push(record);
        Ok(())
    }

    async fn executions(&self, query: &ExecutionQuery) -> Result<Vec<ExecutionRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .executions
            .iter()
            .rev()
            .filter(|r| query.matches(r))
            .take(query.limit)
            .cloned()
            .collect())
    }
}
