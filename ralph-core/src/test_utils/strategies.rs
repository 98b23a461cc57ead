//! Strategies with scripted outcomes.

use crate::error::StrategyError;
use crate::result::ExecutionResult;
use crate::strategy::Strategy;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Notify, Semaphore};

/// Returns a clone of the same result on every call.
pub struct FixedStrategy {
    result: ExecutionResult,
    calls: AtomicUsize,
}

impl FixedStrategy {
    /// Create a strategy that always returns `result`.
    pub fn new(result: ExecutionResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    /// A strategy that succeeds with the given action and zero profit.
    pub fn ok(action: &str) -> Self {
        Self::new(ExecutionResult::success(action).with_profit_loss(0.0))
    }

    /// Number of times `execute` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Strategy for FixedStrategy {
    async fn execute(&self) -> Result<ExecutionResult, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

/// Always returns an error.
pub struct FailingStrategy {
    message: String,
    calls: AtomicUsize,
}

impl FailingStrategy {
    /// Create a strategy that fails with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `execute` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Strategy for FailingStrategy {
    async fn execute(&self) -> Result<ExecutionResult, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StrategyError::Failed(self.message.clone()))
    }
}

/// Blocks inside `execute` until the test releases it.
///
/// Each call signals [`BlockingStrategy::wait_entered`] and then waits
/// for one permit from [`BlockingStrategy::release`].
pub struct BlockingStrategy {
    entered: Notify,
    permits: Semaphore,
    calls: AtomicUsize,
}

impl BlockingStrategy {
    /// Create a strategy with no permits.
    pub fn new() -> Self {
        Self {
            entered: Notify::new(),
            permits: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Wait until a call is inside `execute`.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let `n` calls complete.
    pub fn release(&self, n: usize) {
        self.permits.add_permits(n);
    }

    /// Number of times `execute` was entered.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for BlockingStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Strategy for BlockingStrategy {
    async fn execute(&self) -> Result<ExecutionResult, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| StrategyError::Other(Box::new(e)))?;
        permit.forget();
        Ok(ExecutionResult::success("blocked").with_profit_loss(0.0))
    }
}
