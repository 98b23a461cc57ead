//! The Strategy and BeliefRewrite protocols.

use crate::{
    belief::BeliefScores,
    error::{RewriteError, StrategyError},
    result::ExecutionResult,
};
use async_trait::async_trait;

/// Protocol ①: Strategy
///
/// One unit of work the agent may run each cycle.
///
/// Implementations:
/// - the registered stubs in `ralph-strategies`
/// - scripted strategies in [`crate::test_utils`]
///
/// The trait is one method. The caller enforces no timeout, so a
/// strategy that never returns stalls the whole cycle. Errors are caught
/// by the agent and logged as a failed execution; they never abort the
/// cycle. The agent stamps the registered name on the returned result,
/// so the strategy does not need to know its own key.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Execute the strategy once.
    async fn execute(&self) -> Result<ExecutionResult, StrategyError>;
}

/// Protocol ②: Belief rewrite
///
/// Recomputes belief scores from the latest cycle. Returns only the
/// scores it wants to change; the agent overwrites those in its cache and
/// in the store and keeps every other score as it was.
#[async_trait]
pub trait BeliefRewrite: Send + Sync {
    /// Produce new scores from this cycle's results and the current cache.
    async fn rewrite(
        &self,
        results: &[ExecutionResult],
        current: &BeliefScores,
    ) -> Result<BeliefScores, RewriteError>;
}
