//! The belief strategy and its rewrite rules.

use crate::names;
use async_trait::async_trait;
use ralph_core::belief::BeliefScores;
use ralph_core::error::{RewriteError, StrategyError};
use ralph_core::result::ExecutionResult;
use ralph_core::strategy::{BeliefRewrite, Strategy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which rewrite rule the belief strategy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeliefMode {
    /// [`FixedBeliefs`]: constant scores, inputs ignored.
    #[default]
    Fixed,
    /// [`ReinforcementRewrite`]: scores follow observed outcomes.
    Reinforce,
}

/// Constant scores, ignoring both the results and the current cache.
///
/// This is the placeholder rule the loop shipped with. It is kept as the
/// default until an owner defines the intended scoring rule; it makes the
/// belief mechanism a fixed bias rather than a feedback loop.
#[derive(Debug, Clone, Default)]
pub struct FixedBeliefs;

impl FixedBeliefs {
    /// The constant table.
    pub fn scores() -> BeliefScores {
        [
            (names::YIELD, 0.8),
            (names::SIGNAL, 0.6),
            (names::LIQUIDITY, 0.4),
            (names::ZK, 0.7),
            (names::BELIEF, 1.0),
        ]
        .into_iter()
        .collect()
    }
}

#[async_trait]
impl BeliefRewrite for FixedBeliefs {
    async fn rewrite(
        &self,
        _results: &[ExecutionResult],
        _current: &BeliefScores,
    ) -> Result<BeliefScores, RewriteError> {
        Ok(Self::scores())
    }
}

/// Exponential moving update toward each observed outcome.
///
/// For every result, in order, the strategy's score moves a fraction
/// `learning_rate` of the way toward `1.0` if it succeeded with
/// non-negative profit, and toward `0.0` otherwise. Output is clipped to
/// `[0, 1]`. Strategies with no result this cycle are not returned, so
/// their scores stay as they were.
#[derive(Debug, Clone)]
pub struct ReinforcementRewrite {
    learning_rate: f64,
}

impl ReinforcementRewrite {
    /// Default step size.
    pub const DEFAULT_LEARNING_RATE: f64 = 0.2;

    /// Create a rule with the given step size, clamped into `(0, 1]`.
    pub fn new(learning_rate: f64) -> Self {
        let learning_rate = if learning_rate.is_finite() && learning_rate > 0.0 {
            learning_rate.min(1.0)
        } else {
            Self::DEFAULT_LEARNING_RATE
        };
        Self { learning_rate }
    }

    /// The step size in use.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

impl Default for ReinforcementRewrite {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEARNING_RATE)
    }
}

fn outcome_target(result: &ExecutionResult) -> f64 {
    let profitable = result.profit_loss.is_none_or(|p| p >= 0.0);
    if result.success && profitable { 1.0 } else { 0.0 }
}

#[async_trait]
impl BeliefRewrite for ReinforcementRewrite {
    async fn rewrite(
        &self,
        results: &[ExecutionResult],
        current: &BeliefScores,
    ) -> Result<BeliefScores, RewriteError> {
        let mut updated = BeliefScores::new();
        for result in results {
            if result.strategy.as_str().is_empty() {
                continue;
            }
            let prior = updated
                .get(&result.strategy)
                .unwrap_or_else(|| current.score(&result.strategy));
            let next = prior + self.learning_rate * (outcome_target(result) - prior);
            updated.set(result.strategy.clone(), next.clamp(0.0, 1.0));
        }
        Ok(updated)
    }
}

/// The `belief` entry of the registry.
///
/// Runs every cycle regardless of its enabled flag or score. Its
/// `execute` only records that a rewrite pass happened; the actual work is
/// the [`BeliefRewrite`] impl, which the agent calls after all strategies.
#[derive(Clone)]
pub struct BeliefStrategy {
    rule: Arc<dyn BeliefRewrite>,
}

impl BeliefStrategy {
    /// Action recorded for every execution.
    pub const ACTION: &'static str = "rewrite";

    /// Wrap a rewrite rule.
    pub fn new(rule: Arc<dyn BeliefRewrite>) -> Self {
        Self { rule }
    }

    /// Build the rule for a mode.
    pub fn from_mode(mode: BeliefMode, learning_rate: f64) -> Self {
        match mode {
            BeliefMode::Fixed => Self::new(Arc::new(FixedBeliefs)),
            BeliefMode::Reinforce => Self::new(Arc::new(ReinforcementRewrite::new(learning_rate))),
        }
    }
}

#[async_trait]
impl Strategy for BeliefStrategy {
    async fn execute(&self) -> Result<ExecutionResult, StrategyError> {
        Ok(ExecutionResult::success(Self::ACTION))
    }
}

#[async_trait]
impl BeliefRewrite for BeliefStrategy {
    async fn rewrite(
        &self,
        results: &[ExecutionResult],
        current: &BeliefScores,
    ) -> Result<BeliefScores, RewriteError> {
        self.rule.rewrite(results, current).await
    }
}
