//! Execution results, persisted execution records and cycle summaries.

use crate::id::StrategyName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action recorded when a result does not name one.
pub const UNKNOWN_ACTION: &str = "unknown";

/// What one strategy invocation produced.
///
/// Immutable once the agent has stamped the strategy name on it. Amounts
/// are plain `f64` token units; the stubs never fill them.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Registered name of the strategy. Set by the agent, not the strategy.
    #[serde(default)]
    pub strategy: StrategyName,
    /// What the strategy did (`harvest`, `seek`, ...).
    pub action: String,
    /// Input token mint or symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_in: Option<String>,
    /// Output token mint or symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_out: Option<String>,
    /// Amount sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_in: Option<f64>,
    /// Amount received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_out: Option<f64>,
    /// Fees paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_cost: Option<f64>,
    /// Realized profit (negative for a loss).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_loss: Option<f64>,
    /// Whether the invocation succeeded.
    pub success: bool,
    /// Error message for failed invocations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// A successful result for the given action.
    pub fn success(action: impl Into<String>) -> Self {
        Self {
            strategy: StrategyName::default(),
            action: action.into(),
            token_in: None,
            token_out: None,
            amount_in: None,
            amount_out: None,
            gas_cost: None,
            profit_loss: None,
            success: true,
            error: None,
        }
    }

    /// A failed result carrying an error message. The action is
    /// [`UNKNOWN_ACTION`] because the strategy never reported one.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::success(UNKNOWN_ACTION)
        }
    }

    /// Stamp the registered strategy name.
    #[must_use]
    pub fn with_strategy(mut self, name: StrategyName) -> Self {
        self.strategy = name;
        self
    }

    /// Set the realized profit or loss.
    #[must_use]
    pub fn with_profit_loss(mut self, profit_loss: f64) -> Self {
        self.profit_loss = Some(profit_loss);
        self
    }

    /// Set the swap legs.
    #[must_use]
    pub fn with_swap(
        mut self,
        token_in: impl Into<String>,
        amount_in: f64,
        token_out: impl Into<String>,
        amount_out: f64,
    ) -> Self {
        self.token_in = Some(token_in.into());
        self.amount_in = Some(amount_in);
        self.token_out = Some(token_out.into());
        self.amount_out = Some(amount_out);
        self
    }

    /// Set the fees paid.
    #[must_use]
    pub fn with_gas_cost(mut self, gas_cost: f64) -> Self {
        self.gas_cost = Some(gas_cost);
        self
    }
}

/// One row of the append-only execution log.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// The result as the strategy produced it (or the synthetic failure).
    #[serde(flatten)]
    pub result: ExecutionResult,
    /// When the attempt was logged.
    pub executed_at: DateTime<Utc>,
}

impl ExecutionRecord {
    /// Create a record stamped with the current time.
    pub fn now(result: ExecutionResult) -> Self {
        Self {
            result,
            executed_at: Utc::now(),
        }
    }
}

/// Aggregate of one cycle's results, as sent in the notification.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSummary {
    /// Number of results in the cycle.
    pub executed: usize,
    /// Results with `success == true`.
    pub successful: usize,
    /// Sum of `profit_loss` across results (absent counts as zero).
    pub total_profit: f64,
}

impl CycleSummary {
    /// Fold a slice of results into a summary.
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        Self {
            executed: results.len(),
            successful: results.iter().filter(|r| r.success).count(),
            total_profit: results.iter().filter_map(|r| r.profit_loss).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_successes_and_sums_profit() {
        let results = vec![
            ExecutionResult::success("a").with_profit_loss(2.0),
            ExecutionResult::success("b").with_profit_loss(-0.5),
            ExecutionResult::failure("boom"),
        ];
        let summary = CycleSummary::from_results(&results);
        assert_eq!(summary.executed, 3);
        assert_eq!(summary.successful, 2);
        assert!((summary.total_profit - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_of_empty_cycle_is_zero() {
        assert_eq!(CycleSummary::from_results(&[]), CycleSummary::default());
    }

    #[test]
    fn failure_has_unknown_action() {
        let r = ExecutionResult::failure("rpc down");
        assert!(!r.success);
        assert_eq!(r.action, UNKNOWN_ACTION);
        assert_eq!(r.error.as_deref(), Some("rpc down"));
    }

    #[test]
    fn result_serializes_camel_case_and_skips_empty_fields() {
        let r = ExecutionResult::success("harvest")
            .with_strategy("yield".into())
            .with_profit_loss(0.0);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["profitLoss"], serde_json::json!(0.0));
        assert_eq!(json["strategy"], serde_json::json!("yield"));
        assert!(json.get("tokenIn").is_none());
    }

    #[test]
    fn record_flattens_result() {
        let record = ExecutionRecord::now(ExecutionResult::success("seek"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["action"], serde_json::json!("seek"));
        assert!(json.get("executedAt").is_some());
    }
}
