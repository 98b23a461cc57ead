//! The typed outcome of one cycle.

use ralph_core::id::StrategyName;
use ralph_core::result::{CycleSummary, ExecutionResult};
use serde::{Deserialize, Serialize};

/// A failure that was isolated during a cycle instead of aborting it.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CycleFault {
    /// A strategy returned an error. A failure record was still logged.
    Strategy {
        /// The failing strategy.
        strategy: StrategyName,
        /// Rendered error.
        error: String,
    },
    /// A store call failed while reading or logging for a strategy.
    Persistence {
        /// The strategy whose row or log entry was affected.
        strategy: StrategyName,
        /// Rendered error.
        error: String,
    },
    /// The belief-rewrite rule failed. Previous scores were kept.
    Rewrite {
        /// Rendered error.
        error: String,
    },
    /// The summary could not be delivered.
    Notification {
        /// Rendered error.
        error: String,
    },
}

/// Everything one cycle produced.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    /// 1-based cycle number within this agent's lifetime.
    pub cycle: u64,
    /// Results of the strategies that ran and returned `Ok`, in
    /// registration order.
    pub results: Vec<ExecutionResult>,
    /// Aggregate of `results`.
    pub summary: CycleSummary,
    /// Failures isolated along the way.
    pub faults: Vec<CycleFault>,
}

impl CycleReport {
    /// True when nothing was isolated.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Render the notification text for a cycle summary (Telegram Markdown).
pub fn format_summary(summary: &CycleSummary) -> String {
    format!(
        "🧬 *Ralph Agent Report*\n\n\
         ⚡ Strategies Executed: {}\n\
         ✅ Successful: {}\n\
         💰 Total P/L: {:.4} SOL\n\n\
         _Helix eternal. Empire compounds._",
        summary.executed, summary.successful, summary.total_profit
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_message_has_counts_and_four_decimals() {
        let results = vec![
            ExecutionResult::success("a").with_profit_loss(2.0),
            ExecutionResult::success("b").with_profit_loss(-0.5),
            ExecutionResult::failure("boom"),
        ];
        let message = format_summary(&CycleSummary::from_results(&results));
        assert!(message.starts_with("🧬 *Ralph Agent Report*"));
        assert!(message.contains("Strategies Executed: 3"));
        assert!(message.contains("Successful: 2"));
        assert!(message.contains("Total P/L: 1.5000 SOL"));
    }

    #[test]
    fn negative_profit_is_rendered_with_sign() {
        let results = vec![ExecutionResult::success("a").with_profit_loss(-0.25)];
        let message = format_summary(&CycleSummary::from_results(&results));
        assert!(message.contains("Total P/L: -0.2500 SOL"), "{message}");
    }

    #[test]
    fn fault_serializes_with_kind_tag() {
        let fault = CycleFault::Rewrite {
            error: "down".into(),
        };
        let json = serde_json::to_value(&fault).unwrap();
        assert_eq!(json["kind"], "rewrite");
        assert_eq!(json["error"], "down");
    }
}
