//! The four trading strategies. All are placeholders: they hold the chain
//! connection and report a zero-profit success without touching it.

use crate::rpc::RpcClient;
use async_trait::async_trait;
use ralph_core::error::StrategyError;
use ralph_core::result::ExecutionResult;
use ralph_core::strategy::Strategy;
use std::sync::Arc;

macro_rules! stub_strategy {
    ($name:ident, $action:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone)]
        pub struct $name {
            rpc: Arc<RpcClient>,
        }

        impl $name {
            /// Action recorded for every execution.
            pub const ACTION: &'static str = $action;

            /// Create the strategy over a shared connection.
            pub fn new(rpc: Arc<RpcClient>) -> Self {
                Self { rpc }
            }

            /// The chain connection this strategy holds.
            pub fn connection(&self) -> &RpcClient {
                &self.rpc
            }
        }

        #[async_trait]
        impl Strategy for $name {
            async fn execute(&self) -> Result<ExecutionResult, StrategyError> {
                tracing::debug!(
                    strategy = stringify!($name),
                    action = Self::ACTION,
                    "ralph.strategy.stub"
                );
                Ok(ExecutionResult::success(Self::ACTION).with_profit_loss(0.0))
            }
        }
    };
}

stub_strategy!(YieldHarvester, "harvest", "Harvests staking and LP yield.");
stub_strategy!(SignalSeeker, "seek", "Watches on-chain signals for entries.");
stub_strategy!(LiquiditySniffer, "sniff", "Looks for fresh liquidity pools.");
stub_strategy!(ZkFarmer, "farm", "Farms ZK-rollup airdrop eligibility.");

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc() -> Arc<RpcClient> {
        Arc::new(RpcClient::new("http://127.0.0.1:8899"))
    }

    #[tokio::test]
    async fn stubs_report_zero_profit_success() {
        let strategies: Vec<(Box<dyn Strategy>, &str)> = vec![
            (Box::new(YieldHarvester::new(rpc())), "harvest"),
            (Box::new(SignalSeeker::new(rpc())), "seek"),
            (Box::new(LiquiditySniffer::new(rpc())), "sniff"),
            (Box::new(ZkFarmer::new(rpc())), "farm"),
        ];
        for (strategy, action) in strategies {
            let result = strategy.execute().await.unwrap();
            assert!(result.success);
            assert_eq!(result.action, action);
            assert_eq!(result.profit_loss, Some(0.0));
        }
    }

    #[test]
    fn stubs_share_one_connection() {
        let shared = rpc();
        let a = YieldHarvester::new(Arc::clone(&shared));
        let b = ZkFarmer::new(Arc::clone(&shared));
        assert_eq!(a.connection().endpoint(), b.connection().endpoint());
        assert_eq!(Arc::strong_count(&shared), 3);
    }
}
