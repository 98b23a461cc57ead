#![deny(missing_docs)]
//! Registered strategies and belief-rewrite rules for ralph.
//!
//! The registry is fixed at startup: four trading strategies plus the
//! belief strategy, all sharing one [`RpcClient`]. The trading strategies
//! are placeholders that succeed with zero profit.

mod belief;
mod rpc;
mod stubs;

pub use belief::{BeliefMode, BeliefStrategy, FixedBeliefs, ReinforcementRewrite};
pub use rpc::{DEFAULT_ENDPOINT, RpcClient};
pub use stubs::{LiquiditySniffer, SignalSeeker, YieldHarvester, ZkFarmer};

use ralph_core::id::StrategyName;
use ralph_core::strategy::Strategy;
use std::sync::Arc;

/// Registry keys.
pub mod names {
    /// [`crate::YieldHarvester`].
    pub const YIELD: &str = "yield";
    /// [`crate::SignalSeeker`].
    pub const SIGNAL: &str = "signal";
    /// [`crate::LiquiditySniffer`].
    pub const LIQUIDITY: &str = "liquidity";
    /// [`crate::ZkFarmer`].
    pub const ZK: &str = "zk";
    /// [`crate::BeliefStrategy`]. Always runs.
    pub const BELIEF: &str = "belief";
}

/// The standard registry in registration order, with `belief` last.
///
/// The same `belief` instance should be handed to the agent as its
/// rewrite rule so the registry entry and the rewrite pass agree.
pub fn standard_strategies(
    rpc: Arc<RpcClient>,
    belief: Arc<BeliefStrategy>,
) -> Vec<(StrategyName, Arc<dyn Strategy>)> {
    let entries: [(&str, Arc<dyn Strategy>); 5] = [
        (names::YIELD, Arc::new(YieldHarvester::new(Arc::clone(&rpc)))),
        (names::SIGNAL, Arc::new(SignalSeeker::new(Arc::clone(&rpc)))),
        (names::LIQUIDITY, Arc::new(LiquiditySniffer::new(Arc::clone(&rpc)))),
        (names::ZK, Arc::new(ZkFarmer::new(rpc))),
        (names::BELIEF, belief),
    ];
    entries
        .into_iter()
        .map(|(name, strategy)| (StrategyName::new(name), strategy))
        .collect()
}
