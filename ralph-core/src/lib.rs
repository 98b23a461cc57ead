//! # ralph-core: Protocol traits for the Ralph strategy loop
//!
//! This crate defines the boundaries that compose into one belief-weighted
//! execution loop. Backends (stores, notifiers, strategies) live in their
//! own crates and only depend on this one.
//!
//! ## The Protocols
//!
//! | Protocol | Trait | What it does |
//! |----------|-------|-------------|
//! | ① Strategy | [`Strategy`] | One unit of work executed per cycle |
//! | ② Belief | [`BeliefRewrite`] | Recompute belief scores from a cycle's results |
//! | ③ Store | [`StrategyStore`] | Strategy registry + append-only execution log |
//! | ④ Notify | [`Notifier`] | Deliver a preformatted cycle summary |
//! | ⑤ Gate | [`Gate`] | The Bernoulli draw that admits a strategy |
//!
//! ## Design Principle
//!
//! Every trait is operation-defined. [`Strategy::execute`] means "do this
//! strategy's work once", not "send a transaction". A stub, a swap router
//! and a mock all implement the same trait, and the agent that drives them
//! does not know which one it holds.
//!
//! Traits use `async-trait` so they stay object-safe behind `Arc<dyn _>`.

#![deny(missing_docs)]

pub mod belief;
pub mod error;
pub mod gate;
pub mod id;
pub mod notify;
pub mod result;
pub mod store;
pub mod strategy;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use belief::{BeliefScores, DEFAULT_BELIEF_SCORE};
pub use error::{CycleError, NotifyError, RewriteError, StoreError, StrategyError};
pub use gate::Gate;
pub use id::StrategyName;
pub use notify::Notifier;
pub use result::{CycleSummary, ExecutionRecord, ExecutionResult};
pub use store::{ExecutionQuery, StrategyRecord, StrategyStore, StrategyUpdate};
pub use strategy::{BeliefRewrite, Strategy};
