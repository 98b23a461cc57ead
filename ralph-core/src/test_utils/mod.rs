//! Scripted implementations for testing.
//!
//! Available behind the `test-utils` feature flag. These are minimal
//! implementations that let agent and loop tests control every outcome.

mod gates;
mod notifiers;
mod rewrites;
mod strategies;

pub use gates::{ConstGate, SequenceGate};
pub use notifiers::{FailingNotifier, RecordingNotifier};
pub use rewrites::{FailingRewrite, ScriptedRewrite};
pub use strategies::{BlockingStrategy, FailingStrategy, FixedStrategy};
