#![deny(missing_docs)]
//! Notifier implementations for ralph.
//!
//! - [`TelegramNotifier`]: posts to the Telegram Bot API `sendMessage`.
//! - [`LogNotifier`]: emits the message as a `tracing` event; used when no
//!   channel is configured.

mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;
use ralph_core::error::NotifyError;
use ralph_core::notify::Notifier;

/// A [`Notifier`] that only logs. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    /// Create a new `LogNotifier`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        tracing::info!(message, "ralph.notify.log");
        Ok(())
    }

    async fn alert(&self, message: &str) -> Result<(), NotifyError> {
        tracing::warn!(message, "ralph.notify.alert");
        Ok(())
    }
}
