//! The Notify protocol: best-effort delivery of preformatted text.

use crate::error::NotifyError;
use async_trait::async_trait;

/// Protocol ④: Notify
///
/// Accepts a preformatted message. Callers treat delivery as
/// fire-and-forget: a failure is recorded, never retried, and never
/// fails the cycle that produced the message.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a cycle summary or other informational message.
    async fn send(&self, message: &str) -> Result<(), NotifyError>;

    /// Deliver an alert. Defaults to [`Notifier::send`] with a marker prefix.
    async fn alert(&self, message: &str) -> Result<(), NotifyError> {
        self.send(&format!("⚠️ {message}")).await
    }
}
