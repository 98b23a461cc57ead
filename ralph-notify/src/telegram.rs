//! Telegram Bot API notifier.

use async_trait::async_trait;
use ralph_core::error::NotifyError;
use ralph_core::notify::Notifier;
use serde_json::json;

/// Default Telegram Bot API base URL.
const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Posts messages to one chat through a bot.
///
/// Messages are sent with `parse_mode: "Markdown"`, so `*bold*` and
/// `_italic_` in the cycle report render.
///
/// # Example
///
/// ```no_run
/// use ralph_notify::TelegramNotifier;
///
/// let notifier = TelegramNotifier::new("123:ABC", "-1001234")
///     .base_url("https://api.telegram.org");
/// ```
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    /// Create a notifier for the given bot token and chat.
    #[must_use]
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            base_url: DEFAULT_BASE_URL.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the API base URL.
    ///
    /// Useful for testing with a local mock server or a proxy.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Build the sendMessage endpoint URL.
    pub(crate) fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.bot_token)
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let body = json!({
            "chat_id": self.chat_id,
            "text": message,
            "parse_mode": "Markdown",
        });

        tracing::debug!(chat_id = %self.chat_id, len = message.len(), "ralph.notify.telegram");

        let response = self
            .client
            .post(self.send_message_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_embeds_token() {
        let n = TelegramNotifier::new("42:secret", "1").base_url("http://localhost:9");
        assert_eq!(n.send_message_url(), "http://localhost:9/bot42:secret/sendMessage");
    }

    #[test]
    fn debug_hides_token() {
        let n = TelegramNotifier::new("42:secret", "chat");
        let out = format!("{n:?}");
        assert!(!out.contains("secret"));
        assert!(out.contains("chat"));
    }
}
