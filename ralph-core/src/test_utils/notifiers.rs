//! Notifiers that record or refuse messages.

use crate::error::NotifyError;
use crate::notify::Notifier;
use async_trait::async_trait;
use std::sync::Mutex;

/// A notifier that records every message for inspection.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every delivered message, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(message.to_owned());
        Ok(())
    }
}

/// A notifier whose channel is always down.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _message: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("channel unavailable".into()))
    }
}
