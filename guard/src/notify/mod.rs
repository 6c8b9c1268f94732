//! Team notifications.
//!
//! [`Notifier`] is best-effort: it hands a [`Notification`] to at most one
//! [`NotifyChannel`] and only logs delivery failures, so a broken webhook can
//! never change the outcome of a deployment or rollback.

pub mod slack;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::settings::Settings;
use crate::errors::GuardError;

pub use slack::SlackChannel;

/// Notification severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    #[default]
    Info,
    Error,
}

impl NotifyLevel {
    /// Slack attachment color
    pub fn color(&self) -> &'static str {
        match self {
            NotifyLevel::Info => "good",
            NotifyLevel::Error => "danger",
        }
    }
}

/// A message for the team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotifyLevel,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotifyLevel) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }
}

/// Delivery transport for notifications
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, notification: &Notification) -> Result<(), GuardError>;
}

/// Best-effort dispatcher
#[derive(Clone, Default)]
pub struct Notifier {
    channel: Option<Arc<dyn NotifyChannel>>,
}

impl Notifier {
    pub fn new(channel: Arc<dyn NotifyChannel>) -> Self {
        Self {
            channel: Some(channel),
        }
    }

    /// A notifier that never sends anything
    pub fn disabled() -> Self {
        Self { channel: None }
    }

    /// Slack notifier when a webhook is configured, disabled otherwise
    pub fn from_settings(settings: &Settings) -> Result<Self, GuardError> {
        match settings.webhook() {
            Some(url) => Ok(Self::new(Arc::new(SlackChannel::new(url.to_string())?))),
            None => Ok(Self::disabled()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.channel.is_some()
    }

    /// Send `message`, logging instead of returning any failure
    pub async fn notify(&self, message: &str, level: NotifyLevel) {
        let Some(channel) = &self.channel else {
            debug!("No notification channel configured, skipping");
            return;
        };

        let notification = Notification::new(message, level);
        match channel.send(&notification).await {
            Ok(()) => debug!(channel = channel.name(), "Notification sent"),
            Err(e) => error!(
                channel = channel.name(),
                error = %e,
                "Failed to send notification"
            ),
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("channel", &self.channel.as_ref().map(|c| c.name()))
            .finish()
    }
}
