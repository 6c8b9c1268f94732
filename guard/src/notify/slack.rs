//! Slack-compatible incoming webhook channel

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::errors::GuardError;
use crate::notify::{Notification, NotifyChannel};

/// Webhook request body
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SlackPayload<'a> {
    pub text: &'a str,
    pub color: &'a str,
}

impl<'a> From<&'a Notification> for SlackPayload<'a> {
    fn from(notification: &'a Notification) -> Self {
        Self {
            text: &notification.message,
            color: notification.level.color(),
        }
    }
}

/// Posts `{text, color}` JSON to a webhook URL
pub struct SlackChannel {
    webhook_url: String,
    client: Client,
}

impl SlackChannel {
    pub fn new(webhook_url: String) -> Result<Self, GuardError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            webhook_url,
            client,
        })
    }
}

#[async_trait]
impl NotifyChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, notification: &Notification) -> Result<(), GuardError> {
        debug!("POST {} (notification)", self.webhook_url);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&SlackPayload::from(notification))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GuardError::Internal(format!(
                "Webhook rejected notification: {} - {}",
                status, body
            )));
        }

        Ok(())
    }
}
