//! HTTP health probe

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{error, info, warn};

use crate::config::settings::Settings;
use crate::errors::GuardError;
use crate::health::HealthProbe;

/// GETs the endpoint and reports healthy only on an exact 200
pub struct HttpHealthProbe {
    client: Client,
    /// `None` when the check is disabled
    endpoint: Option<String>,
}

impl HttpHealthProbe {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Result<Self, GuardError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, GuardError> {
        let endpoint = (!settings.health_check_disabled())
            .then(|| settings.health_check_endpoint.trim().to_string());
        Self::new(endpoint, settings.health_check_timeout())
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn check(&self) -> bool {
        let Some(endpoint) = &self.endpoint else {
            info!("Skipping health check - no valid endpoint configured");
            return true;
        };

        info!("Performing health check against {}", endpoint);
        match self.client.get(endpoint).send().await {
            Ok(response) => {
                let status = response.status();
                let healthy = status == StatusCode::OK;
                if healthy {
                    info!(status = status.as_u16(), "Health check passed");
                } else {
                    warn!(status = status.as_u16(), "Health check failed");
                }
                healthy
            }
            Err(e) => {
                error!("Health check failed: {}", e);
                false
            }
        }
    }
}
