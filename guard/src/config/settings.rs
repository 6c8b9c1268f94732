//! Settings file management

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::layout::shared_basename;
use crate::errors::GuardError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Settings file looked up in the working directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "deployguard.json";

/// Endpoint value that leaves the health check disabled
pub const HEALTH_CHECK_SENTINEL: &str = "/api/health";

/// Environment variable consulted when no webhook is configured
pub const ENV_SLACK_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";

/// Settings for one deployguard run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Rollback attempts before giving up
    #[serde(default = "default_max_rollback_attempts")]
    pub max_rollback_attempts: u32,

    /// Health endpoint URL, or the disabled sentinel
    #[serde(default = "default_health_check_endpoint")]
    pub health_check_endpoint: String,

    /// Health request timeout in milliseconds
    #[serde(default = "default_health_check_timeout")]
    pub health_check_timeout: u64,

    /// Where backups and the history file live
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,

    /// Slack-compatible incoming webhook
    #[serde(default)]
    pub slack_webhook: Option<String>,

    /// History records kept by cleanup
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,

    /// Root of the project being deployed
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,

    /// Files snapshotted before each deployment, relative to `project_dir`
    #[serde(default = "default_backup_files")]
    pub backup_files: Vec<PathBuf>,

    #[serde(default = "default_install_command")]
    pub install_command: String,

    #[serde(default = "default_build_command")]
    pub build_command: String,

    /// Commands run in order by the deploy step
    #[serde(default = "default_deploy_commands")]
    pub deploy_commands: Vec<String>,

    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_max_rollback_attempts() -> u32 {
    3
}

fn default_health_check_endpoint() -> String {
    HEALTH_CHECK_SENTINEL.to_string()
}

fn default_health_check_timeout() -> u64 {
    30_000
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from(".deployment-backups")
}

fn default_max_backups() -> usize {
    5
}

fn default_project_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_backup_files() -> Vec<PathBuf> {
    vec![
        PathBuf::from("package.json"),
        PathBuf::from("amplify/backend/backend-config.json"),
        PathBuf::from("src/aws-exports.js"),
    ]
}

fn default_install_command() -> String {
    "npm install --legacy-peer-deps".to_string()
}

fn default_build_command() -> String {
    "npm run build".to_string()
}

fn default_deploy_commands() -> Vec<String> {
    vec!["npm run build".to_string(), "amplify push".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_rollback_attempts: default_max_rollback_attempts(),
            health_check_endpoint: default_health_check_endpoint(),
            health_check_timeout: default_health_check_timeout(),
            backup_dir: default_backup_dir(),
            slack_webhook: None,
            max_backups: default_max_backups(),
            project_dir: default_project_dir(),
            backup_files: default_backup_files(),
            install_command: default_install_command(),
            build_command: default_build_command(),
            deploy_commands: default_deploy_commands(),
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from [`DEFAULT_SETTINGS_FILE`] when it
    /// exists, falling back to defaults. Environment overrides are applied
    /// afterwards.
    pub async fn load(path: Option<&Path>) -> Result<Self, GuardError> {
        let mut settings = match path {
            Some(path) => {
                let file = File::new(path);
                if !file.exists().await {
                    return Err(GuardError::ConfigError(format!(
                        "Settings file not found: {}",
                        path.display()
                    )));
                }
                file.read_json::<Settings>().await?
            }
            None => {
                let file = File::new(DEFAULT_SETTINGS_FILE);
                if file.exists().await {
                    debug!("Loading settings from {}", DEFAULT_SETTINGS_FILE);
                    file.read_json::<Settings>().await?
                } else {
                    Settings::default()
                }
            }
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Fill unset values from the environment. A blank webhook counts as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.webhook().is_none() {
            self.slack_webhook = lookup(ENV_SLACK_WEBHOOK_URL).filter(|v| !v.trim().is_empty());
        }
    }

    /// Reject settings the rollback manager cannot work with
    pub fn validate(&self) -> Result<(), GuardError> {
        if self.max_rollback_attempts == 0 {
            return Err(GuardError::ConfigError(
                "maxRollbackAttempts must be at least 1".to_string(),
            ));
        }

        if self.max_backups == 0 {
            return Err(GuardError::ConfigError(
                "maxBackups must be at least 1".to_string(),
            ));
        }

        if !self.health_check_disabled() {
            validate_http_url("healthCheckEndpoint", &self.health_check_endpoint)?;
        }

        if let Some(webhook) = self.webhook() {
            validate_http_url("slackWebhook", webhook)?;
        }

        if let Some(name) = shared_basename(&self.backup_files) {
            return Err(GuardError::ConfigError(format!(
                "backupFiles lists more than one file named {name}"
            )));
        }

        Ok(())
    }

    /// Configured webhook, `None` when unset or blank
    pub fn webhook(&self) -> Option<&str> {
        self.slack_webhook
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Whether the health endpoint is empty or the default sentinel
    pub fn health_check_disabled(&self) -> bool {
        let endpoint = self.health_check_endpoint.trim();
        endpoint.is_empty() || endpoint == HEALTH_CHECK_SENTINEL
    }

    pub fn health_check_timeout(&self) -> Duration {
        Duration::from_millis(self.health_check_timeout)
    }

    /// Backup directory, resolved against the project directory when relative
    pub fn resolved_backup_dir(&self) -> PathBuf {
        if self.backup_dir.is_absolute() {
            self.backup_dir.clone()
        } else {
            self.project_dir.join(&self.backup_dir)
        }
    }
}

fn validate_http_url(key: &str, value: &str) -> Result<(), GuardError> {
    let url = Url::parse(value)
        .map_err(|e| GuardError::ConfigError(format!("{key} is not a valid URL ({value}): {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(GuardError::ConfigError(format!(
            "{key} must use http or https, got {scheme}"
        ))),
    }
}
