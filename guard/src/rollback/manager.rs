//! Rollback manager: backups, history retention and rollback

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::config::layout::{shared_basename, BackupLayout};
use crate::config::settings::Settings;
use crate::errors::GuardError;
use crate::filesys::file::File;
use crate::health::{HealthProbe, HttpHealthProbe};
use crate::history::{DeploymentHistory, DeploymentRecord};
use crate::notify::{Notifier, NotifyLevel};
use crate::rollback::fsm::{RollbackEvent, RollbackFsm, RollbackState};
use crate::toolchain::{ShellToolchain, Toolchain};
use crate::utils::backup_timestamp;
use crate::vcs::{GitCli, VersionControl};

/// Static rollback settings for one run
#[derive(Debug, Clone)]
pub struct RollbackConfig {
    pub max_rollback_attempts: u32,
    pub max_backups: usize,
    /// Project-relative files snapshotted before each deployment
    pub backup_files: Vec<PathBuf>,
}

impl Default for RollbackConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self::from(&settings)
    }
}

impl From<&Settings> for RollbackConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            max_rollback_attempts: settings.max_rollback_attempts,
            max_backups: settings.max_backups,
            backup_files: settings.backup_files.clone(),
        }
    }
}

/// External systems the manager drives
#[derive(Clone)]
pub struct Collaborators {
    pub vcs: Arc<dyn VersionControl>,
    pub toolchain: Arc<dyn Toolchain>,
    pub health: Arc<dyn HealthProbe>,
    pub notifier: Notifier,
}

/// Result of a successful rollback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackOutcome {
    /// Record that was restored
    pub target: DeploymentRecord,

    /// Attempts it took, starting at 1
    pub attempts: u32,
}

/// Owns the deployment history and every operation that touches it
pub struct RollbackManager {
    config: RollbackConfig,
    layout: BackupLayout,
    history: DeploymentHistory,
    vcs: Arc<dyn VersionControl>,
    toolchain: Arc<dyn Toolchain>,
    health: Arc<dyn HealthProbe>,
    notifier: Notifier,
}

impl RollbackManager {
    pub fn new(config: RollbackConfig, layout: BackupLayout, collaborators: Collaborators) -> Self {
        Self {
            config,
            layout,
            history: DeploymentHistory::new(),
            vcs: collaborators.vcs,
            toolchain: collaborators.toolchain,
            health: collaborators.health,
            notifier: collaborators.notifier,
        }
    }

    /// Build a manager backed by git, shell commands, HTTP and Slack
    pub fn from_settings(settings: &Settings) -> Result<Self, GuardError> {
        settings.validate()?;

        let collaborators = Collaborators {
            vcs: Arc::new(GitCli::new(&settings.project_dir)),
            toolchain: Arc::new(ShellToolchain::from_settings(settings)),
            health: Arc::new(HttpHealthProbe::from_settings(settings)?),
            notifier: Notifier::from_settings(settings)?,
        };
        let layout = BackupLayout::new(&settings.project_dir, settings.resolved_backup_dir());

        Ok(Self::new(RollbackConfig::from(settings), layout, collaborators))
    }

    pub fn config(&self) -> &RollbackConfig {
        &self.config
    }

    pub fn layout(&self) -> &BackupLayout {
        &self.layout
    }

    pub fn history(&self) -> &DeploymentHistory {
        &self.history
    }

    pub fn toolchain(&self) -> &Arc<dyn Toolchain> {
        &self.toolchain
    }

    /// Ensure the backup directory exists and load any persisted history
    pub async fn initialize(&mut self) -> Result<(), GuardError> {
        let dir = self.layout.backup_dir();
        if !dir.exists().await {
            info!("Creating backup directory {}", dir.path().display());
        }
        dir.ensure().await?;

        self.history = DeploymentHistory::load(&self.layout.history_file()).await;
        debug!("Deployment history has {} records", self.history.len());
        Ok(())
    }

    /// Snapshot the tracked files for the commit about to be deployed
    pub async fn create_deployment_backup(&mut self) -> Result<DeploymentRecord, GuardError> {
        self.create_deployment_backup_at(Utc::now()).await
    }

    /// [`create_deployment_backup`](Self::create_deployment_backup) with an explicit clock
    pub async fn create_deployment_backup_at(
        &mut self,
        at: DateTime<Utc>,
    ) -> Result<DeploymentRecord, GuardError> {
        if let Some(name) = shared_basename(&self.config.backup_files) {
            return Err(GuardError::ConfigError(format!(
                "Cannot back up two files named {name}"
            )));
        }

        let timestamp = backup_timestamp(at);
        let commit = self.vcs.current_commit().await?;
        let branch = self.vcs.current_branch().await?;
        let mut record = DeploymentRecord::new(timestamp, commit, branch);

        for relative in &self.config.backup_files {
            let source = File::new(self.layout.project_path(relative));
            if !source.exists().await {
                debug!("Not backing up missing file {}", relative.display());
                continue;
            }

            let dest = self.layout.backup_path(&record.timestamp, relative);
            source.copy_to(&dest).await?;
            record.files.push(dest);
        }

        info!(
            commit = record.short_commit(),
            branch = %record.branch,
            files = record.files.len(),
            "Created deployment backup {}",
            record.timestamp
        );

        self.history.push(record.clone());
        self.history.save(&self.layout.history_file()).await?;
        Ok(record)
    }

    /// Whether the deployed service is healthy; never fails
    pub async fn perform_health_check(&self) -> bool {
        self.health.check().await
    }

    /// Best-effort team notification
    pub async fn notify_team(&self, message: &str, level: NotifyLevel) {
        self.notifier.notify(message, level).await;
    }

    /// Revert to the deployment before the latest one.
    ///
    /// Fails with [`GuardError::NoPriorDeployment`] before touching anything
    /// when fewer than two records exist. Otherwise retries up to
    /// `max_rollback_attempts` times and fails with
    /// [`GuardError::RollbackExhausted`] once they are used up.
    pub async fn rollback(&self) -> Result<RollbackOutcome, GuardError> {
        let target = self
            .history
            .previous()
            .cloned()
            .ok_or(GuardError::NoPriorDeployment)?;

        let mut fsm = RollbackFsm::new(self.config.max_rollback_attempts);
        fsm.process(RollbackEvent::Begin)?;

        loop {
            let attempt = fsm.attempt();
            info!(
                "Attempting rollback ({}/{}) to {} on {}",
                attempt,
                fsm.max_attempts(),
                target.short_commit(),
                target.branch
            );

            match self.attempt_rollback(&target).await {
                Ok(()) => {
                    fsm.process(RollbackEvent::AttemptSucceeded)?;
                    self.notify_team("🔄 Rollback completed successfully", NotifyLevel::Info)
                        .await;
                    info!("Rollback completed successfully");
                    return Ok(RollbackOutcome {
                        target,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    error!(attempt, "Rollback failed: {}", e);
                    self.notify_team(&format!("❌ Rollback failed: {e}"), NotifyLevel::Error)
                        .await;

                    if fsm.process(RollbackEvent::AttemptFailed(e.to_string()))?
                        == RollbackState::Failed
                    {
                        return Err(GuardError::RollbackExhausted {
                            attempts: fsm.max_attempts(),
                            last_error: e.to_string(),
                        });
                    }
                    info!("Retrying rollback...");
                }
            }
        }
    }

    async fn attempt_rollback(&self, target: &DeploymentRecord) -> Result<(), GuardError> {
        self.vcs.reset_hard(&target.commit).await?;
        self.vcs.force_push().await?;

        let restored = self.restore_files(target).await?;
        debug!("Restored {} backed up files", restored);

        self.toolchain.install().await?;
        self.toolchain.build().await?;

        if !self.perform_health_check().await {
            return Err(GuardError::HealthCheckFailed(
                "Health check failed after rollback".to_string(),
            ));
        }
        Ok(())
    }

    async fn restore_files(&self, target: &DeploymentRecord) -> Result<usize, GuardError> {
        for backup in &target.files {
            let relative = target.restore_target(backup, &self.config.backup_files);
            let dest = self.layout.project_path(&relative);
            debug!("Restoring {} to {}", backup.display(), dest.display());
            File::new(backup).copy_to(&dest).await?;
        }
        Ok(target.files.len())
    }

    /// Trim the history to the newest `max_backups` records, deleting the
    /// backup files of the removed ones. Returns the removed records.
    pub async fn cleanup(&mut self) -> Result<Vec<DeploymentRecord>, GuardError> {
        let removed = self.history.trim(self.config.max_backups);
        if removed.is_empty() {
            debug!("History within retention, nothing to clean up");
            return Ok(removed);
        }

        for record in &removed {
            for backup in &record.files {
                if !File::new(backup).delete().await? {
                    warn!("Backup file already gone: {}", backup.display());
                }
            }
        }

        self.history.save(&self.layout.history_file()).await?;
        info!(
            removed = removed.len(),
            kept = self.history.len(),
            "Trimmed deployment history"
        );
        Ok(removed)
    }
}
