//! Deploy driver: backup, deploy, verify, clean up, or roll back

use tracing::{error, info};

use crate::errors::GuardError;
use crate::history::DeploymentRecord;
use crate::rollback::{RollbackManager, RollbackOutcome};

/// How a deploy run ended when it did not fail outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Deployed, verified and cleaned up
    Deployed {
        record: DeploymentRecord,
        /// Records dropped by retention
        trimmed: usize,
    },

    /// The deployment failed and the previous one was restored
    RolledBack {
        /// Why the deployment was abandoned
        cause: String,
        rollback: RollbackOutcome,
    },
}

/// Sequences one deployment run over a [`RollbackManager`]
pub struct DeployDriver {
    manager: RollbackManager,
}

impl DeployDriver {
    pub fn new(manager: RollbackManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &RollbackManager {
        &self.manager
    }

    pub fn into_manager(self) -> RollbackManager {
        self.manager
    }

    /// Run the deployment. Any failure triggers a rollback; only a failed
    /// rollback is returned as an error.
    pub async fn run(&mut self) -> Result<DeployOutcome, GuardError> {
        match self.deploy().await {
            Ok(outcome) => Ok(outcome),
            Err(cause) => {
                error!("Deployment failed: {}", cause);
                let rollback = self.manager.rollback().await?;
                Ok(DeployOutcome::RolledBack {
                    cause: cause.to_string(),
                    rollback,
                })
            }
        }
    }

    async fn deploy(&mut self) -> Result<DeployOutcome, GuardError> {
        self.manager.initialize().await?;
        let record = self.manager.create_deployment_backup().await?;

        info!("Running deployment commands");
        self.manager.toolchain().deploy().await?;

        if !self.manager.perform_health_check().await {
            return Err(GuardError::HealthCheckFailed(
                "Deployment health check failed".to_string(),
            ));
        }

        let trimmed = self.manager.cleanup().await?.len();
        info!(commit = record.short_commit(), "Deployment completed successfully");
        Ok(DeployOutcome::Deployed { record, trimmed })
    }
}
