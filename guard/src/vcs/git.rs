//! Git CLI backend

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::errors::GuardError;
use crate::utils::run_command;
use crate::vcs::VersionControl;

/// Shells out to `git` inside the project directory
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    async fn git(&self, args: &[&str]) -> Result<String, GuardError> {
        run_command("git", args, &self.repo_dir).await
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn current_commit(&self) -> Result<String, GuardError> {
        self.git(&["rev-parse", "HEAD"]).await
    }

    async fn current_branch(&self) -> Result<String, GuardError> {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    async fn reset_hard(&self, commit: &str) -> Result<(), GuardError> {
        info!("Resetting working tree to {}", commit);
        self.git(&["reset", "--hard", commit]).await?;
        Ok(())
    }

    async fn force_push(&self) -> Result<(), GuardError> {
        info!("Force-pushing rolled back branch");
        self.git(&["push", "--force"]).await?;
        Ok(())
    }
}
