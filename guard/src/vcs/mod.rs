//! Version control access

pub mod git;

use async_trait::async_trait;

use crate::errors::GuardError;

pub use git::GitCli;

/// Version control operations needed for backup and rollback
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Hash of the checked-out commit
    async fn current_commit(&self) -> Result<String, GuardError>;

    /// Name of the checked-out branch
    async fn current_branch(&self) -> Result<String, GuardError>;

    /// Hard-reset the working tree to `commit`
    async fn reset_hard(&self, commit: &str) -> Result<(), GuardError>;

    /// Force-push the current branch to its upstream
    async fn force_push(&self) -> Result<(), GuardError>;
}
