//! Build and deploy tooling

pub mod shell;

use async_trait::async_trait;

use crate::errors::GuardError;

pub use shell::ShellToolchain;

/// Package/build tool invoked around a deployment
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Reinstall project dependencies
    async fn install(&self) -> Result<(), GuardError>;

    /// Rebuild the project
    async fn build(&self) -> Result<(), GuardError>;

    /// Run the deployment itself
    async fn deploy(&self) -> Result<(), GuardError>;
}
