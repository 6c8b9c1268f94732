//! Toolchain backed by configured shell commands

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::config::settings::Settings;
use crate::errors::GuardError;
use crate::toolchain::Toolchain;

/// Runs each command through `bash -c` inside the project directory,
/// inheriting stdio so build output stays visible
#[derive(Debug, Clone)]
pub struct ShellToolchain {
    project_dir: PathBuf,
    install_command: String,
    build_command: String,
    deploy_commands: Vec<String>,
}

impl ShellToolchain {
    pub fn new(
        project_dir: impl Into<PathBuf>,
        install_command: impl Into<String>,
        build_command: impl Into<String>,
        deploy_commands: Vec<String>,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            install_command: install_command.into(),
            build_command: build_command.into(),
            deploy_commands,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.project_dir,
            &settings.install_command,
            &settings.build_command,
            settings.deploy_commands.clone(),
        )
    }

    async fn run(&self, step: &str, command: &str) -> Result<(), GuardError> {
        if command.trim().is_empty() {
            info!("No {} command configured, skipping", step);
            return Ok(());
        }

        info!("Running {} command: {}", step, command);
        let status = Command::new("bash")
            .current_dir(&self.project_dir)
            .args(["-c", command])
            .status()
            .await
            .map_err(|e| GuardError::CommandError {
                program: command.to_string(),
                status: "spawn failure".to_string(),
                stderr: e.to_string(),
            })?;

        if !status.success() {
            return Err(GuardError::CommandError {
                program: command.to_string(),
                status: status.to_string(),
                stderr: format!("{step} command failed"),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Toolchain for ShellToolchain {
    async fn install(&self) -> Result<(), GuardError> {
        self.run("install", &self.install_command).await
    }

    async fn build(&self) -> Result<(), GuardError> {
        self.run("build", &self.build_command).await
    }

    async fn deploy(&self) -> Result<(), GuardError> {
        for command in &self.deploy_commands {
            self.run("deploy", command).await?;
        }
        Ok(())
    }
}
