//! Utility functions

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::errors::GuardError;

/// Version information for the binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

/// Filesystem-safe backup prefix: ISO-8601 UTC with `:` and `.` replaced by `-`
pub fn backup_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Run `program` in `dir` and return its trimmed stdout.
///
/// A non-zero exit becomes [`GuardError::CommandError`] carrying stderr.
pub async fn run_command(program: &str, args: &[&str], dir: &Path) -> Result<String, GuardError> {
    debug!("Running {} {:?} in {}", program, args, dir.display());

    let output = Command::new(program)
        .current_dir(dir)
        .args(args)
        .output()
        .await
        .map_err(|e| GuardError::CommandError {
            program: program.to_string(),
            status: "spawn failure".to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(GuardError::CommandError {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
