//! Deployment record model

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One backup snapshot, tied to the commit that was about to be deployed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Backup prefix, e.g. `2026-10-15T09-30-00-123Z`
    pub timestamp: String,

    /// Commit hash of HEAD at backup time
    pub commit: String,

    /// Branch name of HEAD at backup time
    pub branch: String,

    /// Paths of the snapshot copies
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

impl DeploymentRecord {
    pub fn new(timestamp: impl Into<String>, commit: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            commit: commit.into(),
            branch: branch.into(),
            files: Vec::new(),
        }
    }

    /// Project-relative path a snapshot restores to.
    ///
    /// The timestamp prefix is stripped from the snapshot name and the rest
    /// is matched against `tracked` by basename. Unmatched names restore to
    /// the project root.
    pub fn restore_target(&self, backup: &Path, tracked: &[PathBuf]) -> PathBuf {
        let name = backup
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let prefix = format!("{}-", self.timestamp);
        let original = name.strip_prefix(&prefix).unwrap_or(&name);

        tracked
            .iter()
            .find(|path| {
                path.file_name()
                    .map(|n| n.to_string_lossy() == original)
                    .unwrap_or(false)
            })
            .cloned()
            .unwrap_or_else(|| PathBuf::from(original))
    }

    /// Short commit hash for log lines
    pub fn short_commit(&self) -> &str {
        self.commit.get(..7).unwrap_or(&self.commit)
    }
}
