//! Backup directory layout

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::filesys::dir::Dir;
use crate::filesys::file::File;

/// History file name inside the backup directory
pub const HISTORY_FILE: &str = "deployment-history.json";

/// Log file name inside the backup directory
pub const LOG_FILE: &str = "deployguard.log";

/// Where backups live relative to the project being deployed
#[derive(Debug, Clone)]
pub struct BackupLayout {
    /// Root of the deployed project; restored files land here
    pub project_dir: PathBuf,

    /// Directory holding snapshots and the history file
    pub backup_dir: PathBuf,
}

impl BackupLayout {
    pub fn new(project_dir: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            backup_dir: backup_dir.into(),
        }
    }

    pub fn backup_dir(&self) -> Dir {
        Dir::new(&self.backup_dir)
    }

    pub fn history_file(&self) -> File {
        self.backup_dir().file(HISTORY_FILE)
    }

    pub fn log_file(&self) -> PathBuf {
        self.backup_dir.join(LOG_FILE)
    }

    /// Snapshot path for `source` taken at `timestamp`
    pub fn backup_path(&self, timestamp: &str, source: &Path) -> PathBuf {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.backup_dir.join(format!("{timestamp}-{name}"))
    }

    /// Absolute location of a project-relative path
    pub fn project_path(&self, relative: &Path) -> PathBuf {
        self.project_dir.join(relative)
    }
}

/// First basename carried by more than one of `files`. Snapshots are named
/// by basename, so such files cannot be backed up side by side.
pub fn shared_basename(files: &[PathBuf]) -> Option<String> {
    let mut seen = HashSet::new();
    files
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .find(|name| !seen.insert(name.clone()))
}
