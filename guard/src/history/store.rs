//! Persisted, retention-bounded deployment history

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::GuardError;
use crate::filesys::file::File;
use crate::history::record::DeploymentRecord;

/// Records in creation order, oldest first.
///
/// Only [`push`](Self::push) and [`trim`](Self::trim) mutate the list, so
/// the order is always creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentHistory {
    records: Vec<DeploymentRecord>,
}

impl DeploymentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<DeploymentRecord>) -> Self {
        Self { records }
    }

    /// Load from `file`. A missing or unreadable file yields an empty history.
    pub async fn load(file: &File) -> Self {
        if !file.exists().await {
            debug!("No deployment history at {}", file.path().display());
            return Self::new();
        }

        match file.read_json::<DeploymentHistory>().await {
            Ok(history) => {
                debug!("Loaded {} deployment records", history.len());
                history
            }
            Err(e) => {
                warn!(
                    "Ignoring unreadable deployment history {}: {}",
                    file.path().display(),
                    e
                );
                Self::new()
            }
        }
    }

    pub async fn save(&self, file: &File) -> Result<(), GuardError> {
        file.write_json(self).await
    }

    pub fn records(&self) -> &[DeploymentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record
    pub fn latest(&self) -> Option<&DeploymentRecord> {
        self.records.last()
    }

    /// The record before the latest one, i.e. the last deployment that was
    /// not the one currently being attempted
    pub fn previous(&self) -> Option<&DeploymentRecord> {
        self.records.len().checked_sub(2).map(|i| &self.records[i])
    }

    pub fn push(&mut self, record: DeploymentRecord) {
        self.records.push(record);
    }

    /// Keep the newest `keep` records and return the removed ones, oldest first
    pub fn trim(&mut self, keep: usize) -> Vec<DeploymentRecord> {
        let excess = self.records.len().saturating_sub(keep);
        self.records.drain(..excess).collect()
    }
}
