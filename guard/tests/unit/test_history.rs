//! Deployment history persistence tests

use std::path::PathBuf;

use deployguard::config::layout::BackupLayout;
use deployguard::history::{DeploymentHistory, DeploymentRecord};

fn record(commit: &str) -> DeploymentRecord {
    let mut record = DeploymentRecord::new(format!("2026-10-15T09-0{commit}-00-000Z"), commit, "main");
    record
        .files
        .push(PathBuf::from(format!(".deployment-backups/{}-package.json", record.timestamp)));
    record
}

#[tokio::test]
async fn test_save_then_load_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let layout = BackupLayout::new(dir.path(), dir.path().join(".deployment-backups"));
    layout.backup_dir().ensure().await.unwrap();
    let file = layout.history_file();

    let history =
        DeploymentHistory::from_records(["1", "2", "3"].into_iter().map(record).collect());
    history.save(&file).await.unwrap();

    let loaded = DeploymentHistory::load(&file).await;
    assert_eq!(loaded, history);
    let commits: Vec<_> = loaded.records().iter().map(|r| r.commit.as_str()).collect();
    assert_eq!(commits, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_history_file_is_a_plain_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let layout = BackupLayout::new(dir.path(), dir.path());
    let history = DeploymentHistory::from_records(vec![record("1")]);
    history.save(&layout.history_file()).await.unwrap();

    let raw = std::fs::read_to_string(layout.history_file().path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "timestamp": "2026-10-15T09-01-00-000Z",
            "commit": "1",
            "branch": "main",
            "files": [".deployment-backups/2026-10-15T09-01-00-000Z-package.json"]
        }])
    );
    // Atomic writes leave no temp file behind
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[tokio::test]
async fn test_missing_file_loads_empty_without_creating_it() {
    let dir = tempfile::tempdir().unwrap();
    let layout = BackupLayout::new(dir.path(), dir.path().join(".deployment-backups"));

    let history = DeploymentHistory::load(&layout.history_file()).await;

    assert!(history.is_empty());
    assert!(!layout.backup_dir.exists());
}

#[tokio::test]
async fn test_corrupt_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let layout = BackupLayout::new(dir.path(), dir.path());
    std::fs::write(layout.history_file().path(), "{ not json").unwrap();

    let history = DeploymentHistory::load(&layout.history_file()).await;

    assert!(history.is_empty());
}

#[tokio::test]
async fn test_trimmed_history_persists() {
    let dir = tempfile::tempdir().unwrap();
    let layout = BackupLayout::new(dir.path(), dir.path());
    let mut history = DeploymentHistory::from_records(
        ["1", "2", "3", "4", "5", "6", "7"].into_iter().map(record).collect(),
    );

    let removed = history.trim(5);
    history.save(&layout.history_file()).await.unwrap();

    assert_eq!(removed.len(), 2);
    let loaded = DeploymentHistory::load(&layout.history_file()).await;
    let commits: Vec<_> = loaded.records().iter().map(|r| r.commit.as_str()).collect();
    assert_eq!(commits, vec!["3", "4", "5", "6", "7"]);
}
