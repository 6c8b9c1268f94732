//! deployguard - Entry Point
//!
//! Snapshots configuration, deploys, verifies health and rolls back to the
//! previous known-good commit when the deployment does not come up healthy.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use deployguard::config::layout::BackupLayout;
use deployguard::config::settings::Settings;
use deployguard::deploy::{DeployDriver, DeployOutcome};
use deployguard::history::DeploymentHistory;
use deployguard::logs::{init_logging, LogLevel, LogOptions};
use deployguard::rollback::RollbackManager;
use deployguard::utils::version_info;

use tracing::{error, info};

/// Commands in the order they are looked up on the command line
const COMMANDS: [&str; 6] = ["rollback", "backup", "cleanup", "health", "history", "deploy"];

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to render version info: {e}"),
        }
        return ExitCode::SUCCESS;
    }

    let command = COMMANDS
        .iter()
        .find(|c| cli_args.contains_key(**c))
        .copied()
        .unwrap_or("deploy");

    match run(command, &cli_args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("[ERROR] {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: &str, cli_args: &HashMap<String, String>) -> anyhow::Result<()> {
    let config_path = cli_args.get("config").map(PathBuf::from);
    let mut settings = Settings::load(config_path.as_deref())
        .await
        .context("Unable to load settings")?;

    if let Some(dir) = cli_args.get("backup-dir") {
        settings.backup_dir = PathBuf::from(dir);
    }
    if let Some(endpoint) = cli_args.get("endpoint") {
        settings.health_check_endpoint = endpoint.clone();
    }
    if let Some(level) = cli_args.get("log-level") {
        settings.log_level = level
            .parse::<LogLevel>()
            .map_err(anyhow::Error::msg)
            .context("Invalid --log-level")?;
    }

    let log_options = LogOptions {
        log_level: settings.log_level,
        json_format: cli_args.contains_key("log-json"),
        log_file: cli_args.contains_key("log-file").then(|| {
            BackupLayout::new(&settings.project_dir, settings.resolved_backup_dir()).log_file()
        }),
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            println!("Failed to initialize logging: {e}");
            None
        }
    };

    let mut manager =
        RollbackManager::from_settings(&settings).context("Invalid configuration")?;
    info!("Running deployguard {}", command);

    match command {
        "rollback" => {
            manager.initialize().await?;
            let outcome = manager.rollback().await?;
            println!(
                "Rolled back to {} ({}) after {} attempt(s)",
                outcome.target.commit, outcome.target.branch, outcome.attempts
            );
        }
        "backup" => {
            manager.initialize().await?;
            let record = manager.create_deployment_backup().await?;
            println!(
                "Backed up {} file(s) for {} as {}",
                record.files.len(),
                record.commit,
                record.timestamp
            );
        }
        "cleanup" => {
            manager.initialize().await?;
            let removed = manager.cleanup().await?;
            println!("Removed {} old deployment(s)", removed.len());
        }
        "health" => {
            if !manager.perform_health_check().await {
                anyhow::bail!("Service is unhealthy");
            }
            println!("Service is healthy");
        }
        "history" => {
            let history = DeploymentHistory::load(&manager.layout().history_file()).await;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        _ => {
            let mut driver = DeployDriver::new(manager);
            match driver.run().await? {
                DeployOutcome::Deployed { record, trimmed } => {
                    println!(
                        "Deployed {} ({}), {} old backup(s) trimmed",
                        record.commit, record.branch, trimmed
                    );
                }
                DeployOutcome::RolledBack { cause, rollback } => {
                    println!(
                        "Deployment failed ({}); rolled back to {} after {} attempt(s)",
                        cause, rollback.target.commit, rollback.attempts
                    );
                    anyhow::bail!("Deployment was rolled back");
                }
            }
        }
    }

    Ok(())
}
