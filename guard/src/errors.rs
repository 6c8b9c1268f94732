//! Error types for deployguard

use thiserror::Error;

/// Main error type
#[derive(Error, Debug)]
pub enum GuardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("`{program}` exited with {status}: {stderr}")]
    CommandError {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("No previous deployment found to roll back to")]
    NoPriorDeployment,

    #[error("Rollback failed after {attempts} attempts: {last_error}")]
    RollbackExhausted { attempts: u32, last_error: String },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GuardError {
    /// Whether the error ends the run without any further recovery
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GuardError::NoPriorDeployment | GuardError::RollbackExhausted { .. }
        )
    }
}
