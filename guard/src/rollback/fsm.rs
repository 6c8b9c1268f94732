//! Finite state machine for rollback attempts

use serde::{Deserialize, Serialize};

use crate::errors::GuardError;

/// Rollback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollbackState {
    /// Not started
    Idle,

    /// Running attempt `n` (1-based)
    Attempting(u32),

    /// An attempt finished with a healthy service
    Succeeded,

    /// Every attempt failed
    Failed,
}

/// Rollback event
#[derive(Debug, Clone)]
pub enum RollbackEvent {
    /// Start the first attempt
    Begin,

    /// The current attempt restored a healthy service
    AttemptSucceeded,

    /// The current attempt failed
    AttemptFailed(String),
}

/// Attempt counter for one rollback invocation.
///
/// `Attempting(max)` followed by a failure is terminal.
#[derive(Debug, Clone)]
pub struct RollbackFsm {
    state: RollbackState,
    max_attempts: u32,
    attempts_used: u32,
    last_error: Option<String>,
}

impl RollbackFsm {
    /// Create an idle FSM. `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            state: RollbackState::Idle,
            max_attempts: max_attempts.max(1),
            attempts_used: 0,
            last_error: None,
        }
    }

    pub fn state(&self) -> RollbackState {
        self.state
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Error of the most recent failed attempt
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Current attempt number, 0 before the first one
    pub fn attempt(&self) -> u32 {
        match self.state {
            RollbackState::Idle => 0,
            RollbackState::Attempting(n) => n,
            RollbackState::Succeeded | RollbackState::Failed => self.attempts_used,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, RollbackState::Succeeded | RollbackState::Failed)
    }

    /// Process an event and return the new state
    pub fn process(&mut self, event: RollbackEvent) -> Result<RollbackState, GuardError> {
        let new_state = match (self.state, &event) {
            (RollbackState::Idle, RollbackEvent::Begin) => RollbackState::Attempting(1),

            (RollbackState::Attempting(n), RollbackEvent::AttemptSucceeded) => {
                self.attempts_used = n;
                RollbackState::Succeeded
            }
            (RollbackState::Attempting(n), RollbackEvent::AttemptFailed(err)) => {
                self.last_error = Some(err.clone());
                self.attempts_used = n;
                if n < self.max_attempts {
                    RollbackState::Attempting(n + 1)
                } else {
                    RollbackState::Failed
                }
            }

            (state, event) => {
                return Err(GuardError::InvalidTransition(format!(
                    "{:?} -> {:?}",
                    state, event
                )));
            }
        };

        self.state = new_state;
        Ok(new_state)
    }
}
