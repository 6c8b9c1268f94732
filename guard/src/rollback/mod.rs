//! Backup, retention and retry-bounded rollback

pub mod fsm;
pub mod manager;

pub use fsm::{RollbackEvent, RollbackFsm, RollbackState};
pub use manager::{Collaborators, RollbackConfig, RollbackManager, RollbackOutcome};
