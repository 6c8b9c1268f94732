//! deployguard
//!
//! Snapshots configuration before a deployment, verifies health afterwards,
//! and rolls back to the previous known-good commit when anything fails.

pub mod config;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod health;
pub mod history;
pub mod logs;
pub mod notify;
pub mod rollback;
pub mod toolchain;
pub mod utils;
pub mod vcs;
