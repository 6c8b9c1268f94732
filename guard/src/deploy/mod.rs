//! Deployment orchestration

pub mod driver;

pub use driver::{DeployDriver, DeployOutcome};
