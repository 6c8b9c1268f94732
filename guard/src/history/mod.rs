//! Deployment history

pub mod record;
pub mod store;

pub use record::DeploymentRecord;
pub use store::DeploymentHistory;
