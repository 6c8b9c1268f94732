//! Post-deployment health verification

pub mod probe;

use async_trait::async_trait;

pub use probe::HttpHealthProbe;

/// Answers whether the deployed service is healthy. Never fails: any error
/// reaching the service counts as unhealthy.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> bool;
}
