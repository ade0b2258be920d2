//! Readiness probes for `/health/ready`

use async_trait::async_trait;

/// A dependency the server needs before it can take traffic.
#[async_trait]
pub trait ReadinessCheck: Send + Sync {
    fn name(&self) -> &str;
    async fn check(&self) -> Result<(), String>;
}
