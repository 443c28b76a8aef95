//! Capability traits implemented outside the core crate.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Failure;

/// A sink that delivers the failure report to an external channel.
///
/// Delivery is best-effort: the dispatcher logs a returned error and moves on
/// to the next notifier.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Identity used in logs and in the registry.
    fn name(&self) -> &str;

    /// Deliver the failures, in the order they were recorded.
    async fn send(&self, failures: &[Failure]) -> Result<()>;
}
