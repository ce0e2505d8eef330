//! Market data source interface.

use async_trait::async_trait;

use crate::error::AcquisitionError;
use crate::models::snapshot::MarketSnapshot;

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Acquire one snapshot from `endpoint`. Resolves within the source's own
    /// timeout; it never hangs.
    async fn fetch_snapshot(&self, endpoint: &str) -> Result<MarketSnapshot, AcquisitionError>;
}
