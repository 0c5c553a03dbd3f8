use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use thoughtnet_common::Item;

/// One retrieval capability per source. Implementations own their
/// protocol, auth and pagination details; the orchestrator only sees
/// `fetch(query, limit)`.
///
/// Contract: missing credentials yield `Ok(vec![])` with a warning, not an
/// error. A returned error is absorbed by the orchestrator as zero items.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Provenance tag stamped on produced items.
    fn name(&self) -> &'static str;

    /// Per-source fetch deadline. A slow source must not stall sub-queries
    /// that depend on faster sources.
    fn timeout(&self) -> Duration {
        Duration::from_secs(8)
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Item>>;
}
