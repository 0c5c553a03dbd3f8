//! Concurrent fan-out over (sub-query × source) pairs.
//!
//! One fetch task per pair, all launched together and awaited as a single
//! batch. A failing or timed-out task contributes zero items and is
//! logged; it never aborts siblings or surfaces to the caller. Filtering
//! and dedup happen downstream, never here.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use thoughtnet_common::{Item, SubQuery, SubQueryItems};
use thoughtnet_sources::SourceFetcher;

/// Fixed per-call result limit, per source per sub-query.
pub const FETCH_LIMIT: usize = 10;

pub struct FetchOrchestrator {
    fetchers: Vec<Arc<dyn SourceFetcher>>,
}

impl FetchOrchestrator {
    pub fn new(fetchers: Vec<Arc<dyn SourceFetcher>>) -> Self {
        Self { fetchers }
    }

    pub fn task_count(&self, sub_queries: &[SubQuery]) -> usize {
        self.fetchers.len() * sub_queries.len()
    }

    /// Execute every (sub-query, source) fetch task concurrently and
    /// aggregate results into per-sub-query buckets. Each task writes only
    /// to its own result tuple; aggregation groups by sub-query index, so
    /// completion order never affects correctness. Per-source insertion
    /// order is preserved within a bucket; cross-source order is not.
    pub async fn fetch_all(&self, sub_queries: &[SubQuery]) -> Vec<SubQueryItems> {
        let tasks: Vec<_> = sub_queries
            .iter()
            .enumerate()
            .flat_map(|(idx, sub_query)| {
                self.fetchers
                    .iter()
                    .map(move |fetcher| (idx, sub_query.text.clone(), fetcher.clone()))
            })
            .collect();

        // Launch the whole batch at once; each task carries its own
        // source-specific deadline so one slow source cannot stall the rest.
        let concurrency = tasks.len().max(1);
        let mut futs = Vec::with_capacity(tasks.len());
        for (idx, query, fetcher) in tasks {
            futs.push(async move {
                let deadline = fetcher.timeout();
                let result =
                    match tokio::time::timeout(deadline, fetcher.fetch(&query, FETCH_LIMIT)).await
                    {
                        Ok(result) => result,
                        Err(_) => Err(anyhow::anyhow!("timed out after {deadline:?}")),
                    };
                (idx, fetcher.name(), result)
            });
        }
        let results: Vec<(usize, &'static str, anyhow::Result<Vec<Item>>)> = stream::iter(futs)
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut buckets: Vec<Vec<Item>> = vec![Vec::new(); sub_queries.len()];
        for (idx, source, result) in results {
            match result {
                Ok(items) => {
                    debug!(source, sub_query = sub_queries[idx].text.as_str(), count = items.len(), "Fetch complete");
                    buckets[idx].extend(items);
                }
                Err(e) => {
                    warn!(
                        source,
                        sub_query = sub_queries[idx].text.as_str(),
                        error = %e,
                        "Source fetch failed, contributing zero items"
                    );
                }
            }
        }

        sub_queries
            .iter()
            .cloned()
            .zip(buckets)
            .map(|(sub_query, items)| SubQueryItems { sub_query, items })
            .collect()
    }
}
