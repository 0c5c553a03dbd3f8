//! In-memory doubles for the pipeline's external seams. Compiled into
//! unit tests and, behind the `test-support` feature, into integration
//! tests of dependent crates.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use thoughtnet_common::{Item, ThoughtNetError};
use thoughtnet_semantic::{ClusterLabeler, TextEmbedder};
use thoughtnet_sources::SourceFetcher;

/// Returns the same items for every query.
pub struct StaticFetcher {
    name: &'static str,
    items: Vec<Item>,
}

impl StaticFetcher {
    pub fn new(name: &'static str, items: Vec<Item>) -> Self {
        Self { name, items }
    }
}

#[async_trait]
impl SourceFetcher for StaticFetcher {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _query: &str, limit: usize) -> Result<Vec<Item>> {
        Ok(self.items.iter().take(limit).cloned().collect())
    }
}

/// Always errors, for failure-isolation tests.
pub struct FailingFetcher {
    name: &'static str,
}

impl FailingFetcher {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl SourceFetcher for FailingFetcher {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _query: &str, _limit: usize) -> Result<Vec<Item>> {
        bail!("simulated upstream failure")
    }
}

/// Sleeps past its own (shortened) deadline so the orchestrator's
/// timeout path is exercised without multi-second test runtimes.
pub struct SlowFetcher {
    name: &'static str,
}

impl SlowFetcher {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl SourceFetcher for SlowFetcher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(50)
    }

    async fn fetch(&self, _query: &str, _limit: usize) -> Result<Vec<Item>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }
}

/// Maps known texts to fixed vectors; unknown texts get a default vector.
pub struct FixedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
}

impl FixedEmbedder {
    pub fn new(vectors: HashMap<String, Vec<f32>>, default: Vec<f32>) -> Self {
        Self { vectors, default }
    }
}

#[async_trait]
impl TextEmbedder for FixedEmbedder {
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| self.vectors.get(text).cloned().unwrap_or_else(|| self.default.clone()))
            .collect())
    }
}

/// Always fails, for embed-failure isolation tests.
pub struct FailingEmbedder;

#[async_trait]
impl TextEmbedder for FailingEmbedder {
    async fn embed_batch(&self, _texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        Err(ThoughtNetError::Embedding("simulated embedding outage".into()).into())
    }
}

/// Returns the same label for every group.
pub struct ConstLabeler {
    label: String,
}

impl ConstLabeler {
    pub fn new(label: &str) -> Self {
        Self { label: label.to_string() }
    }
}

#[async_trait]
impl ClusterLabeler for ConstLabeler {
    async fn label(&self, _texts: &[String]) -> String {
        self.label.clone()
    }
}
