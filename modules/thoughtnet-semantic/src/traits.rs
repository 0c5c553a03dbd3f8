use anyhow::Result;
use async_trait::async_trait;

use thoughtnet_common::ThoughtNetError;

/// Text-embedding capability. One fixed-length vector per input text,
/// same order.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;
}

/// Clustering capability: one integer label per vector, in input order.
/// Compute-bound and synchronous; the pipeline treats it as sequential
/// per sub-query. `kmeans` is the only built-in method; any other
/// `method` name fails with a configuration error.
pub trait ClusterEngine: Send + Sync {
    fn cluster(
        &self,
        vectors: &[Vec<f32>],
        method: &str,
        n_clusters: usize,
    ) -> Result<Vec<usize>, ThoughtNetError>;
}

/// Cluster label text generation. Never fails outward: implementations
/// map internal failures and empty input to a fixed fallback label.
#[async_trait]
pub trait ClusterLabeler: Send + Sync {
    async fn label(&self, texts: &[String]) -> String;
}
