//! End-to-end query coordinator: decompose → fetch → filter → dedup →
//! embed → cluster → label → assemble.
//!
//! Stage failures degrade rather than abort: a fetch failure costs its
//! items, an embed or cluster failure costs its sub-query. The only
//! pipeline-level error is `NoData`, when filtering and dedup leave
//! nothing to cluster for any sub-query.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use thoughtnet_common::{ClusterGroups, GraphResponse, SubQuery, ThoughtNetError};
use thoughtnet_semantic::{analyze_query, ClusterEngine, ClusterLabeler, TextEmbedder};
use thoughtnet_sources::{select_fetchers, SourceFetcher};

use crate::assign::ClusterAssigner;
use crate::dedup::dedup_by_content;
use crate::graph::build_graph;
use crate::labeling::GroupLabeler;
use crate::orchestrator::FetchOrchestrator;
use crate::relevance::filter_relevant;

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Source tags resolved against the registry, in order.
    pub sources: Vec<String>,
    /// Clustering method name, validated by the cluster engine.
    pub method: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            sources: ["reddit", "news", "hn", "ddg"].map(String::from).to_vec(),
            method: "kmeans".to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct RunStats {
    sub_queries: usize,
    fetch_tasks: usize,
    items_fetched: usize,
    items_relevant: usize,
    items_deduped: usize,
    sub_queries_clustered: usize,
    clusters: usize,
    nodes: usize,
    edges: usize,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} sub-queries, {} fetch tasks, {} items fetched, {} relevant, {} after dedup, {} sub-queries clustered into {} clusters, graph {} nodes / {} edges",
            self.sub_queries,
            self.fetch_tasks,
            self.items_fetched,
            self.items_relevant,
            self.items_deduped,
            self.sub_queries_clustered,
            self.clusters,
            self.nodes,
            self.edges
        )
    }
}

pub struct Pipeline {
    registry: HashMap<&'static str, Arc<dyn SourceFetcher>>,
    embedder: Arc<dyn TextEmbedder>,
    engine: Arc<dyn ClusterEngine>,
    labeler: Arc<dyn ClusterLabeler>,
}

impl Pipeline {
    pub fn new(
        registry: HashMap<&'static str, Arc<dyn SourceFetcher>>,
        embedder: Arc<dyn TextEmbedder>,
        engine: Arc<dyn ClusterEngine>,
        labeler: Arc<dyn ClusterLabeler>,
    ) -> Self {
        Self {
            registry,
            embedder,
            engine,
            labeler,
        }
    }

    /// Run the full pipeline for one query and return the assembled
    /// graph. Identical sub-queries produced by decomposition collapse to
    /// the first occurrence before fetching.
    pub async fn run(
        &self,
        query: &str,
        options: &RunOptions,
    ) -> Result<GraphResponse, ThoughtNetError> {
        let mut stats = RunStats::default();

        let (sub_queries, complexity) = analyze_query(query);
        let sub_queries = dedup_sub_queries(sub_queries);
        stats.sub_queries = sub_queries.len();
        info!(query, complexity, sub_queries = stats.sub_queries, "Query decomposed");

        let fetchers = select_fetchers(&self.registry, &options.sources);
        let orchestrator = FetchOrchestrator::new(fetchers);
        stats.fetch_tasks = orchestrator.task_count(&sub_queries);

        let buckets = orchestrator.fetch_all(&sub_queries).await;

        let assigner = ClusterAssigner::new(self.engine.clone(), &options.method);
        let group_labeler = GroupLabeler::new(self.labeler.clone());

        let mut prepared = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            stats.items_fetched += bucket.items.len();
            let relevant = filter_relevant(&bucket.sub_query.text, bucket.items);
            stats.items_relevant += relevant.len();
            let deduped = dedup_by_content(relevant);
            stats.items_deduped += deduped.len();
            prepared.push((bucket.sub_query, deduped));
        }

        if prepared.iter().all(|(_, items)| items.is_empty()) {
            return Err(ThoughtNetError::NoData);
        }

        let mut clusters: Vec<(SubQuery, ClusterGroups)> = Vec::new();
        for (sub_query, items) in prepared {
            if items.is_empty() {
                continue;
            }

            let texts: Vec<String> = items.iter().map(|item| item.content.clone()).collect();
            let vectors = match self.embedder.embed_batch(texts).await {
                Ok(vectors) => vectors,
                Err(e) => {
                    warn!(
                        sub_query = sub_query.text.as_str(),
                        error = %e,
                        "Batch embedding failed, skipping sub-query"
                    );
                    continue;
                }
            };

            let groups = match assigner.assign(items, &vectors) {
                Ok(Some(groups)) => groups,
                Ok(None) => continue,
                Err(e) => {
                    warn!(
                        sub_query = sub_query.text.as_str(),
                        error = %e,
                        "Clustering failed, skipping sub-query"
                    );
                    continue;
                }
            };

            let labeled = group_labeler.label_groups(groups).await;
            stats.sub_queries_clustered += 1;
            stats.clusters += labeled.len();
            clusters.push((sub_query, labeled));
        }

        let graph = build_graph(query, &clusters);
        stats.nodes = graph.nodes.len();
        stats.edges = graph.edges.len();
        info!(query, %stats, "Pipeline run complete");

        Ok(graph)
    }
}

/// Collapse textually identical sub-queries (after normalization),
/// keeping the first occurrence in order.
fn dedup_sub_queries(sub_queries: Vec<SubQuery>) -> Vec<SubQuery> {
    let mut seen = std::collections::HashSet::new();
    sub_queries.into_iter().filter(|sq| seen.insert(sq.normalized())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_sub_queries_keeps_first_and_order() {
        let deduped = dedup_sub_queries(vec![
            SubQuery::new("Alpha"),
            SubQuery::new("beta"),
            SubQuery::new(" alpha "),
            SubQuery::new("gamma"),
        ]);
        let texts: Vec<_> = deduped.iter().map(|sq| sq.text.as_str()).collect();
        assert_eq!(texts, vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn default_options_use_all_sources_and_kmeans() {
        let options = RunOptions::default();
        assert_eq!(options.sources, vec!["reddit", "news", "hn", "ddg"]);
        assert_eq!(options.method, "kmeans");
    }
}
