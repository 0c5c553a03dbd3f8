//! Volume-adaptive cluster assignment.
//!
//! Decides how many clusters a sub-query's items warrant and delegates the
//! actual partitioning to the clustering capability. Cluster membership is
//! reassigned fresh every run.

use std::sync::Arc;

use thoughtnet_common::{Item, ThoughtNetError};
use thoughtnet_semantic::ClusterEngine;

const ITEMS_PER_CLUSTER: usize = 3;
const MIN_CLUSTERS: usize = 2;
const MAX_CLUSTERS: usize = 5;

/// Cluster-count policy. `None` means skip the sub-query entirely;
/// `Some(1)` means one fixed cluster without invoking the engine.
pub fn cluster_count(item_count: usize) -> Option<usize> {
    match item_count {
        0 => None,
        1 => Some(1),
        n => Some((n / ITEMS_PER_CLUSTER).clamp(MIN_CLUSTERS, MAX_CLUSTERS).min(n)),
    }
}

pub struct ClusterAssigner {
    engine: Arc<dyn ClusterEngine>,
    method: String,
}

impl ClusterAssigner {
    pub fn new(engine: Arc<dyn ClusterEngine>, method: &str) -> Self {
        Self {
            engine,
            method: method.to_string(),
        }
    }

    /// Group `items` by cluster label. `vectors` are the externally
    /// computed embeddings, one per item in the same order. Returns groups
    /// keyed by the stringified raw label, in label-first-appearance
    /// order, or `None` when the sub-query is skipped. An unsupported
    /// method propagates as a configuration error — fatal to this
    /// sub-query's contribution only.
    pub fn assign(
        &self,
        items: Vec<Item>,
        vectors: &[Vec<f32>],
    ) -> Result<Option<Vec<(String, Vec<Item>)>>, ThoughtNetError> {
        let Some(n_clusters) = cluster_count(items.len()) else {
            return Ok(None);
        };

        let labels = if items.len() == 1 {
            vec![0]
        } else {
            self.engine.cluster(vectors, &self.method, n_clusters)?
        };

        let mut groups: Vec<(usize, Vec<Item>)> = Vec::new();
        for (label, item) in labels.into_iter().zip(items) {
            match groups.iter_mut().find(|(existing, _)| *existing == label) {
                Some((_, members)) => members.push(item),
                None => groups.push((label, vec![item])),
            }
        }

        Ok(Some(
            groups.into_iter().map(|(label, members)| (label.to_string(), members)).collect(),
        ))
    }
}
