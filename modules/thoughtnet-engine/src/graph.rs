//! Deterministic assembly of the root → sub-topic → thought-cloud →
//! evidence tree.
//!
//! Edges are only ever emitted parent→child in one top-down pass with no
//! back-references, so the result is cycle-free by construction. Node ids
//! come from a counter scoped to one build call: identical inputs yield
//! identical graphs, but ids are not stable across different inputs.

use thoughtnet_common::{
    ClusterGroups, GraphEdge, GraphNode, GraphResponse, NodeKind, SubQuery,
};

const ROOT_ID: &str = "root";

/// Evidence nodes per thought cloud, capped to avoid graph explosion.
const MAX_EVIDENCE_PER_CLOUD: usize = 5;

/// Characters of content shown on an evidence node label.
const EVIDENCE_LABEL_CHARS: usize = 50;

/// Build the response graph from labeled cluster groups, in sub-query
/// iteration order. A sub-query whose normalized text equals the
/// normalized original query attaches its clusters directly to the root
/// (no sub-topic layer); sub-queries with empty groups contribute nothing.
pub fn build_graph(query: &str, clusters: &[(SubQuery, ClusterGroups)]) -> GraphResponse {
    let mut nodes = vec![GraphNode::new(ROOT_ID, query, NodeKind::Root)];
    let mut edges = Vec::new();

    let root_normalized = query.trim().to_lowercase();
    // Duplicate sub-query texts share one sub-topic node.
    let mut sub_topics: Vec<(String, String)> = Vec::new();
    let mut cloud_counter = 0usize;
    let mut leaf_counter = 0usize;

    for (sub_query, groups) in clusters {
        if groups.is_empty() {
            continue;
        }

        let normalized = sub_query.normalized();
        let parent_id = if normalized == root_normalized {
            ROOT_ID.to_string()
        } else {
            match sub_topics.iter().find(|(text, _)| *text == normalized) {
                Some((_, id)) => id.clone(),
                None => {
                    let id = format!("sq_{}", sub_topics.len());
                    nodes.push(GraphNode::new(&id, &sub_query.text, NodeKind::SubTopic));
                    edges.push(GraphEdge {
                        source: ROOT_ID.to_string(),
                        target: id.clone(),
                    });
                    sub_topics.push((normalized, id.clone()));
                    id
                }
            }
        };

        for (label, items) in groups {
            let cloud_id = format!("cl_{cloud_counter}");
            cloud_counter += 1;
            nodes.push(GraphNode::new(&cloud_id, label, NodeKind::ThoughtCloud));
            edges.push(GraphEdge {
                source: parent_id.clone(),
                target: cloud_id.clone(),
            });

            for item in items.iter().take(MAX_EVIDENCE_PER_CLOUD) {
                let leaf_id = format!("leaf_{leaf_counter}");
                leaf_counter += 1;
                let mut leaf =
                    GraphNode::new(&leaf_id, evidence_label(&item.content), NodeKind::Evidence);
                leaf.full_text = Some(item.content.clone());
                leaf.url = item.url.clone();
                leaf.source = Some(item.source.clone());
                nodes.push(leaf);
                edges.push(GraphEdge {
                    source: cloud_id.clone(),
                    target: leaf_id,
                });
            }
        }
    }

    GraphResponse {
        root_id: ROOT_ID.to_string(),
        nodes,
        edges,
    }
}

fn evidence_label(content: &str) -> String {
    let truncated: String = content.chars().take(EVIDENCE_LABEL_CHARS).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    use thoughtnet_common::Item;

    fn groups(labels: &[(&str, usize)]) -> ClusterGroups {
        labels
            .iter()
            .map(|(label, count)| {
                let items = (0..*count)
                    .map(|i| {
                        Item::new(format!("{label} item {i}"), "test")
                            .with_url(format!("https://example.com/{label}/{i}"))
                    })
                    .collect();
                (label.to_string(), items)
            })
            .collect()
    }

    fn assert_tree_invariants(graph: &GraphResponse) {
        // Exactly one root.
        let roots: Vec<_> = graph.nodes.iter().filter(|n| n.kind == NodeKind::Root).collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, graph.root_id);

        // Unique ids.
        let ids: HashSet<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), graph.nodes.len());

        // Every non-root node has exactly one incoming edge.
        let mut incoming: HashMap<&str, usize> = HashMap::new();
        for edge in &graph.edges {
            *incoming.entry(edge.target.as_str()).or_insert(0) += 1;
        }
        for node in &graph.nodes {
            if node.id == graph.root_id {
                assert!(!incoming.contains_key(node.id.as_str()));
            } else {
                assert_eq!(incoming.get(node.id.as_str()), Some(&1), "node {}", node.id);
            }
        }

        // Reachability from root covers all nodes (no cycles, no orphans).
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &graph.edges {
            children.entry(edge.source.as_str()).or_default().push(edge.target.as_str());
        }
        let mut reached = HashSet::new();
        let mut stack = vec![graph.root_id.as_str()];
        while let Some(id) = stack.pop() {
            if reached.insert(id) {
                if let Some(kids) = children.get(id) {
                    stack.extend(kids);
                }
            }
        }
        assert_eq!(reached.len(), graph.nodes.len());

        // Evidence cap per thought cloud.
        for node in graph.nodes.iter().filter(|n| n.kind == NodeKind::ThoughtCloud) {
            let evidence = children.get(node.id.as_str()).map(|k| k.len()).unwrap_or(0);
            assert!(evidence <= MAX_EVIDENCE_PER_CLOUD);
        }
    }

    #[test]
    fn root_alias_sub_query_attaches_clusters_to_root() {
        let clusters = vec![(SubQuery::new(" AI "), groups(&[("One", 1), ("Two", 1)]))];
        let graph = build_graph("ai", &clusters);
        assert_tree_invariants(&graph);
        assert!(graph.nodes.iter().all(|n| n.kind != NodeKind::SubTopic));
        let cloud_parents: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.target.starts_with("cl_"))
            .map(|e| e.source.as_str())
            .collect();
        assert_eq!(cloud_parents, vec!["root", "root"]);
    }

    #[test]
    fn distinct_sub_query_gets_a_sub_topic_layer() {
        let clusters = vec![(
            SubQuery::new("quantum hardware"),
            groups(&[("A", 5), ("B", 7), ("C", 2), ("D", 1)]),
        )];
        let graph = build_graph("quantum computing", &clusters);
        assert_tree_invariants(&graph);

        let sub_topics: Vec<_> =
            graph.nodes.iter().filter(|n| n.kind == NodeKind::SubTopic).collect();
        assert_eq!(sub_topics.len(), 1);
        assert_eq!(sub_topics[0].label, "quantum hardware");

        let clouds = graph.nodes.iter().filter(|n| n.kind == NodeKind::ThoughtCloud).count();
        assert_eq!(clouds, 4);

        // 7-item group is capped at 5 evidence leaves.
        let evidence = graph.nodes.iter().filter(|n| n.kind == NodeKind::Evidence).count();
        assert_eq!(evidence, 5 + 5 + 2 + 1);
    }

    #[test]
    fn empty_groups_produce_no_sub_topic_node() {
        let clusters = vec![
            (SubQuery::new("silent clause"), Vec::new()),
            (SubQuery::new("loud clause"), groups(&[("A", 1)])),
        ];
        let graph = build_graph("original query", &clusters);
        assert_tree_invariants(&graph);
        let labels: Vec<_> = graph
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::SubTopic)
            .map(|n| n.label.as_str())
            .collect();
        assert_eq!(labels, vec!["loud clause"]);
    }

    #[test]
    fn same_labeled_sibling_clusters_stay_distinct_nodes() {
        let clusters =
            vec![(SubQuery::new("topic"), groups(&[("Same", 1), ("Same", 1)]))];
        let graph = build_graph("query", &clusters);
        assert_tree_invariants(&graph);
        let clouds: Vec<_> =
            graph.nodes.iter().filter(|n| n.kind == NodeKind::ThoughtCloud).collect();
        assert_eq!(clouds.len(), 2);
        assert_eq!(clouds[0].label, clouds[1].label);
        assert_ne!(clouds[0].id, clouds[1].id);
    }

    #[test]
    fn evidence_carries_payload_and_truncated_label() {
        let long_content = "x".repeat(80);
        let clusters = vec![(
            SubQuery::new("alias"),
            vec![("Label".to_string(), vec![
                Item::new(long_content.clone(), "Reddit").with_url("https://reddit.com/x"),
            ])],
        )];
        let graph = build_graph("alias", &clusters);
        let leaf = graph.nodes.iter().find(|n| n.kind == NodeKind::Evidence).unwrap();
        assert_eq!(leaf.label.chars().count(), 53); // 50 + "..."
        assert_eq!(leaf.full_text.as_deref(), Some(long_content.as_str()));
        assert_eq!(leaf.url.as_deref(), Some("https://reddit.com/x"));
        assert_eq!(leaf.source.as_deref(), Some("Reddit"));
        assert_eq!(leaf.size, 10);
    }

    #[test]
    fn identical_inputs_build_identical_graphs() {
        let clusters = vec![(SubQuery::new("sub"), groups(&[("A", 2), ("B", 3)]))];
        let first = build_graph("query", &clusters);
        let second = build_graph("query", &clusters);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }
}
