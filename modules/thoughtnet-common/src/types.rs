use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One piece of retrieved evidence with text content and provenance.
/// Produced by a source fetcher and immutable afterwards. Dedup identity
/// is the exact `content` string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub content: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: HashMap<String, serde_json::Value>,
}

impl Item {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            url: None,
            title: None,
            meta: HashMap::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }
}

/// One decomposed clause of the original query, independently searched.
/// Decomposition order is preserved for deterministic iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubQuery {
    pub text: String,
}

impl SubQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Trimmed, lowercased form used for root-alias comparison.
    pub fn normalized(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

impl std::fmt::Display for SubQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Items accumulated for one sub-query across all sources.
#[derive(Debug, Clone)]
pub struct SubQueryItems {
    pub sub_query: SubQuery,
    pub items: Vec<Item>,
}

/// Labeled cluster groups for one sub-query. Carried as an ordered list
/// rather than a map: same-label sibling groups coexist, never merge.
pub type ClusterGroups = Vec<(String, Vec<Item>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    SubTopic,
    ThoughtCloud,
    Evidence,
}

impl NodeKind {
    /// Fixed rendering weight per node kind.
    pub fn size(self) -> u32 {
        match self {
            NodeKind::Root => 30,
            NodeKind::SubTopic => 20,
            NodeKind::ThoughtCloud => 15,
            NodeKind::Evidence => 10,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Root => write!(f, "root"),
            NodeKind::SubTopic => write!(f, "sub_topic"),
            NodeKind::ThoughtCloud => write!(f, "thought_cloud"),
            NodeKind::Evidence => write!(f, "evidence"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            size: kind.size(),
            full_text: None,
            url: None,
            source: None,
        }
    }
}

/// Directed parent→child edge. The assembled graph is a tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// The assembled hierarchical graph, serialized as the API response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphResponse {
    pub root_id: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_kind_serializes_snake_case() {
        let node = GraphNode::new("cl_0", "Quantum Hardware", NodeKind::ThoughtCloud);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "thought_cloud");
        assert_eq!(json["size"], 15);
        assert!(json.get("full_text").is_none());
    }

    #[test]
    fn node_sizes_are_fixed_per_kind() {
        assert_eq!(NodeKind::Root.size(), 30);
        assert_eq!(NodeKind::SubTopic.size(), 20);
        assert_eq!(NodeKind::ThoughtCloud.size(), 15);
        assert_eq!(NodeKind::Evidence.size(), 10);
    }

    #[test]
    fn sub_query_normalization() {
        assert_eq!(SubQuery::new("  Quantum Computing ").normalized(), "quantum computing");
    }
}
