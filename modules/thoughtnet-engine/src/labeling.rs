//! Human-readable labeling of raw cluster groups.
//!
//! Delegates each group's concatenated text to the labeling capability,
//! bounded to a fixed combined length. Labeling is never fatal: empty
//! groups get the fallback label, and same-label sibling groups coexist —
//! graph assembly does not require label uniqueness.

use std::sync::Arc;

use thoughtnet_common::{ClusterGroups, Item};
use thoughtnet_semantic::label::FALLBACK_LABEL;
use thoughtnet_semantic::ClusterLabeler;

/// Combined character budget passed to the labeling capability per group.
const MAX_LABEL_INPUT_CHARS: usize = 2000;

pub struct GroupLabeler {
    labeler: Arc<dyn ClusterLabeler>,
}

impl GroupLabeler {
    pub fn new(labeler: Arc<dyn ClusterLabeler>) -> Self {
        Self { labeler }
    }

    /// Re-key raw-labeled groups by generated human-readable labels,
    /// preserving group order and membership.
    pub async fn label_groups(&self, groups: Vec<(String, Vec<Item>)>) -> ClusterGroups {
        let mut labeled = Vec::with_capacity(groups.len());
        for (_, items) in groups {
            let texts = bounded_texts(&items, MAX_LABEL_INPUT_CHARS);
            let label = if texts.is_empty() {
                FALLBACK_LABEL.to_string()
            } else {
                self.labeler.label(&texts).await
            };
            labeled.push((label, items));
        }
        labeled
    }
}

/// Item contents truncated to a combined budget: whole texts until the
/// budget is reached, the crossing text cut at a char boundary, the rest
/// dropped.
fn bounded_texts(items: &[Item], budget: usize) -> Vec<String> {
    let mut texts = Vec::new();
    let mut used = 0usize;
    for item in items {
        if item.content.is_empty() {
            continue;
        }
        let remaining = budget.saturating_sub(used);
        if remaining == 0 {
            break;
        }
        let chars = item.content.chars().count();
        if chars <= remaining {
            used += chars;
            texts.push(item.content.clone());
        } else {
            texts.push(item.content.chars().take(remaining).collect());
            break;
        }
    }
    texts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ConstLabeler;
    use thoughtnet_semantic::KeywordLabeler;

    #[tokio::test]
    async fn groups_are_rekeyed_by_generated_label() {
        let labeler = GroupLabeler::new(Arc::new(KeywordLabeler::new()));
        let groups = vec![(
            "0".to_string(),
            vec![Item::new("quantum hardware quantum qubits", "s")],
        )];
        let labeled = labeler.label_groups(groups).await;
        assert_eq!(labeled[0].0, "Quantum, Hardware");
        assert_eq!(labeled[0].1.len(), 1);
    }

    #[tokio::test]
    async fn empty_group_text_falls_back() {
        let labeler = GroupLabeler::new(Arc::new(KeywordLabeler::new()));
        let groups = vec![("0".to_string(), vec![Item::new("", "s")])];
        let labeled = labeler.label_groups(groups).await;
        assert_eq!(labeled[0].0, FALLBACK_LABEL);
    }

    #[tokio::test]
    async fn colliding_labels_stay_distinct_groups() {
        let labeler = GroupLabeler::new(Arc::new(ConstLabeler::new("Same")));
        let groups = vec![
            ("0".to_string(), vec![Item::new("first topic", "s")]),
            ("1".to_string(), vec![Item::new("second topic", "s")]),
        ];
        let labeled = labeler.label_groups(groups).await;
        assert_eq!(labeled.len(), 2);
        assert_eq!(labeled[0].0, "Same");
        assert_eq!(labeled[1].0, "Same");
        assert_ne!(labeled[0].1[0].content, labeled[1].1[0].content);
    }

    #[test]
    fn bounded_texts_respects_combined_budget() {
        let items = vec![
            Item::new("aaaa", "s"),
            Item::new("bbbb", "s"),
            Item::new("cccc", "s"),
        ];
        let texts = bounded_texts(&items, 10);
        assert_eq!(texts, vec!["aaaa", "bbbb", "cc"]);
    }
}
