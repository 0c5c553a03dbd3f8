//! Keyword-frequency cluster labeler.
//!
//! Produces a short human-readable label from the most frequent
//! non-stop-word terms in a cluster's texts. Deterministic: frequency
//! ties break toward first occurrence.

use async_trait::async_trait;

use thoughtnet_common::text::{is_stop_word, tokenize};

use crate::traits::ClusterLabeler;

/// Label used when no keywords can be extracted.
pub const FALLBACK_LABEL: &str = "Misc";

/// Number of keywords joined into a label.
const TOP_N: usize = 2;

#[derive(Debug, Default)]
pub struct KeywordLabeler;

impl KeywordLabeler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClusterLabeler for KeywordLabeler {
    async fn label(&self, texts: &[String]) -> String {
        let joined = texts.join(" ");
        let tokens = tokenize(&joined);

        // Count keyword frequency, remembering first-seen order for ties.
        let mut order: Vec<String> = Vec::new();
        let mut counts: std::collections::HashMap<String, usize> =
            std::collections::HashMap::new();
        for token in tokens {
            if token.len() <= 2 || is_stop_word(&token) {
                continue;
            }
            if !counts.contains_key(&token) {
                order.push(token.clone());
            }
            *counts.entry(token).or_insert(0) += 1;
        }

        if order.is_empty() {
            return FALLBACK_LABEL.to_string();
        }

        let mut ranked: Vec<(usize, &String)> = order.iter().enumerate().collect();
        ranked.sort_by(|(seen_a, a), (seen_b, b)| {
            counts[*b].cmp(&counts[*a]).then(seen_a.cmp(seen_b))
        });

        ranked
            .into_iter()
            .take(TOP_N)
            .map(|(_, token)| title_case(token))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
