//! Shared text helpers used by the relevance filter and the keyword labeler.

use std::collections::HashSet;

/// Fixed stop-word set: articles, prepositions, common conjunctions and
/// a handful of frequent function words. Deliberately small — the
/// relevance filter is recall-biased and only needs to discard tokens
/// that carry no topical signal.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "how",
    "in", "is", "it", "its", "of", "on", "or", "that", "the", "this", "to", "was", "we", "were",
    "what", "when", "where", "which", "who", "why", "will", "with",
];

/// Lowercase alphanumeric word tokens, in input order.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Query keywords: tokens longer than 2 characters with stop words removed.
/// An empty result means the query cannot discriminate.
pub fn keywords(text: &str) -> HashSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.len() > 2 && !is_stop_word(t))
        .collect()
}
