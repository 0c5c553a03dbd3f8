//! Query decomposition: break a natural-language query into independently
//! searchable clauses plus a coarse complexity score.
//!
//! Heuristic, not linguistic: question marks bound sentences, then
//! commas/semicolons and coordinating conjunctions bound clauses. Never
//! fails — the worst case is the query itself as the single sub-query.

use std::sync::LazyLock;

use regex::Regex;

use thoughtnet_common::SubQuery;

static CLAUSE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i),|;|\s+and\s+|\s+or\s+|\s+but\s+").unwrap());

/// Decompose `query` into an ordered sub-query sequence and a complexity
/// score in `[3, 7]`. Sub-queries may be textually identical to the query.
pub fn analyze_query(query: &str) -> (Vec<SubQuery>, u8) {
    let complexity = calculate_complexity(query);

    let mut sub_queries = Vec::new();
    for sentence in split_sentences(query) {
        for part in CLAUSE_SPLIT.split(&sentence) {
            let part = part.trim();
            if !part.is_empty() {
                sub_queries.push(SubQuery::new(part));
            }
        }
    }

    if sub_queries.is_empty() {
        sub_queries.push(SubQuery::new(query));
    }
    (sub_queries, complexity)
}

/// Split on `?` boundaries, keeping the `?` with its sentence so the
/// question shape survives into search queries.
fn split_sentences(query: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = query.chars().peekable();
    while let Some(ch) = chars.next() {
        current.push(ch);
        if ch == '?' && chars.peek() != Some(&'?') {
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current);
    }
    sentences
}

/// 3 base + 1 per length band, capped at 7.
fn calculate_complexity(query: &str) -> u8 {
    let words = query.split_whitespace().count();
    let mut score = 3u8;
    if words > 10 {
        score += 1;
    }
    if words > 20 {
        score += 1;
    }
    score.min(7)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_query_maps_to_itself() {
        let (subs, complexity) = analyze_query("AI");
        assert_eq!(subs, vec![SubQuery::new("AI")]);
        assert_eq!(complexity, 3);
    }

    #[test]
    fn conjunctions_split_clauses() {
        let (subs, _) = analyze_query("quantum computing and protein folding");
        assert_eq!(
            subs,
            vec![SubQuery::new("quantum computing"), SubQuery::new("protein folding")]
        );
    }

    #[test]
    fn question_marks_bound_sentences() {
        let (subs, _) = analyze_query("Is AGI close? Will it matter?");
        assert_eq!(subs, vec![SubQuery::new("Is AGI close?"), SubQuery::new("Will it matter?")]);
    }

    #[test]
    fn commas_and_semicolons_split() {
        let (subs, _) = analyze_query("climate policy, carbon capture; fusion");
        assert_eq!(subs.len(), 3);
    }

    #[test]
    fn complexity_grows_with_length_and_caps() {
        let (_, short) = analyze_query("one two three");
        assert_eq!(short, 3);
        let (_, medium) = analyze_query(&"w ".repeat(11));
        assert_eq!(medium, 4);
        let (_, long) = analyze_query(&"w ".repeat(25));
        assert_eq!(long, 5);
    }
}
