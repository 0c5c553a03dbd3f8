//! Content-identity dedup within one sub-query's item set.

use std::collections::HashSet;

use thoughtnet_common::Item;

/// One item per distinct `content` value, first occurrence wins, surviving
/// order is first-seen order. Items with the same content but different
/// url/source collapse to the first — a deliberate simplification, not a
/// cross-source merge.
pub fn dedup_by_content(items: Vec<Item>) -> Vec<Item> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.content.clone())).collect()
}
