//! Keyword-overlap relevance filter.
//!
//! Coarse and recall-biased: an item survives if its content or title
//! contains any sub-query keyword as a substring. False positives are
//! tolerated; dropping true matches is the failure to avoid.

use thoughtnet_common::text::keywords;
use thoughtnet_common::Item;

/// Return the subset of `items` judged on-topic for `sub_query`. With no
/// usable keywords the filter cannot discriminate and passes everything.
pub fn filter_relevant(sub_query: &str, items: Vec<Item>) -> Vec<Item> {
    let keywords = keywords(sub_query);
    if keywords.is_empty() {
        return items;
    }

    items
        .into_iter()
        .filter(|item| {
            let mut haystack = item.content.to_lowercase();
            if let Some(title) = &item.title {
                haystack.push(' ');
                haystack.push_str(&title.to_lowercase());
            }
            keywords.iter().any(|keyword| haystack.contains(keyword.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(content: &str) -> Item {
        Item::new(content, "test")
    }

    #[test]
    fn empty_keyword_set_passes_everything() {
        // Every token is a stop word or too short — nothing to match on.
        let items = vec![item("completely unrelated"), item("also unrelated")];
        let kept = filter_relevant("is it to be", items.clone());
        assert_eq!(kept.len(), items.len());
    }

    #[test]
    fn off_topic_items_are_dropped() {
        let items = vec![
            item("Quantum computing hits a milestone"),
            item("Top 10 rap albums this year"),
        ];
        let kept = filter_relevant("quantum computing", items);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].content.contains("Quantum"));
    }

    #[test]
    fn title_counts_toward_the_match() {
        let items = vec![item("see link below").with_title("Quantum supremacy explained")];
        let kept = filter_relevant("quantum computing", items);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        let items = vec![item("QUANTUMLEAP announcement")];
        let kept = filter_relevant("quantum computing", items);
        assert_eq!(kept.len(), 1);
    }
}
