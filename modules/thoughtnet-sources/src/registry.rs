use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use thoughtnet_common::Config;

use crate::ddg::DuckDuckGoFetcher;
use crate::hackernews::HackerNewsFetcher;
use crate::news::NewsApiFetcher;
use crate::reddit::RedditFetcher;
use crate::traits::SourceFetcher;

/// Tag → fetcher table built once at startup. `web` aliases `ddg`.
pub fn build_registry(config: &Config) -> HashMap<&'static str, Arc<dyn SourceFetcher>> {
    let ddg: Arc<dyn SourceFetcher> = Arc::new(DuckDuckGoFetcher::new());

    let mut registry: HashMap<&'static str, Arc<dyn SourceFetcher>> = HashMap::new();
    registry.insert(
        "reddit",
        Arc::new(RedditFetcher::new(
            &config.reddit_client_id,
            &config.reddit_client_secret,
            &config.reddit_user_agent,
        )) as Arc<dyn SourceFetcher>,
    );
    registry.insert(
        "news",
        Arc::new(NewsApiFetcher::new(&config.news_api_key)) as Arc<dyn SourceFetcher>,
    );
    registry.insert("hn", Arc::new(HackerNewsFetcher::new()) as Arc<dyn SourceFetcher>);
    registry.insert("ddg", ddg.clone());
    registry.insert("web", ddg);
    registry
}

/// Resolve caller-supplied tags against the registry, preserving tag
/// order. Unrecognized tags are skipped silently; duplicate tags (and the
/// `ddg`/`web` alias pair) resolve to one fetcher.
pub fn select_fetchers(
    registry: &HashMap<&'static str, Arc<dyn SourceFetcher>>,
    tags: &[String],
) -> Vec<Arc<dyn SourceFetcher>> {
    let mut selected: Vec<Arc<dyn SourceFetcher>> = Vec::new();
    for tag in tags {
        let Some(fetcher) = registry.get(tag.as_str()) else {
            debug!(tag = tag.as_str(), "Unknown source tag, ignoring");
            continue;
        };
        if selected.iter().any(|f| f.name() == fetcher.name()) {
            continue;
        }
        selected.push(fetcher.clone());
    }
    selected
}
