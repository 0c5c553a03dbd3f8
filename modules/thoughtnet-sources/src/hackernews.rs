use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use thoughtnet_common::Item;

use crate::traits::SourceFetcher;

/// Algolia search is far faster than walking the Firebase item tree.
const SEARCH_URL: &str = "https://hn.algolia.com/api/v1/search";

/// Hacker News story search via the Algolia API. No credentials required.
pub struct HackerNewsFetcher {
    client: reqwest::Client,
}

impl HackerNewsFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HackerNewsFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceFetcher for HackerNewsFetcher {
    fn name(&self) -> &'static str {
        "HackerNews"
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Item>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let resp = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("query", query),
                ("tags", "story"),
                ("hitsPerPage", &limit.to_string()),
            ])
            .send()
            .await
            .context("HN search request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("HN search returned {status}: {body}");
        }

        let results: SearchResults = resp.json().await.context("Invalid HN search response")?;
        let items = results
            .hits
            .into_iter()
            .filter(|hit| !hit.title.is_empty())
            .map(|hit| {
                let url = match hit.url {
                    Some(url) if !url.is_empty() => url,
                    _ => format!("https://news.ycombinator.com/item?id={}", hit.object_id),
                };
                Item::new(hit.title.clone(), self.name())
                    .with_url(url)
                    .with_title(hit.title)
                    .with_meta("points", serde_json::json!(hit.points))
            })
            .collect();
        Ok(items)
    }
}

#[derive(Deserialize)]
struct SearchResults {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(default)]
    title: String,
    url: Option<String>,
    #[serde(rename = "objectID", default)]
    object_id: String,
    #[serde(default)]
    points: i64,
}
