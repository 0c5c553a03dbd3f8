use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use thoughtnet_common::Item;

use crate::traits::SourceFetcher;

const EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";

/// NewsAPI article search.
pub struct NewsApiFetcher {
    client: reqwest::Client,
    api_key: String,
}

impl NewsApiFetcher {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl SourceFetcher for NewsApiFetcher {
    fn name(&self) -> &'static str {
        "NewsAPI"
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Item>> {
        if self.api_key.is_empty() {
            warn!("NewsAPI key not set, skipping");
            return Ok(Vec::new());
        }
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let resp = self
            .client
            .get(EVERYTHING_URL)
            .query(&[
                ("q", query),
                ("apiKey", &self.api_key),
                ("language", "en"),
                ("sortBy", "relevancy"),
                ("pageSize", &limit.to_string()),
            ])
            .send()
            .await
            .context("NewsAPI request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("NewsAPI returned {status}: {body}");
        }

        let data: Everything = resp.json().await.context("Invalid NewsAPI response")?;
        let items = data
            .articles
            .into_iter()
            .filter(|a| !a.title.is_empty())
            .map(|article| {
                let description = article.description.unwrap_or_default();
                // Title + description embeds better than either alone.
                let content = format!("{}. {}", article.title, description);
                let mut item = Item::new(content, self.name()).with_title(article.title);
                if let Some(url) = article.url {
                    item = item.with_url(url);
                }
                if let Some(name) = article.source.name {
                    item = item.with_meta("source_name", serde_json::json!(name));
                }
                if let Some(published) = article.published_at {
                    item = item.with_meta("publishedAt", serde_json::json!(published));
                }
                item
            })
            .collect();
        Ok(items)
    }
}

#[derive(Deserialize)]
struct Everything {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Deserialize)]
struct Article {
    #[serde(default)]
    title: String,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    #[serde(default)]
    source: ArticleSource,
}

#[derive(Deserialize, Default)]
struct ArticleSource {
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_parses_articles() {
        let json = r#"{
            "status": "ok",
            "articles": [
                {"title": "AI regulation advances", "description": "Parliament vote",
                 "url": "https://example.com/a", "publishedAt": "2026-08-01T00:00:00Z",
                 "source": {"id": null, "name": "Example"}},
                {"title": "", "description": null, "url": null, "source": {}}
            ]
        }"#;
        let data: Everything = serde_json::from_str(json).unwrap();
        assert_eq!(data.articles.len(), 2);
        assert_eq!(data.articles[0].source.name.as_deref(), Some("Example"));
    }

    #[tokio::test]
    async fn missing_key_yields_empty() {
        let fetcher = NewsApiFetcher::new("");
        let items = fetcher.fetch("ai", 10).await.unwrap();
        assert!(items.is_empty());
    }
}
