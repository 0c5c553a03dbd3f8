use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use thoughtnet_common::Item;

use crate::traits::SourceFetcher;

const API_URL: &str = "https://api.duckduckgo.com/";

/// Open-web results via the DuckDuckGo instant-answer API. No credentials
/// required; topical queries return an abstract plus related topics.
pub struct DuckDuckGoFetcher {
    client: reqwest::Client,
}

impl DuckDuckGoFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for DuckDuckGoFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceFetcher for DuckDuckGoFetcher {
    fn name(&self) -> &'static str {
        "Web Search (DDG)"
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Item>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let resp = self
            .client
            .get(API_URL)
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .send()
            .await
            .context("DDG request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("DDG returned {status}: {body}");
        }

        let answer: InstantAnswer = resp.json().await.context("Invalid DDG response")?;
        let mut items = Vec::new();

        if !answer.abstract_text.is_empty() {
            let mut item = Item::new(answer.abstract_text, self.name())
                .with_meta("source_name", serde_json::json!("DuckDuckGo"));
            if !answer.abstract_url.is_empty() {
                item = item.with_url(answer.abstract_url);
            }
            if !answer.heading.is_empty() {
                item = item.with_title(answer.heading);
            }
            items.push(item);
        }

        for topic in flatten_topics(answer.related_topics) {
            if items.len() >= limit {
                break;
            }
            if topic.text.is_empty() {
                continue;
            }
            let mut item = Item::new(topic.text, self.name())
                .with_meta("source_name", serde_json::json!("DuckDuckGo"));
            if !topic.first_url.is_empty() {
                item = item.with_url(topic.first_url);
            }
            items.push(item);
        }

        Ok(items)
    }
}

/// Related topics arrive either flat or grouped one level deep by category.
fn flatten_topics(topics: Vec<RelatedTopic>) -> Vec<TopicResult> {
    let mut flat = Vec::new();
    for topic in topics {
        match topic {
            RelatedTopic::Result(result) => flat.push(result),
            RelatedTopic::Group { topics } => flat.extend(topics),
        }
    }
    flat
}

#[derive(Deserialize)]
struct InstantAnswer {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Result(TopicResult),
    Group {
        #[serde(rename = "Topics", default)]
        topics: Vec<TopicResult>,
    },
}

#[derive(Deserialize)]
struct TopicResult {
    #[serde(rename = "Text", default)]
    text: String,
    #[serde(rename = "FirstURL", default)]
    first_url: String,
}
