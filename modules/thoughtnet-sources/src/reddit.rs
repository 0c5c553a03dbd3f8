use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use thoughtnet_common::Item;

use crate::traits::SourceFetcher;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const SEARCH_URL: &str = "https://oauth.reddit.com/search";

/// Max characters of post body carried into `content`. Titles carry most
/// of the topical signal; long selftexts only bloat embeddings.
const MAX_SELFTEXT_CHARS: usize = 500;

/// Reddit search via the OAuth client-credentials flow.
pub struct RedditFetcher {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    user_agent: String,
}

impl RedditFetcher {
    pub fn new(client_id: &str, client_secret: &str, user_agent: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    async fn access_token(&self) -> Result<String> {
        let resp = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("Reddit token request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Reddit token request returned {status}: {body}");
        }

        let token: TokenResponse = resp.json().await.context("Invalid Reddit token response")?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl SourceFetcher for RedditFetcher {
    fn name(&self) -> &'static str {
        "Reddit"
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Item>> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            warn!("Reddit credentials not set, skipping");
            return Ok(Vec::new());
        }
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let token = self.access_token().await?;
        let resp = self
            .client
            .get(SEARCH_URL)
            .bearer_auth(&token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[("q", query), ("limit", &limit.to_string()), ("sort", "relevance")])
            .send()
            .await
            .context("Reddit search request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Reddit search returned {status}: {body}");
        }

        let listing: Listing = resp.json().await.context("Invalid Reddit search response")?;
        let items = listing
            .data
            .children
            .into_iter()
            .map(|child| {
                let post = child.data;
                let body = truncate_chars(&post.selftext, MAX_SELFTEXT_CHARS);
                let content = if body.is_empty() {
                    post.title.clone()
                } else {
                    format!("{} {}", post.title, body)
                };
                // Prefer the comment-thread link over the submitted URL for
                // discussion context.
                let permalink = format!("https://reddit.com{}", post.permalink);
                Item::new(content, self.name())
                    .with_url(permalink)
                    .with_title(post.title)
                    .with_meta("score", serde_json::json!(post.score))
                    .with_meta("subreddit", serde_json::json!(post.subreddit))
            })
            .collect();
        Ok(items)
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Deserialize)]
struct ListingChild {
    data: Submission,
}

#[derive(Deserialize)]
struct Submission {
    title: String,
    #[serde(default)]
    selftext: String,
    permalink: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    subreddit: String,
}
