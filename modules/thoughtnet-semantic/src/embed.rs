use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::traits::TextEmbedder;

/// Embedder backed by an OpenAI-compatible `/embeddings` endpoint.
pub struct ApiEmbedder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ApiEmbedder {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl TextEmbedder for ApiEmbedder {
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "input": texts,
            }))
            .send()
            .await
            .context("Embedding request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, model = self.model.as_str(), "Embedding API request rejected");
            anyhow::bail!("Embedding API returned {status}: {body}");
        }

        let data: EmbeddingResponse =
            resp.json().await.context("Invalid embedding response")?;
        let mut rows = check_vector_count(data.data, texts.len())?;
        debug!(count = rows.len(), model = self.model.as_str(), "Embedded batch");

        // The API documents input order, but `index` is authoritative.
        rows.sort_by_key(|row| row.index);
        Ok(rows.into_iter().map(|row| row.embedding).collect())
    }
}

/// A row-count mismatch means vectors cannot be paired back to their
/// texts, so the whole batch is rejected.
fn check_vector_count(rows: Vec<EmbeddingRow>, expected: usize) -> Result<Vec<EmbeddingRow>> {
    if rows.len() != expected {
        warn!(
            returned = rows.len(),
            expected,
            "Embedding API returned a mismatched vector count"
        );
        anyhow::bail!(
            "Embedding API returned {} vectors for {expected} texts",
            rows.len()
        );
    }
    Ok(rows)
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_rows_reorder_by_index() {
        let json = r#"{
            "data": [
                {"index": 1, "embedding": [0.5, 0.5]},
                {"index": 0, "embedding": [1.0, 0.0]}
            ]
        }"#;
        let mut data: EmbeddingResponse = serde_json::from_str(json).unwrap();
        data.data.sort_by_key(|row| row.index);
        assert_eq!(data.data[0].embedding, vec![1.0, 0.0]);
    }

    #[test]
    fn mismatched_vector_count_is_rejected() {
        let rows = vec![EmbeddingRow {
            index: 0,
            embedding: vec![1.0],
        }];
        let err = check_vector_count(rows, 2).unwrap_err();
        assert!(err.to_string().contains("1 vectors for 2 texts"));

        let rows = vec![EmbeddingRow {
            index: 0,
            embedding: vec![1.0],
        }];
        assert_eq!(check_vector_count(rows, 1).unwrap().len(), 1);
    }
}
