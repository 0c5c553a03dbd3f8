use std::env;

use tracing::info;

/// Application configuration loaded from environment variables.
///
/// Source credentials are optional: a fetcher with missing credentials
/// contributes zero items instead of failing the run.
#[derive(Debug, Clone)]
pub struct Config {
    // Reddit (OAuth client credentials)
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_user_agent: String,

    // NewsAPI
    pub news_api_key: String,

    // Embeddings (OpenAI-compatible endpoint)
    pub embeddings_api_key: String,
    pub embeddings_base_url: String,
    pub embeddings_model: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            reddit_client_id: optional_env("REDDIT_CLIENT_ID"),
            reddit_client_secret: optional_env("REDDIT_CLIENT_SECRET"),
            reddit_user_agent: env::var("REDDIT_USER_AGENT")
                .unwrap_or_else(|_| "thoughtnet/0.2".to_string()),
            news_api_key: optional_env("NEWS_API_KEY"),
            embeddings_api_key: optional_env("EMBEDDINGS_API_KEY"),
            embeddings_base_url: env::var("EMBEDDINGS_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            embeddings_model: env::var("EMBEDDINGS_MODEL")
                .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
        }
    }

    /// Log which credentials are configured without printing their values.
    pub fn log_redacted(&self) {
        info!(
            reddit = !self.reddit_client_id.is_empty(),
            news = !self.news_api_key.is_empty(),
            embeddings = !self.embeddings_api_key.is_empty(),
            embeddings_model = self.embeddings_model.as_str(),
            "Config loaded"
        );
    }
}

fn optional_env(key: &str) -> String {
    env::var(key).unwrap_or_default()
}
