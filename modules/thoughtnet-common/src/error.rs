use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThoughtNetError {
    #[error("Source fetch error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Labeling error: {0}")]
    Labeling(String),

    #[error("No data fetched for any sub-query")]
    NoData,

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
