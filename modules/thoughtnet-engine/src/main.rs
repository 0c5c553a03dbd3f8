use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use thoughtnet_common::Config;
use thoughtnet_engine::{Pipeline, RunOptions};
use thoughtnet_semantic::{ApiEmbedder, KMeansEngine, KeywordLabeler};
use thoughtnet_sources::build_registry;

/// Run one query through the full pipeline and print the graph as JSON.
#[derive(Parser, Debug)]
#[command(name = "thoughtnet", about = "Query → thought graph, on stdout")]
struct Args {
    /// Natural-language query to decompose and search.
    query: String,

    /// Source tags to fetch from.
    #[arg(long, value_delimiter = ',', default_values_t = [
        "reddit".to_string(),
        "news".to_string(),
        "hn".to_string(),
        "ddg".to_string(),
    ])]
    sources: Vec<String>,

    /// Clustering method.
    #[arg(long, default_value = "kmeans")]
    method: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("thoughtnet=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = Config::from_env();
    config.log_redacted();

    let pipeline = Pipeline::new(
        build_registry(&config),
        Arc::new(ApiEmbedder::new(
            &config.embeddings_api_key,
            &config.embeddings_base_url,
            &config.embeddings_model,
        )),
        Arc::new(KMeansEngine::new()),
        Arc::new(KeywordLabeler::new()),
    );

    let options = RunOptions {
        sources: args.sources,
        method: args.method,
    };
    info!(query = args.query.as_str(), "Running pipeline");
    let graph = pipeline.run(&args.query, &options).await?;

    println!("{}", serde_json::to_string_pretty(&graph)?);
    Ok(())
}
