use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use thoughtnet_common::{Config, ThoughtNetError};
use thoughtnet_engine::{Pipeline, RunOptions};
use thoughtnet_semantic::{ApiEmbedder, KMeansEngine, KeywordLabeler};
use thoughtnet_sources::build_registry;

pub struct AppState {
    pub pipeline: Pipeline,
}

#[derive(Deserialize)]
struct GraphQuery {
    query: String,
    /// Comma-separated source tags; defaults to all.
    sources: Option<String>,
    method: Option<String>,
}

async fn api_graph(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GraphQuery>,
) -> impl IntoResponse {
    let query = params.query.trim().to_string();
    if query.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "query must not be empty" })),
        )
            .into_response();
    }

    let mut options = RunOptions::default();
    if let Some(sources) = &params.sources {
        options.sources = sources
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(method) = &params.method {
        options.method = method.clone();
    }

    match state.pipeline.run(&query, &options).await {
        Ok(graph) => Json(graph).into_response(),
        Err(ThoughtNetError::NoData) => {
            warn!(query = query.as_str(), "No data found for query");
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "no data found for query" })),
            )
                .into_response()
        }
        Err(e) => {
            error!(query = query.as_str(), error = %e, "Pipeline run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}

/// Keep-alive probe for cold-start-prone hosting; does no work.
async fn api_warmup() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "awake" }))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("thoughtnet=info".parse()?),
        )
        .init();

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
    let state = Arc::new(AppState { pipeline });

    let app = Router::new()
        .route("/api/graph", get(api_graph))
        .route("/api/warmup", get(api_warmup))
        // Health check
        .route("/", get(|| async { "ok" }))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("ThoughtNet API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
