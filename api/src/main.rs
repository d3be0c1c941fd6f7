//! FluxRank API Server
//!
//! Collects popularity signals for tracked repositories and packages and
//! ranks them by momentum.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    GitHubClient, NpmClient, PostgresEntityRepository, PostgresRankingRepository,
    PostgresSnapshotRepository, RedditClient,
};
use app::{CollectionService, LeaderboardService, RetryPolicy, ScoringService};
use config::Config;
use domain::ports::Store;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub collection_service: Arc<CollectionService>,
    pub scoring_service: Arc<ScoringService>,
    pub leaderboard_service: Arc<LeaderboardService>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Collection
        .route(
            "/collect/:source",
            get(handlers::get_collect).post(handlers::post_collect),
        )
        // Scoring
        .route("/score", post(handlers::post_score))
        // Leaderboard
        .route("/rankings", get(handlers::get_rankings))
        .route("/rankings/history", get(handlers::get_history))
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fluxrank_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting FluxRank API...");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Create adapters
    let store = Store::new(
        Arc::new(PostgresEntityRepository::new(db.clone())),
        Arc::new(PostgresSnapshotRepository::new(db.clone())),
        Arc::new(PostgresRankingRepository::new(db.clone())),
    );

    let http = adapters::sources::http_client(&config.user_agent, config.request_timeout)
        .context("Failed to build HTTP client")?;

    if config.github_token.is_none() {
        tracing::warn!("GITHUB_TOKEN is not set; GitHub collection will fail");
    }

    let github = Arc::new(GitHubClient::new(
        http.clone(),
        config.github_api_url.clone(),
        config.github_token.clone(),
    ));
    let npm = Arc::new(NpmClient::new(http.clone(), config.npm_api_url.clone()));
    let reddit = Arc::new(RedditClient::new(
        http,
        config.reddit_url.clone(),
        config.reddit_channels.clone(),
        config.reddit_concurrency,
        config.reddit_timeout,
    ));

    // Create application services
    let collection_service = Arc::new(
        CollectionService::new(
            store.clone(),
            RetryPolicy::new(config.retry_cooldown),
            config.collect_concurrency,
        )
        .with_client(github)
        .with_client(npm)
        .with_client(reddit),
    );
    let scoring_service = Arc::new(ScoringService::new(store.clone()));
    let leaderboard_service = Arc::new(LeaderboardService::new(store));

    let state = AppState {
        collection_service,
        scoring_service,
        leaderboard_service,
    };
    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
