mod auth;
mod clients;
mod config;
mod db;
mod models;
mod result;
mod routes;
mod scores;

use std::sync::Arc;

use anyhow::Result;
use clients::{GameCatalog, HttpGameCatalog, HttpUserDirectory, PgGameCatalog};
use config::Config;
use scores::{GameScoreService, PgScoreStore};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub scores: GameScoreService,
    /// Catalog backing the single-game lookup endpoint
    pub games: Arc<dyn GameCatalog>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "game_scores_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting game scores backend server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Connect to database
    let db = db::create_pool(config.database_url(), config.database.max_connections).await?;
    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations").run(&db).await?;
    tracing::info!("Database migrations completed");

    // Create shared HTTP client for reusing connections
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()?;
    tracing::info!("HTTP client initialized");

    // Wire collaborators
    let users = Arc::new(HttpUserDirectory::new(
        http_client.clone(),
        &config.users.url,
        config.users.api_token.clone(),
    )?);
    let games: Arc<dyn GameCatalog> = match config.games.service_url.as_deref() {
        Some(url) => {
            tracing::info!("Using remote game service at {}", url);
            Arc::new(HttpGameCatalog::new(http_client.clone(), url)?)
        }
        None => {
            tracing::info!("Using local games table for game lookups");
            Arc::new(PgGameCatalog::new(db.clone()))
        }
    };
    let store = Arc::new(PgScoreStore::new(db));
    let scores = GameScoreService::new(store, users, games.clone());

    // Create application state
    let state = Arc::new(AppState {
        config: config.clone(),
        scores,
        games,
    });

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = routes::create_routes()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
