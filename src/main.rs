use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use movie_api::config::{AppConfig, StoreBackend};
use movie_api::database::{DatabaseManager, MemoryStore, PgStore};
use movie_api::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "movie-api", version, about = "Movie and review REST API")]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Storage backend: memory or postgres (overrides MOVIE_API_STORE)
    #[arg(long)]
    store: Option<StoreBackend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SECRET_KEY, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(store) = args.store {
        config.database.backend = store;
        config.validate().context("invalid configuration")?;
    }

    tracing::info!("Starting movie-api in {:?} mode", config.environment);
    if config.uses_placeholder_secret() {
        tracing::warn!("SECRET_KEY not set; using the development placeholder secret");
    }

    let bind_addr = format!("{}:{}", config.server.bind_address, config.server.port);

    let state = match config.database.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store; data is lost on exit");
            let store = Arc::new(MemoryStore::new(config.security.password_hash_cost));
            AppState::new(config, store)?
        }
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to postgres")?;
            let store = Arc::new(PgStore::new(pool, config.security.password_hash_cost));
            AppState::new(config, store)?
        }
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("movie-api listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
