#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::OnceCell;
use serde_json::{json, Value};
use uuid::Uuid;

use movie_api::config::AppConfig;
use movie_api::database::{DatabaseManager, MemoryStore, PgStore};
use movie_api::{build_router, AppState};

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve the router on an ephemeral port for the lifetime of the calling test's runtime
    pub async fn spawn() -> Result<Self> {
        let mut config = AppConfig::development();
        config.security.jwt_secret = "integration-secret".to_string();
        config.security.password_hash_cost = 4;
        config.unique_key = Some("integration-key".to_string());

        let store = Arc::new(MemoryStore::new(config.security.password_hash_cost));
        let state = AppState::new(config, store).context("failed to build state")?;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind ephemeral port")?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, build_router(state)).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sign up a fresh user and return its "JWT <token>" credential
    pub async fn login(&self, username: &str) -> Result<String> {
        let credentials = json!({ "name": username, "username": username, "password": "correct horse" });

        let signup: Value = self
            .client
            .post(self.url("/signup"))
            .json(&credentials)
            .send()
            .await?
            .json()
            .await?;
        anyhow::ensure!(signup["success"] == true, "signup failed: {}", signup);

        let signin: Value = self
            .client
            .post(self.url("/signin"))
            .json(&credentials)
            .send()
            .await?
            .json()
            .await?;
        signin["token"]
            .as_str()
            .map(str::to_string)
            .context("signin returned no token")
    }
}

/// Unique name so tests sharing a store never collide
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

static PG_SCHEMA: OnceCell<()> = OnceCell::const_new();

/// Postgres store from DATABASE_URL, or None when no database is configured
///
/// The first caller creates the schema so parallel tests never race on it.
pub async fn pg_store() -> Result<Option<PgStore>> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => return Ok(None),
    };

    let mut config = AppConfig::development().database;
    config.url = Some(url);
    config.max_connections = 2;

    PG_SCHEMA
        .get_or_try_init(|| async {
            let pool = DatabaseManager::connect(&config).await?;
            pool.close().await;
            anyhow::Ok(())
        })
        .await?;

    let pool = DatabaseManager::connect(&config)
        .await
        .context("failed to connect to DATABASE_URL")?;
    Ok(Some(PgStore::new(pool, 4)))
}
