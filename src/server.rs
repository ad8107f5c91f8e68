//! HTTP server initialization and runtime setup.
//!
//! Handles storage setup, the expiry sweeper, and the Axum server lifecycle.

use crate::application::expiry_sweeper::run_expiry_sweeper;
use crate::application::services::{generate_token, hash_token};
use crate::api::middleware::rate_limit::RateLimitSettings;
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::TokenRepository;
use crate::infrastructure::memory::MemoryStore;
use crate::routes::app_router;
use crate::state::{AppState, ServiceSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations, or the in-memory store
/// - Background expiry sweeper
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let settings = ServiceSettings::from(&config);

    let state = match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to migrate")?;

            AppState::postgres(Arc::new(pool), settings)
        }
        StorageBackend::Memory => {
            let store = Arc::new(MemoryStore::new());
            issue_bootstrap_token(store.as_ref(), &config.token_signing_secret).await?;
            AppState::in_memory(store, settings)
        }
    };

    let sweeper = (config.expiry_sweep_interval > 0).then(|| {
        tokio::spawn(run_expiry_sweeper(
            state.link_service.clone(),
            Duration::from_secs(config.expiry_sweep_interval),
            Duration::from_secs(config.expired_retention),
        ))
    });

    let app = app_router(state, RateLimitSettings::from(&config));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// The in-memory store starts empty and the admin CLI cannot reach it, so a
/// token is issued at startup and printed once.
async fn issue_bootstrap_token(tokens: &dyn TokenRepository, signing_secret: &str) -> Result<()> {
    let token = generate_token();
    let api_token = tokens
        .create_token("bootstrap", &hash_token(signing_secret, &token))
        .await
        .context("Failed to create bootstrap token")?;

    tracing::warn!(
        token_id = api_token.id,
        "In-memory storage: data is lost on restart. Bootstrap API token: {token}"
    );

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
