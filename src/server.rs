//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, database connection and migrations, service
//! wiring, and the Axum server lifecycle.

use crate::config::Config;
use crate::domain::clock::SystemClock;
use crate::domain::commission::CommissionRate;
use crate::infrastructure::persistence::MemoryStore;
use crate::routes::app_router;
use crate::state::{AppState, Policies, Repositories};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations (or the in-memory store)
/// - Services with the configured commission and refund policies
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails after retries
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repositories = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = connect(&config, database_url).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to apply migrations")?;
            tracing::info!("Migrations applied");

            Repositories::postgres(Arc::new(pool), config.booking_lock_timeout())
        }
        None => {
            tracing::warn!("No database configured; bookings are kept in memory only");
            Repositories::memory(Arc::new(MemoryStore::new(config.booking_lock_timeout())))
        }
    };

    let policies = Policies {
        default_commission_rate: CommissionRate::new(config.default_commission_rate)
            .context("Invalid DEFAULT_COMMISSION_RATE")?,
        refund_policy: config.refund_policy(),
    };

    let state = AppState::new(repositories, Arc::new(SystemClock), policies);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens the pool, retrying with jittered backoff while the database starts up.
async fn connect(config: &Config, database_url: &str) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = ExponentialBackoff::from_millis(200)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(5);

    Retry::spawn(strategy, || {
        let options = options.clone();
        async move {
            options.connect(database_url).await.map_err(|e| {
                tracing::warn!(error = %e, "Database connection failed, retrying");
                e
            })
        }
    })
    .await
    .context("Failed to connect to database")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
