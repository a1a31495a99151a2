//! Intake webhook indexing service.
//!
//! Main entry point. Initializes tracing, loads configuration, builds the
//! database pool, and runs the HTTP server until a shutdown signal.

use anyhow::{Context, Result};
use intake_api::{AppState, Config};
use intake_core::Storage;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting intake webhook indexing service");

    let config = Config::load()?;
    let server_addr = config.parse_server_addr()?;
    info!(
        database = %config.database_dsn_masked(),
        server_addr = %server_addr,
        max_connections = config.database_max_connections,
        "Configuration loaded"
    );

    // Lazy pool: the server starts whether or not the database is up, and
    // unavailability surfaces per request as the generic error response.
    let db_pool = create_database_pool(&config);

    match intake_core::storage::ensure_schema(&db_pool).await {
        Ok(()) => info!("Database schema ensured"),
        Err(e) => warn!(
            error = %e,
            "Could not ensure database schema at startup; requests will fail until the database is reachable"
        ),
    }

    let storage = Storage::new(db_pool.clone());

    info!(addr = %server_addr, "Intake is ready to receive webhooks");

    intake_api::start_server(AppState { storage }, server_addr)
        .await
        .context("HTTP server failed")?;

    db_pool.close().await;
    info!("Database connections closed");

    info!("Intake shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,intake=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Creates the lazily-connecting database pool.
fn create_database_pool(config: &Config) -> sqlx::PgPool {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .connect_lazy_with(config.connect_options())
}
