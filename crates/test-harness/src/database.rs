//! Database pools for integration tests.
//!
//! `setup_test_database` needs a running PostgreSQL; gate tests that call
//! it behind the `docker` feature. `unreachable_pool` needs nothing and
//! exists to exercise the connection-failure path.

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use tokio::sync::{Mutex, MutexGuard};

static TEST_LOCK: Mutex<()> = Mutex::const_new(());

/// Serializes database-backed tests within one test binary.
///
/// Setup truncates `indexed_data`, which would race against a concurrently
/// running test's assertions. Hold the guard for the whole test.
pub async fn lock_test_database() -> MutexGuard<'static, ()> {
    TEST_LOCK.lock().await
}

/// Builds a lazily-connected pool aimed at an address nothing listens on.
///
/// Acquiring from this pool fails quickly, which is exactly what the
/// database-unreachable tests want. The short acquire timeout keeps those
/// tests from stalling.
pub fn unreachable_pool() -> PgPool {
    let options = PgConnectOptions::new()
        .host("127.0.0.1")
        .port(1)
        .username("nobody")
        .database("nowhere");

    PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(options)
}

/// Connects to the test database and prepares a clean `indexed_data` table.
///
/// The database is addressed by `TEST_DATABASE_URL` when set, otherwise by
/// the same `DB_*` values the service itself reads, with the database name
/// defaulting to `intake_test`.
///
/// # Errors
///
/// Returns error if no PostgreSQL is reachable or schema setup fails.
pub async fn setup_test_database() -> Result<PgPool> {
    let pool = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&url)
            .await
            .context("Failed to connect to TEST_DATABASE_URL")?,
        Err(_) => {
            let options = PgConnectOptions::new()
                .host(&env_or("DB_HOST", "localhost"))
                .username(&env_or("DB_USER", "postgres"))
                .password(&env_or("DB_PASSWORD", "postgres"))
                .database(&env_or("DB_NAME", "intake_test"));

            PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(10))
                .connect_with(options)
                .await
                .context("Failed to connect to test database from DB_* values")?
        },
    };

    intake_core::storage::ensure_schema(&pool).await.context("Failed to ensure test schema")?;

    sqlx::query("TRUNCATE indexed_data RESTART IDENTITY")
        .execute(&pool)
        .await
        .context("Failed to truncate indexed_data")?;

    Ok(pool)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
