//! Database access layer for indexed records.
//!
//! All database operations go through the repository in this module so the
//! HTTP handlers never hold SQL. The repository shares one connection pool;
//! each statement checks a connection out for its own duration and returns
//! it on drop, success or failure.

use std::sync::Arc;

use sqlx::PgPool;

pub mod records;

use crate::error::Result;

/// Entry point for all database operations.
///
/// Cheap to clone; repositories share the underlying pool behind `Arc`.
#[derive(Clone)]
pub struct Storage {
    /// Repository for indexed-record operations.
    pub records: Arc<records::Repository>,
}

impl Storage {
    /// Creates a new storage instance over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        let pool = Arc::new(pool);

        Self { records: Arc::new(records::Repository::new(pool)) }
    }

    /// Performs a health check on the database connection.
    ///
    /// Executes a trivial query to verify connectivity. Used by the
    /// `/health` and `/ready` endpoints.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if no connection can be acquired or
    /// the query fails.
    pub async fn health_check(&self) -> Result<()> {
        let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&*self.records.pool()).await?;

        Ok(())
    }
}

/// Ensures the `indexed_data` table exists.
///
/// Identifier and timestamp columns are owned by the database; intake code
/// only ever writes the `data` column.
///
/// # Errors
///
/// Returns `CoreError::Database` if the DDL statement fails, typically
/// because the database is unreachable.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS indexed_data (
            id         BIGSERIAL PRIMARY KEY,
            data       TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        ",
    )
    .execute(pool)
    .await?;

    Ok(())
}
