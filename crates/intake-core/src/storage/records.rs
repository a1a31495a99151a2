//! Repository for indexed-record database operations.
//!
//! Writes are either a single parameterized insert (`insert`) or a single
//! transaction around a batch (`insert_many`), so a record is observable
//! iff its commit succeeded.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    error::Result,
    models::{IndexedRecord, RecordId},
};

/// Repository for indexed-record database operations.
pub struct Repository {
    pool: Arc<PgPool>,
}

impl Repository {
    /// Creates a new repository instance.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<PgPool> {
        self.pool.clone()
    }

    /// Persists one payload as a new indexed record.
    ///
    /// The payload is re-serialized to its canonical text form and stored
    /// in the `data` column. No deduplication: identical payloads produce
    /// distinct rows.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized or the insert fails.
    pub async fn insert(&self, payload: &serde_json::Value) -> Result<RecordId> {
        let text = serde_json::to_string(payload)?;

        let id: i64 =
            sqlx::query_scalar("INSERT INTO indexed_data (data) VALUES ($1) RETURNING id")
                .bind(&text)
                .fetch_one(&*self.pool)
                .await?;

        Ok(RecordId(id))
    }

    /// Persists a batch of payloads inside a single transaction.
    ///
    /// Either every payload becomes a record or none does; any serialization
    /// or statement failure rolls the whole batch back.
    ///
    /// # Errors
    ///
    /// Returns error if the transaction cannot be opened, any insert fails,
    /// or the commit fails.
    pub async fn insert_many(&self, payloads: &[serde_json::Value]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut stored = 0u64;

        for payload in payloads {
            let text = serde_json::to_string(payload)?;

            sqlx::query("INSERT INTO indexed_data (data) VALUES ($1)")
                .bind(&text)
                .execute(&mut *tx)
                .await?;

            stored += 1;
        }

        tx.commit().await?;

        Ok(stored)
    }

    /// Fetches the most recently indexed records, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn fetch_recent(&self, limit: i64) -> Result<Vec<IndexedRecord>> {
        let records = sqlx::query_as::<_, IndexedRecord>(
            r"
            SELECT id, data, created_at
            FROM indexed_data
            ORDER BY id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&*self.pool)
        .await?;

        Ok(records)
    }

    /// Counts all indexed records.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM indexed_data")
            .fetch_one(&*self.pool)
            .await?;

        Ok(count)
    }
}
