//! Key/value repository
//!
//! Thin persistence layer over the `store` table. Structured entities
//! go through the JSON helpers; settings use the raw string accessors.
//! A value that fails to deserialize is treated as absent so the caller
//! falls back to defaults instead of refusing to start.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

/// Repository for key/value store operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read a raw entry
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Write a raw entry (insert or overwrite)
    pub async fn put(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO store (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Stored entry: {}", key);
        Ok(())
    }

    /// Remove an entry; missing keys are not an error
    pub async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Removed entry: {}", key);
        Ok(())
    }

    /// Read and deserialize a JSON entry.
    ///
    /// Returns `None` both for a missing key and for a value that no
    /// longer parses; the malformed value is logged and left in place
    /// until the next write overwrites it.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!("Discarding malformed entry {}: {}", key, err);
                Ok(None)
            }
        }
    }

    /// Serialize and write a JSON entry
    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.put(key, &raw).await
    }
}
