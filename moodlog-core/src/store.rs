//! Journal entry store backed by the `entries` table.
//!
//! Every operation runs a single statement against the pool, so each one holds
//! a connection only for the duration of that statement.

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::JournalError;
use crate::models::entry::{JournalEntry, TIMESTAMP_FORMAT};
use crate::sentiment::SentimentScorer;

#[derive(Clone)]
pub struct EntryStore {
    pool: SqlitePool,
    scorer: Arc<dyn SentimentScorer>,
}

impl EntryStore {
    pub fn new(pool: SqlitePool, scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { pool, scorer }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Score and persist a new entry. Returns the assigned id and its sentiment.
    pub async fn create_entry(&self, content: Option<&str>) -> Result<(i64, f64), JournalError> {
        let content = match content {
            Some(c) if !c.trim().is_empty() => c,
            _ => return Err(JournalError::Validation("Content is required".to_string())),
        };

        let sentiment = self.scorer.polarity(content);
        let timestamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();

        let result = sqlx::query(
            "INSERT INTO entries (content, timestamp, sentiment) VALUES (?, ?, ?)",
        )
        .bind(content)
        .bind(&timestamp)
        .bind(sentiment)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(id, sentiment, scorer = self.scorer.name(), "Journal entry created");

        Ok((id, sentiment))
    }

    /// All entries in insertion order.
    pub async fn list_entries(&self) -> Result<Vec<JournalEntry>, JournalError> {
        let entries = sqlx::query_as::<_, JournalEntry>(
            "SELECT id, content, timestamp, sentiment FROM entries ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn get_entry(&self, id: i64) -> Result<JournalEntry, JournalError> {
        sqlx::query_as::<_, JournalEntry>(
            "SELECT id, content, timestamp, sentiment FROM entries WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(JournalError::NotFound(id))
    }

    /// Hard delete. Not-found is decided by the same statement that deletes.
    pub async fn delete_entry(&self, id: i64) -> Result<(), JournalError> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(JournalError::NotFound(id));
        }

        tracing::info!(id, "Journal entry deleted");
        Ok(())
    }

    pub async fn count_entries(&self) -> Result<i64, JournalError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
