//! Participant collection

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::models::Participant;

/// Presence records keyed by participant name
#[derive(Clone)]
pub struct ParticipantStore {
    pool: SqlitePool,
}

impl ParticipantStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new participant. Fails with `Conflict` if the name exists.
    pub async fn insert(&self, participant: &Participant) -> Result<()> {
        let result = sqlx::query("INSERT INTO participants (name, last_seen_at) VALUES (?, ?)")
            .bind(&participant.name)
            .bind(participant.last_seen_at.timestamp_millis())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(Error::Conflict(participant.name.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find(&self, name: &str) -> Result<Option<Participant>> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT name, last_seen_at FROM participants WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(into_participant))
    }

    pub async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.find(name).await?.is_some())
    }

    /// All participants, in name order
    pub async fn list(&self) -> Result<Vec<Participant>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT name, last_seen_at FROM participants ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(into_participant).collect())
    }

    /// Refresh `last_seen_at`. Returns false when no such participant exists.
    pub async fn touch(&self, name: &str, at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query("UPDATE participants SET last_seen_at = ? WHERE name = ?")
            .bind(at.timestamp_millis())
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete `name` only if its `last_seen_at` still equals `seen_at`.
    ///
    /// Returns false when the record is gone or was refreshed in between.
    pub async fn remove_if_unchanged(&self, name: &str, seen_at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query("DELETE FROM participants WHERE name = ? AND last_seen_at = ?")
            .bind(name)
            .bind(seen_at.timestamp_millis())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn into_participant((name, millis): (String, i64)) -> Participant {
    let last_seen_at = DateTime::from_timestamp_millis(millis).unwrap_or_default();
    Participant { name, last_seen_at }
}
