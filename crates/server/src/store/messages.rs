//! Append-only message log

use sqlx::SqlitePool;
use tracing::warn;

use crate::error::Result;
use crate::models::{Message, MessageKind};

#[derive(Clone)]
pub struct MessageStore {
    pool: SqlitePool,
}

impl MessageStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn append(&self, message: &Message) -> Result<()> {
        sqlx::query(
            "INSERT INTO messages (sender, recipient, text, kind, time) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&message.from)
        .bind(&message.to)
        .bind(&message.text)
        .bind(message.kind.as_str())
        .bind(&message.time)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Every message in insertion order
    pub async fn all(&self) -> Result<Vec<Message>> {
        let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT sender, recipient, text, kind, time FROM messages ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(from, to, text, kind, time)| match kind.parse::<MessageKind>() {
                Ok(kind) => Some(Message {
                    from,
                    to,
                    text,
                    kind,
                    time,
                }),
                Err(e) => {
                    warn!("Skipping stored message from {}: {}", from, e);
                    None
                }
            })
            .collect())
    }

    pub async fn count(&self) -> Result<usize> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}
