//! Chat storage module
//!
//! Two collections in one SQLite database: `participants` keyed by name and
//! an append-only `messages` log ordered by insertion.

pub mod messages;
pub mod participants;

pub use messages::MessageStore;
pub use participants::ParticipantStore;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// Open a pool for `database_url`, creating the database file if missing.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    info!("[Store] Connected to {}", database_url);
    Ok(pool)
}

/// Create tables if they do not exist yet
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    // The primary key on name is what makes concurrent joins of one name safe.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS participants (
            name TEXT PRIMARY KEY NOT NULL,
            last_seen_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sender TEXT NOT NULL,
            recipient TEXT NOT NULL,
            text TEXT NOT NULL,
            kind TEXT NOT NULL,
            time TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
