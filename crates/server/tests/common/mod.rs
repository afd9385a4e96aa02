#![allow(dead_code)]

use chat_server::chat::ChatManager;
use chat_server::store::{self, MessageStore, ParticipantStore};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Enough connections for concurrent requests to hit the database at once.
pub const TEST_POOL_SIZE: u32 = 4;

/// A fresh database in a temp dir. Keep the `TempDir` alive for the test.
pub async fn temp_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("chat.sqlite").display());
    let pool = store::connect(&url, TEST_POOL_SIZE).await.unwrap();
    (dir, pool)
}

pub fn stores(pool: &SqlitePool) -> (ParticipantStore, MessageStore) {
    (
        ParticipantStore::new(pool.clone()),
        MessageStore::new(pool.clone()),
    )
}

pub fn manager(pool: &SqlitePool) -> ChatManager {
    let (participants, messages) = stores(pool);
    ChatManager::new(participants, messages)
}
