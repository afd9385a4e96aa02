//! Chat server configuration

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::chat::ChatManager;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:chat.sqlite";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_REAPER_INTERVAL_SECS: u64 = 15;
pub const DEFAULT_STALE_AFTER_SECS: u64 = 20;

/// Configuration for the chat server
#[derive(Clone, Debug)]
pub struct ChatServerConfig {
    /// Store connection string
    pub database_url: String,
    /// Listening port
    pub port: u16,
    /// Max pooled store connections
    pub max_connections: u32,
    /// Period between reaper sweeps
    pub reaper_interval: Duration,
    /// Inactivity gap after which a participant is evicted
    pub stale_after: Duration,
}

impl Default for ChatServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            port: DEFAULT_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            reaper_interval: Duration::from_secs(DEFAULT_REAPER_INTERVAL_SECS),
            stale_after: Duration::from_secs(DEFAULT_STALE_AFTER_SECS),
        }
    }
}

impl ChatServerConfig {
    /// Build config from the environment, reading `.env` first if present
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let config = Self {
            database_url: lookup("DATABASE_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            reaper_interval: Duration::from_secs(parse_or(
                &lookup,
                "REAPER_INTERVAL_SECS",
                DEFAULT_REAPER_INTERVAL_SECS,
            )),
            stale_after: Duration::from_secs(parse_or(
                &lookup,
                "STALE_AFTER_SECS",
                DEFAULT_STALE_AFTER_SECS,
            )),
        };
        config.normalized()
    }

    /// Clamp values that would make the reaper misbehave.
    ///
    /// A zero interval is replaced by the default, and a staleness threshold
    /// shorter than one sweep period is raised to the period.
    pub fn normalized(mut self) -> Self {
        if self.reaper_interval.is_zero() {
            warn!("REAPER_INTERVAL_SECS must be positive, using default");
            self.reaper_interval = Duration::from_secs(DEFAULT_REAPER_INTERVAL_SECS);
        }
        if self.stale_after < self.reaper_interval {
            warn!(
                "Staleness threshold {:?} is shorter than the sweep period {:?}, raising it",
                self.stale_after, self.reaper_interval
            );
            self.stale_after = self.reaper_interval;
        }
        if self.max_connections == 0 {
            self.max_connections = DEFAULT_MAX_CONNECTIONS;
        }
        self
    }
}

fn parse_or<T: FromStr + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatManager>,
}
