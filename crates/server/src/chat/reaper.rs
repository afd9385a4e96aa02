//! Inactivity reaper
//!
//! Periodically evicts participants whose last heartbeat is older than the
//! staleness threshold and posts a departure notice for each of them.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{Message, Participant, LEFT_TEXT};
use crate::store::{MessageStore, ParticipantStore};

pub struct InactivityReaper {
    participants: ParticipantStore,
    messages: MessageStore,
    interval: Duration,
    stale_after: chrono::Duration,
}

impl InactivityReaper {
    pub fn new(
        participants: ParticipantStore,
        messages: MessageStore,
        interval: Duration,
        stale_after: Duration,
    ) -> Self {
        Self {
            participants,
            messages,
            interval,
            stale_after: chrono::Duration::from_std(stale_after)
                .unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Run one sweep as of `now`. Returns how many participants were evicted.
    ///
    /// Only a failure to read the participant list aborts the sweep; errors on
    /// individual participants are logged and skipped.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<usize> {
        let stale: Vec<Participant> = self
            .participants
            .list()
            .await?
            .into_iter()
            .filter(|p| p.is_stale(now, self.stale_after))
            .collect();

        let mut evicted = 0;
        for participant in stale {
            match self.evict(&participant, now).await {
                Ok(true) => evicted += 1,
                Ok(false) => debug!(
                    "[Reaper] {} sent a heartbeat during the sweep, keeping",
                    participant.name
                ),
                Err(e) => warn!("[Reaper] Failed to evict {}: {}", participant.name, e),
            }
        }

        if evicted > 0 {
            info!("[Reaper] Evicted {} inactive participant(s)", evicted);
        }
        Ok(evicted)
    }

    async fn evict(&self, participant: &Participant, now: DateTime<Utc>) -> Result<bool> {
        let removed = self
            .participants
            .remove_if_unchanged(&participant.name, participant.last_seen_at)
            .await?;
        if !removed {
            return Ok(false);
        }

        self.messages
            .append(&Message::status(&participant.name, LEFT_TEXT, now))
            .await?;
        Ok(true)
    }

    /// Spawn the sweep loop. It stops once `token` is cancelled.
    pub fn spawn(self, token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(token).await })
    }

    async fn run(self, token: CancellationToken) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "[Reaper] Started (every {:?}, stale after {}s)",
            self.interval,
            self.stale_after.num_seconds()
        );

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("[Reaper] Received cancellation signal, stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep(Utc::now()).await {
                        warn!("[Reaper] Sweep failed: {}", e);
                    }
                }
            }
        }
    }
}
