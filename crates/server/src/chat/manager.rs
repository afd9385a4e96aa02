//! Join, heartbeat, send and poll operations over the two stores

use chrono::Utc;
use tracing::{debug, info};

use crate::chat::visibility::filter_messages;
use crate::error::{Error, Result};
use crate::models::{Message, MessageKind, Participant, JOINED_TEXT};
use crate::store::{MessageStore, ParticipantStore};

/// Chat manager handles all participant-driven operations
#[derive(Clone)]
pub struct ChatManager {
    participants: ParticipantStore,
    messages: MessageStore,
}

impl ChatManager {
    pub fn new(participants: ParticipantStore, messages: MessageStore) -> Self {
        Self {
            participants,
            messages,
        }
    }

    pub fn participants(&self) -> &ParticipantStore {
        &self.participants
    }

    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }

    /// Register `name` and announce it to the room
    pub async fn join(&self, name: &str) -> Result<Participant> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("name must not be empty".to_string()));
        }

        let now = Utc::now();
        let participant = Participant::new(name, now);
        // Conflict surfaces here, before any status message is written.
        self.participants.insert(&participant).await?;
        self.messages
            .append(&Message::status(name, JOINED_TEXT, now))
            .await?;

        info!("[Chat] {} joined", name);
        Ok(participant)
    }

    pub async fn heartbeat(&self, name: &str) -> Result<()> {
        if self.participants.touch(name, Utc::now()).await? {
            debug!("[Chat] heartbeat from {}", name);
            Ok(())
        } else {
            Err(Error::NotFound(name.to_string()))
        }
    }

    /// Append a message from `from`. Status messages cannot be sent this way.
    pub async fn send_message(
        &self,
        from: Option<&str>,
        to: &str,
        text: &str,
        kind: &str,
    ) -> Result<Message> {
        if to.trim().is_empty() {
            return Err(Error::Validation("to must not be empty".to_string()));
        }
        if text.trim().is_empty() {
            return Err(Error::Validation("text must not be empty".to_string()));
        }
        let kind = kind
            .parse::<MessageKind>()
            .ok()
            .filter(MessageKind::is_user_sendable)
            .ok_or_else(|| {
                Error::Validation("type must be message or private_message".to_string())
            })?;

        let from = match from {
            Some(from) if !from.trim().is_empty() => from,
            _ => return Err(Error::UnknownSender("missing user header".to_string())),
        };
        if !self.participants.exists(from).await? {
            return Err(Error::UnknownSender(from.to_string()));
        }

        let message = Message::new(from, to, text, kind, Utc::now());
        self.messages.append(&message).await?;

        debug!("[Chat] {} -> {} ({})", from, to, kind.as_str());
        Ok(message)
    }

    pub async fn list_participants(&self) -> Result<Vec<Participant>> {
        self.participants.list().await
    }

    /// Messages visible to `viewer`, optionally only the last `limit`
    pub async fn poll_messages(
        &self,
        viewer: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Message>> {
        let all = self.messages.all().await?;
        Ok(filter_messages(all, viewer, limit))
    }
}
