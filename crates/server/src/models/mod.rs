use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Recipient used for messages addressed to everyone in the room.
pub const BROADCAST: &str = "Todos";

pub const JOINED_TEXT: &str = "joined the room";
pub const LEFT_TEXT: &str = "left the room";

/// A participant currently present in the room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    /// Last heartbeat (or join) time, serialized as epoch milliseconds
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_seen_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(name: impl Into<String>, last_seen_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            last_seen_at,
        }
    }

    /// True when the gap since the last heartbeat exceeds `stale_after`.
    pub fn is_stale(&self, now: DateTime<Utc>, stale_after: chrono::Duration) -> bool {
        now.signed_duration_since(self.last_seen_at) > stale_after
    }
}

/// Kind of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Message,
    PrivateMessage,
    Status,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Message => "message",
            MessageKind::PrivateMessage => "private_message",
            MessageKind::Status => "status",
        }
    }

    /// Whether a participant may send this kind directly.
    pub fn is_user_sendable(&self) -> bool {
        !matches!(self, MessageKind::Status)
    }
}

impl std::str::FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(MessageKind::Message),
            "private_message" => Ok(MessageKind::PrivateMessage),
            "status" => Ok(MessageKind::Status),
            other => Err(format!("unknown message kind: {}", other)),
        }
    }
}

/// A single chat message. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Server local wall clock, `HH:MM:SS`
    pub time: String,
}

impl Message {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
        kind: MessageKind,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            text: text.into(),
            kind,
            time: clock_time(at),
        }
    }

    pub fn status(from: impl Into<String>, text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(from, BROADCAST, text, MessageKind::Status, at)
    }

    /// Whether `viewer` is allowed to see this message.
    pub fn is_visible_to(&self, viewer: Option<&str>) -> bool {
        match self.kind {
            MessageKind::Message | MessageKind::Status => true,
            MessageKind::PrivateMessage => {
                viewer.is_some_and(|v| v == self.from || v == self.to)
            }
        }
    }
}

/// Formats an instant as `HH:MM:SS` on the server's local clock.
pub fn clock_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Input for POST /participants
#[derive(Debug, Clone, Deserialize)]
pub struct JoinInput {
    pub name: String,
}

/// Response body for a successful join
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinOutput {
    pub name: String,
}

/// Input for POST /messages
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageInput {
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Query string for GET /messages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<String>,
}
