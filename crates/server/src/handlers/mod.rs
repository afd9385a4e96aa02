//! HTTP handlers and router

pub mod messages;
pub mod participants;
pub mod status;

pub use crate::config::AppState;

use axum::{
    http::HeaderMap,
    routing::{get, post},
    Router,
};

pub use messages::{get_messages, send_message};
pub use participants::{join, list_participants};
pub use status::heartbeat;

/// Name of the header carrying the caller's participant name
pub const USER_HEADER: &str = "user";

/// Participant name from the `user` header, if present and non-blank.
///
/// Names may be non-ASCII: the raw bytes are read as UTF-8, and as Latin-1
/// when they are not valid UTF-8.
pub fn user_header(headers: &HeaderMap) -> Option<String> {
    let bytes = headers.get(USER_HEADER)?.as_bytes();
    let name = match std::str::from_utf8(bytes) {
        Ok(name) => name.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    };

    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/participants", get(list_participants).post(join))
        .route("/messages", get(get_messages).post(send_message))
        .route("/status", post(heartbeat))
        .route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK - Chat Server"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, HeaderValue::from_bytes(value).unwrap());
        headers
    }

    #[test]
    fn reads_ascii_and_trims() {
        assert_eq!(user_header(&headers_with(b" ana ")).as_deref(), Some("ana"));
        assert_eq!(user_header(&headers_with(b"   ")), None);
        assert_eq!(user_header(&HeaderMap::new()), None);
    }

    #[test]
    fn reads_utf8_names() {
        let headers = headers_with("João".as_bytes());
        assert_eq!(user_header(&headers).as_deref(), Some("João"));
    }

    #[test]
    fn falls_back_to_latin1() {
        // "João" as a browser encodes it in ISO-8859-1
        let headers = headers_with(&[b'J', b'o', 0xE3, b'o']);
        assert_eq!(user_header(&headers).as_deref(), Some("João"));
    }
}
