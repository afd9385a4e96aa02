use crate::config::AppState;
use crate::error::{Error, Result};
use crate::handlers::user_header;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::debug;

/// POST /status
///
/// Heartbeat from the participant named in the `user` header.
pub async fn heartbeat(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode> {
    let user = user_header(&headers)
        .ok_or_else(|| Error::NotFound("missing user header".to_string()))?;
    debug!("POST /status - {}", user);

    state.chat.heartbeat(&user).await?;
    Ok(StatusCode::OK)
}
