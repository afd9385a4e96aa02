use crate::config::AppState;
use crate::error::{Error, Result};
use crate::handlers::user_header;
use crate::models::{Message, MessagesQuery, SendMessageInput};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;

/// POST /messages
pub async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    input: std::result::Result<Json<SendMessageInput>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(input) = input.map_err(Error::from)?;
    let user = user_header(&headers);
    info!("POST /messages - {:?} -> {}", user, input.to);

    state
        .chat
        .send_message(user.as_deref(), &input.to, &input.text, &input.kind)
        .await?;

    Ok(StatusCode::CREATED)
}

/// GET /messages?limit=N
pub async fn get_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: std::result::Result<Query<MessagesQuery>, QueryRejection>,
) -> Result<Json<Vec<Message>>> {
    let Query(query) = query.map_err(Error::from)?;
    let user = user_header(&headers);
    let limit = parse_limit(query.limit.as_deref())?;
    info!("GET /messages - {:?} (limit {:?})", user, limit);

    let messages = state.chat.poll_messages(user.as_deref(), limit).await?;
    Ok(Json(messages))
}

fn parse_limit(raw: Option<&str>) -> Result<Option<usize>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<usize>()
            .map(Some)
            .map_err(|_| {
                Error::Validation(format!(
                    "limit must be a non-negative integer, got {:?}",
                    raw
                ))
            }),
    }
}
