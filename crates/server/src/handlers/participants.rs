use crate::config::AppState;
use crate::error::{Error, Result};
use crate::models::{JoinInput, JoinOutput, Participant};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::info;

/// POST /participants
pub async fn join(
    State(state): State<AppState>,
    input: std::result::Result<Json<JoinInput>, JsonRejection>,
) -> Result<(StatusCode, Json<JoinOutput>)> {
    let Json(input) = input.map_err(Error::from)?;
    info!("POST /participants - {}", input.name);

    let participant = state.chat.join(&input.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(JoinOutput {
            name: participant.name,
        }),
    ))
}

/// GET /participants
pub async fn list_participants(State(state): State<AppState>) -> Result<Json<Vec<Participant>>> {
    info!("GET /participants");
    Ok(Json(state.chat.list_participants().await?))
}
