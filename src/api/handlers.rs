//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{command::ChatCommand, state::UpdateCommand};
use super::{
    responses::{ApiError, ChatReply, HealthResponse, TimerView},
    ApiState,
};

/// Form fields posted by the chat slash command
#[derive(Debug, Deserialize)]
struct ChatForm {
    #[serde(default)]
    text: String,
    #[serde(default)]
    user_id: String,
}

/// Handle GET /state - Checked read of the current level
pub async fn get_state_handler(State(state): State<Arc<ApiState>>) -> Result<Json<TimerView>, ApiError> {
    let timer = state.engine.load_checked().await?;
    Ok(Json(TimerView::from(&timer)))
}

/// Handle POST /state - Structured update, token required
pub async fn post_state_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TimerView>, ApiError> {
    state.auth.check_api_token(&headers)?;
    let cmd = UpdateCommand::from_json(&body)?;
    apply(&state, &cmd).await
}

/// Handle POST /pause - Pause the clock, token required
pub async fn pause_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<TimerView>, ApiError> {
    state.auth.check_api_token(&headers)?;
    apply(&state, &UpdateCommand::pause()).await
}

/// Handle POST /resume - Resume the clock, token required
pub async fn resume_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<TimerView>, ApiError> {
    state.auth.check_api_token(&headers)?;
    apply(&state, &UpdateCommand::resume()).await
}

async fn apply(state: &ApiState, cmd: &UpdateCommand) -> Result<Json<TimerView>, ApiError> {
    let timer = state.engine.apply_update(cmd).await?;
    info!("Applied API update {:?}", cmd);
    Ok(Json(TimerView::from(&timer)))
}

/// Handle POST /slack - Signed chat command.
///
/// Only a bad signature is an HTTP error; every other failure is a chat reply.
pub async fn slack_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatReply>, ApiError> {
    state
        .auth
        .check_slack_signature(&headers, &body, Utc::now().timestamp())?;

    let form: ChatForm = match serde_urlencoded::from_bytes(&body) {
        Ok(form) => form,
        Err(e) => {
            warn!("Failed to parse chat body: {}", e);
            return Ok(Json(ChatReply::new("failed to parse body params", None)));
        }
    };

    if let Err(e) = state.auth.check_slack_user(&form.user_id) {
        warn!("Rejected chat command: {}", e);
        return Ok(Json(ChatReply::new("unauthorized user", None)));
    }

    let command = match ChatCommand::parse(&form.text) {
        Ok(command) => command,
        Err(e) => {
            warn!("Rejected chat command from {}: {}", form.user_id, e);
            return Ok(Json(ChatReply::new("invalid input", None)));
        }
    };

    match state.engine.apply_update(&command.update).await {
        Ok(timer) => {
            info!("Chat command from {}: {:?}", form.user_id, command.update);
            Ok(Json(ChatReply::new(command.reply, Some(TimerView::from(&timer)))))
        }
        Err(e) => {
            error!("Chat update failed: {}", e);
            Ok(Json(ChatReply::new("state update failed", None)))
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
