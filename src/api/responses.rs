//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    error::{StorageError, TimerError},
    state::TimerState,
};

/// The one externally visible rendering of the timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerView {
    /// Deadline as an RFC 3339 timestamp
    pub timer: String,
    pub small: u64,
    pub big: u64,
    pub paused: bool,
}

impl From<&TimerState> for TimerView {
    fn from(state: &TimerState) -> Self {
        Self {
            timer: state.deadline.to_rfc3339_opts(SecondsFormat::Secs, true),
            small: state.small_blind,
            big: state.big_blind,
            paused: state.is_paused(),
        }
    }
}

/// Uniform failure body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Wraps a [`TimerError`] so handlers can return it with `?`.
///
/// The detailed error is logged; callers only see the error class.
#[derive(Debug)]
pub struct ApiError(pub TimerError);

impl<E: Into<TimerError>> From<E> for ApiError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            TimerError::Auth(e) => {
                warn!("Rejected request: {}", e);
                (StatusCode::UNAUTHORIZED, "unauthorized")
            }
            TimerError::Parse(e) => {
                warn!("Rejected update: {}", e);
                (StatusCode::BAD_REQUEST, "invalid update")
            }
            TimerError::Storage(StorageError::NotFound(location)) => {
                warn!("Timer state not initialized at {}", location);
                (StatusCode::NOT_FOUND, "timer not initialized")
            }
            TimerError::Storage(e) => {
                error!("Storage failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "storage failure")
            }
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Reply body for chat slash commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response_type: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<TimerView>,
}

impl ChatReply {
    pub fn new(text: impl Into<String>, state: Option<TimerView>) -> Self {
        Self {
            response_type: "ephemeral".to_string(),
            text: text.into(),
            state,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
