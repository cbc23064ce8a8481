//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth::AuthConfig, state::Engine};
use handlers::*;

/// Shared, immutable handler state
pub struct ApiState {
    pub engine: Engine,
    pub auth: AuthConfig,
}

impl ApiState {
    pub fn new(engine: Engine, auth: AuthConfig) -> Self {
        Self { engine, auth }
    }
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/state", get(get_state_handler).post(post_state_handler))
        .route("/pause", post(pause_handler))
        .route("/resume", post(resume_handler))
        .route("/slack", post(slack_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
