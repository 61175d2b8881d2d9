//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and the request and
//! response structures.

pub mod handlers;
pub mod requests;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sessions", post(create_session_handler))
        .route("/sessions/:session_id", delete(drop_session_handler))
        .route("/sessions/:session_id/status", get(status_handler))
        .route("/sessions/:session_id/timers", post(create_timer_handler))
        .route(
            "/sessions/:session_id/timers/:label/start",
            post(start_timer_handler),
        )
        // Resume is the same transition as start, kept as a separate path
        // for UI symmetry
        .route(
            "/sessions/:session_id/timers/:label/resume",
            post(start_timer_handler),
        )
        .route(
            "/sessions/:session_id/timers/:label/pause",
            post(pause_timer_handler),
        )
        .route(
            "/sessions/:session_id/timers/:label",
            delete(stop_timer_handler),
        )
        .route("/sessions/:session_id/analyze", post(analyze_handler))
        .route("/sessions/:session_id/extract", post(extract_handler))
        .route(
            "/sessions/:session_id/chat",
            post(chat_handler).get(transcript_handler),
        )
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
