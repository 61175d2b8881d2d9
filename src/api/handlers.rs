//! HTTP endpoint handlers
//!
//! Registry mutations run under the session lock; calls to the model API
//! and the OCR binary always happen before the lock is taken, so a slow
//! external collaborator never blocks other sessions.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    services::{
        self, break_into_steps, derive_label, estimate_reply, parse_minutes, steps_reply,
        GeminiError, OcrError, FALLBACK_MINUTES,
    },
    state::{AppState, RegistryError},
    utils::format_mm_ss,
};

use super::requests::{AnalyzeRequest, ChatRequest, CreateTimerRequest};
use super::responses::{
    AnalyzeResponse, ApiResponse, ChatResponse, ExtractResponse, HealthResponse, SessionResponse,
    StatusResponse, TimerSnapshot, TranscriptResponse,
};

type ApiError = (StatusCode, Json<ApiResponse>);

fn api_error(status: StatusCode, message: String) -> ApiError {
    (status, Json(ApiResponse::error(message)))
}

fn internal_error(context: &str, detail: String) -> ApiError {
    error!("{}: {}", context, detail);
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error".to_string(),
    )
}

fn unknown_session(id: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, format!("no session '{}'", id))
}

fn registry_error(err: RegistryError) -> ApiError {
    let status = match err {
        RegistryError::DuplicateLabel(_) => StatusCode::CONFLICT,
        RegistryError::UnknownLabel(_) => StatusCode::NOT_FOUND,
    };
    api_error(status, err.to_string())
}

fn gemini_error(err: GeminiError) -> ApiError {
    warn!("Model API call failed: {}", err);
    let status = match err {
        GeminiError::TimedOut => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    };
    api_error(status, err.to_string())
}

/// Handle POST /sessions - Initialize a fresh session
pub async fn create_session_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = state
        .create_session()
        .map_err(|e| internal_error("Failed to create session", e))?;

    Ok(Json(SessionResponse {
        session_id,
        timestamp: chrono::Utc::now(),
    }))
}

/// Handle DELETE /sessions/:session_id - Tear down a session
pub async fn drop_session_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let removed = state
        .drop_session(&session_id)
        .map_err(|e| internal_error("Failed to drop session", e))?;

    let message = if removed {
        format!("session '{}' dropped", session_id)
    } else {
        format!("session '{}' was not present", session_id)
    };
    Ok(Json(ApiResponse::ok(message)))
}

/// Handle GET /sessions/:session_id/status - Tick the registry and report
///
/// This is the observation point: remaining times are recomputed here and
/// nowhere else, and timers that reached zero are removed after being
/// reported in `expired`.
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let now = Instant::now();
    let uptime = state.get_uptime();

    let status = state
        .with_session(&session_id, |session| {
            let expired = session.registry.tick(now);
            for label in &expired {
                info!("Timer '{}' is done", label);
            }

            let mut timers: Vec<TimerSnapshot> = session
                .registry
                .iter()
                .map(|(label, timer)| {
                    let remaining_seconds = timer.remaining().as_secs();
                    TimerSnapshot {
                        label: label.clone(),
                        remaining_seconds,
                        remaining_display: format_mm_ss(remaining_seconds),
                        running: timer.is_running(),
                        paused: timer.is_paused(),
                        steps: timer.steps().to_vec(),
                    }
                })
                .collect();
            timers.sort_by(|a, b| a.label.cmp(&b.label));

            StatusResponse {
                session_id: session_id.clone(),
                timers,
                expired,
                steps: session.steps_output.clone(),
                transcript_turns: session.transcript.len(),
                uptime,
                last_action: session.last_action.clone(),
                last_action_time: session.last_action_time,
            }
        })
        .map_err(|e| internal_error("Failed to read session", e))?
        .ok_or_else(|| unknown_session(&session_id))?;

    Ok(Json(status))
}

/// Handle POST /sessions/:session_id/timers - Manual timer creation
pub async fn create_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<CreateTimerRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    req.validate()
        .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e))?;

    let duration = Duration::from_secs(req.duration_seconds());
    let created = state
        .with_session(&session_id, |session| {
            let result = session.registry.create(&req.label, duration, Vec::new());
            if result.is_ok() {
                session.note_action("timer-create");
            }
            result
        })
        .map_err(|e| internal_error("Failed to create timer", e))?
        .ok_or_else(|| unknown_session(&session_id))?;

    created.map_err(registry_error)?;

    info!(
        "Timer '{}' added for {} min {} sec",
        req.label, req.minutes, req.seconds
    );
    Ok(Json(ApiResponse::ok(format!(
        "timer '{}' added for {} min {} sec",
        req.label, req.minutes, req.seconds
    ))))
}

/// Handle POST /sessions/:session_id/timers/:label/start - Start or resume
pub async fn start_timer_handler(
    State(state): State<Arc<AppState>>,
    Path((session_id, label)): Path<(String, String)>,
) -> Result<Json<ApiResponse>, ApiError> {
    let now = Instant::now();
    let started = state
        .with_session(&session_id, |session| {
            let result = session.registry.start(&label, now);
            if result.is_ok() {
                session.note_action("timer-start");
            }
            result
        })
        .map_err(|e| internal_error("Failed to start timer", e))?
        .ok_or_else(|| unknown_session(&session_id))?;

    started.map_err(registry_error)?;

    info!("Timer '{}' started", label);
    Ok(Json(ApiResponse::ok(format!("timer '{}' started", label))))
}

/// Handle POST /sessions/:session_id/timers/:label/pause - Freeze remaining time
pub async fn pause_timer_handler(
    State(state): State<Arc<AppState>>,
    Path((session_id, label)): Path<(String, String)>,
) -> Result<Json<ApiResponse>, ApiError> {
    let now = Instant::now();
    let paused = state
        .with_session(&session_id, |session| {
            let result = session.registry.pause(&label, now);
            if result.is_ok() {
                session.note_action("timer-pause");
            }
            result
        })
        .map_err(|e| internal_error("Failed to pause timer", e))?
        .ok_or_else(|| unknown_session(&session_id))?;

    paused.map_err(registry_error)?;

    info!("Timer '{}' paused", label);
    Ok(Json(ApiResponse::ok(format!("timer '{}' paused", label))))
}

/// Handle DELETE /sessions/:session_id/timers/:label - Stop and remove
///
/// Stopping an absent label succeeds: the outcome the caller asked for
/// already holds.
pub async fn stop_timer_handler(
    State(state): State<Arc<AppState>>,
    Path((session_id, label)): Path<(String, String)>,
) -> Result<Json<ApiResponse>, ApiError> {
    let removed = state
        .with_session(&session_id, |session| {
            let removed = session.registry.stop(&label);
            if removed {
                session.note_action("timer-stop");
            }
            removed
        })
        .map_err(|e| internal_error("Failed to stop timer", e))?
        .ok_or_else(|| unknown_session(&session_id))?;

    let message = if removed {
        info!("Timer '{}' stopped", label);
        format!("timer '{}' stopped", label)
    } else {
        format!("timer '{}' was not present", label)
    };
    Ok(Json(ApiResponse::ok(message)))
}

/// Handle POST /sessions/:session_id/analyze - Analyze recipe text
///
/// Runs the two model calls, then creates a timer labeled after the first
/// recipe word with the step list attached. An unparseable time estimate
/// falls back to the default; a failed step call propagates.
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "please enter or upload a recipe".to_string(),
        ));
    }
    if !state
        .session_exists(&session_id)
        .map_err(|e| internal_error("Failed to read session", e))?
    {
        return Err(unknown_session(&session_id));
    }

    let minutes_raw = estimate_reply(&state.gemini, text)
        .await
        .map_err(gemini_error)?;
    let estimated_minutes = match parse_minutes(&minutes_raw) {
        Ok(minutes) => minutes,
        Err(e) => {
            // Hidden from the user, but never from the log
            warn!(
                "Could not parse a minute estimate ({}), falling back to {} minutes",
                e, FALLBACK_MINUTES
            );
            FALLBACK_MINUTES
        }
    };

    let steps_raw = steps_reply(&state.gemini, text)
        .await
        .map_err(gemini_error)?;
    let steps = break_into_steps(&steps_raw);

    let label = derive_label(text);
    let duration = services::estimate_duration(estimated_minutes);

    let created = state
        .with_session(&session_id, |session| {
            let result = session.registry.create(&label, duration, steps.clone());
            if result.is_ok() {
                session.steps_output = steps.clone();
                session.note_action("analyze");
            }
            result
        })
        .map_err(|e| internal_error("Failed to store analysis", e))?
        .ok_or_else(|| unknown_session(&session_id))?;

    created.map_err(registry_error)?;

    info!(
        "Timer for '{}' added, duration {} min, {} steps",
        label,
        estimated_minutes,
        steps.len()
    );
    Ok(Json(AnalyzeResponse {
        label,
        estimated_minutes,
        steps,
    }))
}

/// Handle POST /sessions/:session_id/extract - OCR over raw image bytes
pub async fn extract_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Result<Json<ExtractResponse>, ApiError> {
    if !state
        .session_exists(&session_id)
        .map_err(|e| internal_error("Failed to read session", e))?
    {
        return Err(unknown_session(&session_id));
    }

    let text = services::extract_text(&body).await.map_err(|e| match e {
        OcrError::UnreadableImage(detail) => {
            warn!("Unreadable image upload: {}", detail);
            api_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("image could not be read: {}", detail),
            )
        }
        other => internal_error("OCR failed", other.to_string()),
    })?;

    // Session may have been torn down while tesseract ran; just report it
    state
        .with_session(&session_id, |session| session.note_action("extract"))
        .map_err(|e| internal_error("Failed to update session", e))?
        .ok_or_else(|| unknown_session(&session_id))?;

    Ok(Json(ExtractResponse { text }))
}

/// Handle POST /sessions/:session_id/chat - One assistant exchange
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "ask your assistant something".to_string(),
        ));
    }
    if !state
        .session_exists(&session_id)
        .map_err(|e| internal_error("Failed to read session", e))?
    {
        return Err(unknown_session(&session_id));
    }

    let prompt = format!("{} {}", req.mode.prompt_prefix(), text);
    let reply = state.gemini.generate(&prompt).await.map_err(gemini_error)?;

    state
        .with_session(&session_id, |session| {
            session.transcript.record_exchange(text, &reply);
            session.note_action("chat");
        })
        .map_err(|e| internal_error("Failed to record exchange", e))?
        .ok_or_else(|| unknown_session(&session_id))?;

    Ok(Json(ChatResponse { reply }))
}

/// Handle GET /sessions/:session_id/chat - Full chat history
pub async fn transcript_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let turns = state
        .with_session(&session_id, |session| session.transcript.turns().to_vec())
        .map_err(|e| internal_error("Failed to read transcript", e))?
        .ok_or_else(|| unknown_session(&session_id))?;

    Ok(Json(TranscriptResponse { turns }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
