//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::ChatTurn;

/// Generic response envelope for state change endpoints and errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
        }
    }

    /// Create a success response
    pub fn ok(message: String) -> Self {
        Self::new("ok".to_string(), message)
    }

    /// Create an error response
    pub fn error(message: String) -> Self {
        Self::new("error".to_string(), message)
    }
}

/// Response to session creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Point-in-time view of one timer, taken during a tick pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub label: String,
    pub remaining_seconds: u64,
    /// `MM:SS` rendering of `remaining_seconds`
    pub remaining_display: String,
    pub running: bool,
    pub paused: bool,
    pub steps: Vec<String>,
}

/// Session status: timers after a tick pass, plus session metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub session_id: String,
    /// Timer snapshots, sorted by label so the order is stable across
    /// passes (the registry itself keeps no insertion order)
    pub timers: Vec<TimerSnapshot>,
    /// Labels that reached zero on this pass; already removed
    pub expired: Vec<String>,
    /// Step list from the most recent recipe analysis
    pub steps: Vec<String>,
    pub transcript_turns: usize,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Response to recipe analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub label: String,
    pub estimated_minutes: u64,
    pub steps: Vec<String>,
}

/// Response to image text extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub text: String,
}

/// Response to a chat exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Full chat history for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub turns: Vec<ChatTurn>,
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
