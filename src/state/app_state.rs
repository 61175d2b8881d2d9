//! Main application state: the session table and shared service clients

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Instant,
};

use tracing::info;

use crate::services::GeminiClient;

use super::SessionState;

/// Top-level server state shared by all handlers.
///
/// Sessions are partitioned: each holds its own registry and transcript,
/// keyed by a server-assigned id. The Gemini client is shared since it is
/// stateless per request.
#[derive(Debug)]
pub struct AppState {
    sessions: Mutex<HashMap<String, SessionState>>,
    session_seq: AtomicU64,
    /// Shared client for the hosted model API
    pub gemini: GeminiClient,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    /// Create a new AppState with an empty session table
    pub fn new(gemini: GeminiClient, port: u16, host: String) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            session_seq: AtomicU64::new(1),
            gemini,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Initialize a fresh session and return its id
    pub fn create_session(&self) -> Result<String, String> {
        let seq = self.session_seq.fetch_add(1, Ordering::Relaxed);
        let id = format!("s-{}-{}", chrono::Utc::now().timestamp_millis(), seq);

        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| format!("Failed to lock session table: {}", e))?;
        sessions.insert(id.clone(), SessionState::new());

        info!("Session created: {}", id);
        Ok(id)
    }

    /// Tear down a session and everything it owns.
    ///
    /// Returns whether a session was actually removed; an unknown id is
    /// not an error.
    pub fn drop_session(&self, id: &str) -> Result<bool, String> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| format!("Failed to lock session table: {}", e))?;
        let removed = sessions.remove(id).is_some();
        if removed {
            info!("Session dropped: {}", id);
        }
        Ok(removed)
    }

    /// Run a closure against one session's state under the lock.
    ///
    /// Returns `Ok(None)` when the id is unknown. External calls must
    /// happen before entering here; the closure runs synchronously with
    /// the table locked.
    pub fn with_session<T, F>(&self, id: &str, f: F) -> Result<Option<T>, String>
    where
        F: FnOnce(&mut SessionState) -> T,
    {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| format!("Failed to lock session table: {}", e))?;
        Ok(sessions.get_mut(id).map(f))
    }

    /// Check whether a session id is live
    pub fn session_exists(&self, id: &str) -> Result<bool, String> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|e| format!("Failed to lock session table: {}", e))?;
        Ok(sessions.contains_key(id))
    }

    pub fn session_count(&self) -> Result<usize, String> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|e| format!("Failed to lock session table: {}", e))?;
        Ok(sessions.len())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_state() -> AppState {
        let gemini = GeminiClient::new(
            "test-key".to_string(),
            "gemini-1.5-pro-latest".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        AppState::new(gemini, 8490, "127.0.0.1".to_string())
    }

    #[test]
    fn test_session_lifecycle() {
        let state = test_state();
        let id = state.create_session().unwrap();
        assert!(state.session_exists(&id).unwrap());
        assert_eq!(state.session_count().unwrap(), 1);

        assert!(state.drop_session(&id).unwrap());
        assert!(!state.session_exists(&id).unwrap());
        // Teardown is idempotent
        assert!(!state.drop_session(&id).unwrap());
    }

    #[test]
    fn test_sessions_are_partitioned() {
        let state = test_state();
        let a = state.create_session().unwrap();
        let b = state.create_session().unwrap();
        assert_ne!(a, b);

        state
            .with_session(&a, |s| {
                s.registry
                    .create("Rice", Duration::from_secs(600), Vec::new())
                    .unwrap();
            })
            .unwrap()
            .unwrap();

        // The same label is free in the other session
        let created = state
            .with_session(&b, |s| {
                s.registry
                    .create("Rice", Duration::from_secs(60), Vec::new())
                    .is_ok()
            })
            .unwrap()
            .unwrap();
        assert!(created);
    }

    #[test]
    fn test_with_session_unknown_id() {
        let state = test_state();
        let hit = state.with_session("s-0-0", |_| ()).unwrap();
        assert!(hit.is_none());
    }
}
