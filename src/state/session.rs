//! Per-session state: timer registry, transcript, and analysis output

use chrono::{DateTime, Utc};

use super::chat::Transcript;
use super::timer::TimerRegistry;

/// Everything one user session owns.
///
/// Sessions never share state: timer labels are unique only within one
/// session's registry, and the transcript belongs to that session alone.
/// Created empty on session init and dropped whole on teardown.
#[derive(Debug)]
pub struct SessionState {
    pub registry: TimerRegistry,
    pub transcript: Transcript,
    /// Step list from the most recent recipe analysis
    pub steps_output: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Create a fresh session with an empty registry and transcript
    pub fn new() -> Self {
        Self {
            registry: TimerRegistry::new(),
            transcript: Transcript::new(),
            steps_output: Vec::new(),
            created_at: Utc::now(),
            last_action: None,
            last_action_time: None,
        }
    }

    /// Record the most recent user-triggered action for status reporting
    pub fn note_action(&mut self, action: &str) {
        self.last_action = Some(action.to_string());
        self.last_action_time = Some(Utc::now());
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = SessionState::new();
        assert!(session.registry.is_empty());
        assert!(session.transcript.is_empty());
        assert!(session.steps_output.is_empty());
        assert!(session.last_action.is_none());
    }

    #[test]
    fn test_note_action() {
        let mut session = SessionState::new();
        session.note_action("analyze");
        assert_eq!(session.last_action.as_deref(), Some("analyze"));
        assert!(session.last_action_time.is_some());
    }
}
