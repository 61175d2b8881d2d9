//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod app_state;
pub mod chat;
pub mod session;
pub mod timer;

// Re-export main types
pub use app_state::AppState;
pub use chat::{ChatMode, ChatTurn, Role, Transcript};
pub use session::SessionState;
pub use timer::{RegistryError, TimerRecord, TimerRegistry};
