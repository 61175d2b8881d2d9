//! Sous Chef - A state-managed HTTP server for recipe analysis and cooking timers
//!
//! This library provides session-partitioned cooking timers, recipe analysis
//! through a hosted generative model, image text extraction through the
//! tesseract binary, and a mode-based chat assistant.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use utils::shutdown_signal;
