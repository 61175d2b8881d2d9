//! External collaborator module
//!
//! This module contains the clients for the two external services the
//! application delegates to: the hosted generative model and the tesseract
//! OCR binary.

pub mod analyzer;
pub mod gemini;
pub mod ocr;

// Re-export main types and functions
pub use analyzer::{
    break_into_steps, derive_label, estimate_duration, estimate_reply, parse_minutes, steps_reply,
    ParseError, FALLBACK_MINUTES,
};
pub use gemini::{GeminiClient, GeminiError};
pub use ocr::{check_tesseract_available, extract_text, OcrError};
