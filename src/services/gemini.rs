//! Hosted model API client
//!
//! Thin wrapper over the Gemini `generateContent` endpoint. Every prompt in
//! this application goes through [`GeminiClient::generate`]; the caller owns
//! prompt construction and reply interpretation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Failures talking to the model API
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("model API call timed out")]
    TimedOut,
    #[error("model API request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("model API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("model reply contained no candidates")]
    EmptyReply,
}

// Request wire types
#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

// Response wire types
#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

/// Client for the hosted generative model
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

// The key must never leak through `{:?}` of this client or any state
// holding it
impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiClient {
    /// Build a client with an explicit per-request timeout.
    ///
    /// The timeout bounds every call; without it a slow model API would
    /// block the triggering user action indefinitely.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, GeminiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key,
            model,
        })
    }

    /// Send one prompt and return the model's text reply, trimmed.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, self.model, self.api_key
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!("Sending prompt to model {} ({} chars)", self.model, prompt.len());

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeminiError::TimedOut
                } else {
                    GeminiError::Request(e)
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, body });
        }

        let reply: GenerateResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                GeminiError::TimedOut
            } else {
                GeminiError::Request(e)
            }
        })?;

        let text = reply
            .candidates
            .and_then(|c| c.into_iter().next())
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or(GeminiError::EmptyReply)?;

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let client = GeminiClient::new(
            "super-secret-key".to_string(),
            "gemini-1.5-pro-latest".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("gemini-1.5-pro-latest"));
    }
}
