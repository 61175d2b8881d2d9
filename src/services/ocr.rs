//! Text extraction from recipe images via the tesseract binary

use std::path::PathBuf;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

const TESSERACT_BIN: &str = "tesseract";

/// Failures extracting text from an image
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("failed to run tesseract: {0}")]
    Launch(std::io::Error),
    #[error("failed to stage image for OCR: {0}")]
    Staging(std::io::Error),
    #[error("image could not be read: {0}")]
    UnreadableImage(String),
}

/// Check that the tesseract binary is on PATH.
///
/// The server refuses to start without it; discovering the missing binary
/// on the first upload would waste the user's session.
pub async fn check_tesseract_available() -> Result<(), String> {
    Command::new(TESSERACT_BIN)
        .arg("--version")
        .output()
        .await
        .map_err(|_| {
            "tesseract is not available. Install the tesseract-ocr package before starting."
                .to_string()
        })?;

    info!("tesseract is available");
    Ok(())
}

fn staging_path() -> PathBuf {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);
    std::env::temp_dir().join(format!("sous-chef-{}-{}.img", std::process::id(), nanos))
}

/// Run OCR over raw image bytes and return the extracted text.
///
/// The bytes are staged to a temp file because tesseract reads from disk;
/// the file is removed before returning, success or not.
pub async fn extract_text(image_bytes: &[u8]) -> Result<String, OcrError> {
    if image_bytes.is_empty() {
        return Err(OcrError::UnreadableImage("empty image body".to_string()));
    }

    let path = staging_path();
    tokio::fs::write(&path, image_bytes)
        .await
        .map_err(OcrError::Staging)?;

    debug!("Running tesseract on {} ({} bytes)", path.display(), image_bytes.len());

    let output = Command::new(TESSERACT_BIN)
        .arg(&path)
        .arg("stdout")
        .output()
        .await;

    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!("Failed to remove staged image {}: {}", path.display(), e);
    }

    let output = output.map_err(OcrError::Launch)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(OcrError::UnreadableImage(stderr.trim().to_string()));
    }

    let text = String::from_utf8_lossy(&output.stdout).to_string();
    info!("OCR extracted {} chars", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_body_is_unreadable() {
        let err = extract_text(&[]).await.unwrap_err();
        assert!(matches!(err, OcrError::UnreadableImage(_)));
    }

    #[test]
    fn test_staging_paths_are_distinct() {
        assert_ne!(staging_path(), staging_path());
    }
}
