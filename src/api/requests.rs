//! API request structures

use serde::Deserialize;

use crate::state::ChatMode;

/// Manual entry caps from the timer input surface
pub const MAX_MINUTES: u64 = 120;
pub const MAX_SECONDS: u64 = 59;

fn default_label() -> String {
    "My Dish".to_string()
}

/// Manual timer creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTimerRequest {
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

impl CreateTimerRequest {
    /// Check the field caps (minutes 0..=120, seconds 0..=59)
    pub fn validate(&self) -> Result<(), String> {
        if self.minutes > MAX_MINUTES {
            return Err(format!("minutes must be at most {}", MAX_MINUTES));
        }
        if self.seconds > MAX_SECONDS {
            return Err(format!("seconds must be at most {}", MAX_SECONDS));
        }
        Ok(())
    }

    pub fn duration_seconds(&self) -> u64 {
        self.minutes * 60 + self.seconds
    }
}

/// Recipe analysis over pasted or extracted text
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// One chat turn from the user
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub mode: ChatMode,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_defaults_to_my_dish() {
        let req: CreateTimerRequest =
            serde_json::from_str(r#"{"minutes": 5, "seconds": 30}"#).unwrap();
        assert_eq!(req.label, "My Dish");
        assert_eq!(req.duration_seconds(), 330);
    }

    #[test]
    fn test_validate_caps() {
        let req: CreateTimerRequest =
            serde_json::from_str(r#"{"minutes": 120, "seconds": 59}"#).unwrap();
        assert!(req.validate().is_ok());

        let req: CreateTimerRequest = serde_json::from_str(r#"{"minutes": 121}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateTimerRequest = serde_json::from_str(r#"{"seconds": 60}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_duration_is_allowed() {
        let req: CreateTimerRequest = serde_json::from_str(r#"{"label": "Nap"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.duration_seconds(), 0);
    }
}
