//! Recipe analysis: cooking time estimates and step breakdown
//!
//! Two independent model calls plus the pure helpers that interpret their
//! replies. Reply parsing is separate from the network calls; the fallback
//! policy lives with the caller.

use std::time::Duration;

use thiserror::Error;

use super::gemini::{GeminiClient, GeminiError};

/// Minutes assumed when the estimate reply cannot be parsed. Applied by
/// the caller, which logs the swallowed parse failure.
pub const FALLBACK_MINUTES: u64 = 10;

const LABEL_PREFIX: &str = "🍳 ";
const LABEL_MAX_CHARS: usize = 15;

/// Failure to read a minute count out of the model's reply
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("reply contains no digits: {0:?}")]
    NoDigits(String),
    #[error("digit run {0:?} does not fit a minute count")]
    OutOfRange(String),
}

/// Ask the model for a total cooking time estimate. Returns the raw reply.
pub async fn estimate_reply(
    client: &GeminiClient,
    recipe_text: &str,
) -> Result<String, GeminiError> {
    client
        .generate(&format!(
            "Estimate total cooking time (in minutes only). Recipe: {}",
            recipe_text
        ))
        .await
}

/// Ask the model to break the recipe into step instructions. Returns the
/// raw reply; split it with [`break_into_steps`].
pub async fn steps_reply(client: &GeminiClient, recipe_text: &str) -> Result<String, GeminiError> {
    client
        .generate(&format!(
            "Break this recipe into clear step-by-step instructions with estimated time for each step:\n{}",
            recipe_text
        ))
        .await
}

/// Extract a minute count from a model reply by concatenating every ASCII
/// digit and parsing the run as one integer.
pub fn parse_minutes(reply: &str) -> Result<u64, ParseError> {
    let digits: String = reply.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(ParseError::NoDigits(reply.to_string()));
    }
    digits
        .parse::<u64>()
        .map_err(|_| ParseError::OutOfRange(digits))
}

/// Convert an estimated minute count into a timer duration.
///
/// The minute count comes from an unconstrained model reply, so the
/// multiplication saturates instead of overflowing on absurd estimates.
pub fn estimate_duration(minutes: u64) -> Duration {
    Duration::from_secs(minutes.saturating_mul(60))
}

/// Split a free-text step reply on line boundaries, dropping blank lines.
pub fn break_into_steps(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Derive a display label from recipe text: the first word, truncated to
/// 15 characters, with the dish prefix.
pub fn derive_label(recipe_text: &str) -> String {
    let first = recipe_text.split_whitespace().next().unwrap_or("Recipe");
    let truncated: String = first.chars().take(LABEL_MAX_CHARS).collect();
    format!("{}{}...", LABEL_PREFIX, truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minutes_plain_number() {
        assert_eq!(parse_minutes("45"), Ok(45));
    }

    #[test]
    fn test_parse_minutes_digits_in_prose() {
        assert_eq!(parse_minutes("About 30 minutes."), Ok(30));
    }

    #[test]
    fn test_parse_minutes_concatenates_digit_runs() {
        // Every digit in the reply is kept, matching the digit-filter parse
        assert_eq!(parse_minutes("45-60 minutes"), Ok(4560));
    }

    #[test]
    fn test_parse_minutes_no_digits() {
        let err = parse_minutes("a while").unwrap_err();
        assert_eq!(err, ParseError::NoDigits("a while".to_string()));
    }

    #[test]
    fn test_fallback_is_ten_minutes() {
        let minutes = parse_minutes("no idea").unwrap_or(FALLBACK_MINUTES);
        assert_eq!(minutes, 10);
    }

    #[test]
    fn test_estimate_duration_saturates_on_huge_replies() {
        // A long digit run concatenated out of a model reply still fits a
        // u64, so the minute-to-second conversion must not overflow
        let minutes = parse_minutes("400000000000000000").unwrap();
        assert_eq!(minutes, 400_000_000_000_000_000);
        assert_eq!(
            estimate_duration(minutes),
            Duration::from_secs(u64::MAX)
        );
    }

    #[test]
    fn test_estimate_duration_plain() {
        assert_eq!(estimate_duration(10), Duration::from_secs(600));
    }

    #[test]
    fn test_break_into_steps_drops_blank_lines() {
        assert_eq!(
            break_into_steps("Step A\n\nStep B\n"),
            vec!["Step A".to_string(), "Step B".to_string()]
        );
    }

    #[test]
    fn test_break_into_steps_trims_whitespace() {
        assert_eq!(
            break_into_steps("  1. Boil water  \n\t2. Add rice\n   \n"),
            vec!["1. Boil water".to_string(), "2. Add rice".to_string()]
        );
    }

    #[test]
    fn test_break_into_steps_empty_reply() {
        assert!(break_into_steps("").is_empty());
        assert!(break_into_steps("\n\n").is_empty());
    }

    #[test]
    fn test_derive_label_first_word() {
        assert_eq!(derive_label("Risotto with mushrooms"), "🍳 Risotto...");
    }

    #[test]
    fn test_derive_label_truncates_long_word() {
        assert_eq!(
            derive_label("Supercalifragilistic stew"),
            "🍳 Supercalifragil..."
        );
    }

    #[test]
    fn test_derive_label_empty_text() {
        assert_eq!(derive_label("   "), "🍳 Recipe...");
    }
}
