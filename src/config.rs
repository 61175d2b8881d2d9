//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "sous-chef")]
#[command(about = "A state-managed HTTP server for recipe analysis and cooking timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "8490")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Gemini model used for analysis and chat
    #[arg(short, long, default_value = "gemini-1.5-pro-latest")]
    pub model: String,

    /// Gemini API key (falls back to the GEMINI_API_KEY environment variable)
    #[arg(long)]
    pub gemini_api_key: Option<String>,

    /// Timeout for model API calls, in seconds
    #[arg(long, default_value = "30")]
    pub request_timeout: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Resolve the Gemini API key from the flag or the environment
    pub fn resolved_api_key(&self) -> Option<String> {
        self.gemini_api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.is_empty())
    }

    /// Timeout applied to every model API call
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}
