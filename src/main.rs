//! Sous Chef - A state-managed HTTP server for recipe analysis and cooking timers
//!
//! This is the main entry point for the sous-chef application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use sous_chef::{
    api::create_router,
    config::Config,
    services::{check_tesseract_available, GeminiClient},
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("sous_chef={},tower_http=info", config.log_level()))
        .init();

    info!("Starting sous-chef server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, model={}, timeout={}s",
        config.host, config.port, config.model, config.request_timeout
    );

    // Check that the OCR binary is installed (required for image uploads)
    if let Err(e) = check_tesseract_available().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    // Resolve the model API key before accepting any input
    let api_key = match config.resolved_api_key() {
        Some(key) => key,
        None => {
            tracing::error!(
                "No Gemini API key. Pass --gemini-api-key or set GEMINI_API_KEY."
            );
            std::process::exit(1);
        }
    };

    let gemini = GeminiClient::new(api_key, config.model.clone(), config.timeout())?;

    // Create application state
    let state = Arc::new(AppState::new(gemini, config.port, config.host.clone()));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /sessions                          - Create a session");
    info!("  DELETE /sessions/:id                      - Tear down a session");
    info!("  GET    /sessions/:id/status               - Timers and session status");
    info!("  POST   /sessions/:id/timers               - Add a manual timer");
    info!("  POST   /sessions/:id/timers/:label/start  - Start or resume a timer");
    info!("  POST   /sessions/:id/timers/:label/pause  - Pause a timer");
    info!("  DELETE /sessions/:id/timers/:label        - Stop a timer");
    info!("  POST   /sessions/:id/analyze              - Analyze recipe text");
    info!("  POST   /sessions/:id/extract              - Extract text from an image");
    info!("  POST   /sessions/:id/chat                 - Ask the assistant");
    info!("  GET    /sessions/:id/chat                 - Chat history");
    info!("  GET    /health                            - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
