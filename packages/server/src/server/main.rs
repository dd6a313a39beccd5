// Main entry point for the pitch builder API server

use std::sync::Arc;

use anyhow::{Context, Result};
use pitch_extraction::ai::OpenAI;
use pitch_extraction::{HttpIngestor, Ingestor, PitchEngine, ValidatedIngestor, AI};
use pitch_server::{
    server::{build_app, AppState},
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pitch_server=debug,pitch_extraction=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pitch Builder API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        generation_model = %config.credentials.generation_model,
        analysis_model = %config.credentials.analysis_model,
        json_mode = config.pipeline.json_mode,
        "Configuration loaded"
    );

    // Model provider; the per-call deadline is enforced by the engine
    let ai: Arc<dyn AI> = Arc::new(OpenAI::from_credentials(&config.credentials));

    // Website fetcher with SSRF protection
    let http = HttpIngestor::with_timeout(config.pipeline.document_timeout)
        .context("Failed to build HTTP client")?;
    let ingestor: Arc<dyn Ingestor> = Arc::new(ValidatedIngestor::new(http));

    let engine = PitchEngine::with_config(ai, ingestor, config.pipeline.clone());
    let app = build_app(AppState::new(engine), &config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
