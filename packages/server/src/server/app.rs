//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use pitch_extraction::{Ingestor, PitchEngine, PromptKind, AI};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::routes::{
    analyze_pdf_handler, analyze_website_handler, generate_email_cadence_handler,
    generate_objection_handling_handler, generate_pitch_strategy_handler, health_handler,
    improve_email_cadence_handler, improve_objection_handling_handler,
    improve_pitch_strategy_handler, improve_prompt_handler, process_feedback_handler,
    ARTIFACT_SOURCE_HEADER,
};

/// Engine with the provider and fetcher chosen at startup.
pub type AppEngine = PitchEngine<Arc<dyn AI>, Arc<dyn Ingestor>>;

/// Headers browsers send from the pitch builder frontend.
const CLIENT_INFO: HeaderName = HeaderName::from_static("x-client-info");
const API_KEY: HeaderName = HeaderName::from_static("apikey");

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AppEngine>,
}

impl AppState {
    pub fn new(engine: AppEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Largest request body accepted: a base64 PDF at the configured ceiling
/// plus room for the JSON envelope.
pub fn body_limit(max_document_bytes: usize) -> usize {
    max_document_bytes.div_ceil(3) * 4 + 64 * 1024
}

fn stage_path(kind: PromptKind) -> String {
    format!("/functions/v1/{}", kind.as_str())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, CLIENT_INFO, API_KEY])
        .expose_headers([HeaderName::from_static(ARTIFACT_SOURCE_HEADER)]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState, allowed_origins: &[String]) -> Router {
    let max_body = body_limit(state.engine.config().max_document_bytes);

    Router::new()
        .route(
            &stage_path(PromptKind::AnalyzeWebsite),
            post(analyze_website_handler),
        )
        .route(&stage_path(PromptKind::AnalyzePdf), post(analyze_pdf_handler))
        .route(
            &stage_path(PromptKind::ProcessFeedback),
            post(process_feedback_handler),
        )
        .route(
            &stage_path(PromptKind::PitchStrategy),
            post(generate_pitch_strategy_handler),
        )
        .route(
            &stage_path(PromptKind::ImprovePitchStrategy),
            post(improve_pitch_strategy_handler),
        )
        .route(
            &stage_path(PromptKind::ObjectionHandling),
            post(generate_objection_handling_handler),
        )
        .route(
            &stage_path(PromptKind::ImproveObjectionHandling),
            post(improve_objection_handling_handler),
        )
        .route(
            &stage_path(PromptKind::EmailCadence),
            post(generate_email_cadence_handler),
        )
        .route(
            &stage_path(PromptKind::ImproveEmailCadence),
            post(improve_email_cadence_handler),
        )
        .route("/functions/v1/improve-prompt", post(improve_prompt_handler))
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(Extension(state))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_limit_fits_encoded_ceiling() {
        let ceiling: usize = 5 * 1024 * 1024;
        let encoded = ceiling.div_ceil(3) * 4;
        assert!(body_limit(ceiling) > encoded);
    }

    #[test]
    fn test_stage_paths() {
        assert_eq!(
            stage_path(PromptKind::PitchStrategy),
            "/functions/v1/generate-pitch-strategy"
        );
        assert_eq!(
            stage_path(PromptKind::AnalyzePdf),
            "/functions/v1/analyze-pdf"
        );
    }
}
