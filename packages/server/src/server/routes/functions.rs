//! Stage endpoints under `/functions/v1`.
//!
//! Each handler deserializes a camelCase body, runs one engine stage and
//! answers with the artifact as JSON. Artifact responses carry
//! `x-artifact-source: model|fallback`.

use axum::extract::{Extension, FromRequest};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pitch_extraction::{
    EmailCadence, FieldType, ObjectionHandlingSet, PipelineResult, PitchStrategy, ProductInfo,
    PromptConfig, PromptKind,
};
use serde::{Deserialize, Serialize};

use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Response header naming where an artifact came from.
pub const ARTIFACT_SOURCE_HEADER: &str = "x-artifact-source";

/// JSON body extractor that rejects with an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// A stage result rendered as its value plus the source header.
pub struct ArtifactResponse<T>(pub PipelineResult<T>);

impl<T: Serialize> IntoResponse for ArtifactResponse<T> {
    fn into_response(self) -> Response {
        let source = self.0.source_label();
        (
            [(ARTIFACT_SOURCE_HEADER, source)],
            Json(self.0.into_value()),
        )
            .into_response()
    }
}

fn prompts(kind: PromptKind, system_prompt: Option<&str>) -> PromptConfig {
    PromptConfig::new().with_optional(kind, system_prompt)
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeWebsiteRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePdfRequest {
    #[serde(default)]
    pub pdf_content: String,
    pub file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessFeedbackRequest {
    #[serde(default)]
    pub feedback: String,
    pub current_product_info: ProductInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePitchRequest {
    pub product_info: ProductInfo,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovePitchRequest {
    #[serde(default)]
    pub feedback: String,
    pub current_strategy: PitchStrategy,
    pub product_info: ProductInfo,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateObjectionsRequest {
    pub product_info: ProductInfo,
    pub pitch_strategy: PitchStrategy,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveObjectionsRequest {
    #[serde(default)]
    pub feedback: String,
    pub current_objections: ObjectionHandlingSet,
    pub product_info: ProductInfo,
    pub pitch_strategy: Option<PitchStrategy>,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCadenceRequest {
    pub product_info: ProductInfo,
    pub pitch_strategy: PitchStrategy,
    pub objection_handling: Option<ObjectionHandlingSet>,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveCadenceRequest {
    #[serde(default)]
    pub feedback: String,
    pub current_cadence: EmailCadence,
    pub product_info: ProductInfo,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovePromptRequest {
    #[serde(default)]
    pub prompt: String,
    pub context: Option<String>,
    pub field_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovePromptResponse {
    pub improved_prompt: String,
}

// ============================================================================
// Analysis
// ============================================================================

pub async fn analyze_website_handler(
    Extension(state): Extension<AppState>,
    ApiJson(body): ApiJson<AnalyzeWebsiteRequest>,
) -> Result<Response, ApiError> {
    let result = state
        .engine
        .analyze_website(&body.url, &PromptConfig::new())
        .await?;
    Ok(ArtifactResponse(result).into_response())
}

pub async fn analyze_pdf_handler(
    Extension(state): Extension<AppState>,
    ApiJson(body): ApiJson<AnalyzePdfRequest>,
) -> Result<Response, ApiError> {
    let result = state
        .engine
        .analyze_pdf(
            &body.pdf_content,
            body.file_name.as_deref(),
            &PromptConfig::new(),
        )
        .await?;
    Ok(ArtifactResponse(result).into_response())
}

pub async fn process_feedback_handler(
    Extension(state): Extension<AppState>,
    ApiJson(body): ApiJson<ProcessFeedbackRequest>,
) -> Result<Response, ApiError> {
    let result = state
        .engine
        .process_feedback(&body.feedback, &body.current_product_info, &PromptConfig::new())
        .await?;
    Ok(ArtifactResponse(result).into_response())
}

// ============================================================================
// Pitch strategy
// ============================================================================

pub async fn generate_pitch_strategy_handler(
    Extension(state): Extension<AppState>,
    ApiJson(body): ApiJson<GeneratePitchRequest>,
) -> Response {
    let prompts = prompts(PromptKind::PitchStrategy, body.system_prompt.as_deref());
    let result = state
        .engine
        .generate_pitch_strategy(&body.product_info, &prompts)
        .await;
    ArtifactResponse(result).into_response()
}

pub async fn improve_pitch_strategy_handler(
    Extension(state): Extension<AppState>,
    ApiJson(body): ApiJson<ImprovePitchRequest>,
) -> Result<Response, ApiError> {
    let prompts = prompts(
        PromptKind::ImprovePitchStrategy,
        body.system_prompt.as_deref(),
    );
    let result = state
        .engine
        .improve_pitch_strategy(
            &body.feedback,
            &body.current_strategy,
            &body.product_info,
            &prompts,
        )
        .await?;
    Ok(ArtifactResponse(result).into_response())
}

// ============================================================================
// Objection handling
// ============================================================================

pub async fn generate_objection_handling_handler(
    Extension(state): Extension<AppState>,
    ApiJson(body): ApiJson<GenerateObjectionsRequest>,
) -> Response {
    let prompts = prompts(PromptKind::ObjectionHandling, body.system_prompt.as_deref());
    let result = state
        .engine
        .generate_objection_handling(&body.product_info, &body.pitch_strategy, &prompts)
        .await;
    ArtifactResponse(result).into_response()
}

pub async fn improve_objection_handling_handler(
    Extension(state): Extension<AppState>,
    ApiJson(body): ApiJson<ImproveObjectionsRequest>,
) -> Result<Response, ApiError> {
    let prompts = prompts(
        PromptKind::ImproveObjectionHandling,
        body.system_prompt.as_deref(),
    );
    let result = state
        .engine
        .improve_objection_handling(
            &body.feedback,
            &body.current_objections,
            &body.product_info,
            body.pitch_strategy.as_ref(),
            &prompts,
        )
        .await?;
    Ok(ArtifactResponse(result).into_response())
}

// ============================================================================
// Email cadence
// ============================================================================

pub async fn generate_email_cadence_handler(
    Extension(state): Extension<AppState>,
    ApiJson(body): ApiJson<GenerateCadenceRequest>,
) -> Response {
    let prompts = prompts(PromptKind::EmailCadence, body.system_prompt.as_deref());
    let result = state
        .engine
        .generate_email_cadence(
            &body.product_info,
            &body.pitch_strategy,
            body.objection_handling.as_ref(),
            &prompts,
        )
        .await;
    ArtifactResponse(result).into_response()
}

pub async fn improve_email_cadence_handler(
    Extension(state): Extension<AppState>,
    ApiJson(body): ApiJson<ImproveCadenceRequest>,
) -> Result<Response, ApiError> {
    let prompts = prompts(
        PromptKind::ImproveEmailCadence,
        body.system_prompt.as_deref(),
    );
    let result = state
        .engine
        .improve_email_cadence(
            &body.feedback,
            &body.current_cadence,
            &body.product_info,
            &prompts,
        )
        .await?;
    Ok(ArtifactResponse(result).into_response())
}

// ============================================================================
// Prompt helper
// ============================================================================

pub async fn improve_prompt_handler(
    Extension(state): Extension<AppState>,
    ApiJson(body): ApiJson<ImprovePromptRequest>,
) -> Result<Json<ImprovePromptResponse>, ApiError> {
    let field_type = FieldType::from_name(body.field_type.as_deref());
    let improved_prompt = state
        .engine
        .improve_prompt(&body.prompt, body.context.as_deref(), field_type)
        .await?;
    Ok(Json(ImprovePromptResponse { improved_prompt }))
}
