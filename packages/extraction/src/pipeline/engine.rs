//! Stage orchestration.
//!
//! Every stage is one model call wrapped in the same policy:
//!
//! - Input problems surface as [`ExtractionError::InvalidInput`] before any
//!   model call.
//! - Generation and revision stages never fail because of the model. A
//!   failed, slow or unparseable completion is replaced by a fallback
//!   artifact and reported through [`PipelineResult::source`].
//! - Analysis stages (website, PDF) surface fetch failures, upstream model
//!   errors and timeouts, but still fall back when the model answers with
//!   something unparseable.

use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::artifact::{Artifact, FallbackReason, Pipeline, PipelineResult};
use super::fallback::StageFacts;
use super::prompts::{
    format_cadence_prompt, format_feedback_prompt, format_improve_prompt,
    format_objection_prompt, format_pdf_analysis_prompt, format_pitch_prompt,
    format_revision_prompt, format_website_analysis_prompt, FieldType, PromptConfig, PromptKind,
};
use super::validate::validate_shape;
use crate::document::{html_to_text, PdfTextExtractor};
use crate::error::{ExtractionError, Result};
use crate::traits::ai::{CompletionRequest, AI, ANALYSIS_TEMPERATURE, CREATIVE_TEMPERATURE};
use crate::traits::ingestor::Ingestor;
use crate::types::cadence::EmailCadence;
use crate::types::config::PipelineConfig;
use crate::types::objection::ObjectionHandlingSet;
use crate::types::pitch::PitchStrategy;
use crate::types::product::{ProductField, ProductInfo};

const IMPROVE_PROMPT_TEMPERATURE: f32 = 0.7;
const IMPROVE_PROMPT_MAX_TOKENS: u32 = 1000;

/// ProductInfo recovered from an uploaded PDF.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfAnalysis {
    #[serde(flatten)]
    pub product_info: ProductInfo,

    /// Extraction passes that contributed, e.g. `parentheses+bt`
    pub extraction_method: String,

    /// Characters of text sent to the model
    pub extracted_text_length: usize,
}

/// Runs the pitch-builder stages against an [`AI`] provider.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct PitchEngine<A: AI, I: Ingestor> {
    ai: A,
    ingestor: I,
    config: PipelineConfig,
    documents: PdfTextExtractor,
}

impl<A: AI, I: Ingestor> PitchEngine<A, I> {
    pub fn new(ai: A, ingestor: I) -> Self {
        Self::with_config(ai, ingestor, PipelineConfig::default())
    }

    pub fn with_config(ai: A, ingestor: I, config: PipelineConfig) -> Self {
        let documents = PdfTextExtractor::new(config.max_document_bytes);
        Self {
            ai,
            ingestor,
            config,
            documents,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn ai(&self) -> &A {
        &self.ai
    }

    // ========================================================================
    // Analysis stages
    // ========================================================================

    /// Fetch a product website and extract ProductInfo from its text.
    pub async fn analyze_website(
        &self,
        url: &str,
        prompts: &PromptConfig,
    ) -> Result<PipelineResult<ProductInfo>> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ExtractionError::invalid_input("URL is required"));
        }

        let deadline = self.config.document_timeout;
        match timeout(deadline, self.website_stage(url, prompts)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(url = %url, after_secs = deadline.as_secs(), "Website analysis timed out");
                Err(ExtractionError::Timeout {
                    operation: "website analysis",
                    after: deadline,
                })
            }
        }
    }

    async fn website_stage(
        &self,
        url: &str,
        prompts: &PromptConfig,
    ) -> Result<PipelineResult<ProductInfo>> {
        let page = self.ingestor.fetch(url).await?;
        let limit = self.config.website_text_limit;
        let text = if page.is_html() {
            html_to_text(&page.content, limit)
        } else {
            page.content.chars().take(limit).collect()
        };
        debug!(url = %page.url, chars = text.chars().count(), "Fetched website text");

        let request = self
            .request(
                PromptKind::AnalyzeWebsite,
                prompts,
                format_website_analysis_prompt(&text),
            )
            .temperature(ANALYSIS_TEMPERATURE)
            .model(self.config.analysis_model.clone());

        let raw = self.complete(PromptKind::AnalyzeWebsite, request).await?;
        let facts = StageFacts::new(ProductInfo::for_source(url));
        let result = self
            .interpret::<ProductInfo>(PromptKind::AnalyzeWebsite, &raw, &facts)
            .map(|mut info| {
                info.set_field(ProductField::Website, url);
                info
            });
        Ok(result)
    }

    /// Extract text from a base64 PDF and extract ProductInfo from it.
    pub async fn analyze_pdf(
        &self,
        pdf_content: &str,
        file_name: Option<&str>,
        prompts: &PromptConfig,
    ) -> Result<PipelineResult<PdfAnalysis>> {
        if pdf_content.trim().is_empty() {
            return Err(ExtractionError::invalid_input("PDF content is required"));
        }

        let deadline = self.config.document_timeout;
        match timeout(deadline, self.pdf_stage(pdf_content, file_name, prompts)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    file = file_name.unwrap_or("unknown"),
                    after_secs = deadline.as_secs(),
                    "PDF analysis timed out"
                );
                Err(ExtractionError::Timeout {
                    operation: "PDF analysis",
                    after: deadline,
                })
            }
        }
    }

    async fn pdf_stage(
        &self,
        pdf_content: &str,
        file_name: Option<&str>,
        prompts: &PromptConfig,
    ) -> Result<PipelineResult<PdfAnalysis>> {
        let extracted = self.documents.extract_base64(pdf_content)?;
        let method = extracted.method();
        info!(
            file = file_name.unwrap_or("unknown"),
            method = %method,
            chars = extracted.len(),
            truncated = extracted.truncated,
            "Extracted PDF text"
        );

        let request = self
            .request(
                PromptKind::AnalyzePdf,
                prompts,
                format_pdf_analysis_prompt(&extracted.text),
            )
            .temperature(ANALYSIS_TEMPERATURE)
            .model(self.config.analysis_model.clone());

        let raw = self.complete(PromptKind::AnalyzePdf, request).await?;
        let facts = StageFacts::default();
        let extracted_text_length = extracted.len();

        Ok(self
            .interpret::<ProductInfo>(PromptKind::AnalyzePdf, &raw, &facts)
            .map(|product_info| PdfAnalysis {
                product_info,
                extraction_method: method,
                extracted_text_length,
            }))
    }

    // ========================================================================
    // ProductInfo revision
    // ========================================================================

    /// Apply user feedback to a ProductInfo record.
    ///
    /// Falls back to the current record unchanged.
    pub async fn process_feedback(
        &self,
        feedback: &str,
        current: &ProductInfo,
        prompts: &PromptConfig,
    ) -> Result<PipelineResult<ProductInfo>> {
        let feedback = require_feedback(feedback)?;

        let request = self
            .request(
                PromptKind::ProcessFeedback,
                prompts,
                format_feedback_prompt(current, feedback),
            )
            .temperature(ANALYSIS_TEMPERATURE)
            .model(self.config.generation_model.clone());

        let facts = StageFacts::new(current.clone());
        Ok(self
            .revise(PromptKind::ProcessFeedback, request, current, &facts, 0)
            .await)
    }

    // ========================================================================
    // Generation stages
    // ========================================================================

    pub async fn generate_pitch_strategy(
        &self,
        product: &ProductInfo,
        prompts: &PromptConfig,
    ) -> PipelineResult<PitchStrategy> {
        let request = self
            .request(PromptKind::PitchStrategy, prompts, format_pitch_prompt(product))
            .temperature(CREATIVE_TEMPERATURE)
            .model(self.config.generation_model.clone());

        let facts = StageFacts::new(product.clone());
        self.generate(PromptKind::PitchStrategy, request, &facts).await
    }

    pub async fn generate_objection_handling(
        &self,
        product: &ProductInfo,
        pitch: &PitchStrategy,
        prompts: &PromptConfig,
    ) -> PipelineResult<ObjectionHandlingSet> {
        let request = self
            .request(
                PromptKind::ObjectionHandling,
                prompts,
                format_objection_prompt(product, pitch),
            )
            .temperature(CREATIVE_TEMPERATURE)
            .model(self.config.analysis_model.clone());

        let facts = StageFacts::new(product.clone()).with_pitch(pitch.clone());
        self.generate(PromptKind::ObjectionHandling, request, &facts)
            .await
    }

    pub async fn generate_email_cadence(
        &self,
        product: &ProductInfo,
        pitch: &PitchStrategy,
        objections: Option<&ObjectionHandlingSet>,
        prompts: &PromptConfig,
    ) -> PipelineResult<EmailCadence> {
        let request = self
            .request(
                PromptKind::EmailCadence,
                prompts,
                format_cadence_prompt(product, pitch, objections),
            )
            .temperature(CREATIVE_TEMPERATURE)
            .model(self.config.generation_model.clone());

        let mut facts = StageFacts::new(product.clone()).with_pitch(pitch.clone());
        if let Some(objections) = objections {
            facts = facts.with_objections(objections.clone());
        }
        self.generate(PromptKind::EmailCadence, request, &facts).await
    }

    // ========================================================================
    // Revision stages
    // ========================================================================

    pub async fn improve_pitch_strategy(
        &self,
        feedback: &str,
        current: &PitchStrategy,
        product: &ProductInfo,
        prompts: &PromptConfig,
    ) -> Result<PipelineResult<PitchStrategy>> {
        let feedback = require_feedback(feedback)?;

        let request = self
            .request(
                PromptKind::ImprovePitchStrategy,
                prompts,
                format_revision_prompt("pitch strategy", current, product, feedback),
            )
            .temperature(ANALYSIS_TEMPERATURE)
            .model(self.config.generation_model.clone());

        let facts = StageFacts::new(product.clone());
        Ok(self
            .revise(PromptKind::ImprovePitchStrategy, request, current, &facts, 0)
            .await)
    }

    /// Revise objection handling, retrying the whole call on failure.
    pub async fn improve_objection_handling(
        &self,
        feedback: &str,
        current: &ObjectionHandlingSet,
        product: &ProductInfo,
        pitch: Option<&PitchStrategy>,
        prompts: &PromptConfig,
    ) -> Result<PipelineResult<ObjectionHandlingSet>> {
        let feedback = require_feedback(feedback)?;

        let mut user = format_revision_prompt("objection handling", current, product, feedback);
        if let Some(pitch) = pitch {
            user.push_str(&format!(
                "\n\nPitch strategy context:\nTalk Tracks: {}",
                pitch.talk_tracks.join(" | ")
            ));
        }

        let request = self
            .request(PromptKind::ImproveObjectionHandling, prompts, user)
            .temperature(CREATIVE_TEMPERATURE)
            .model(self.config.analysis_model.clone());

        let mut facts = StageFacts::new(product.clone());
        if let Some(pitch) = pitch {
            facts = facts.with_pitch(pitch.clone());
        }
        Ok(self
            .revise(
                PromptKind::ImproveObjectionHandling,
                request,
                current,
                &facts,
                self.config.revision_retries,
            )
            .await)
    }

    pub async fn improve_email_cadence(
        &self,
        feedback: &str,
        current: &EmailCadence,
        product: &ProductInfo,
        prompts: &PromptConfig,
    ) -> Result<PipelineResult<EmailCadence>> {
        let feedback = require_feedback(feedback)?;

        let request = self
            .request(
                PromptKind::ImproveEmailCadence,
                prompts,
                format_revision_prompt("email cadence", current, product, feedback),
            )
            .temperature(CREATIVE_TEMPERATURE)
            .model(self.config.generation_model.clone());

        let facts = StageFacts::new(product.clone());
        Ok(self
            .revise(PromptKind::ImproveEmailCadence, request, current, &facts, 0)
            .await)
    }

    // ========================================================================
    // Prompt helper
    // ========================================================================

    /// Rewrite user-entered text so it reads better as a prompt.
    ///
    /// Not an artifact stage: upstream errors and timeouts surface.
    pub async fn improve_prompt(
        &self,
        prompt: &str,
        context: Option<&str>,
        field_type: FieldType,
    ) -> Result<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ExtractionError::invalid_input("Prompt text is required"));
        }

        let request = CompletionRequest::new(
            field_type.system_prompt(),
            format_improve_prompt(prompt, context),
        )
        .temperature(IMPROVE_PROMPT_TEMPERATURE)
        .max_tokens(IMPROVE_PROMPT_MAX_TOKENS)
        .model(self.config.analysis_model.clone());

        let started = std::time::Instant::now();
        let improved = match timeout(self.config.ai_timeout, self.ai.complete(request)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ExtractionError::Timeout {
                    operation: "prompt improvement",
                    after: self.config.ai_timeout,
                })
            }
        };

        let improved = improved.trim();
        info!(
            field_type = field_type.as_str(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Improved prompt"
        );
        if improved.is_empty() {
            warn!("Model returned an empty improvement, keeping the original text");
            return Ok(prompt.to_string());
        }
        Ok(improved.to_string())
    }

    // ========================================================================
    // Shared policy
    // ========================================================================

    fn json_mode(&self) -> bool {
        self.config.json_mode && self.ai.supports_json_mode()
    }

    fn request(&self, kind: PromptKind, prompts: &PromptConfig, user: String) -> CompletionRequest {
        CompletionRequest::new(prompts.system_prompt(kind), user).json_mode(self.json_mode())
    }

    /// One model call under the per-call deadline.
    async fn complete(&self, kind: PromptKind, request: CompletionRequest) -> Result<String> {
        let deadline = self.config.ai_timeout;
        match timeout(deadline, self.ai.complete(request)).await {
            Ok(Ok(raw)) => {
                debug!(stage = %kind, provider = self.ai.name(), chars = raw.len(), "Model answered");
                Ok(raw)
            }
            Ok(Err(e)) => {
                warn!(stage = %kind, error = %e, "Model call failed");
                Err(e)
            }
            Err(_) => {
                warn!(stage = %kind, after_secs = deadline.as_secs(), "Model call timed out");
                Err(ExtractionError::Timeout {
                    operation: "AI completion",
                    after: deadline,
                })
            }
        }
    }

    fn parse<T: Artifact>(&self, pipeline: &Pipeline<T>, raw: &str) -> std::result::Result<T, FallbackReason> {
        if self.json_mode() {
            pipeline.parse_json_mode(raw)
        } else {
            pipeline.parse(raw)
        }
    }

    /// Parse a completion that already arrived, falling back on bad output.
    fn interpret<T: Artifact>(&self, kind: PromptKind, raw: &str, facts: &StageFacts) -> PipelineResult<T> {
        let pipeline = Pipeline::<T>::new();
        let result = match self.parse(&pipeline, raw) {
            Ok(value) => PipelineResult::model(value),
            Err(reason) => pipeline.recover(reason, facts),
        };
        info!(stage = %kind, source = result.source_label(), "Stage complete");
        result
    }

    /// Call and parse, retrying the whole request up to `retries` extra times.
    async fn attempt<T: Artifact>(
        &self,
        kind: PromptKind,
        pipeline: &Pipeline<T>,
        request: CompletionRequest,
        retries: u32,
    ) -> std::result::Result<T, FallbackReason> {
        let mut attempt = 0u32;
        loop {
            let reason = match self.complete(kind, request.clone()).await {
                Ok(raw) => match self.parse(pipeline, &raw) {
                    Ok(value) => return Ok(value),
                    Err(reason) => reason,
                },
                Err(e) => failure_reason(&e),
            };

            if attempt >= retries {
                return Err(reason);
            }
            attempt += 1;
            warn!(
                stage = %kind,
                attempt,
                retries,
                reason = reason.as_str(),
                "Retrying stage"
            );
            tokio::time::sleep(self.config.retry_delay).await;
        }
    }

    async fn generate<T: Artifact>(
        &self,
        kind: PromptKind,
        request: CompletionRequest,
        facts: &StageFacts,
    ) -> PipelineResult<T> {
        let pipeline = Pipeline::<T>::new();
        let result = match self.attempt(kind, &pipeline, request, 0).await {
            Ok(value) => PipelineResult::model(value),
            Err(reason) => pipeline.recover(reason, facts),
        };
        info!(stage = %kind, source = result.source_label(), "Stage complete");
        result
    }

    /// Like `generate`, but the current artifact is preferred as fallback.
    async fn revise<T: Artifact>(
        &self,
        kind: PromptKind,
        request: CompletionRequest,
        current: &T,
        facts: &StageFacts,
        retries: u32,
    ) -> PipelineResult<T> {
        let pipeline = Pipeline::<T>::new();
        let result = match self.attempt(kind, &pipeline, request, retries).await {
            Ok(value) => PipelineResult::model(value),
            Err(reason) => match carry_over(current) {
                Some(value) => {
                    warn!(stage = %kind, reason = reason.as_str(), error = %reason, "Keeping current artifact");
                    PipelineResult::fallback(value, reason)
                }
                None => pipeline.recover(reason, facts),
            },
        };
        info!(stage = %kind, source = result.source_label(), "Stage complete");
        result
    }
}

fn require_feedback(feedback: &str) -> Result<&str> {
    let feedback = feedback.trim();
    if feedback.is_empty() {
        return Err(ExtractionError::invalid_input("Feedback is required"));
    }
    Ok(feedback)
}

fn failure_reason(error: &ExtractionError) -> FallbackReason {
    if error.is_timeout() {
        FallbackReason::Timeout
    } else {
        FallbackReason::Upstream(error.to_string())
    }
}

/// The current artifact, if it still passes validation.
fn carry_over<T: Artifact>(current: &T) -> Option<T> {
    let value = serde_json::to_value(current).ok()?;
    validate_shape::<T>(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::artifact::ValueSource;
    use crate::testing::{MockAI, MockIngestor};
    use crate::types::product::NOT_SPECIFIED;
    use std::time::Duration;

    const PITCH_JSON: &str = r#"{"coldCallStarters": ["Hi"], "talkTracks": ["Track"], "talkingPoints": ["Point"]}"#;

    fn engine(ai: MockAI) -> PitchEngine<MockAI, MockIngestor> {
        let config = PipelineConfig::default().with_revision_retries(2, Duration::ZERO);
        PitchEngine::with_config(ai, MockIngestor::new(), config)
    }

    fn acme() -> ProductInfo {
        ProductInfo::new().with(ProductField::ProductName, "Acme Forecast")
    }

    #[tokio::test]
    async fn test_generate_pitch_from_fenced_json() {
        let ai = MockAI::new().with_response(format!("```json\n{PITCH_JSON}\n```"));
        let engine = engine(ai.clone());

        let result = engine
            .generate_pitch_strategy(&acme(), &PromptConfig::new())
            .await;

        assert!(result.is_ok());
        assert_eq!(result.value.talk_tracks, vec!["Track".to_string()]);

        let call = ai.last_call().unwrap();
        assert_eq!(call.temperature, CREATIVE_TEMPERATURE);
        assert!(call.user.contains("Product Name: Acme Forecast"));
    }

    #[tokio::test]
    async fn test_upstream_failure_degrades_to_fallback() {
        let engine = engine(MockAI::new().with_failure("503"));

        let result = engine
            .generate_pitch_strategy(&acme(), &PromptConfig::new())
            .await;

        assert!(matches!(result.source, ValueSource::Fallback(FallbackReason::Upstream(_))));
        assert!(result.value.talk_tracks[0].contains("Acme Forecast"));
    }

    #[tokio::test]
    async fn test_system_prompt_override_is_used() {
        let ai = MockAI::new().with_response(PITCH_JSON);
        let engine = engine(ai.clone());
        let prompts = PromptConfig::new().with_override(PromptKind::PitchStrategy, "Custom.");

        engine.generate_pitch_strategy(&acme(), &prompts).await;

        assert_eq!(ai.last_call().unwrap().system, "Custom.");
    }

    #[tokio::test]
    async fn test_empty_feedback_is_rejected_without_calls() {
        let ai = MockAI::new().with_default_response(PITCH_JSON);
        let engine = engine(ai.clone());

        let err = engine
            .improve_pitch_strategy("  ", &PitchStrategy::default(), &acme(), &PromptConfig::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::InvalidInput(_)));
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test]
    async fn test_revision_keeps_valid_current_artifact() {
        let engine = engine(MockAI::new().with_response("I made it punchier!"));
        let current: PitchStrategy = serde_json::from_str(PITCH_JSON).unwrap();

        let result = engine
            .improve_pitch_strategy("shorter", &current, &acme(), &PromptConfig::new())
            .await
            .unwrap();

        assert!(!result.is_ok());
        assert_eq!(result.value, current);
    }

    #[tokio::test]
    async fn test_revision_synthesizes_when_current_is_invalid() {
        let engine = engine(MockAI::new().with_response("nope"));

        let result = engine
            .improve_pitch_strategy("shorter", &PitchStrategy::default(), &acme(), &PromptConfig::new())
            .await
            .unwrap();

        assert!(result.value.is_complete());
        assert!(result.value.talk_tracks[0].contains("Acme Forecast"));
    }

    #[tokio::test]
    async fn test_process_feedback_falls_back_to_current() {
        let engine = engine(MockAI::new().with_response("Sure, updated!"));
        let current = acme();

        let result = engine
            .process_feedback("add pricing", &current, &PromptConfig::new())
            .await
            .unwrap();

        assert_eq!(result.value, current);
        assert_eq!(result.source_label(), "fallback");
    }

    #[tokio::test]
    async fn test_website_analysis_sets_source_url() {
        let ingestor = MockIngestor::new()
            .with_page("https://acme.test/", "<html><body><h1>Acme</h1><script>x()</script></body></html>");
        let ai = MockAI::new().with_response(r#"{"productName": "Acme"}"#);
        let engine = PitchEngine::new(ai.clone(), ingestor);

        let result = engine
            .analyze_website("https://acme.test/", &PromptConfig::new())
            .await
            .unwrap();

        assert_eq!(result.value.product_name, "Acme");
        assert_eq!(result.value.website, "https://acme.test/");
        let call = ai.last_call().unwrap();
        assert_eq!(call.temperature, ANALYSIS_TEMPERATURE);
        assert!(call.user.ends_with("Acme"));
    }

    #[tokio::test]
    async fn test_website_fetch_failure_surfaces() {
        let engine = PitchEngine::new(MockAI::new(), MockIngestor::new());

        let err = engine
            .analyze_website("https://missing.test/", &PromptConfig::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::Crawl(_)));
    }

    #[tokio::test]
    async fn test_website_unparseable_answer_falls_back() {
        let ingestor = MockIngestor::new().with_page("https://acme.test/", "<p>Acme</p>");
        let engine = PitchEngine::new(MockAI::new().with_response("no idea"), ingestor);

        let result = engine
            .analyze_website("https://acme.test/", &PromptConfig::new())
            .await
            .unwrap();

        assert_eq!(result.source_label(), "fallback");
        assert_eq!(result.value.website, "https://acme.test/");
        assert_eq!(result.value.product_name, NOT_SPECIFIED);
    }

    #[tokio::test]
    async fn test_improve_prompt_trims_and_surfaces_errors() {
        let ai = MockAI::new()
            .with_response("  https://acme.test  \n")
            .with_failure("down");
        let engine = engine(ai.clone());

        let improved = engine
            .improve_prompt("acme.test", None, FieldType::Website)
            .await
            .unwrap();
        assert_eq!(improved, "https://acme.test");

        let call = ai.last_call().unwrap();
        assert_eq!(call.max_tokens, Some(1000));
        assert_eq!(call.system, FieldType::Website.system_prompt());

        assert!(engine
            .improve_prompt("acme.test", None, FieldType::Website)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_json_mode_requires_provider_support() {
        let config = PipelineConfig::default().with_json_mode(true);

        let unsupported = PitchEngine::with_config(
            MockAI::new().with_response(format!("```json\n{PITCH_JSON}\n```")),
            MockIngestor::new(),
            config.clone(),
        );
        let result = unsupported
            .generate_pitch_strategy(&acme(), &PromptConfig::new())
            .await;
        assert!(result.is_ok());
        assert!(!unsupported.ai().last_call().unwrap().json_mode);

        let supported = PitchEngine::with_config(
            MockAI::new().with_json_mode(true).with_response(PITCH_JSON),
            MockIngestor::new(),
            config,
        );
        let result = supported
            .generate_pitch_strategy(&acme(), &PromptConfig::new())
            .await;
        assert!(result.is_ok());
        assert!(supported.ai().last_call().unwrap().json_mode);
    }
}
