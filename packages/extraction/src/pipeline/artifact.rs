//! Turning raw model output into a typed artifact, with a guaranteed answer.
//!
//! ```text
//! raw completion ──► locate ──► validate ──► A            (source: model)
//!                       │           │
//!                       └─────┬─────┘
//!                             ▼
//!                    A::synthesize(facts)                 (source: fallback)
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::fallback::{synthesize_cadence, synthesize_objections, synthesize_pitch, StageFacts};
use super::locate::{JsonLocator, LocateError, MarkdownHook};
use super::markdown::objections_from_markdown;
use super::validate::{validate_shape, ArtifactShape, ShapeError};
use crate::types::cadence::EmailCadence;
use crate::types::objection::ObjectionHandlingSet;
use crate::types::pitch::PitchStrategy;
use crate::types::product::ProductInfo;

/// A structured value a stage asks the model for.
pub trait Artifact: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Structural tag checked before deserializing.
    const SHAPE: ArtifactShape;

    /// Deterministic replacement used when the model output is unusable.
    fn synthesize(facts: &StageFacts) -> Self;

    /// Last-resort conversion of non-JSON answers.
    fn markdown_hook() -> Option<MarkdownHook> {
        None
    }
}

impl Artifact for PitchStrategy {
    const SHAPE: ArtifactShape = ArtifactShape::PitchStrategy;

    fn synthesize(facts: &StageFacts) -> Self {
        synthesize_pitch(facts)
    }
}

impl Artifact for ObjectionHandlingSet {
    const SHAPE: ArtifactShape = ArtifactShape::ObjectionHandling;

    fn synthesize(facts: &StageFacts) -> Self {
        synthesize_objections(facts)
    }

    fn markdown_hook() -> Option<MarkdownHook> {
        Some(objections_from_markdown)
    }
}

impl Artifact for EmailCadence {
    const SHAPE: ArtifactShape = ArtifactShape::EmailCadence;

    fn synthesize(facts: &StageFacts) -> Self {
        synthesize_cadence(facts)
    }
}

impl Artifact for ProductInfo {
    const SHAPE: ArtifactShape = ArtifactShape::ProductInfo;

    /// The known record as-is: a sentinel record carrying the source for
    /// analysis, the current record for revisions.
    fn synthesize(facts: &StageFacts) -> Self {
        facts.product.clone()
    }
}

/// Why a stage answered with a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FallbackReason {
    #[error("AI service failed: {0}")]
    Upstream(String),

    #[error("AI call timed out")]
    Timeout,

    #[error(transparent)]
    NoJson(#[from] LocateError),

    #[error("invalid shape: {0}")]
    Shape(#[from] ShapeError),
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::Upstream(_) => "upstream",
            FallbackReason::Timeout => "timeout",
            FallbackReason::NoJson(_) => "no_json",
            FallbackReason::Shape(_) => "invalid_shape",
        }
    }
}

/// Where a stage's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    Model,
    Fallback(FallbackReason),
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Model => f.write_str("model"),
            ValueSource::Fallback(_) => f.write_str("fallback"),
        }
    }
}

/// A stage's value plus its provenance.
///
/// Serializes as `{"ok": bool, "value": ...}`; the reason stays in logs.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> PipelineResult<T> {
    pub fn model(value: T) -> Self {
        Self {
            value,
            source: ValueSource::Model,
        }
    }

    pub fn fallback(value: T, reason: FallbackReason) -> Self {
        Self {
            value,
            source: ValueSource::Fallback(reason),
        }
    }

    /// True when the model output was used.
    pub fn is_ok(&self) -> bool {
        self.source == ValueSource::Model
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match &self.source {
            ValueSource::Model => None,
            ValueSource::Fallback(reason) => Some(reason),
        }
    }

    /// "model" or "fallback".
    pub fn source_label(&self) -> &'static str {
        match self.source {
            ValueSource::Model => "model",
            ValueSource::Fallback(_) => "fallback",
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PipelineResult<U> {
        PipelineResult {
            value: f(self.value),
            source: self.source,
        }
    }
}

impl<T: Serialize> Serialize for PipelineResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PipelineResult", 2)?;
        state.serialize_field("ok", &self.is_ok())?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

/// Locate, validate and, when needed, synthesize one artifact type.
pub struct Pipeline<A> {
    locator: JsonLocator,
    _artifact: PhantomData<fn() -> A>,
}

impl<A: Artifact> Default for Pipeline<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Artifact> Pipeline<A> {
    pub fn new() -> Self {
        let locator = match A::markdown_hook() {
            Some(hook) => JsonLocator::new().with_markdown_fallback(hook),
            None => JsonLocator::new(),
        };
        Self {
            locator,
            _artifact: PhantomData,
        }
    }

    /// Run the locate cascade and validate the result.
    pub fn parse(&self, raw: &str) -> Result<A, FallbackReason> {
        let located = self.locator.locate(raw)?;
        debug!(
            artifact = A::SHAPE.as_str(),
            strategy = %located.strategy,
            "Validating located object"
        );
        Ok(validate_shape(located.value)?)
    }

    /// Parse a JSON-mode completion directly, skipping the locator.
    pub fn parse_json_mode(&self, raw: &str) -> Result<A, FallbackReason> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LocateError::Empty.into());
        }
        let value: Value =
            serde_json::from_str(trimmed).map_err(|_| FallbackReason::NoJson(LocateError::NotFound))?;
        Ok(validate_shape(value)?)
    }

    /// Parse `raw`, or synthesize from `facts` when it is unusable.
    pub fn run(&self, raw: &str, facts: &StageFacts) -> PipelineResult<A> {
        match self.parse(raw) {
            Ok(value) => PipelineResult::model(value),
            Err(reason) => self.recover(reason, facts),
        }
    }

    /// Answer with the synthesized artifact.
    pub fn recover(&self, reason: FallbackReason, facts: &StageFacts) -> PipelineResult<A> {
        warn!(
            artifact = A::SHAPE.as_str(),
            reason = reason.as_str(),
            error = %reason,
            "Using fallback artifact"
        );
        PipelineResult::fallback(A::synthesize(facts), reason)
    }
}
