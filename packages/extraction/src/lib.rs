//! Resilient Structured Extraction for Sales Pitch Generation
//!
//! Turns unreliable language-model output into typed sales artifacts
//! (ProductInfo, PitchStrategy, ObjectionHandlingSet, EmailCadence), and
//! recovers plain text from uploaded PDFs and product websites.
//!
//! # Design Philosophy
//!
//! **"Always answer with something usable"**
//!
//! - Models wrap JSON in fences, prose and markdown; the locator digs it out
//! - Shapes are validated all-or-nothing before deserializing
//! - When the output is unusable, a deterministic fallback is built from the
//!   facts already known, so generation stages never fail on model output
//! - Input problems and document problems still surface as errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use pitch_extraction::{PitchEngine, PromptConfig, ProductInfo};
//! use pitch_extraction::testing::{MockAI, MockIngestor};
//!
//! let engine = PitchEngine::new(MockAI::new(), MockIngestor::new());
//! let product = ProductInfo::new();
//!
//! let pitch = engine.generate_pitch_strategy(&product, &PromptConfig::new()).await;
//! println!("{} talk tracks from {}", pitch.value.talk_tracks.len(), pitch.source_label());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (AI, Ingestor)
//! - [`types`] - Artifact and configuration types
//! - [`pipeline`] - Normalize, locate, validate, fallback and the stage engine
//! - [`document`] - PDF and HTML text recovery
//! - [`ingestors`] - Website fetchers (HttpIngestor, MockIngestor)
//! - [`security`] - Credential handling and SSRF protection
//! - [`testing`] - Mock implementations for testing

pub mod document;
pub mod error;
pub mod ingestors;
pub mod pipeline;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use error::{CrawlError, DocumentError, ExtractionError, Result, SecurityError};
pub use traits::{
    ai::{CompletionRequest, AI},
    ingestor::{Ingestor, RawPage, ValidatedIngestor},
};
pub use types::{
    cadence::{EmailCadence, EmailCadenceStep},
    config::PipelineConfig,
    objection::{ObjectionHandling, ObjectionHandlingSet},
    pitch::{PitchSection, PitchStrategy},
    product::{ProductField, ProductInfo, NOT_SPECIFIED},
};

// Re-export pipeline components
pub use pipeline::{
    // Engine
    PdfAnalysis, PitchEngine,
    // Results
    Artifact, FallbackReason, Pipeline, PipelineResult, ValueSource,
    // Prompts
    FieldType, PromptConfig, PromptKind,
    // Building blocks
    normalize, validate_shape, ArtifactShape, JsonLocator, LocateError, ShapeError, StageFacts,
};

// Re-export documents and security
pub use document::{ExtractedText, PdfTextExtractor};
pub use security::{AICredentials, SecretString, UrlValidator};

// Re-export ingestors
pub use ingestors::{HttpIngestor, MockIngestor};

// Re-export testing utilities
pub use testing::MockAI;
