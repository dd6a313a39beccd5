//! Extraction pipeline - the core of the library.
//!
//! The pipeline turns raw model output into typed artifacts:
//! - Normalize (strip fences and markdown noise)
//! - Locate (cascade of JSON-object recovery strategies)
//! - Validate (tagged shape check, then typed deserialization)
//! - Fallback (deterministic synthesis from known facts)
//!
//! [`PitchEngine`] wires these to the model-backed stages.

pub mod artifact;
pub mod engine;
pub mod fallback;
pub mod locate;
pub mod markdown;
pub mod normalize;
pub mod prompts;
pub mod validate;

pub use artifact::{Artifact, FallbackReason, Pipeline, PipelineResult, ValueSource};
pub use engine::{PdfAnalysis, PitchEngine};
pub use fallback::{synthesize_cadence, synthesize_objections, synthesize_pitch, StageFacts};
pub use locate::{JsonLocator, LocateError, LocateStrategy, Located, MarkdownHook};
pub use markdown::objections_from_markdown;
pub use normalize::{normalize, strip_markdown_noise};
pub use prompts::{FieldType, PromptConfig, PromptKind};
pub use validate::{validate_shape, ArtifactShape, ShapeError};
