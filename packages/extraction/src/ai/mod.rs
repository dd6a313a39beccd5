//! AI implementations for the pitch pipeline.
//!
//! This module provides reference implementations of the `AI` trait.
//! Users can use these directly or implement their own.

mod openai;

pub use openai::OpenAI;
