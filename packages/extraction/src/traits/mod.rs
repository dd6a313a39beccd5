//! Core trait abstractions for the pitch pipeline.
//!
//! Applications implement these to plug in a language model provider and
//! a website fetcher.

pub mod ai;
pub mod ingestor;
