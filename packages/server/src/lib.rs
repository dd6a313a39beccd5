// Pitch Builder - API Server
//
// Exposes each pitch-builder stage (website and PDF analysis, pitch strategy,
// objection handling, email cadence and their feedback revisions) as a JSON
// endpoint. All model work happens in the pitch-extraction library.

pub mod config;
pub mod server;

pub use config::*;
