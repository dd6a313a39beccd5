//! Ingestor implementations for fetching product websites.
//!
//! - `HttpIngestor` - plain HTTP GET via reqwest
//! - `MockIngestor` - canned pages for tests
//!
//! ```rust,ignore
//! use pitch_extraction::ingestors::{HttpIngestor, ValidatedIngestor};
//!
//! let ingestor = ValidatedIngestor::new(HttpIngestor::new()?);
//! let page = ingestor.fetch("https://example.com").await?;
//! ```

mod http;
mod mock;

pub use http::HttpIngestor;
pub use mock::MockIngestor;

pub use crate::traits::ingestor::{Ingestor, RawPage, ValidatedIngestor};
