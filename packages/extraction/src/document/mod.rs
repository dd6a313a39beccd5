//! Plain-text recovery from uploaded PDFs and fetched web pages.

pub mod html;
pub mod pdf;

pub use html::html_to_text;
pub use pdf::{ExtractedText, ExtractionPass, PdfTextExtractor};
