//! Heuristic text recovery from raw PDF bytes.
//!
//! No PDF object model is built. The bytes are read as Latin-1 and scanned
//! with a few regex passes that catch the text operators most generators
//! emit. Image-only or encrypted files yield too little text and are
//! rejected with [`DocumentError::InsufficientText`].

use std::fmt;
use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::DocumentError;
use crate::types::config::DEFAULT_MAX_DOCUMENT_BYTES;

/// Below this many cleaned characters the document is rejected.
pub const MIN_TEXT_CHARS: usize = 50;

/// Above this many cleaned characters the middle is cut out.
pub const MAX_TEXT_CHARS: usize = 50_000;

/// Inserted between the kept head and tail of an oversized document.
pub const TRUNCATION_MARKER: &str = "\n\n[... middle content truncated ...]\n\n";

/// Passes 1-3 must yield at least this much before the letter-run pass is skipped.
const LETTER_RUN_THRESHOLD: usize = 100;

static PAREN_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]{2,})\)").unwrap());
static TJ_ARRAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]\s*TJ").unwrap());
static TEXT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)BT\s+(.*?)\s+ET").unwrap());
static BLOCK_LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]+)\)").unwrap());
static LETTER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s([A-Za-z]{3,}(?:\s[A-Za-z]{3,})*)\s").unwrap());
static NUMERIC_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9.\-\s]+$").unwrap());

static PDF_ESCAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\[nrtbf]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_LATIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\x20-\x7E\u{00A0}-\u{024F}\u{1E00}-\u{1EFF}]").unwrap()
});

/// A scan that contributed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionPass {
    /// `(...)` string literals anywhere in the file
    Parentheses,
    /// `[...] TJ` show-text arrays
    Tj,
    /// Literals inside `BT ... ET` text objects
    Bt,
    /// Bare letter runs, only when the other passes came up short
    Simple,
}

impl ExtractionPass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionPass::Parentheses => "parentheses",
            ExtractionPass::Tj => "tj",
            ExtractionPass::Bt => "bt",
            ExtractionPass::Simple => "simple",
        }
    }
}

impl fmt::Display for ExtractionPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cleaned text recovered from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,

    /// Passes that found something, in order
    pub passes: Vec<ExtractionPass>,

    /// Cleaned length before truncation, in characters
    pub original_length: usize,

    pub truncated: bool,
}

impl ExtractedText {
    /// Pass names joined with `+`, e.g. `parentheses+tj+bt`.
    pub fn method(&self) -> String {
        if self.passes.is_empty() {
            return "none".to_string();
        }
        self.passes
            .iter()
            .map(ExtractionPass::as_str)
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Length of `text` in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Recovers readable text from a base64 PDF upload.
#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    max_bytes: usize,
    min_chars: usize,
    max_chars: usize,
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DOCUMENT_BYTES)
    }
}

impl PdfTextExtractor {
    /// Create an extractor that rejects documents over `max_bytes` decoded.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            min_chars: MIN_TEXT_CHARS,
            max_chars: MAX_TEXT_CHARS,
        }
    }

    /// Override the truncation budget.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Decode and extract a base64 payload.
    ///
    /// The size guard runs on the encoded length, before any decoding.
    pub fn extract_base64(&self, payload: &str) -> Result<ExtractedText, DocumentError> {
        let payload = strip_data_url(payload);

        let estimated = estimated_decoded_len(payload);
        if estimated > self.max_bytes {
            return Err(DocumentError::TooLarge {
                size: estimated,
                limit: self.max_bytes,
            });
        }

        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| DocumentError::InvalidBase64(e.to_string()))?;

        debug!(bytes = bytes.len(), "Decoded PDF payload");
        self.extract_bytes(&bytes)
    }

    /// Extract from already-decoded bytes.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<ExtractedText, DocumentError> {
        if bytes.len() > self.max_bytes {
            return Err(DocumentError::TooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }

        // Latin-1: every byte maps to the code point of the same value.
        let raw: String = bytes.iter().map(|&b| char::from(b)).collect();

        let mut collected = String::new();
        let mut passes = Vec::new();

        let scans: [(ExtractionPass, fn(&str) -> String); 3] = [
            (ExtractionPass::Parentheses, paren_literals),
            (ExtractionPass::Tj, tj_arrays),
            (ExtractionPass::Bt, text_blocks),
        ];
        for (pass, scan) in scans {
            let found = scan(&raw);
            if !found.is_empty() {
                collected.push_str(&found);
                collected.push(' ');
                passes.push(pass);
            }
        }

        if collected.chars().count() < LETTER_RUN_THRESHOLD {
            let found = letter_runs(&raw);
            if !found.is_empty() {
                collected.push_str(&found);
                collected.push(' ');
                passes.push(ExtractionPass::Simple);
            }
        }

        let text = clean(&collected);
        let original_length = text.chars().count();

        if original_length < self.min_chars {
            return Err(DocumentError::InsufficientText {
                extracted: original_length,
            });
        }

        let (text, truncated) = truncate_middle(text, original_length, self.max_chars);
        let extracted = ExtractedText {
            text,
            passes,
            original_length,
            truncated,
        };

        info!(
            method = %extracted.method(),
            chars = original_length,
            truncated,
            "PDF text extracted"
        );
        Ok(extracted)
    }
}

fn strip_data_url(payload: &str) -> &str {
    let payload = payload.trim();
    if payload.starts_with("data:") {
        if let Some(idx) = payload.find(";base64,") {
            return &payload[idx + ";base64,".len()..];
        }
    }
    payload
}

/// Decoded size implied by a base64 string, ignoring whitespace.
fn estimated_decoded_len(payload: &str) -> usize {
    let significant = payload.bytes().filter(|b| !b.is_ascii_whitespace()).count();
    let padding = payload
        .trim_end()
        .bytes()
        .rev()
        .take_while(|&b| b == b'=')
        .count()
        .min(2);
    (significant * 3 / 4).saturating_sub(padding)
}

fn is_readable_literal(text: &str) -> bool {
    text.chars().count() > 1 && text.chars().any(|c| c.is_ascii_alphabetic())
}

fn paren_literals(raw: &str) -> String {
    PAREN_LITERAL
        .captures_iter(raw)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .filter(|t| is_readable_literal(t))
        .collect::<Vec<_>>()
        .join(" ")
}

fn tj_arrays(raw: &str) -> String {
    TJ_ARRAY
        .captures_iter(raw)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .filter(|t| t.chars().count() > 1)
        .collect::<Vec<_>>()
        .join(" ")
}

fn text_blocks(raw: &str) -> String {
    TEXT_BLOCK
        .captures_iter(raw)
        .filter_map(|c| c.get(0).map(|m| m.as_str()))
        .map(|block| {
            BLOCK_LITERAL
                .captures_iter(block)
                .filter_map(|c| c.get(1).map(|m| m.as_str()))
                .filter(|t| is_readable_literal(t))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|t| t.chars().count() > 1)
        .collect::<Vec<_>>()
        .join(" ")
}

fn letter_runs(raw: &str) -> String {
    LETTER_RUN
        .find_iter(raw)
        .map(|m| m.as_str().trim())
        .filter(|t| t.len() > 3 && !NUMERIC_TOKEN.is_match(t))
        .collect::<Vec<_>>()
        .join(" ")
}

fn clean(text: &str) -> String {
    let text = PDF_ESCAPE.replace_all(text, " ");
    let text = NON_LATIN.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Keep the first 70% and last 30% of `max_chars`, joined by the marker.
fn truncate_middle(text: String, len: usize, max_chars: usize) -> (String, bool) {
    if len <= max_chars {
        return (text, false);
    }

    let head_chars = max_chars * 7 / 10;
    let tail_chars = max_chars - head_chars;

    let head: String = text.chars().take(head_chars).collect();
    let tail: String = text.chars().skip(len - tail_chars).collect();

    debug!(len, max_chars, "Truncating middle of extracted text");
    (format!("{head}{TRUNCATION_MARKER}{tail}"), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(body: &str) -> String {
        STANDARD.encode(body.as_bytes())
    }

    fn sample_pdf() -> String {
        "%PDF-1.4\n1 0 obj << /Length 200 >> stream\n\
         BT /F1 12 Tf 72 712 Td (Acme Analytics helps revenue teams forecast) Tj ET\n\
         BT /F1 12 Tf 72 690 Td (pipeline risk with real time deal scoring.) Tj ET\n\
         endstream endobj\n%%EOF"
            .to_string()
    }

    #[test]
    fn test_extracts_text_objects() {
        let extracted = PdfTextExtractor::default()
            .extract_base64(&encode(&sample_pdf()))
            .unwrap();

        assert!(extracted.text.contains("Acme Analytics helps revenue teams forecast"));
        assert!(extracted.passes.contains(&ExtractionPass::Parentheses));
        assert!(extracted.passes.contains(&ExtractionPass::Bt));
        assert!(!extracted.truncated);
    }

    #[test]
    fn test_accepts_data_url_and_line_breaks() {
        let encoded = encode(&sample_pdf());
        let wrapped: String = encoded
            .as_bytes()
            .chunks(60)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        let payload = format!("data:application/pdf;base64,{wrapped}");

        assert!(PdfTextExtractor::default().extract_base64(&payload).is_ok());
    }

    #[test]
    fn test_size_guard_runs_before_decoding() {
        let extractor = PdfTextExtractor::new(1_000);
        // Not valid base64: a decode attempt would report InvalidBase64.
        let payload = "!".repeat(2_000);

        let err = extractor.extract_base64(&payload).unwrap_err();

        assert!(matches!(err, DocumentError::TooLarge { limit: 1_000, .. }));
    }

    #[test]
    fn test_payload_at_limit_is_accepted() {
        let body = format!("{}{}", sample_pdf(), " ".repeat(40));
        let extractor = PdfTextExtractor::new(body.len());
        assert!(extractor.extract_base64(&encode(&body)).is_ok());
    }

    #[test]
    fn test_invalid_base64() {
        let err = PdfTextExtractor::default()
            .extract_base64("not base64 at all!")
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidBase64(_)));
    }

    #[test]
    fn test_insufficient_text() {
        let err = PdfTextExtractor::default()
            .extract_base64(&encode("%PDF-1.4 (Hi) 0 0 obj"))
            .unwrap_err();
        assert!(matches!(err, DocumentError::InsufficientText { .. }));
    }

    #[test]
    fn test_letter_run_pass_only_when_short() {
        let body = "%PDF-1.4\nstream\n Quarterly planning software for finance teams \
                    that replaces spreadsheets entirely \nendstream";
        let extracted = PdfTextExtractor::default()
            .extract_base64(&encode(body))
            .unwrap();

        assert_eq!(extracted.passes, vec![ExtractionPass::Simple]);
        assert_eq!(extracted.method(), "simple");
        assert!(extracted.text.contains("Quarterly planning software"));
    }

    #[test]
    fn test_cleans_escapes_and_control_chars() {
        let body = "(Line one\\nLine two\\tTabbed \u{7f} text that keeps going long enough \
                    to skip the fallback letter scan and then some)";
        let extracted = PdfTextExtractor::default()
            .extract_bytes(body.as_bytes())
            .unwrap();

        assert_eq!(
            extracted.text,
            "Line one Line two Tabbed text that keeps going long enough \
             to skip the fallback letter scan and then some"
        );
    }

    #[test]
    fn test_truncates_middle() {
        let mut body = String::from("%PDF-1.4\n");
        for i in 0..3_000 {
            body.push_str(&format!("(Section {i} describes the onboarding workflow) "));
        }

        let extracted = PdfTextExtractor::default()
            .extract_base64(&encode(&body))
            .unwrap();

        assert!(extracted.truncated);
        assert!(extracted.original_length > MAX_TEXT_CHARS);
        assert!(extracted.text.contains(TRUNCATION_MARKER));
        assert_eq!(
            extracted.len(),
            35_000 + TRUNCATION_MARKER.chars().count() + 15_000
        );
        assert!(extracted.text.starts_with("Section 0 describes"));
        assert!(extracted.text.ends_with("Section 2999 describes the onboarding workflow"));
    }

    #[test]
    fn test_method_none_when_empty() {
        let text = ExtractedText {
            text: String::new(),
            passes: vec![],
            original_length: 0,
            truncated: false,
        };
        assert_eq!(text.method(), "none");
    }
}
