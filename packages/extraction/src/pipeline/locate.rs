//! Locating a JSON object inside free-form model output.
//!
//! Models wrap JSON in fences, prepend commentary, append sign-offs, or
//! answer in markdown. The locator tries progressively looser strategies
//! and stops at the first one that yields a JSON *object*. Whether that
//! object has the right shape is the validator's concern.

use std::fmt;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::normalize::{normalize, strip_markdown_noise};

const OPEN_MARKERS: [&str; 3] = ["{", "{\n", "{ \n"];
const CLOSE_MARKERS: [&str; 3] = ["}", "\n}", "\n }"];

/// Converts markdown prose into a JSON object when no JSON is present.
pub type MarkdownHook = fn(&str) -> Option<Value>;

/// Which strategy produced the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateStrategy {
    /// The whole text parsed as-is
    Direct,
    /// Parsed after removing code fences
    FenceStripped,
    /// First `{` to last `}`, or a balanced `{...}` candidate
    BraceSpan,
    /// First opening marker to last closing marker
    MarkerPair,
    /// Rebuilt from markdown sections
    Markdown,
}

impl LocateStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocateStrategy::Direct => "direct",
            LocateStrategy::FenceStripped => "fence_stripped",
            LocateStrategy::BraceSpan => "brace_span",
            LocateStrategy::MarkerPair => "marker_pair",
            LocateStrategy::Markdown => "markdown",
        }
    }
}

impl fmt::Display for LocateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON object found in model output.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub value: Value,
    pub strategy: LocateStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("model output was empty")]
    Empty,

    #[error("no JSON object found in model output")]
    NotFound,
}

/// Runs the locate cascade.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLocator {
    markdown: Option<MarkdownHook>,
}

impl JsonLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the markdown fallback as a last resort.
    pub fn with_markdown_fallback(mut self, hook: MarkdownHook) -> Self {
        self.markdown = Some(hook);
        self
    }

    /// Find the first JSON object the cascade can recover from `text`.
    pub fn locate(&self, text: &str) -> Result<Located, LocateError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(LocateError::Empty);
        }

        if let Some(value) = parse_object(trimmed) {
            return Ok(found(value, LocateStrategy::Direct));
        }
        debug!(strategy = "direct", "JSON locate strategy failed");

        let normalized = normalize(trimmed);
        if let Some(value) = parse_object(&normalized) {
            return Ok(found(value, LocateStrategy::FenceStripped));
        }
        debug!(strategy = "fence_stripped", "JSON locate strategy failed");

        if let Some(value) = brace_span(&normalized) {
            return Ok(found(value, LocateStrategy::BraceSpan));
        }
        debug!(strategy = "brace_span", "JSON locate strategy failed");

        if let Some(value) = marker_pairs(trimmed) {
            return Ok(found(value, LocateStrategy::MarkerPair));
        }
        debug!(strategy = "marker_pair", "JSON locate strategy failed");

        if let Some(hook) = self.markdown {
            if let Some(value) = hook(trimmed).filter(Value::is_object) {
                return Ok(found(value, LocateStrategy::Markdown));
            }
            debug!(strategy = "markdown", "JSON locate strategy failed");
        }

        Err(LocateError::NotFound)
    }
}

fn found(value: Value, strategy: LocateStrategy) -> Located {
    debug!(strategy = %strategy, "Located JSON object");
    Located { value, strategy }
}

fn parse_object(candidate: &str) -> Option<Value> {
    serde_json::from_str::<Value>(candidate.trim())
        .ok()
        .filter(Value::is_object)
}

/// Greedy first-`{`-to-last-`}` span.
fn greedy_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn brace_span(normalized: &str) -> Option<Value> {
    if let Some(value) = greedy_span(normalized).and_then(parse_object) {
        return Some(value);
    }

    let stripped = strip_markdown_noise(normalized);
    if let Some(value) = greedy_span(&stripped).and_then(parse_object) {
        return Some(value);
    }

    balanced_objects(normalized).into_iter().find_map(parse_object)
}

/// Top-level `{...}` substrings with balanced braces, ignoring braces inside
/// JSON string literals.
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut candidates = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        candidates.push(&text[s..=idx]);
                    }
                }
            }
            _ => {}
        }
    }

    candidates
}

fn marker_pairs(text: &str) -> Option<Value> {
    for open in OPEN_MARKERS {
        let Some(start) = text.find(open) else {
            continue;
        };
        for close in CLOSE_MARKERS {
            let Some(close_idx) = text.rfind(close) else {
                continue;
            };
            if close_idx <= start {
                continue;
            }
            let end = close_idx + close.len();
            if let Some(value) = parse_object(&text[start..end]) {
                return Some(value);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn locate(text: &str) -> Result<Located, LocateError> {
        JsonLocator::new().locate(text)
    }

    #[test]
    fn test_direct() {
        let located = locate(r#"{"talkTracks": ["a"]}"#).unwrap();
        assert_eq!(located.strategy, LocateStrategy::Direct);
        assert_eq!(located.value, json!({"talkTracks": ["a"]}));
    }

    #[test]
    fn test_fenced() {
        let located = locate("```json\n{\"a\": 1}\n```").unwrap();
        assert_eq!(located.strategy, LocateStrategy::FenceStripped);
        assert_eq!(located.value, json!({"a": 1}));
    }

    #[test]
    fn test_prose_wrapped() {
        let located = locate("Here is your strategy:\n{\"a\": {\"b\": 2}}\nLet me know!").unwrap();
        assert_eq!(located.strategy, LocateStrategy::BraceSpan);
        assert_eq!(located.value, json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_fence_inside_prose() {
        let text = "Sure! Here it is:\n```json\n{\"a\": 1}\n```\nAnything else?";
        let located = locate(text).unwrap();
        assert_eq!(located.value, json!({"a": 1}));
    }

    #[test]
    fn test_balanced_scan_handles_trailing_braces() {
        // Greedy span swallows the trailing "{placeholder}" and fails to parse.
        let text = "Result: {\"a\": \"x } y\"} Replace {placeholder} before sending.";
        let located = locate(text).unwrap();
        assert_eq!(located.strategy, LocateStrategy::BraceSpan);
        assert_eq!(located.value, json!({"a": "x } y"}));
    }

    #[test]
    fn test_arrays_are_not_objects() {
        assert_eq!(locate("[1, 2, 3]"), Err(LocateError::NotFound));
    }

    #[test]
    fn test_wrong_shape_is_still_located() {
        let located = locate(r#"{"unexpected": true}"#).unwrap();
        assert_eq!(located.value, json!({"unexpected": true}));
    }

    #[test]
    fn test_not_found() {
        assert_eq!(
            locate("I'm sorry, I can't help with that."),
            Err(LocateError::NotFound)
        );
        assert_eq!(locate("   "), Err(LocateError::Empty));
    }

    #[test]
    fn test_markdown_hook_runs_last() {
        fn hook(_: &str) -> Option<Value> {
            Some(json!({"fromMarkdown": true}))
        }

        let locator = JsonLocator::new().with_markdown_fallback(hook);
        let located = locator.locate("### 1. Price\nToo expensive").unwrap();
        assert_eq!(located.strategy, LocateStrategy::Markdown);

        let direct = locator.locate("{\"a\": 1}").unwrap();
        assert_eq!(direct.strategy, LocateStrategy::Direct);
    }

    #[test]
    fn test_marker_pairs() {
        assert_eq!(
            marker_pairs("x {\n\"a\": 1\n} y"),
            Some(json!({"a": 1}))
        );
        assert_eq!(marker_pairs("} before {"), None);
    }

    #[test]
    fn test_balanced_objects() {
        assert_eq!(
            balanced_objects(r#"a {"k": "{"} b {"n": 1}"#),
            vec![r#"{"k": "{"}"#, r#"{"n": 1}"#]
        );
    }
}
