//! Markdown cleanup applied to raw model output before JSON location.

use std::sync::LazyLock;

use regex::Regex;

static HEADING_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+\s").unwrap());
static BOLD_ONLY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*[^*]+\*\*:?$").unwrap());
static BULLET_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:[-*•]|\d+\.)\s+").unwrap());

/// Strip surrounding whitespace and markdown code fences.
///
/// A leading "```json" or "```" and a trailing "```" are removed, repeatedly,
/// until the text no longer opens with a fence. Total and idempotent.
pub fn normalize(text: &str) -> String {
    let mut current = text.trim();

    loop {
        let rest = if let Some(rest) = current.strip_prefix("```json") {
            rest
        } else if let Some(rest) = current.strip_prefix("```") {
            rest
        } else {
            break;
        };

        let rest = rest.trim();
        current = rest.strip_suffix("```").unwrap_or(rest).trim();
    }

    current.to_string()
}

/// Aggressive cleanup for prose-wrapped JSON.
///
/// Drops heading lines, bold-only label lines and every fence marker, and
/// removes leading bullet markers. Not idempotent in general and only used
/// as a locator fallback.
pub fn strip_markdown_noise(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.starts_with("```"))
        .filter(|line| !HEADING_LINE.is_match(line))
        .filter(|line| !BOLD_ONLY_LINE.is_match(line))
        .map(|line| BULLET_PREFIX.replace(line, "").into_owned())
        .map(|line| line.replace("```json", "").replace("```", ""))
        .collect::<Vec<_>>()
        .join("\n")
}
