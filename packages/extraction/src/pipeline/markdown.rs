//! Recovering objection handling from a markdown answer.
//!
//! Some completions ignore the JSON instruction and return numbered
//! sections instead:
//!
//! ```text
//! ### 1. **Budget concerns**
//! "We don't have budget for this right now."
//! **Strategic Response:** "I hear you. Most teams fund this from ..."
//! **Evidence:**
//! - Customers cut tooling spend by 30%
//! ```
//!
//! Each section becomes one objection record. Missing parts get neutral
//! default sentences so the result still validates.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};

pub const DEFAULT_RESPONSE: &str = "I understand your concern. Let me address that for you.";
pub const DEFAULT_PROOF_POINT: &str = "Our customers have seen significant value from this solution.";

static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#{2,3}\s*\d+[.)]\s*([^\n]+)").unwrap());
static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());
static RESPONSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)(?:Strategic Response|Response|Feel-Felt-Found).*?"([^"]+)""#).unwrap()
});
static PROOF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(?:Evidence|ROI|Metrics|Testimonials?).*?[-•]\s*([^-•\n]+)").unwrap()
});

/// Parse numbered markdown sections into `{"objectionHandling": [...]}`.
///
/// Returns `None` when the text has no numbered section headers.
pub fn objections_from_markdown(text: &str) -> Option<Value> {
    let headers: Vec<_> = SECTION_HEADER.captures_iter(text).collect();
    if headers.is_empty() {
        return None;
    }

    let mut objections = Vec::with_capacity(headers.len());
    for (i, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(title)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let body_end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());
        let body = text[whole.end()..body_end].trim();

        objections.push(section_to_objection(clean_title(title.as_str()), body));
    }

    Some(json!({ "objectionHandling": objections }))
}

fn clean_title(title: &str) -> &str {
    title.trim().trim_matches('*').trim()
}

fn section_to_objection(title: &str, body: &str) -> Value {
    let objection = QUOTED
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(title);

    let response = RESPONSE
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .or_else(|| {
            body.lines()
                .find(|line| line.contains("understand") || line.contains("appreciate"))
                .map(|line| line.replace(['*', '"'], "").trim().to_string())
                .filter(|line| !line.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_RESPONSE.to_string());

    let proof_point = PROOF
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_PROOF_POINT);

    json!({
        "objection": objection,
        "response": response,
        "proofPoint": proof_point,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"Here are the most likely objections:

### 1. **Budget concerns**
"We don't have budget for this right now."

**Strategic Response:** "Most teams fund this from the savings in the first quarter."

**Evidence:**
- Customers cut tooling spend by 30%

### 2) Timing
We understand timing matters for your rollout.

## 3. Incumbent vendor
**ROI Metrics:**
• Payback in under 90 days
"#;

    #[test]
    fn test_parses_sections() {
        let value = objections_from_markdown(SAMPLE).unwrap();
        let items = value["objectionHandling"].as_array().unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["objection"], "We don't have budget for this right now.");
        assert_eq!(
            items[0]["response"],
            "Most teams fund this from the savings in the first quarter."
        );
        assert_eq!(items[0]["proofPoint"], "Customers cut tooling spend by 30%");
    }

    #[test]
    fn test_falls_back_to_title_and_understand_line() {
        let value = objections_from_markdown(SAMPLE).unwrap();
        let second = &value["objectionHandling"][1];

        assert_eq!(second["objection"], "Timing");
        assert_eq!(second["response"], "We understand timing matters for your rollout.");
        assert_eq!(second["proofPoint"], DEFAULT_PROOF_POINT);
    }

    #[test]
    fn test_defaults_when_section_is_bare() {
        let value = objections_from_markdown(SAMPLE).unwrap();
        let third = &value["objectionHandling"][2];

        assert_eq!(third["objection"], "Incumbent vendor");
        assert_eq!(third["response"], DEFAULT_RESPONSE);
        assert_eq!(third["proofPoint"], "Payback in under 90 days");
    }

    #[test]
    fn test_no_sections() {
        assert_eq!(objections_from_markdown("Just some prose."), None);
    }
}
