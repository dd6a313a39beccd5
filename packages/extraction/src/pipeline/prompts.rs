//! LLM prompts for the pitch pipeline.
//!
//! System prompts are fixed per stage and may be overridden per request
//! through [`PromptConfig`]. User prompts interpolate the known facts.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ExtractionError;
use crate::types::objection::ObjectionHandlingSet;
use crate::types::pitch::PitchStrategy;
use crate::types::product::{ProductField, ProductInfo, NOT_SPECIFIED};

/// System prompt for both analysis stages (website and PDF).
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an expert sales strategist and market analyst. Analyze the provided {source} to extract product information and make informed inferences about the target audience and the objections they are likely to raise.

Combine:
1. Facts stated explicitly in the content
2. Inferences drawn from the product category, industry and market positioning
3. Sales experience about buyer personas and common objections

Respond with a single JSON object:

{
  "productName": "Name of the main product or service",
  "coreProblem": "The core problem the product solves",
  "keyFeatures": ["Feature 1", "Feature 2", "Feature 3"],
  "differentiators": "What sets the product apart from alternatives",
  "successStories": "Notable customer results, metrics or case studies",
  "idealCustomer": "Ideal buyer (title, company type, industry), inferred if not stated",
  "customerChallenges": "The buyer's main challenges, goals or pain points",
  "productSolution": "How the product addresses those challenges",
  "objections": "Likely objections or hesitations, inferred for this kind of product"
}

Guidance:
- Prefer explicit facts where they exist
- Infer idealCustomer and customerChallenges from the product type and positioning
- Think like a seller when listing objections: pricing, complexity, competition, timing
- Use "Unable to determine" only when no reasonable inference is possible"#;

/// System prompt for revising ProductInfo from user feedback.
pub const PROCESS_FEEDBACK_SYSTEM_PROMPT: &str = r#"You update product and audience information based on user feedback.

You receive the current product information as JSON and the user's feedback. Apply the feedback and return the complete record in the same JSON format:

{
  "website": "Website URL",
  "productName": "Name of the main product or service",
  "coreProblem": "The core problem the product solves",
  "keyFeatures": ["Feature 1", "Feature 2", "Feature 3"],
  "differentiators": "What sets the product apart from alternatives",
  "successStories": "Notable customer results, metrics or case studies",
  "idealCustomer": "Ideal buyer (title, company type, industry)",
  "customerChallenges": "The buyer's main challenges, goals or pain points",
  "productSolution": "How the product addresses those challenges",
  "objections": "Likely objections or hesitations"
}

Rules:
- Change only the fields the feedback mentions or clearly relates to
- Keep every other field exactly as it was
- Incorporate new information the user provides
- Return only the JSON object"#;

/// System prompt for generating a pitch strategy.
pub const PITCH_STRATEGY_SYSTEM_PROMPT: &str = r#"You are an expert sales strategist. From the product and customer information provided, write a personalized pitch strategy with cold call starters, talk tracks and key talking points.

Return ONLY a JSON object. No markdown, no code fences, no text before or after it. Start with { and end with }.

{
  "coldCallStarters": ["Starter 1", "Starter 2"],
  "talkTracks": ["Talk track 1", "Talk track 2"],
  "talkingPoints": ["Point 1", "Point 2", "Point 3", "Point 4", "Point 5", "Point 6"]
}

Cold call starters:
- Two opening lines using a pattern interrupt or upfront contract
- Natural, brief and engaging; the goal is earning the next thirty seconds

Talk tracks:
- Two personalized opening pitches of 3-4 sentences each
- Use the real product name, core problem and differentiators
- Reference the ideal customer and their challenges
- Include metrics or success stories when available

Talking points:
- Six concise points covering benefits, features and differentiators
- Tie each point to a specific customer challenge"#;

/// System prompt for revising a pitch strategy.
pub const IMPROVE_PITCH_SYSTEM_PROMPT: &str = r#"You are an expert sales strategist who improves pitch strategies based on user feedback.

Return ONLY a JSON object. No markdown, no code fences, no text before or after it.

You receive the current pitch strategy, the product information for context, and the user's feedback. Return the updated strategy in this format:

{
  "coldCallStarters": ["Starter 1", "Starter 2"],
  "talkTracks": ["Talk track 1", "Talk track 2"],
  "talkingPoints": ["Point 1", "Point 2", "Point 3", "Point 4", "Point 5", "Point 6"]
}

Rules:
- Always include coldCallStarters, talkTracks and talkingPoints
- Change only what the feedback asks for and keep everything else as it was
- Talk tracks stay conversational at 3-4 sentences; talking points stay short"#;

/// System prompt for generating objection handling.
pub const OBJECTION_HANDLING_SYSTEM_PROMPT: &str = r#"You are an expert sales strategist specializing in objection handling. From the product information, target audience and pitch strategy provided, write objection handling tactics.

Return ONLY this JSON object, with no markdown or additional text:

{
  "objectionHandling": [
    {
      "objection": "Likely objection",
      "response": "Suggested response",
      "proofPoint": "Supporting proof point, metric or value proposition"
    }
  ]
}

Guidelines:
- Cover the 5-7 objections this audience is most likely to raise
- Address pricing, implementation, ROI, competition and timing where relevant
- Keep responses conversational and specific to the product
- Ground proof points in the success stories and differentiators provided"#;

/// System prompt for revising objection handling.
pub const IMPROVE_OBJECTIONS_SYSTEM_PROMPT: &str = r#"You are an expert sales strategist who improves objection handling based on user feedback.

Return ONLY a JSON object. No markdown, no code fences, no text before or after it.

You receive the current objection handling, the product information for context, and the user's feedback. Return the updated set in this format:

{
  "objectionHandling": [
    {
      "objection": "Likely objection",
      "response": "Suggested response",
      "proofPoint": "Supporting proof point, metric or value proposition"
    }
  ]
}

Rules:
- Every entry keeps objection, response and proofPoint
- Change only what the feedback asks for and keep the other entries as they were
- Add or remove objections only when the feedback asks for it"#;

/// System prompt for generating an email cadence.
pub const EMAIL_CADENCE_SYSTEM_PROMPT: &str = r#"You are an expert sales development representative specializing in outreach cadences. From the product information, pitch strategy and objection handling provided, write a 16-day cadence with ready-to-use copy.

Return ONLY this JSON object:

{
  "emailCadence": [
    {
      "day": "Day 1",
      "step": "Step 1",
      "type": "Email #1",
      "content": "**Subject:** {{first_name}} at {{company}}\n**Body:** Hi {{first_name}}, ..."
    }
  ]
}

Follow this structure, 13 steps in day order:
- Day 1: Email #1 + LinkedIn Connect + Call #1
- Day 4: Email #2
- Day 5: LinkedIn Message + Call #2
- Day 8: Email #3 + Call #3
- Day 12: Email #4 + LinkedIn Follow-up + Call #4
- Day 16: Email #5 + Call #5

Guidelines:
- Use the real product name, benefits and differentiators
- Give every email a subject line and a personalized body
- Use placeholders like {{first_name}}, {{company}} and {{my.first_name}}
- Keep LinkedIn messages short; give call guidance and a voicemail script
- Each touch builds on the previous one and ends with a clear next step"#;

/// System prompt for revising an email cadence.
pub const IMPROVE_CADENCE_SYSTEM_PROMPT: &str = r#"You are an expert sales development representative who improves outreach cadences based on user feedback.

Return ONLY a JSON object. No markdown, no code fences, no text before or after it.

You receive the current cadence, the product information for context, and the user's feedback. Return the full updated cadence in this format:

{
  "emailCadence": [
    {"day": "Day 1", "step": "Step 1", "type": "Email #1", "content": "**Subject:** ...\n**Body:** ..."}
  ]
}

Rules:
- Keep every step's day, step, type and content fields
- Keep steps in day order
- Change only what the feedback asks for and keep the other steps as they were"#;

const ANALYZE_WEBSITE_PROMPT: &str =
    "Analyze this website content and extract product/audience information:\n\n{text}";

const ANALYZE_PDF_PROMPT: &str = "Analyze this document and extract product/audience information for sales strategy purposes.\n\nDocument content:\n{text}";

const PROCESS_FEEDBACK_PROMPT: &str = "Current product information:\n{current}\n\nUser feedback:\n{feedback}\n\nUpdate the product information based on this feedback and return the updated JSON.";

const PITCH_STRATEGY_PROMPT: &str = r#"Generate a personalized pitch strategy based on this product information:

{product}

Write talk tracks that reference these specific details and talking points that highlight the key benefits for this audience."#;

const OBJECTION_HANDLING_PROMPT: &str = r#"Generate objection handling tactics based on this information:

PRODUCT INFORMATION:
{product}

PITCH STRATEGY:
{pitch}

Focus on the objections this audience is most likely to raise about this specific product. Return only JSON."#;

const EMAIL_CADENCE_PROMPT: &str = r#"Generate a personalized email cadence based on this information:

PRODUCT INFORMATION:
{product}

PITCH STRATEGY:
{pitch}
{objections}
Focus on the buyer's pain points and how this product solves them. Use the success stories and differentiators in the email content."#;

const REVISION_PROMPT: &str = "Current {artifact}:\n{current}\n\nProduct information context:\n{product}\n\nUser feedback:\n{feedback}\n\nUpdate the {artifact} based on this feedback and return the complete improved JSON.";

/// Stage whose system prompt can be overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    AnalyzeWebsite,
    AnalyzePdf,
    ProcessFeedback,
    PitchStrategy,
    ImprovePitchStrategy,
    ObjectionHandling,
    ImproveObjectionHandling,
    EmailCadence,
    ImproveEmailCadence,
}

impl PromptKind {
    pub const ALL: [PromptKind; 9] = [
        PromptKind::AnalyzeWebsite,
        PromptKind::AnalyzePdf,
        PromptKind::ProcessFeedback,
        PromptKind::PitchStrategy,
        PromptKind::ImprovePitchStrategy,
        PromptKind::ObjectionHandling,
        PromptKind::ImproveObjectionHandling,
        PromptKind::EmailCadence,
        PromptKind::ImproveEmailCadence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::AnalyzeWebsite => "analyze-website",
            PromptKind::AnalyzePdf => "analyze-pdf",
            PromptKind::ProcessFeedback => "process-feedback",
            PromptKind::PitchStrategy => "generate-pitch-strategy",
            PromptKind::ImprovePitchStrategy => "improve-pitch-strategy",
            PromptKind::ObjectionHandling => "generate-objection-handling",
            PromptKind::ImproveObjectionHandling => "improve-objection-handling",
            PromptKind::EmailCadence => "generate-email-cadence",
            PromptKind::ImproveEmailCadence => "improve-email-cadence",
        }
    }

    /// Built-in system prompt for this stage.
    pub fn default_system_prompt(&self) -> String {
        match self {
            PromptKind::AnalyzeWebsite => ANALYSIS_SYSTEM_PROMPT.replace("{source}", "website content"),
            PromptKind::AnalyzePdf => ANALYSIS_SYSTEM_PROMPT.replace("{source}", "document text"),
            PromptKind::ProcessFeedback => PROCESS_FEEDBACK_SYSTEM_PROMPT.to_string(),
            PromptKind::PitchStrategy => PITCH_STRATEGY_SYSTEM_PROMPT.to_string(),
            PromptKind::ImprovePitchStrategy => IMPROVE_PITCH_SYSTEM_PROMPT.to_string(),
            PromptKind::ObjectionHandling => OBJECTION_HANDLING_SYSTEM_PROMPT.to_string(),
            PromptKind::ImproveObjectionHandling => IMPROVE_OBJECTIONS_SYSTEM_PROMPT.to_string(),
            PromptKind::EmailCadence => EMAIL_CADENCE_SYSTEM_PROMPT.to_string(),
            PromptKind::ImproveEmailCadence => IMPROVE_CADENCE_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call system prompt overrides.
///
/// A plain value: callers keep one per session and pass it along with each
/// request. Nothing here is shared or mutated behind the caller's back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptConfig {
    overrides: HashMap<PromptKind, String>,
}

impl PromptConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this config with `kind` overridden. Blank prompts are ignored.
    pub fn with_override(&self, kind: PromptKind, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        let mut next = self.clone();
        if !prompt.trim().is_empty() {
            next.overrides.insert(kind, prompt);
        }
        next
    }

    /// Like [`with_override`](Self::with_override) for an optional request field.
    pub fn with_optional(&self, kind: PromptKind, prompt: Option<&str>) -> Self {
        match prompt {
            Some(prompt) => self.with_override(kind, prompt),
            None => self.clone(),
        }
    }

    pub fn is_overridden(&self, kind: PromptKind) -> bool {
        self.overrides.contains_key(&kind)
    }

    /// Override if present, otherwise the built-in prompt.
    pub fn system_prompt(&self, kind: PromptKind) -> String {
        self.overrides
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| kind.default_system_prompt())
    }
}

/// What kind of text the prompt-improvement helper is rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    Feedback,
    SystemPrompt,
    #[default]
    General,
    Website,
    ProductInfo,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Feedback => "feedback",
            FieldType::SystemPrompt => "systemPrompt",
            FieldType::General => "general",
            FieldType::Website => "website",
            FieldType::ProductInfo => "productInfo",
        }
    }

    /// Unknown names map to [`FieldType::General`].
    pub fn from_name(name: Option<&str>) -> Self {
        name.and_then(|n| n.parse().ok()).unwrap_or_default()
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            FieldType::Feedback => "You are an expert prompt engineer. Rewrite the user's feedback or request so it is specific, actionable and focused on the desired outcome. Keep the same intent.",
            FieldType::SystemPrompt => "You are an expert in AI prompt engineering. Improve the given system prompt so it is specific and comprehensive, adding examples where they help, while keeping its core purpose.",
            FieldType::General => "You are an expert communicator. Make the given text clearer and more specific while keeping its original intent and meaning.",
            FieldType::Website => "You are a web expert. If the text is a partial URL or website reference, complete it to a full URL including https://. If it is already complete, return it properly formatted.",
            FieldType::ProductInfo => "You are a product strategist. Make this product information more comprehensive, specific and compelling for sales and marketing while keeping it accurate.",
        }
    }
}

impl FromStr for FieldType {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feedback" => Ok(FieldType::Feedback),
            "systemPrompt" => Ok(FieldType::SystemPrompt),
            "general" => Ok(FieldType::General),
            "website" => Ok(FieldType::Website),
            "productInfo" => Ok(FieldType::ProductInfo),
            other => Err(ExtractionError::invalid_input(format!(
                "unknown field type: {other}"
            ))),
        }
    }
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// "Label: value" lines for the product facts.
fn product_lines(product: &ProductInfo, objections_label: &str) -> String {
    let mut lines: Vec<String> = ProductField::ALL
        .iter()
        .filter(|f| !matches!(f, ProductField::Website | ProductField::Objections))
        .map(|f| format!("{}: {}", f.label(), product.field(*f)))
        .collect();
    lines.push(format!(
        "{}: {}",
        objections_label,
        product.field(ProductField::Objections)
    ));
    lines.join("\n")
}

fn joined_or_sentinel(items: &[String]) -> String {
    if items.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        items.join(" | ")
    }
}

fn pitch_lines(pitch: &PitchStrategy) -> String {
    format!(
        "Talk Tracks: {}\nKey Talking Points: {}",
        joined_or_sentinel(&pitch.talk_tracks),
        joined_or_sentinel(&pitch.talking_points)
    )
}

/// Format the website analysis prompt with page text.
pub fn format_website_analysis_prompt(text: &str) -> String {
    ANALYZE_WEBSITE_PROMPT.replace("{text}", text)
}

/// Format the PDF analysis prompt with extracted document text.
pub fn format_pdf_analysis_prompt(text: &str) -> String {
    ANALYZE_PDF_PROMPT.replace("{text}", text)
}

/// Format the ProductInfo revision prompt.
pub fn format_feedback_prompt(current: &ProductInfo, feedback: &str) -> String {
    PROCESS_FEEDBACK_PROMPT
        .replace("{current}", &pretty(current))
        .replace("{feedback}", feedback)
}

/// Format the pitch strategy generation prompt.
pub fn format_pitch_prompt(product: &ProductInfo) -> String {
    PITCH_STRATEGY_PROMPT.replace("{product}", &product_lines(product, "Likely Objections"))
}

/// Format the objection handling generation prompt.
pub fn format_objection_prompt(product: &ProductInfo, pitch: &PitchStrategy) -> String {
    OBJECTION_HANDLING_PROMPT
        .replace("{product}", &product_lines(product, "Known Objections"))
        .replace("{pitch}", &pitch_lines(pitch))
}

/// Format the email cadence generation prompt.
pub fn format_cadence_prompt(
    product: &ProductInfo,
    pitch: &PitchStrategy,
    objections: Option<&ObjectionHandlingSet>,
) -> String {
    let objections_section = match objections {
        Some(set) if !set.is_empty() => {
            let entries = set
                .iter()
                .map(|o| {
                    format!(
                        "Objection: {} | Response: {} | Proof: {}",
                        o.objection, o.response, o.proof_point
                    )
                })
                .collect::<Vec<_>>()
                .join(" | ");
            format!("\nOBJECTION HANDLING:\n{entries}\n")
        }
        _ => String::new(),
    };

    EMAIL_CADENCE_PROMPT
        .replace("{product}", &product_lines(product, "Known Objections"))
        .replace("{pitch}", &pitch_lines(pitch))
        .replace("{objections}", &objections_section)
}

/// Format a revision prompt for any artifact.
///
/// `artifact` names the thing being revised ("pitch strategy").
pub fn format_revision_prompt<T: Serialize>(
    artifact: &str,
    current: &T,
    product: &ProductInfo,
    feedback: &str,
) -> String {
    REVISION_PROMPT
        .replace("{artifact}", artifact)
        .replace("{current}", &pretty(current))
        .replace("{product}", &pretty(product))
        .replace("{feedback}", feedback)
}

/// Format the prompt-improvement request.
pub fn format_improve_prompt(prompt: &str, context: Option<&str>) -> String {
    match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!("Context: {context}\n\nImprove this text: {prompt}"),
        None => format!("Improve this text: {prompt}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::objection::ObjectionHandling;

    #[test]
    fn test_override_returns_new_config() {
        let base = PromptConfig::new();
        let custom = base.with_override(PromptKind::PitchStrategy, "Be brief.");

        assert!(!base.is_overridden(PromptKind::PitchStrategy));
        assert_eq!(custom.system_prompt(PromptKind::PitchStrategy), "Be brief.");
        assert_eq!(
            custom.system_prompt(PromptKind::EmailCadence),
            EMAIL_CADENCE_SYSTEM_PROMPT
        );
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let config = PromptConfig::new()
            .with_override(PromptKind::ObjectionHandling, "   ")
            .with_optional(PromptKind::EmailCadence, None);

        assert_eq!(config, PromptConfig::new());
    }

    #[test]
    fn test_analysis_prompts_differ_by_source() {
        let website = PromptKind::AnalyzeWebsite.default_system_prompt();
        let pdf = PromptKind::AnalyzePdf.default_system_prompt();

        assert!(website.contains("website content"));
        assert!(pdf.contains("document text"));
        assert!(!pdf.contains("{source}"));
    }

    #[test]
    fn test_pitch_prompt_lists_facts_with_sentinels() {
        let product = ProductInfo::new().with(ProductField::ProductName, "Acme");
        let prompt = format_pitch_prompt(&product);

        assert!(prompt.contains("Product Name: Acme"));
        assert!(prompt.contains("Core Problem: Not specified"));
        assert!(prompt.contains("Likely Objections: Not specified"));
        assert!(!prompt.contains("Website:"));
    }

    #[test]
    fn test_cadence_prompt_objection_section() {
        let product = ProductInfo::new();
        let pitch = PitchStrategy {
            cold_call_starters: vec!["Hi".into()],
            talk_tracks: vec!["Track A".into(), "Track B".into()],
            talking_points: vec![],
        };
        let set = ObjectionHandlingSet::new(vec![ObjectionHandling::new("Price", "Value", "ROI")]);

        let with = format_cadence_prompt(&product, &pitch, Some(&set));
        assert!(with.contains("Talk Tracks: Track A | Track B"));
        assert!(with.contains("Key Talking Points: Not specified"));
        assert!(with.contains("Objection: Price | Response: Value | Proof: ROI"));

        let without = format_cadence_prompt(&product, &pitch, None);
        assert!(!without.contains("OBJECTION HANDLING"));
    }

    #[test]
    fn test_improve_prompt_context() {
        assert_eq!(format_improve_prompt("make it pop", None), "Improve this text: make it pop");
        assert_eq!(
            format_improve_prompt("make it pop", Some("landing page")),
            "Context: landing page\n\nImprove this text: make it pop"
        );
    }

    #[test]
    fn test_field_type_from_name() {
        assert_eq!(FieldType::from_name(Some("website")), FieldType::Website);
        assert_eq!(FieldType::from_name(Some("nonsense")), FieldType::General);
        assert_eq!(FieldType::from_name(None), FieldType::General);
    }
}
