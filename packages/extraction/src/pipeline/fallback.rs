//! Deterministic artifacts built from known facts.
//!
//! When the model output cannot be used, each stage still answers with a
//! complete artifact. Real facts are substituted directly; missing facts get
//! a neutral placeholder phrase so the text still reads naturally.

use crate::types::cadence::{EmailCadence, EmailCadenceStep};
use crate::types::objection::{ObjectionHandling, ObjectionHandlingSet};
use crate::types::pitch::PitchStrategy;
use crate::types::product::{ProductField, ProductInfo};

const PRODUCT: &str = "our product";
const CORE_PROBLEM: &str = "key business challenges";
const CHALLENGES: &str = "operational challenges";
const SOLUTION: &str = "address these pain points";
const DIFFERENTIATORS: &str = "our unique approach";
const SUCCESS: &str = "a proven track record with similar companies";
const IDEAL_CUSTOMER: &str = "companies looking to improve efficiency";
const OBJECTIONS: &str = "comprehensive support and proven ROI";
const FEATURES: &str = "comprehensive solutions tailored to your needs";

/// Known objections that replace canned ones in the objection fallback.
const MAX_KNOWN_OBJECTIONS: usize = 2;

/// Inputs available to a stage's fallback.
#[derive(Debug, Clone, Default)]
pub struct StageFacts {
    pub product: ProductInfo,
    pub pitch: Option<PitchStrategy>,
    pub objections: Option<ObjectionHandlingSet>,
}

impl StageFacts {
    pub fn new(product: ProductInfo) -> Self {
        Self {
            product,
            ..Default::default()
        }
    }

    pub fn with_pitch(mut self, pitch: PitchStrategy) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn with_objections(mut self, objections: ObjectionHandlingSet) -> Self {
        self.objections = Some(objections);
        self
    }

    fn fact<'a>(&'a self, field: ProductField, placeholder: &'a str) -> &'a str {
        self.product.fact_or(field, placeholder)
    }

    fn features(&self, max: usize, separator: &str) -> String {
        let features = self.product.features();
        if features.is_empty() {
            FEATURES.to_string()
        } else {
            features
                .into_iter()
                .take(max)
                .collect::<Vec<_>>()
                .join(separator)
        }
    }
}

/// Two starters, two talk tracks (the first names the product) and six
/// talking points.
pub fn synthesize_pitch(facts: &StageFacts) -> PitchStrategy {
    let product = facts.fact(ProductField::ProductName, PRODUCT);
    let problem = facts.fact(ProductField::CoreProblem, CORE_PROBLEM);
    let challenges = facts.fact(ProductField::CustomerChallenges, CHALLENGES);
    let solution = facts.fact(ProductField::ProductSolution, SOLUTION);
    let differentiators = facts.fact(ProductField::Differentiators, DIFFERENTIATORS);
    let success = facts.fact(ProductField::SuccessStories, SUCCESS);
    let ideal = facts.fact(ProductField::IdealCustomer, IDEAL_CUSTOMER);
    let objections = facts.fact(ProductField::Objections, OBJECTIONS);

    PitchStrategy {
        cold_call_starters: vec![
            format!(
                "Hi [Name], I hope I'm catching you at a good time. I noticed your company \
                 might be facing challenges with {challenges}. Do you have 30 seconds for me \
                 to explain how we've helped similar companies?"
            ),
            format!(
                "Good morning [Name], I'm calling because we've been working with companies \
                 like yours to solve {problem}. Would you be open to a brief conversation \
                 about this?"
            ),
        ],
        talk_tracks: vec![
            format!(
                "Hi [Name], I understand that {challenges} are significant for companies like \
                 yours. {product} is specifically designed to {solution}. What sets us apart \
                 is {differentiators}, which has helped companies achieve measurable results. \
                 Would you be interested in learning more?"
            ),
            format!(
                "{product} solves {problem} for companies like yours, with {success}. Given \
                 your role and company focus, I believe there could be a strong fit. Can we \
                 schedule a brief call to explore this further?"
            ),
        ],
        talking_points: vec![
            format!("{product} directly addresses {problem}"),
            format!("Key features include: {}", facts.features(usize::MAX, ", ")),
            format!("What differentiates us: {differentiators}"),
            format!("Success stories: {success}"),
            format!("Ideal for: {ideal}"),
            format!("Addresses common objections: {objections}"),
        ],
    }
}

/// Five canned objections, the first two replaced by known objections.
pub fn synthesize_objections(facts: &StageFacts) -> ObjectionHandlingSet {
    let product = facts.fact(ProductField::ProductName, PRODUCT);
    let ideal = facts.fact(ProductField::IdealCustomer, IDEAL_CUSTOMER);
    let success = facts.product.fact(ProductField::SuccessStories);
    let differentiators = facts.product.fact(ProductField::Differentiators);

    let mut items = vec![
        ObjectionHandling::new(
            "The price seems too high for our budget.",
            format!(
                "I understand price is a consideration. {product} offers significant value \
                 through {}.",
                facts.features(2, " and ")
            ),
            success.unwrap_or(
                "Our customers typically see ROI within the first year of implementation.",
            ),
        ),
        ObjectionHandling::new(
            "How do we know this will work for our specific needs?",
            format!("That's a great question. {product} was designed specifically for {ideal}."),
            differentiators.unwrap_or("Our solution has been proven across similar organizations."),
        ),
        ObjectionHandling::new(
            "We're concerned about implementation complexity.",
            "Implementation concerns are completely valid. We provide comprehensive support \
             throughout the process.",
            "Our implementation team ensures smooth deployment with minimal disruption to your \
             operations.",
        ),
        ObjectionHandling::new(
            "How does this compare to other solutions we're considering?",
            format!(
                "{product} stands out because of {}.",
                differentiators.unwrap_or(DIFFERENTIATORS)
            ),
            success.unwrap_or(
                "Our differentiated approach has helped customers achieve better results than \
                 alternatives.",
            ),
        ),
        ObjectionHandling::new(
            "We need to think about it and discuss internally.",
            "Absolutely, this is an important decision that deserves careful consideration.",
            "I can provide additional resources and references to help with your internal \
             discussions.",
        ),
    ];

    for (slot, known) in facts
        .product
        .known_objections()
        .into_iter()
        .take(MAX_KNOWN_OBJECTIONS)
        .enumerate()
    {
        items[slot] = ObjectionHandling::new(
            known,
            format!(
                "I understand your concern about {}. Let me address that directly.",
                known.to_lowercase()
            ),
            success.unwrap_or("We have proven results addressing this specific concern."),
        );
    }

    ObjectionHandlingSet::new(items)
}

/// The 13-touch, 16-day sequence.
pub fn synthesize_cadence(facts: &StageFacts) -> EmailCadence {
    let product = facts.fact(ProductField::ProductName, PRODUCT);
    let problem = facts.fact(ProductField::CoreProblem, CORE_PROBLEM);
    let challenges = facts.fact(ProductField::CustomerChallenges, CHALLENGES);
    let solution = facts.fact(ProductField::ProductSolution, SOLUTION);
    let differentiators = facts.fact(ProductField::Differentiators, DIFFERENTIATORS);
    let success = facts.fact(ProductField::SuccessStories, SUCCESS);
    let features = facts.features(3, ", ");

    let talk_track = facts
        .pitch
        .as_ref()
        .and_then(PitchStrategy::primary_talk_track)
        .map(String::from)
        .unwrap_or_else(|| {
            format!("{product} helps teams like yours solve {problem} so they can {solution}.")
        });
    let objection_reply = facts
        .objections
        .as_ref()
        .and_then(|set| set.response(0))
        .unwrap_or("Most teams are up and running quickly with our support.");

    let touches: [(u32, &str, String); 13] = [
        (
            1,
            "Email #1",
            format!(
                "**Subject:** {{{{first_name}}}}, a thought on {problem}\n\n\
                 Hi {{{{first_name}}}},\n\nMany teams at companies like {{{{company}}}} tell us \
                 {challenges} slow them down. {product} is built to {solution}.\n\n\
                 Worth a 15-minute conversation?\n\n{{{{my.first_name}}}}"
            ),
        ),
        (
            1,
            "LinkedIn Connect",
            format!(
                "Hi {{{{first_name}}}}, I work with teams tackling {problem}. \
                 Would love to connect."
            ),
        ),
        (
            1,
            "Call #1",
            format!(
                "Opener: {talk_track}\n\nVoicemail: Hi {{{{first_name}}}}, calling about \
                 {problem}. I'll follow up by email."
            ),
        ),
        (
            4,
            "Email #2",
            format!(
                "**Subject:** How teams handle {challenges}\n\nHi {{{{first_name}}}},\n\n\
                 Following up on my last note. Key capabilities that help: {features}.\n\n\
                 Open to a quick look?\n\n{{{{my.first_name}}}}"
            ),
        ),
        (
            5,
            "LinkedIn Message",
            format!(
                "Thanks for connecting, {{{{first_name}}}}. Curious how {{{{company}}}} is \
                 approaching {challenges} this quarter?"
            ),
        ),
        (
            5,
            "Call #2",
            format!(
                "Reference the email on {challenges}. Ask how they handle it today and \
                 what it costs them."
            ),
        ),
        (
            8,
            "Email #3",
            format!(
                "**Subject:** What makes {product} different\n\nHi {{{{first_name}}}},\n\n\
                 What sets us apart is {differentiators}. {success}.\n\n\
                 Would it make sense to compare notes?\n\n{{{{my.first_name}}}}"
            ),
        ),
        (
            8,
            "Call #3",
            format!(
                "Share the proof point: {success}. If they raise concerns: {objection_reply}"
            ),
        ),
        (
            12,
            "Email #4",
            format!(
                "**Subject:** Common question about {product}\n\nHi {{{{first_name}}}},\n\n\
                 A question we hear often is whether this is worth the effort. \
                 {objection_reply}\n\nHappy to walk through it.\n\n{{{{my.first_name}}}}"
            ),
        ),
        (
            12,
            "LinkedIn Follow-up",
            format!(
                "{{{{first_name}}}}, sharing a quick note on how teams use {product} to \
                 tackle {problem}. Worth a chat?"
            ),
        ),
        (
            12,
            "Call #4",
            format!(
                "Lead with the outcome: {solution}. Confirm whether {problem} is a priority \
                 this quarter."
            ),
        ),
        (
            16,
            "Email #5",
            format!(
                "**Subject:** Closing the loop\n\nHi {{{{first_name}}}},\n\n\
                 I haven't heard back, so I'll assume {problem} isn't a priority right now. \
                 If that changes, {product} is here to help.\n\n{{{{my.first_name}}}}"
            ),
        ),
        (
            16,
            "Call #5",
            format!(
                "Final attempt. Recap the value of {product} in one sentence and ask for \
                 a referral if the timing is wrong."
            ),
        ),
    ];

    let steps = touches
        .into_iter()
        .enumerate()
        .map(|(i, (day, touch, content))| {
            EmailCadenceStep::new(format!("Day {day}"), format!("Step {}", i + 1), touch, content)
        })
        .collect();

    EmailCadence::new(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pitch::PitchSection;

    fn acme() -> ProductInfo {
        ProductInfo::new()
            .with(ProductField::ProductName, "Acme Forecast")
            .with(ProductField::CoreProblem, "inaccurate revenue forecasts")
            .with(ProductField::KeyFeatures, "Deal scoring, Pipeline alerts, CRM sync")
            .with(ProductField::Objections, "Too Expensive, Data security")
    }

    #[test]
    fn test_pitch_from_sentinel_product_is_complete() {
        let pitch = synthesize_pitch(&StageFacts::default());

        assert_eq!(pitch.cold_call_starters.len(), 2);
        assert_eq!(pitch.talk_tracks.len(), 2);
        assert_eq!(pitch.talking_points.len(), 6);
        for section in PitchSection::ALL {
            for item in pitch.section(section) {
                assert!(!item.contains("Not specified"), "{item}");
            }
        }
        assert!(pitch.talk_tracks[0].contains(PRODUCT));
        assert!(pitch.talking_points[1].contains(FEATURES));
    }

    #[test]
    fn test_pitch_uses_facts() {
        let pitch = synthesize_pitch(&StageFacts::new(acme()));

        assert!(pitch.talk_tracks[0].contains("Acme Forecast"));
        assert!(pitch.cold_call_starters[1].contains("inaccurate revenue forecasts"));
        assert_eq!(
            pitch.talking_points[1],
            "Key features include: Deal scoring, Pipeline alerts, CRM sync"
        );
    }

    #[test]
    fn test_objections_replace_first_two_with_known() {
        let set = synthesize_objections(&StageFacts::new(acme()));

        assert_eq!(set.len(), 5);
        assert_eq!(set.objection_handling[0].objection, "Too Expensive");
        assert_eq!(
            set.objection_handling[0].response,
            "I understand your concern about too expensive. Let me address that directly."
        );
        assert_eq!(set.objection_handling[1].objection, "Data security");
        assert_eq!(
            set.objection_handling[2].objection,
            "We're concerned about implementation complexity."
        );
    }

    #[test]
    fn test_objections_from_sentinel_product() {
        let set = synthesize_objections(&StageFacts::default());

        assert_eq!(set.len(), 5);
        assert!(set.objection_handling[0].response.contains(FEATURES));
        assert!(set.iter().all(|o| !o.proof_point.is_empty()));
    }

    #[test]
    fn test_cadence_structure() {
        let cadence = synthesize_cadence(&StageFacts::default());

        assert_eq!(cadence.len(), 13);
        assert_eq!(cadence.first_out_of_order(), None);
        assert_eq!(cadence.emails().count(), 5);

        let days: Vec<_> = cadence
            .email_cadence
            .iter()
            .filter_map(|s| s.day_number())
            .collect();
        assert_eq!(days, vec![1, 1, 1, 4, 5, 5, 8, 8, 12, 12, 12, 16, 16]);
        assert_eq!(cadence.email_cadence[12].step, "Step 13");
        assert!(cadence.emails().all(|s| s.subject().is_some()));
    }

    #[test]
    fn test_cadence_uses_prior_artifacts() {
        let pitch = synthesize_pitch(&StageFacts::new(acme()));
        let objections = synthesize_objections(&StageFacts::new(acme()));
        let facts = StageFacts::new(acme())
            .with_pitch(pitch.clone())
            .with_objections(objections.clone());

        let cadence = synthesize_cadence(&facts);

        assert!(cadence.email_cadence[2].content.contains(&pitch.talk_tracks[0]));
        assert!(cadence.email_cadence[8]
            .content
            .contains(&objections.objection_handling[0].response));
        assert!(cadence.email_cadence[0].content.contains("{{first_name}}"));
    }
}
