//! Email cadence artifact.

use serde::{Deserialize, Serialize};

/// One touch in the multi-day outreach sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCadenceStep {
    /// Label such as "Day 1"
    pub day: String,

    /// Position label such as "Step 1"
    pub step: String,

    /// Touch label such as "Email #1" or "LinkedIn Connect"
    #[serde(rename = "type")]
    pub step_type: String,

    /// Body, may start with a "Subject: ..." line
    pub content: String,
}

impl EmailCadenceStep {
    pub fn new(
        day: impl Into<String>,
        step: impl Into<String>,
        step_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            day: day.into(),
            step: step.into(),
            step_type: step_type.into(),
            content: content.into(),
        }
    }

    /// Numeric day parsed from the label ("Day 12" → 12).
    pub fn day_number(&self) -> Option<u32> {
        day_number(&self.day)
    }

    /// True for email touches ("Email #2", "Email #1 with POV").
    pub fn is_email(&self) -> bool {
        self.step_type
            .trim()
            .get(..5)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("email"))
    }

    /// Subject line embedded in the content, if any.
    pub fn subject(&self) -> Option<&str> {
        self.content.lines().find_map(|line| {
            let line = line.trim().trim_start_matches('*').trim_start();
            line.strip_prefix("Subject:")
                .map(|rest| rest.trim_matches(|c: char| c == '*' || c.is_whitespace()))
        })
    }
}

/// First run of digits in a day label ("Day 12" → 12).
pub fn day_number(label: &str) -> Option<u32> {
    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Index of the first day lower than the last parsed day before it.
/// `None` entries are skipped.
pub fn first_day_out_of_order(days: impl IntoIterator<Item = Option<u32>>) -> Option<usize> {
    let mut last = 0u32;
    for (index, day) in days.into_iter().enumerate() {
        if let Some(day) = day {
            if day < last {
                return Some(index);
            }
            last = day;
        }
    }
    None
}

/// Transport wrapper: `{ "emailCadence": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailCadence {
    pub email_cadence: Vec<EmailCadenceStep>,
}

impl EmailCadence {
    pub fn new(steps: Vec<EmailCadenceStep>) -> Self {
        Self {
            email_cadence: steps,
        }
    }

    pub fn len(&self) -> usize {
        self.email_cadence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.email_cadence.is_empty()
    }

    /// Index of the first step whose day number is lower than its predecessor's.
    ///
    /// Steps without a parseable day are skipped.
    pub fn first_out_of_order(&self) -> Option<usize> {
        first_day_out_of_order(self.email_cadence.iter().map(EmailCadenceStep::day_number))
    }

    /// Email touches only.
    pub fn emails(&self) -> impl Iterator<Item = &EmailCadenceStep> {
        self.email_cadence.iter().filter(|s| s.is_email())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_field_rename() {
        let step: EmailCadenceStep = serde_json::from_str(
            r#"{"day": "Day 4", "step": "Step 4", "type": "Email #2", "content": "Hi"}"#,
        )
        .unwrap();
        assert_eq!(step.step_type, "Email #2");
        assert_eq!(step.day_number(), Some(4));
        assert!(step.is_email());
    }

    #[test]
    fn test_subject_extraction() {
        let step = EmailCadenceStep::new(
            "Day 1",
            "Step 1",
            "Email #1",
            "**Subject: Quick question about onboarding**\n\nHi there,",
        );
        assert_eq!(step.subject(), Some("Quick question about onboarding"));

        let labelled = EmailCadenceStep::new(
            "Day 4",
            "Step 4",
            "Email #2",
            "**Subject:** {{first_name}}, one idea\n**Body:** Hi {{first_name}}",
        );
        assert_eq!(labelled.subject(), Some("{{first_name}}, one idea"));

        let call = EmailCadenceStep::new("Day 1", "Step 3", "Call #1", "Ask about goals");
        assert_eq!(call.subject(), None);
    }

    #[test]
    fn test_first_out_of_order() {
        let ordered = EmailCadence::new(vec![
            EmailCadenceStep::new("Day 1", "Step 1", "Email #1", "a"),
            EmailCadenceStep::new("Day 1", "Step 2", "Call #1", "b"),
            EmailCadenceStep::new("Day 4", "Step 3", "Email #2", "c"),
        ]);
        assert_eq!(ordered.first_out_of_order(), None);

        let unordered = EmailCadence::new(vec![
            EmailCadenceStep::new("Day 8", "Step 1", "Email #3", "a"),
            EmailCadenceStep::new("Day 4", "Step 2", "Email #2", "b"),
        ]);
        assert_eq!(unordered.first_out_of_order(), Some(1));
    }

    #[test]
    fn test_day_labels() {
        assert_eq!(day_number("Day 12"), Some(12));
        assert_eq!(day_number("day 3 (morning)"), Some(3));
        assert_eq!(day_number("Kickoff"), None);

        let days = ["Day 2", "Kickoff", "Day 1"].map(day_number);
        assert_eq!(first_day_out_of_order(days), Some(2));
    }

    #[test]
    fn test_emails() {
        let cadence = EmailCadence::new(vec![
            EmailCadenceStep::new("Day 1", "Step 1", "Email #1 with POV", "a"),
            EmailCadenceStep::new("Day 1", "Step 2", "LinkedIn Connect", "b"),
            EmailCadenceStep::new("Day 1", "Step 3", "Call #1", "c"),
        ]);
        assert_eq!(cadence.emails().count(), 1);
    }
}
