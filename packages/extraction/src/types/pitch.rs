//! Pitch strategy artifact.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};

/// Cold call openers, talk tracks and talking points for one product.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchStrategy {
    /// Two expected
    pub cold_call_starters: Vec<String>,

    /// Two expected
    pub talk_tracks: Vec<String>,

    /// Five to seven expected
    pub talking_points: Vec<String>,
}

/// One list inside a [`PitchStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchSection {
    ColdCallStarters,
    TalkTracks,
    TalkingPoints,
}

impl PitchSection {
    pub const ALL: [PitchSection; 3] = [
        PitchSection::ColdCallStarters,
        PitchSection::TalkTracks,
        PitchSection::TalkingPoints,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PitchSection::ColdCallStarters => "coldCallStarters",
            PitchSection::TalkTracks => "talkTracks",
            PitchSection::TalkingPoints => "talkingPoints",
        }
    }
}

impl fmt::Display for PitchSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PitchSection {
    type Err = ExtractionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PitchSection::ALL
            .iter()
            .copied()
            .find(|section| section.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExtractionError::invalid_input(format!("unknown pitch section: {s}")))
    }
}

impl PitchStrategy {
    pub fn section(&self, section: PitchSection) -> &[String] {
        match section {
            PitchSection::ColdCallStarters => &self.cold_call_starters,
            PitchSection::TalkTracks => &self.talk_tracks,
            PitchSection::TalkingPoints => &self.talking_points,
        }
    }

    fn section_mut(&mut self, section: PitchSection) -> &mut Vec<String> {
        match section {
            PitchSection::ColdCallStarters => &mut self.cold_call_starters,
            PitchSection::TalkTracks => &mut self.talk_tracks,
            PitchSection::TalkingPoints => &mut self.talking_points,
        }
    }

    /// Replace a single list item in place (direct user edit).
    pub fn replace_item(&mut self, section: PitchSection, index: usize, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractionError::invalid_input(format!(
                "{section} item cannot be empty"
            )));
        }

        let items = self.section_mut(section);
        let len = items.len();
        let slot = items.get_mut(index).ok_or_else(|| {
            ExtractionError::invalid_input(format!(
                "{section} has {len} items, index {index} is out of range"
            ))
        })?;
        *slot = text.to_string();
        Ok(())
    }

    /// First talk track, used to seed the email cadence.
    pub fn primary_talk_track(&self) -> Option<&str> {
        self.talk_tracks.first().map(String::as_str)
    }

    /// True when every section has at least one item.
    pub fn is_complete(&self) -> bool {
        PitchSection::ALL
            .iter()
            .all(|section| !self.section(*section).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PitchStrategy {
        PitchStrategy {
            cold_call_starters: vec!["Hi".into(), "Hello".into()],
            talk_tracks: vec!["Track one".into(), "Track two".into()],
            talking_points: vec!["Point".into()],
        }
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["coldCallStarters"][0], "Hi");
        assert_eq!(json["talkTracks"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_replace_item() {
        let mut strategy = sample();
        strategy
            .replace_item(PitchSection::TalkTracks, 1, "  Better track ")
            .unwrap();
        assert_eq!(strategy.talk_tracks[1], "Better track");
    }

    #[test]
    fn test_replace_item_rejects_out_of_range() {
        let mut strategy = sample();
        let err = strategy
            .replace_item(PitchSection::TalkingPoints, 3, "New")
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_replace_item_rejects_blank() {
        let mut strategy = sample();
        assert!(strategy
            .replace_item(PitchSection::ColdCallStarters, 0, " ")
            .is_err());
        assert_eq!(strategy.cold_call_starters[0], "Hi");
    }

    #[test]
    fn test_is_complete() {
        assert!(sample().is_complete());
        assert!(!PitchStrategy::default().is_complete());
    }
}
