//! Shape validation for located JSON objects.
//!
//! Each artifact has a shape tag describing which keys must hold non-empty
//! lists and what the list elements look like. Validation is all or
//! nothing: a candidate either passes completely and is deserialized, or is
//! rejected with the first problem found.

use serde_json::{Map, Value};
use thiserror::Error;

use super::artifact::Artifact;
use crate::types::cadence::{day_number, first_day_out_of_order};
use crate::types::product::ProductField;

/// Allowed number of objection records in a finished set.
pub const OBJECTION_COUNT: std::ops::RangeInclusive<usize> = 3..=7;

/// Structural tag for an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactShape {
    PitchStrategy,
    ObjectionHandling,
    EmailCadence,
    ProductInfo,
}

/// One required list inside a shape.
struct ListRule {
    key: &'static str,
    /// Required string fields of each record; empty means a list of strings
    record_fields: &'static [&'static str],
    min_len: usize,
    max_len: Option<usize>,
}

const PITCH_RULES: &[ListRule] = &[
    ListRule {
        key: "coldCallStarters",
        record_fields: &[],
        min_len: 1,
        max_len: None,
    },
    ListRule {
        key: "talkTracks",
        record_fields: &[],
        min_len: 1,
        max_len: None,
    },
    ListRule {
        key: "talkingPoints",
        record_fields: &[],
        min_len: 1,
        max_len: None,
    },
];

const OBJECTION_RULES: &[ListRule] = &[ListRule {
    key: "objectionHandling",
    record_fields: &["objection", "response", "proofPoint"],
    min_len: *OBJECTION_COUNT.start(),
    max_len: Some(*OBJECTION_COUNT.end()),
}];

const CADENCE_RULES: &[ListRule] = &[ListRule {
    key: "emailCadence",
    record_fields: &["day", "step", "type", "content"],
    min_len: 1,
    max_len: None,
}];

impl ArtifactShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactShape::PitchStrategy => "pitch_strategy",
            ArtifactShape::ObjectionHandling => "objection_handling",
            ArtifactShape::EmailCadence => "email_cadence",
            ArtifactShape::ProductInfo => "product_info",
        }
    }

    fn rules(&self) -> &'static [ListRule] {
        match self {
            ArtifactShape::PitchStrategy => PITCH_RULES,
            ArtifactShape::ObjectionHandling => OBJECTION_RULES,
            ArtifactShape::EmailCadence => CADENCE_RULES,
            ArtifactShape::ProductInfo => &[],
        }
    }

    /// Check structure only, without deserializing.
    pub fn check(&self, value: &Value) -> Result<(), ShapeError> {
        let object = value.as_object().ok_or(ShapeError::NotAnObject)?;

        if *self == ArtifactShape::ProductInfo {
            let recognized = ProductField::ALL
                .iter()
                .any(|field| object.contains_key(field.as_str()));
            return if recognized {
                Ok(())
            } else {
                Err(ShapeError::NoRecognizedKeys)
            };
        }

        for rule in self.rules() {
            check_list(object, rule)?;
        }

        if *self == ArtifactShape::EmailCadence {
            check_day_order(object)?;
        }
        Ok(())
    }
}

/// Why a candidate object was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("candidate is not a JSON object")]
    NotAnObject,

    #[error("missing required key `{0}`")]
    MissingKey(&'static str),

    #[error("`{0}` is not a list")]
    NotAList(&'static str),

    #[error("`{0}` is empty")]
    EmptyList(&'static str),

    #[error("`{key}` has {len} items, outside the allowed range")]
    Count { key: &'static str, len: usize },

    #[error("`{key}[{index}]` {problem}")]
    BadElement {
        key: &'static str,
        index: usize,
        problem: String,
    },

    #[error("email cadence goes back in time at step {index}")]
    DaysOutOfOrder { index: usize },

    #[error("no recognized product fields")]
    NoRecognizedKeys,

    #[error("deserialization failed: {0}")]
    Deserialize(String),
}

/// Validate `value` against `A`'s shape and deserialize it.
pub fn validate_shape<A: Artifact>(value: Value) -> Result<A, ShapeError> {
    A::SHAPE.check(&value)?;
    serde_json::from_value(value).map_err(|e| ShapeError::Deserialize(e.to_string()))
}

fn check_list(object: &Map<String, Value>, rule: &ListRule) -> Result<(), ShapeError> {
    let items = object
        .get(rule.key)
        .ok_or(ShapeError::MissingKey(rule.key))?
        .as_array()
        .ok_or(ShapeError::NotAList(rule.key))?;

    if items.is_empty() {
        return Err(ShapeError::EmptyList(rule.key));
    }

    for (index, item) in items.iter().enumerate() {
        let bad = |problem: String| ShapeError::BadElement {
            key: rule.key,
            index,
            problem,
        };

        if rule.record_fields.is_empty() {
            if !item.is_string() {
                return Err(bad("is not a string".to_string()));
            }
            continue;
        }

        let record = item
            .as_object()
            .ok_or_else(|| bad("is not an object".to_string()))?;
        for field in rule.record_fields {
            match record.get(*field) {
                Some(Value::String(_)) => {}
                Some(_) => return Err(bad(format!("field `{field}` is not a string"))),
                None => return Err(bad(format!("is missing `{field}`"))),
            }
        }
    }

    let too_long = rule.max_len.is_some_and(|max| items.len() > max);
    if items.len() < rule.min_len || too_long {
        return Err(ShapeError::Count {
            key: rule.key,
            len: items.len(),
        });
    }

    Ok(())
}

fn check_day_order(object: &Map<String, Value>) -> Result<(), ShapeError> {
    let Some(steps) = object.get("emailCadence").and_then(Value::as_array) else {
        return Ok(());
    };

    let days = steps
        .iter()
        .map(|step| step.get("day").and_then(Value::as_str).and_then(day_number));
    match first_day_out_of_order(days) {
        Some(index) => Err(ShapeError::DaysOutOfOrder { index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::cadence::EmailCadence;
    use crate::types::objection::ObjectionHandlingSet;
    use crate::types::pitch::PitchStrategy;
    use crate::types::product::{ProductInfo, NOT_SPECIFIED};
    use serde_json::json;

    fn pitch_json() -> Value {
        json!({
            "coldCallStarters": ["Hi", "Hello"],
            "talkTracks": ["Track"],
            "talkingPoints": ["Point"]
        })
    }

    #[test]
    fn test_valid_pitch() {
        let strategy: PitchStrategy = validate_shape(pitch_json()).unwrap();
        assert_eq!(strategy.cold_call_starters.len(), 2);
    }

    #[test]
    fn test_missing_key() {
        let mut value = pitch_json();
        value.as_object_mut().unwrap().remove("talkTracks");

        assert_eq!(
            validate_shape::<PitchStrategy>(value).unwrap_err(),
            ShapeError::MissingKey("talkTracks")
        );
    }

    #[test]
    fn test_empty_list() {
        let mut value = pitch_json();
        value["talkingPoints"] = json!([]);

        assert_eq!(
            validate_shape::<PitchStrategy>(value).unwrap_err(),
            ShapeError::EmptyList("talkingPoints")
        );
    }

    #[test]
    fn test_non_list_and_bad_element() {
        let mut value = pitch_json();
        value["talkTracks"] = json!("one long track");
        assert_eq!(
            validate_shape::<PitchStrategy>(value).unwrap_err(),
            ShapeError::NotAList("talkTracks")
        );

        let mut value = pitch_json();
        value["coldCallStarters"] = json!(["ok", 3]);
        assert!(matches!(
            validate_shape::<PitchStrategy>(value).unwrap_err(),
            ShapeError::BadElement { index: 1, .. }
        ));
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(
            validate_shape::<PitchStrategy>(json!(["a"])).unwrap_err(),
            ShapeError::NotAnObject
        );
    }

    #[test]
    fn test_objection_record_fields() {
        let value = json!({
            "objectionHandling": [
                {"objection": "Price", "response": "Value", "proofPoint": "ROI"},
                {"objection": "Timing", "response": "Now"}
            ]
        });

        let err = validate_shape::<ObjectionHandlingSet>(value).unwrap_err();
        assert_eq!(err.to_string(), "`objectionHandling[1]` is missing `proofPoint`");
    }

    fn objections(count: usize) -> Value {
        let records: Vec<Value> = (0..count)
            .map(|i| json!({"objection": format!("Concern {i}"), "response": "Answer", "proofPoint": "Proof"}))
            .collect();
        json!({ "objectionHandling": records })
    }

    #[test]
    fn test_objection_count_bounds() {
        assert_eq!(
            validate_shape::<ObjectionHandlingSet>(objections(2)).unwrap_err(),
            ShapeError::Count {
                key: "objectionHandling",
                len: 2
            }
        );
        assert_eq!(
            validate_shape::<ObjectionHandlingSet>(objections(8)).unwrap_err(),
            ShapeError::Count {
                key: "objectionHandling",
                len: 8
            }
        );

        for count in [3, 5, 7] {
            let set: ObjectionHandlingSet = validate_shape(objections(count)).unwrap();
            assert_eq!(set.len(), count);
        }
    }

    #[test]
    fn test_cadence_order() {
        let step = |day: &str| json!({"day": day, "step": "Step", "type": "Email #1", "content": "x"});

        let ordered = json!({"emailCadence": [step("Day 1"), step("Day 1"), step("Day 4")]});
        assert!(validate_shape::<EmailCadence>(ordered).is_ok());

        let unordered = json!({"emailCadence": [step("Day 5"), step("Day 4")]});
        assert_eq!(
            validate_shape::<EmailCadence>(unordered).unwrap_err(),
            ShapeError::DaysOutOfOrder { index: 1 }
        );
    }

    #[test]
    fn test_product_info_needs_a_known_key() {
        let info: ProductInfo = validate_shape(json!({"productName": "Acme"})).unwrap();
        assert_eq!(info.product_name, "Acme");
        assert_eq!(info.core_problem, NOT_SPECIFIED);

        assert_eq!(
            validate_shape::<ProductInfo>(json!({"answer": "Acme"})).unwrap_err(),
            ShapeError::NoRecognizedKeys
        );
    }
}
