//! Objection handling artifact.

use serde::{Deserialize, Serialize};

/// One anticipated objection with its scripted response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectionHandling {
    pub objection: String,
    pub response: String,
    pub proof_point: String,
}

impl ObjectionHandling {
    pub fn new(
        objection: impl Into<String>,
        response: impl Into<String>,
        proof_point: impl Into<String>,
    ) -> Self {
        Self {
            objection: objection.into(),
            response: response.into(),
            proof_point: proof_point.into(),
        }
    }
}

/// Transport wrapper: `{ "objectionHandling": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectionHandlingSet {
    pub objection_handling: Vec<ObjectionHandling>,
}

impl ObjectionHandlingSet {
    pub fn new(items: Vec<ObjectionHandling>) -> Self {
        Self {
            objection_handling: items,
        }
    }

    pub fn len(&self) -> usize {
        self.objection_handling.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objection_handling.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectionHandling> {
        self.objection_handling.iter()
    }

    /// Response for the `n`th objection, if present.
    pub fn response(&self, n: usize) -> Option<&str> {
        self.objection_handling.get(n).map(|o| o.response.as_str())
    }
}

impl From<Vec<ObjectionHandling>> for ObjectionHandlingSet {
    fn from(items: Vec<ObjectionHandling>) -> Self {
        Self::new(items)
    }
}
