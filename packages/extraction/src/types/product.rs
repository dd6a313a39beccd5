//! Product and buyer facts gathered by the analysis stages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ExtractionError;

/// Placeholder stored in any field the user or model did not fill in.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Values that count as "no fact" when substituting into templates.
const UNSPECIFIED_MARKERS: &[&str] = &[NOT_SPECIFIED, "Unable to determine", "N/A", "unknown"];

/// Structured facts about a product and its target buyer.
///
/// Every text field carries [`NOT_SPECIFIED`] rather than being absent, so
/// prompt assembly never interpolates a missing value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    #[serde(default = "not_specified", deserialize_with = "text_or_sentinel")]
    pub website: String,

    #[serde(default = "not_specified", deserialize_with = "text_or_sentinel")]
    pub product_name: String,

    #[serde(default = "not_specified", deserialize_with = "text_or_sentinel")]
    pub core_problem: String,

    /// Ordered feature list (accepts a comma-separated string on input)
    #[serde(default, deserialize_with = "list_or_text")]
    pub key_features: Vec<String>,

    #[serde(default = "not_specified", deserialize_with = "text_or_sentinel")]
    pub differentiators: String,

    #[serde(default = "not_specified", deserialize_with = "text_or_sentinel")]
    pub success_stories: String,

    #[serde(default = "not_specified", deserialize_with = "text_or_sentinel")]
    pub ideal_customer: String,

    #[serde(default = "not_specified", deserialize_with = "text_or_sentinel")]
    pub customer_challenges: String,

    #[serde(default = "not_specified", deserialize_with = "text_or_sentinel")]
    pub product_solution: String,

    #[serde(default = "not_specified", deserialize_with = "text_or_sentinel")]
    pub objections: String,
}

impl Default for ProductInfo {
    fn default() -> Self {
        Self {
            website: not_specified(),
            product_name: not_specified(),
            core_problem: not_specified(),
            key_features: Vec::new(),
            differentiators: not_specified(),
            success_stories: not_specified(),
            ideal_customer: not_specified(),
            customer_challenges: not_specified(),
            product_solution: not_specified(),
            objections: not_specified(),
        }
    }
}

impl ProductInfo {
    /// Create an all-sentinel record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an all-sentinel record that remembers where it came from.
    pub fn for_source(source: impl Into<String>) -> Self {
        let mut info = Self::default();
        info.set_field(ProductField::Website, &source.into());
        info
    }

    /// Builder-style field edit.
    pub fn with(mut self, field: ProductField, value: impl AsRef<str>) -> Self {
        self.set_field(field, value.as_ref());
        self
    }

    /// Replace exactly one field.
    ///
    /// `keyFeatures` is split on commas and newlines. A blank value resets
    /// the field to its sentinel.
    pub fn set_field(&mut self, field: ProductField, value: &str) {
        if field == ProductField::KeyFeatures {
            self.key_features = split_list(value);
            return;
        }

        let value = normalize_text(value);
        match field {
            ProductField::Website => self.website = value,
            ProductField::ProductName => self.product_name = value,
            ProductField::CoreProblem => self.core_problem = value,
            ProductField::Differentiators => self.differentiators = value,
            ProductField::SuccessStories => self.success_stories = value,
            ProductField::IdealCustomer => self.ideal_customer = value,
            ProductField::CustomerChallenges => self.customer_challenges = value,
            ProductField::ProductSolution => self.product_solution = value,
            ProductField::Objections => self.objections = value,
            ProductField::KeyFeatures => unreachable!("handled above"),
        }
    }

    /// Raw text of a field; `keyFeatures` is joined with ", ".
    pub fn field(&self, field: ProductField) -> String {
        match field {
            ProductField::Website => self.website.clone(),
            ProductField::ProductName => self.product_name.clone(),
            ProductField::CoreProblem => self.core_problem.clone(),
            ProductField::KeyFeatures => self.features_text(),
            ProductField::Differentiators => self.differentiators.clone(),
            ProductField::SuccessStories => self.success_stories.clone(),
            ProductField::IdealCustomer => self.ideal_customer.clone(),
            ProductField::CustomerChallenges => self.customer_challenges.clone(),
            ProductField::ProductSolution => self.product_solution.clone(),
            ProductField::Objections => self.objections.clone(),
        }
    }

    /// The field's value if it holds a real fact, `None` for placeholders.
    pub fn fact(&self, field: ProductField) -> Option<&str> {
        let value = match field {
            ProductField::Website => &self.website,
            ProductField::ProductName => &self.product_name,
            ProductField::CoreProblem => &self.core_problem,
            ProductField::KeyFeatures => return None,
            ProductField::Differentiators => &self.differentiators,
            ProductField::SuccessStories => &self.success_stories,
            ProductField::IdealCustomer => &self.ideal_customer,
            ProductField::CustomerChallenges => &self.customer_challenges,
            ProductField::ProductSolution => &self.product_solution,
            ProductField::Objections => &self.objections,
        };
        (!is_unspecified(value)).then_some(value.as_str())
    }

    /// The fact, or `placeholder` when the field is unspecified.
    pub fn fact_or<'a>(&'a self, field: ProductField, placeholder: &'a str) -> &'a str {
        self.fact(field).unwrap_or(placeholder)
    }

    /// Features that carry real content.
    pub fn features(&self) -> Vec<&str> {
        self.key_features
            .iter()
            .map(|f| f.trim())
            .filter(|f| !is_unspecified(f))
            .collect()
    }

    /// Features joined for prompts, or the sentinel when there are none.
    pub fn features_text(&self) -> String {
        let features = self.features();
        if features.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            features.join(", ")
        }
    }

    /// Known objections, split on commas.
    pub fn known_objections(&self) -> Vec<&str> {
        self.fact(ProductField::Objections)
            .map(|text| {
                text.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True when no field carries a real fact.
    pub fn is_empty(&self) -> bool {
        self.features().is_empty()
            && ProductField::ALL
                .iter()
                .all(|field| self.fact(*field).is_none())
    }
}

/// A single ProductInfo field, addressed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Website,
    ProductName,
    CoreProblem,
    KeyFeatures,
    Differentiators,
    SuccessStories,
    IdealCustomer,
    CustomerChallenges,
    ProductSolution,
    Objections,
}

impl ProductField {
    pub const ALL: [ProductField; 10] = [
        ProductField::Website,
        ProductField::ProductName,
        ProductField::CoreProblem,
        ProductField::KeyFeatures,
        ProductField::Differentiators,
        ProductField::SuccessStories,
        ProductField::IdealCustomer,
        ProductField::CustomerChallenges,
        ProductField::ProductSolution,
        ProductField::Objections,
    ];

    /// camelCase name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductField::Website => "website",
            ProductField::ProductName => "productName",
            ProductField::CoreProblem => "coreProblem",
            ProductField::KeyFeatures => "keyFeatures",
            ProductField::Differentiators => "differentiators",
            ProductField::SuccessStories => "successStories",
            ProductField::IdealCustomer => "idealCustomer",
            ProductField::CustomerChallenges => "customerChallenges",
            ProductField::ProductSolution => "productSolution",
            ProductField::Objections => "objections",
        }
    }

    /// Human label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            ProductField::Website => "Website",
            ProductField::ProductName => "Product Name",
            ProductField::CoreProblem => "Core Problem",
            ProductField::KeyFeatures => "Key Features",
            ProductField::Differentiators => "Differentiators",
            ProductField::SuccessStories => "Success Stories",
            ProductField::IdealCustomer => "Ideal Customer",
            ProductField::CustomerChallenges => "Customer Challenges",
            ProductField::ProductSolution => "Product Solution",
            ProductField::Objections => "Known Objections",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductField {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExtractionError::invalid_input(format!("unknown product field: {s}")))
    }
}

/// True for blank text and the known placeholder phrases.
pub fn is_unspecified(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || UNSPECIFIED_MARKERS
            .iter()
            .any(|marker| value.eq_ignore_ascii_case(marker))
}

fn not_specified() -> String {
    NOT_SPECIFIED.to_string()
}

fn normalize_text(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        not_specified()
    } else {
        value.to_string()
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', '\n'])
        .map(str::trim)
        .filter(|item| !is_unspecified(item))
        .map(String::from)
        .collect()
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => not_specified(),
        Value::String(s) => normalize_text(&s),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .into_iter()
                .map(value_to_text)
                .filter(|s| !is_unspecified(s))
                .collect();
            if parts.is_empty() {
                not_specified()
            } else {
                parts.join(", ")
            }
        }
        other => other.to_string(),
    }
}

fn text_or_sentinel<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

fn list_or_text<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(value_to_text)
            .filter(|s| !is_unspecified(s))
            .collect(),
        Value::String(s) => split_list(&s),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_sentinel() {
        let info: ProductInfo =
            serde_json::from_str(r#"{"productName": "Acme", "coreProblem": null}"#).unwrap();

        assert_eq!(info.product_name, "Acme");
        assert_eq!(info.core_problem, NOT_SPECIFIED);
        assert_eq!(info.ideal_customer, NOT_SPECIFIED);
        assert!(info.key_features.is_empty());
    }

    #[test]
    fn test_key_features_accepts_string() {
        let info: ProductInfo =
            serde_json::from_str(r#"{"keyFeatures": "Fast setup, SSO,  , Audit log"}"#).unwrap();
        assert_eq!(info.key_features, vec!["Fast setup", "SSO", "Audit log"]);
    }

    #[test]
    fn test_list_valued_text_field_is_joined() {
        let info: ProductInfo =
            serde_json::from_str(r#"{"objections": ["Price", "Integration effort"]}"#).unwrap();
        assert_eq!(info.objections, "Price, Integration effort");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(ProductInfo::new()).unwrap();
        assert!(json.get("productName").is_some());
        assert!(json.get("keyFeatures").unwrap().is_array());
        assert_eq!(json["customerChallenges"], NOT_SPECIFIED);
    }

    #[test]
    fn test_set_field_replaces_one_field() {
        let mut info = ProductInfo::new().with(ProductField::ProductName, "Acme");
        info.set_field(ProductField::CoreProblem, "slow onboarding");
        info.set_field(ProductField::ProductName, "   ");

        assert_eq!(info.core_problem, "slow onboarding");
        assert_eq!(info.product_name, NOT_SPECIFIED);
    }

    #[test]
    fn test_fact_hides_placeholders() {
        let info = ProductInfo::new()
            .with(ProductField::ProductName, "Acme")
            .with(ProductField::IdealCustomer, "Unable to determine");

        assert_eq!(info.fact(ProductField::ProductName), Some("Acme"));
        assert_eq!(info.fact(ProductField::IdealCustomer), None);
        assert_eq!(info.fact_or(ProductField::CoreProblem, "key challenges"), "key challenges");
    }

    #[test]
    fn test_known_objections() {
        let info = ProductInfo::new().with(ProductField::Objections, "Price, ROI timeline,");
        assert_eq!(info.known_objections(), vec!["Price", "ROI timeline"]);
        assert!(ProductInfo::new().known_objections().is_empty());
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!(
            "keyFeatures".parse::<ProductField>().unwrap(),
            ProductField::KeyFeatures
        );
        assert!("price".parse::<ProductField>().is_err());
    }

    #[test]
    fn test_is_empty() {
        assert!(ProductInfo::new().is_empty());
        assert!(!ProductInfo::for_source("https://acme.test").is_empty());
    }
}
