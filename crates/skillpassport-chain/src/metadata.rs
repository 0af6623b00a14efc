//! NFT metadata templating.
//!
//! Templates are JSON objects whose string values may contain the
//! placeholders `{credential_name}`, `{learner_name}`, `{issue_date}` and
//! `{blockchain_network}`.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::ChainError;

/// Template used when none is configured.
pub const DEFAULT_METADATA_TEMPLATE: &str = r#"{
    "name": "{credential_name} Issued to {learner_name}",
    "description": "This NFT certifies the achievement of {credential_name} by {learner_name} on {issue_date}. Verified on {blockchain_network}.",
    "image": "https://example.com/skillpassport/nft_badge_template.png"
}"#;

/// Formats a timestamp the way issue dates are shown to people.
pub fn format_issue_date(at: DateTime<Utc>) -> String {
    at.format("%A, %-d %B %Y, %-I:%M %p").to_string()
}

/// Values substituted into a template.
#[derive(Debug, Clone)]
pub struct MetadataFields {
    pub credential_name: String,
    pub learner_name: String,
    pub issue_date: String,
    pub blockchain_network: String,
}

impl MetadataFields {
    fn replacements(&self) -> [(&'static str, &str); 4] {
        [
            ("{credential_name}", self.credential_name.as_str()),
            ("{learner_name}", self.learner_name.as_str()),
            ("{issue_date}", self.issue_date.as_str()),
            ("{blockchain_network}", self.blockchain_network.as_str()),
        ]
    }
}

/// A parsed metadata template.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataTemplate {
    root: Map<String, Value>,
}

impl MetadataTemplate {
    /// Parses a template. The root must be a JSON object.
    pub fn parse(template: &str) -> Result<Self, ChainError> {
        let value: Value = serde_json::from_str(template)
            .map_err(|e| ChainError::InvalidTemplate(e.to_string()))?;
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(ChainError::InvalidTemplate(
                "template must be a JSON object".to_string(),
            )),
        }
    }

    /// Substitutes every placeholder in every string value, at any depth.
    pub fn render(&self, fields: &MetadataFields) -> Value {
        let replacements = fields.replacements();
        let mut root = Value::Object(self.root.clone());
        substitute(&mut root, &replacements);
        root
    }
}

impl Default for MetadataTemplate {
    fn default() -> Self {
        match Self::parse(DEFAULT_METADATA_TEMPLATE) {
            Ok(template) => template,
            Err(_) => Self { root: Map::new() },
        }
    }
}

fn substitute(value: &mut Value, replacements: &[(&str, &str)]) {
    match value {
        Value::String(s) => {
            for (placeholder, replacement) in replacements {
                if s.contains(placeholder) {
                    *s = s.replace(placeholder, replacement);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|v| substitute(v, replacements)),
        Value::Object(map) => map.values_mut().for_each(|v| substitute(v, replacements)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fields() -> MetadataFields {
        MetadataFields {
            credential_name: "Rust Fundamentals".to_string(),
            learner_name: "Ada Lovelace".to_string(),
            issue_date: "Friday, 15 November 2024, 9:30 AM".to_string(),
            blockchain_network: "ethereum_sepolia".to_string(),
        }
    }

    #[test]
    fn test_default_template_renders() {
        let rendered = MetadataTemplate::default().render(&fields());
        assert_eq!(rendered["name"], "Rust Fundamentals Issued to Ada Lovelace");
        let description = rendered["description"].as_str().unwrap();
        assert!(description.contains("by Ada Lovelace on Friday, 15 November 2024, 9:30 AM"));
        assert!(description.ends_with("Verified on ethereum_sepolia."));
        assert_eq!(
            rendered["image"],
            "https://example.com/skillpassport/nft_badge_template.png"
        );
    }

    #[test]
    fn test_nested_strings_and_non_strings() {
        let template = MetadataTemplate::parse(
            r#"{"attributes": [{"trait_type": "Learner", "value": "{learner_name}"}],
                "edition": 1, "public": true, "{learner_name}": "key untouched"}"#,
        )
        .unwrap();
        let rendered = template.render(&fields());
        assert_eq!(rendered["attributes"][0]["value"], "Ada Lovelace");
        assert_eq!(rendered["edition"], 1);
        assert_eq!(rendered["public"], true);
        assert_eq!(rendered["{learner_name}"], "key untouched");
    }

    #[test]
    fn test_rejects_non_object_template() {
        assert!(MetadataTemplate::parse("[1, 2]").is_err());
        assert!(MetadataTemplate::parse("\"name\"").is_err());
        let err = MetadataTemplate::parse("{not json").unwrap_err();
        assert!(err.to_string().contains("Invalid metadata template"));
    }

    #[test]
    fn test_format_issue_date() {
        let at = Utc.with_ymd_and_hms(2024, 11, 15, 21, 5, 0).unwrap();
        assert_eq!(format_issue_date(at), "Friday, 15 November 2024, 9:05 PM");
    }
}
