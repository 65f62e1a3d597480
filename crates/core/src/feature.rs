//! Feature metadata collected by the submission form.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of a feature name in characters.
pub const MAX_FEATURE_NAME_LENGTH: usize = 200;

/// Description of the software feature that content is generated for.
///
/// Optional fields are plain strings that default to empty; the prompt
/// builder substitutes explicit placeholders for empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureDetails {
    pub name: String,
    pub description: String,
    pub key_benefits: String,
    /// Feature flag name. Empty when the feature is not behind a flag.
    pub feature_flag: String,
    pub release_version: String,
    pub release_date: String,
    pub real_world_use_case: String,
    pub competitor_resources: String,
    pub known_limitations: String,
    pub demo_video_name: Option<String>,
}

impl FeatureDetails {
    /// Validate the required fields (`name`, `description`).
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Feature name must not be empty".to_string(),
            ));
        }
        if self.name.chars().count() > MAX_FEATURE_NAME_LENGTH {
            return Err(CoreError::Validation(format!(
                "Feature name exceeds maximum length of {MAX_FEATURE_NAME_LENGTH} characters"
            )));
        }
        if self.description.trim().is_empty() {
            return Err(CoreError::Validation(
                "Feature description must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// The team that submitted a feature. Purely informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamDetails {
    pub id: Option<String>,
    pub name: String,
    pub emails: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_fields_parse() {
        let json = r#"{
            "name": "Smart Rollback",
            "description": "Rolls back bad deploys",
            "keyBenefits": "Less downtime",
            "featureFlag": "SMART_ROLLBACK",
            "releaseVersion": "1.2.0",
            "releaseDate": "2025-06-01",
            "realWorldUseCase": "Friday deploys",
            "competitorResources": "",
            "knownLimitations": "Kubernetes only",
            "demoVideoName": null
        }"#;
        let f: FeatureDetails = serde_json::from_str(json).unwrap();
        assert_eq!(f.key_benefits, "Less downtime");
        assert_eq!(f.feature_flag, "SMART_ROLLBACK");
        assert_eq!(f.demo_video_name, None);
    }

    #[test]
    fn missing_optional_fields_default() {
        let f: FeatureDetails =
            serde_json::from_str(r#"{"name":"X","description":"Y"}"#).unwrap();
        assert!(f.key_benefits.is_empty());
        assert!(f.validate().is_ok());
    }

    #[test]
    fn validate_requires_name_and_description() {
        let mut f = FeatureDetails {
            name: "X".into(),
            description: "  ".into(),
            ..Default::default()
        };
        assert!(f.validate().is_err());
        f.description = "Y".into();
        f.name = String::new();
        assert!(f.validate().is_err());
    }

    #[test]
    fn team_emails_default_empty() {
        let t: TeamDetails = serde_json::from_str(r#"{"name":"DevRel"}"#).unwrap();
        assert!(t.emails.is_empty());
        assert_eq!(t.id, None);
    }
}
