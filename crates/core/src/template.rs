//! Content templates: the merge of shipped defaults with user overrides.
//!
//! A template id resolves to exactly one effective [`Template`]. When an
//! override exists for an id it shadows the default with the same id;
//! removing the override makes the default visible again. Ids that only
//! exist as overrides are custom templates.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::TemplateId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a template name in characters.
pub const MAX_TEMPLATE_NAME_LENGTH: usize = 200;

/// Maximum length of a template prompt in characters.
pub const MAX_TEMPLATE_PROMPT_LENGTH: usize = 20_000;

/// Template ids double as storage keys, so they are restricted to a
/// filename-safe alphabet. Shipped defaults use underscores (`release_notes`),
/// ids created from names use dashes.
static TEMPLATE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z0-9][a-z0-9_-]*$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Where the effective version of a template comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateOrigin {
    /// Shipped default, not edited.
    Default,
    /// A user edit shadowing a default with the same id.
    Override,
    /// A user-created template with no default counterpart.
    Custom,
}

/// The stored body of a template (`default/<id>.json`, `updated/<id>.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateContent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub prompt: String,
}

/// An effective template as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub prompt: String,
    pub origin: TemplateOrigin,
}

impl Template {
    pub fn from_content(
        id: impl Into<String>,
        content: TemplateContent,
        origin: TemplateOrigin,
    ) -> Self {
        Self {
            id: id.into(),
            name: content.name,
            description: content.description,
            prompt: content.prompt,
            origin,
        }
    }

    /// `true` for templates without a default to fall back to.
    pub fn is_custom(&self) -> bool {
        self.origin == TemplateOrigin::Custom
    }

    /// The storable body of this template.
    pub fn content(&self) -> TemplateContent {
        TemplateContent {
            name: self.name.clone(),
            description: self.description.clone(),
            prompt: self.prompt.clone(),
        }
    }
}

/// One record of the precomputed `latest-templates.json` snapshot.
///
/// `isCustom` is the historical field; `isOverride` was added later and
/// defaults to `false` for snapshots written before it existed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub prompt: String,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub is_override: bool,
}

impl From<&Template> for SnapshotEntry {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            description: t.description.clone(),
            prompt: t.prompt.clone(),
            is_custom: t.is_custom(),
            is_override: t.origin == TemplateOrigin::Override,
        }
    }
}

impl From<SnapshotEntry> for Template {
    fn from(e: SnapshotEntry) -> Self {
        let origin = if e.is_custom {
            TemplateOrigin::Custom
        } else if e.is_override {
            TemplateOrigin::Override
        } else {
            TemplateOrigin::Default
        };
        Self {
            id: e.id,
            name: e.name,
            description: e.description,
            prompt: e.prompt,
            origin,
        }
    }
}

/// Input for creating or overriding a template.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub prompt: String,
}

impl TemplateInput {
    /// Validate and normalise into a storable body.
    ///
    /// `name` and `prompt` are required; a missing description becomes empty.
    pub fn into_content(self) -> Result<TemplateContent, CoreError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "Template name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_TEMPLATE_NAME_LENGTH {
            return Err(CoreError::Validation(format!(
                "Template name exceeds maximum length of {MAX_TEMPLATE_NAME_LENGTH} characters"
            )));
        }
        if self.prompt.trim().is_empty() {
            return Err(CoreError::Validation(
                "Template prompt must not be empty".to_string(),
            ));
        }
        if self.prompt.chars().count() > MAX_TEMPLATE_PROMPT_LENGTH {
            return Err(CoreError::Validation(format!(
                "Template prompt exceeds maximum length of {MAX_TEMPLATE_PROMPT_LENGTH} characters"
            )));
        }
        Ok(TemplateContent {
            name,
            description: self.description.unwrap_or_default().trim().to_string(),
            prompt: self.prompt,
        })
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that `id` can be used as a template storage key.
pub fn validate_template_id(id: &str) -> Result<(), CoreError> {
    if TEMPLATE_ID_RE.is_match(id) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid template id '{id}'. Use lowercase letters, digits, '-' or '_'"
        )))
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merge defaults and overrides into the effective template list.
///
/// Every id that has a default comes first, in the order of `defaults`,
/// each shown as its override when one exists. Override-only (custom) ids
/// follow, sorted by id. Duplicate ids within one input keep the first
/// occurrence.
pub fn merge_templates(
    defaults: Vec<(TemplateId, TemplateContent)>,
    overrides: Vec<(TemplateId, TemplateContent)>,
) -> Vec<Template> {
    let mut override_map: BTreeMap<TemplateId, TemplateContent> = BTreeMap::new();
    for (id, content) in overrides {
        override_map.entry(id).or_insert(content);
    }

    let mut seen: HashSet<TemplateId> = HashSet::new();
    let mut merged = Vec::with_capacity(defaults.len() + override_map.len());

    for (id, default) in defaults {
        if !seen.insert(id.clone()) {
            continue;
        }
        let template = match override_map.remove(&id) {
            Some(edited) => Template::from_content(id, edited, TemplateOrigin::Override),
            None => Template::from_content(id, default, TemplateOrigin::Default),
        };
        merged.push(template);
    }

    // BTreeMap iteration gives the custom ids a stable, sorted order.
    for (id, content) in override_map {
        merged.push(Template::from_content(id, content, TemplateOrigin::Custom));
    }

    merged
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn content(name: &str, prompt: &str) -> TemplateContent {
        TemplateContent {
            name: name.to_string(),
            description: format!("{name} description"),
            prompt: prompt.to_string(),
        }
    }

    #[test]
    fn merge_defaults_only_keeps_order() {
        let merged = merge_templates(
            vec![
                ("blog".into(), content("Blog Post", "p1")),
                ("announcement".into(), content("Feature Announcement", "p2")),
            ],
            vec![],
        );
        let ids: Vec<_> = merged.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["blog", "announcement"]);
        assert!(merged.iter().all(|t| t.origin == TemplateOrigin::Default));
    }

    #[test]
    fn merge_override_shadows_default_in_place() {
        let merged = merge_templates(
            vec![
                ("blog".into(), content("Blog Post", "default prompt")),
                ("release_notes".into(), content("Release Notes", "rn")),
            ],
            vec![("blog".into(), content("Blog Post", "edited prompt"))],
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "blog");
        assert_eq!(merged[0].prompt, "edited prompt");
        assert_eq!(merged[0].origin, TemplateOrigin::Override);
        assert_eq!(merged[1].origin, TemplateOrigin::Default);
    }

    #[test]
    fn merge_customs_follow_defaults_sorted() {
        let merged = merge_templates(
            vec![("blog".into(), content("Blog Post", "p"))],
            vec![
                ("zeta".into(), content("Zeta", "z")),
                ("alpha".into(), content("Alpha", "a")),
            ],
        );
        let ids: Vec<_> = merged.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["blog", "alpha", "zeta"]);
        assert!(merged[1].is_custom());
        assert!(merged[2].is_custom());
    }

    #[test]
    fn merge_duplicate_ids_keep_first() {
        let merged = merge_templates(
            vec![
                ("blog".into(), content("Blog Post", "first")),
                ("blog".into(), content("Blog Post", "second")),
            ],
            vec![],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].prompt, "first");
    }

    #[test]
    fn snapshot_entry_roundtrips_origin() {
        for origin in [
            TemplateOrigin::Default,
            TemplateOrigin::Override,
            TemplateOrigin::Custom,
        ] {
            let t = Template::from_content("blog", content("Blog Post", "p"), origin);
            let entry = SnapshotEntry::from(&t);
            assert_eq!(Template::from(entry), t);
        }
    }

    #[test]
    fn snapshot_entry_without_override_flag_parses() {
        let json = r#"{"id":"blog","name":"Blog Post","description":"d","prompt":"p","isCustom":false}"#;
        let entry: SnapshotEntry = serde_json::from_str(json).unwrap();
        assert!(!entry.is_override);
        assert_eq!(Template::from(entry).origin, TemplateOrigin::Default);
    }

    #[test]
    fn content_without_description_parses() {
        let c: TemplateContent = serde_json::from_str(r#"{"name":"N","prompt":"P"}"#).unwrap();
        assert_eq!(c.description, "");
    }

    #[test]
    fn input_requires_name_and_prompt() {
        let missing_name = TemplateInput {
            name: "   ".into(),
            description: None,
            prompt: "p".into(),
        };
        assert_matches!(missing_name.into_content(), Err(CoreError::Validation(_)));

        let missing_prompt = TemplateInput {
            name: "Blog".into(),
            description: None,
            prompt: "\n".into(),
        };
        assert_matches!(missing_prompt.into_content(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn input_normalises_description() {
        let c = TemplateInput {
            name: " Blog ".into(),
            description: None,
            prompt: "Write it".into(),
        }
        .into_content()
        .unwrap();
        assert_eq!(c.name, "Blog");
        assert_eq!(c.description, "");
    }

    #[test]
    fn template_id_validation() {
        assert!(validate_template_id("release_notes").is_ok());
        assert!(validate_template_id("se-handover").is_ok());
        assert!(validate_template_id("blog2").is_ok());
        assert!(validate_template_id("").is_err());
        assert!(validate_template_id("../secret").is_err());
        assert!(validate_template_id("Blog").is_err());
        assert!(validate_template_id("a/b").is_err());
        assert!(validate_template_id("-leading").is_err());
    }
}
