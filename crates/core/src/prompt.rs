//! Construction of the instructions sent to the text-generation model.
//!
//! Every feature field is always present in the instruction. Empty values
//! are replaced by an explicit placeholder so prompts keep the same shape
//! regardless of how much of the form was filled in.

use std::fmt::Write as _;

use serde::Deserialize;

use crate::feature::FeatureDetails;
use crate::template::Template;

// ---------------------------------------------------------------------------
// Placeholders
// ---------------------------------------------------------------------------

pub const NOT_SPECIFIED: &str = "Not specified";
pub const NONE_PROVIDED: &str = "None provided";
pub const FLAG_NOT_ENABLED: &str = "Not enabled";
pub const NO_VIDEO: &str = "No video uploaded";

/// User message paired with the drafting system prompt.
pub const DRAFT_USER_MESSAGE: &str = "Create the prompt template now.";

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder
    } else {
        trimmed
    }
}

/// Render the feature metadata block shared by all generation prompts.
pub fn feature_summary(feature: &FeatureDetails) -> String {
    let demo = feature
        .demo_video_name
        .as_deref()
        .map(|name| or_placeholder(name, NO_VIDEO))
        .unwrap_or(NO_VIDEO);

    let lines = [
        ("Feature Name", feature.name.trim()),
        ("Feature Description", feature.description.trim()),
        ("Key Benefits", or_placeholder(&feature.key_benefits, NOT_SPECIFIED)),
        ("Feature Flag", or_placeholder(&feature.feature_flag, FLAG_NOT_ENABLED)),
        ("Release Version", or_placeholder(&feature.release_version, NOT_SPECIFIED)),
        ("Release Date", or_placeholder(&feature.release_date, NOT_SPECIFIED)),
        ("Real-world Use Case", or_placeholder(&feature.real_world_use_case, NOT_SPECIFIED)),
        ("Competitor Resources", or_placeholder(&feature.competitor_resources, NOT_SPECIFIED)),
        ("Known Limitations", or_placeholder(&feature.known_limitations, NONE_PROVIDED)),
        ("Demo Video", demo),
    ];
    lines
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the instruction for one template.
pub fn build_template_prompt(
    feature: &FeatureDetails,
    template: &Template,
    context: Option<&str>,
) -> String {
    let context = or_placeholder(context.unwrap_or_default(), NONE_PROVIDED);
    format!(
        "Generate content for a new feature with the following details:\n\n\
         {summary}\n\n\
         Content type: {name}\n\
         Template-specific instructions: {description}\n\n\
         {prompt}\n\n\
         Additional Context: {context}",
        summary = feature_summary(feature),
        name = template.name.trim(),
        description = or_placeholder(&template.description, NONE_PROVIDED),
        prompt = template.prompt.trim(),
    )
}

/// Build the single instruction used by the combined (legacy) mode.
///
/// The model is asked to emit one `# <template name>` heading per template so
/// the response can be split back into per-template sections.
pub fn build_combined_prompt(
    feature: &FeatureDetails,
    templates: &[Template],
    context: Option<&str>,
) -> String {
    let templates_text = templates
        .iter()
        .map(|t| format!("- {}: {}", t.name.trim(), t.description.trim()))
        .collect::<Vec<_>>()
        .join("\n");
    let context = or_placeholder(context.unwrap_or_default(), NONE_PROVIDED);
    format!(
        "Generate content for a new feature with the following details:\n\n\
         {summary}\n\n\
         Content should be generated for the following templates:\n\
         {templates_text}\n\n\
         Additional Context: {context}\n\n\
         Please format the output with clear headings for each template type, \
         using a top-level markdown heading (`# <template name>`) for each one.",
        summary = feature_summary(feature),
    )
}

// ---------------------------------------------------------------------------
// Template prompt drafting
// ---------------------------------------------------------------------------

/// Context for asking the model to draft a reusable template prompt.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateDraftRequest {
    pub name: String,
    pub description: String,
    pub feature_name: Option<String>,
    pub key_benefits: Option<String>,
    pub audience: Option<String>,
    pub is_beta: bool,
    pub release_date: Option<String>,
}

/// Build the system prompt for drafting a new template prompt.
///
/// Unlike generation prompts, absent context lines are left out entirely:
/// the model is writing a reusable prompt, not content for this feature.
pub fn build_draft_system_prompt(req: &TemplateDraftRequest) -> String {
    let mut out = String::from(
        "You are a helpful assistant that creates reusable AI prompt templates for content generation tools.\n\n\
         The user has filled out a form to describe a new feature and wants to generate content using the following context:\n\n",
    );
    let _ = writeln!(out, "- Template type: {}", req.name.trim());
    let _ = writeln!(out, "- Purpose: {}", req.description.trim());

    let optional = [
        ("Feature name", &req.feature_name),
        ("Key benefits", &req.key_benefits),
        ("Intended audience", &req.audience),
        ("Expected release date", &req.release_date),
    ];
    for (label, value) in optional {
        if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "- {label}: {v}");
        }
    }
    if req.is_beta {
        out.push_str("- Note: This feature is currently in beta.\n");
    }

    out.push_str(
        "\nWrite a single reusable prompt that guides an AI model to generate appropriate content based on this context.\n\
         Do not include any headers, labels, or metadata. Return only the raw prompt string itself.",
    );
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateOrigin;

    fn feature() -> FeatureDetails {
        FeatureDetails {
            name: "Smart Rollback".into(),
            description: "Automatically rolls back failed deployments".into(),
            ..Default::default()
        }
    }

    fn template(name: &str) -> Template {
        Template {
            id: "blog".into(),
            name: name.into(),
            description: "Write an SEO-friendly blog post".into(),
            prompt: "Write a blog post.".into(),
            origin: TemplateOrigin::Default,
        }
    }

    #[test]
    fn empty_fields_get_placeholders() {
        let summary = feature_summary(&feature());
        assert!(summary.contains("Key Benefits: Not specified"));
        assert!(summary.contains("Feature Flag: Not enabled"));
        assert!(summary.contains("Release Version: Not specified"));
        assert!(summary.contains("Release Date: Not specified"));
        assert!(summary.contains("Real-world Use Case: Not specified"));
        assert!(summary.contains("Competitor Resources: Not specified"));
        assert!(summary.contains("Known Limitations: None provided"));
        assert!(summary.contains("Demo Video: No video uploaded"));
    }

    #[test]
    fn filled_fields_are_used() {
        let mut f = feature();
        f.feature_flag = "SMART_ROLLBACK".into();
        f.demo_video_name = Some("demo.mp4".into());
        let summary = feature_summary(&f);
        assert!(summary.contains("Feature Flag: SMART_ROLLBACK"));
        assert!(summary.contains("Demo Video: demo.mp4"));
    }

    #[test]
    fn all_fields_always_present() {
        let summary = feature_summary(&FeatureDetails::default());
        assert_eq!(summary.lines().count(), 10);
    }

    #[test]
    fn template_prompt_includes_description_prompt_and_context() {
        let p = build_template_prompt(&feature(), &template("Blog Post"), Some("Target SREs"));
        assert!(p.contains("Content type: Blog Post"));
        assert!(p.contains("Template-specific instructions: Write an SEO-friendly blog post"));
        assert!(p.contains("Write a blog post."));
        assert!(p.contains("Additional Context: Target SREs"));
        assert!(p.contains("Feature Name: Smart Rollback"));
    }

    #[test]
    fn missing_context_gets_placeholder() {
        let p = build_template_prompt(&feature(), &template("Blog Post"), None);
        assert!(p.ends_with("Additional Context: None provided"));
        let p = build_template_prompt(&feature(), &template("Blog Post"), Some("  "));
        assert!(p.ends_with("Additional Context: None provided"));
    }

    #[test]
    fn combined_prompt_lists_every_template() {
        let p = build_combined_prompt(
            &feature(),
            &[template("Blog Post"), template("Release Notes")],
            None,
        );
        assert!(p.contains("- Blog Post: Write an SEO-friendly blog post"));
        assert!(p.contains("- Release Notes: Write an SEO-friendly blog post"));
        assert!(p.contains("# <template name>"));
    }

    #[test]
    fn draft_prompt_omits_absent_context() {
        let req = TemplateDraftRequest {
            name: "Webinar Invite".into(),
            description: "Invite customers to a webinar".into(),
            audience: Some("Platform engineers".into()),
            key_benefits: Some("   ".into()),
            ..Default::default()
        };
        let p = build_draft_system_prompt(&req);
        assert!(p.contains("- Template type: Webinar Invite"));
        assert!(p.contains("- Intended audience: Platform engineers"));
        assert!(!p.contains("Key benefits"));
        assert!(!p.contains("beta"));
    }

    #[test]
    fn draft_prompt_mentions_beta() {
        let req = TemplateDraftRequest {
            name: "Blog".into(),
            description: "d".into(),
            is_beta: true,
            ..Default::default()
        };
        assert!(build_draft_system_prompt(&req).contains("currently in beta"));
    }
}
