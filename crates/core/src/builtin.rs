//! Default templates shipped with the service.
//!
//! Written to `default/<id>.json` by the seeding step when provisioning a
//! fresh store. Once stored, the store copy is authoritative; this list is
//! never consulted at request time.

use crate::template::TemplateContent;

struct BuiltinTemplate {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    prompt: &'static str,
}

const BUILTIN_TEMPLATES: &[BuiltinTemplate] = &[
    BuiltinTemplate {
        id: "announcement",
        name: "Feature Announcement",
        description: "Create a prompt template for generating an exciting product announcement.",
        prompt: "Write a short, upbeat product announcement for this feature. Lead with the \
                 customer problem it solves, highlight the key benefits in two or three \
                 sentences, and close with a clear call to action. Keep it under 200 words.",
    },
    BuiltinTemplate {
        id: "blog",
        name: "Blog Post",
        description: "Create a prompt template for writing an educational, SEO-friendly blog post.",
        prompt: "Write an educational, SEO-friendly blog post about this feature. Use a \
                 descriptive title, an introduction that frames the problem, sections that \
                 walk through how the feature works and the real-world use case, and a \
                 conclusion with next steps. Use markdown subheadings (##) for sections.",
    },
    BuiltinTemplate {
        id: "newsletter",
        name: "Newsletter Snippet",
        description: "Create a prompt template to produce a short, engaging newsletter blurb.",
        prompt: "Write a two to three sentence newsletter blurb introducing this feature. \
                 Be friendly and concrete, mention the most important benefit, and end with \
                 a link placeholder such as [Learn more].",
    },
    BuiltinTemplate {
        id: "release_notes",
        name: "Release Notes",
        description: "Create a prompt template that summarizes a new feature with technical context and limitations.",
        prompt: "Write release notes for this feature. Include the release version and date \
                 when known, a one-paragraph summary, a bullet list of changes, how to enable \
                 it (mention the feature flag if there is one) and a Known Limitations section.",
    },
    BuiltinTemplate {
        id: "se_handover",
        name: "SE Handover",
        description: "Create a prompt template for generating a handover document to help sales engineers explain a feature.",
        prompt: "Write a handover document for sales engineers. Explain what the feature does \
                 in plain language, who it is for, the key talking points, a suggested demo \
                 flow, likely customer questions with answers, competitive positioning and \
                 known limitations to be upfront about.",
    },
    BuiltinTemplate {
        id: "tech_doc",
        name: "Technical Documentation",
        description: "Create a prompt template for writing developer-facing technical documentation.",
        prompt: "Write developer-facing technical documentation for this feature. Cover an \
                 overview, prerequisites, configuration (including any feature flag), a \
                 step-by-step usage guide with examples, and a limitations section. Use \
                 markdown subheadings (##) and code blocks where helpful.",
    },
];

/// The shipped default templates as `(id, content)` pairs.
pub fn builtin_templates() -> Vec<(String, TemplateContent)> {
    BUILTIN_TEMPLATES
        .iter()
        .map(|t| {
            (
                t.id.to_string(),
                TemplateContent {
                    name: t.name.to_string(),
                    description: t.description.to_string(),
                    prompt: t.prompt.to_string(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::validate_template_id;

    #[test]
    fn ids_are_valid_and_unique() {
        let templates = builtin_templates();
        assert_eq!(templates.len(), 6);
        let mut ids: Vec<_> = templates.iter().map(|(id, _)| id.as_str()).collect();
        for id in &ids {
            assert!(validate_template_id(id).is_ok(), "{id}");
        }
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn every_template_has_a_prompt() {
        assert!(builtin_templates()
            .iter()
            .all(|(_, c)| !c.name.is_empty() && !c.prompt.trim().is_empty()));
    }
}
