//! Per-template markdown export of a submission.
//!
//! Convention: `{feature_slug}_{template_id}.md`, one file per template with
//! generated text. A template id appearing twice in one submission gets a
//! `-2`, `-3`, ... suffix so filenames never collide. The bulk archive is
//! named `{feature_slug}-submission.zip`.

use std::collections::HashSet;

use serde::Serialize;

use crate::sections::associate_sections;
use crate::slug::slug;
use crate::submission::{Submission, SubmissionOutputs};
use crate::template::validate_template_id;

/// Stem used when the feature name has no sluggable characters.
const FALLBACK_STEM: &str = "submission";

/// One downloadable markdown file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFile {
    /// Filename, e.g. `smart-rollback_blog.md`.
    pub name: String,
    /// Display title (template name).
    pub title: String,
    pub content: String,
}

fn feature_stem(feature_name: &str) -> String {
    let stem = slug(feature_name);
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

/// Filename for one template's export.
///
/// ```
/// use catapult_core::export::export_filename;
///
/// assert_eq!(export_filename("Smart Rollback", "blog"), "smart-rollback_blog.md");
/// ```
pub fn export_filename(feature_name: &str, template_id: &str) -> String {
    format!("{}_{}.md", feature_stem(feature_name), template_stem(template_id))
}

/// Stored records may predate id validation; anything that is not a valid
/// template id is slugged before it reaches a filename.
fn template_stem(template_id: &str) -> String {
    if validate_template_id(template_id).is_ok() {
        return template_id.to_string();
    }
    let stem = slug(template_id);
    if stem.is_empty() {
        "template".to_string()
    } else {
        stem
    }
}

/// Name of the bulk archive for a submission.
pub fn archive_name(feature_name: &str) -> String {
    format!("{}-submission.zip", feature_stem(feature_name))
}

/// Turn an id such as `release_notes` into `Release Notes`.
pub fn humanize_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut at_word_start = true;
    for c in id.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Hands out collision-free filenames within one submission.
struct FileNamer<'a> {
    feature_name: &'a str,
    used: HashSet<String>,
}

impl<'a> FileNamer<'a> {
    fn new(feature_name: &'a str) -> Self {
        Self {
            feature_name,
            used: HashSet::new(),
        }
    }

    fn next(&mut self, template_id: &str) -> String {
        let mut name = export_filename(self.feature_name, template_id);
        let mut n = 2;
        while self.used.contains(&name) {
            name = export_filename(self.feature_name, &format!("{template_id}-{n}"));
            n += 1;
        }
        self.used.insert(name.clone());
        name
    }
}

/// Build the downloadable files for a submission.
///
/// Per-template records yield one file per template with non-blank output,
/// content trimmed. Legacy combined records are split by section heading
/// first.
pub fn export_files(submission: &Submission) -> Vec<ExportFile> {
    let mut namer = FileNamer::new(&submission.feature.name);

    match &submission.outputs {
        SubmissionOutputs::PerTemplate(outputs) => outputs
            .iter()
            .filter_map(|o| {
                let text = o.generated_output.as_deref()?.trim();
                if text.is_empty() {
                    return None;
                }
                let title = if o.name.trim().is_empty() {
                    humanize_id(&o.id)
                } else {
                    o.name.trim().to_string()
                };
                Some(ExportFile {
                    name: namer.next(&o.id),
                    title,
                    content: text.to_string(),
                })
            })
            .collect(),
        SubmissionOutputs::Combined {
            templates,
            generated_output,
        } => associate_sections(generated_output, templates)
            .into_iter()
            .map(|section| ExportFile {
                name: namer.next(&section.template_id),
                content: section.content(),
                title: section.title,
            })
            .collect(),
    }
}
