//! Splitting of legacy combined output into per-template sections.
//!
//! Older submissions stored every template's generated text in one string,
//! each part introduced by a top-level markdown heading. This module splits
//! that string on `# ` headings and associates every section with one of the
//! submission's templates by name.
//!
//! Matching order for a section heading:
//!
//! 1. case-insensitive equality with a template name (first declared wins);
//! 2. otherwise the template whose name is a case-insensitive substring of
//!    the heading. When several names match, the longest name wins, then
//!    declaration order. This keeps "Release Notes" from being claimed by a
//!    template called "Release".
//!
//! Sections that match nothing get the synthetic id `section-<n>` (1-based
//! position in the input) and keep their heading as the title.

use std::sync::LazyLock;

use regex::Regex;

use crate::submission::TemplateRef;
use crate::types::TemplateId;

/// A top-level ATX heading: one `#`, then whitespace or end of line.
static TOP_LEVEL_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[ \t]+(.*))?$").expect("valid regex"));

/// Prefix of ids assigned to sections that match no template.
pub const SYNTHETIC_ID_PREFIX: &str = "section-";

/// One raw section of combined output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Trimmed heading text.
    pub heading: String,
    /// Lines after the heading, joined and trimmed.
    pub body: String,
}

/// A section paired with the template it was attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociatedSection {
    pub template_id: TemplateId,
    /// Resolved template name, or the heading text when nothing matched.
    pub title: String,
    pub heading: String,
    pub body: String,
    /// `false` when the id is synthetic.
    pub matched: bool,
}

impl AssociatedSection {
    /// Heading and body reassembled as a standalone markdown document.
    pub fn content(&self) -> String {
        format!("# {}\n\n{}", self.heading, self.body)
    }
}

fn heading_text(line: &str) -> Option<&str> {
    TOP_LEVEL_HEADING
        .captures(line)
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()).trim())
}

fn join_body(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

/// Split combined output into sections on top-level headings.
///
/// Blank text before the first heading is discarded. Non-blank text before
/// the first heading becomes its own section, titled by its first line.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut preamble: Vec<&str> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(heading) = heading_text(line) {
            if let Some((heading, body)) = current.take() {
                sections.push(Section {
                    heading,
                    body: join_body(&body),
                });
            }
            current = Some((heading.to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        } else {
            preamble.push(line);
        }
    }

    if let Some((heading, body)) = current {
        sections.push(Section {
            heading,
            body: join_body(&body),
        });
    }

    if let Some(first) = preamble.iter().position(|l| !l.trim().is_empty()) {
        sections.insert(
            0,
            Section {
                heading: preamble[first].trim().to_string(),
                body: join_body(&preamble[first + 1..]),
            },
        );
    }

    sections
}

/// Find the template a section heading belongs to.
pub fn match_template<'a>(
    heading: &str,
    templates: &'a [TemplateRef],
) -> Option<&'a TemplateRef> {
    let heading = heading.trim().to_lowercase();
    let named = || {
        templates
            .iter()
            .map(|t| (t, t.name.trim().to_lowercase()))
            .filter(|(_, name)| !name.is_empty())
    };

    if let Some((t, _)) = named().find(|(_, name)| *name == heading) {
        return Some(t);
    }

    let mut best: Option<(&TemplateRef, usize)> = None;
    for (t, name) in named() {
        if !heading.contains(&name) {
            continue;
        }
        let len = name.chars().count();
        if best.map_or(true, |(_, best_len)| len > best_len) {
            best = Some((t, len));
        }
    }
    best.map(|(t, _)| t)
}

/// Split `combined` and attribute each section to one of `templates`.
pub fn associate_sections(
    combined: &str,
    templates: &[TemplateRef],
) -> Vec<AssociatedSection> {
    split_sections(combined)
        .into_iter()
        .enumerate()
        .map(|(index, section)| match match_template(&section.heading, templates) {
            Some(t) => AssociatedSection {
                template_id: t.id.clone(),
                title: t.name.trim().to_string(),
                heading: section.heading,
                body: section.body,
                matched: true,
            },
            None => {
                let title = if section.heading.is_empty() {
                    format!("Section {}", index + 1)
                } else {
                    section.heading.clone()
                };
                AssociatedSection {
                    template_id: format!("{SYNTHETIC_ID_PREFIX}{}", index + 1),
                    title,
                    heading: section.heading,
                    body: section.body,
                    matched: false,
                }
            }
        })
        .collect()
}
