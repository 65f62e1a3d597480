//! Slug generation for template ids and export filenames.
//!
//! A slug is the lowercase form of a human-readable name where every run of
//! characters outside `[a-z0-9]` collapses to a single `-`, with leading and
//! trailing dashes removed.

use std::sync::LazyLock;

use regex::Regex;

/// Matches one maximal run of characters that may not appear in a slug.
static NON_SLUG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("valid regex"));

/// Derive a slug from `name`.
///
/// # Examples
///
/// ```
/// use catapult_core::slug::slug;
///
/// assert_eq!(slug("SE Handover!"), "se-handover");
/// assert_eq!(slug("  multi   space "), "multi-space");
/// ```
pub fn slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_SLUG_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_is_dropped() {
        assert_eq!(slug("SE Handover!"), "se-handover");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(slug("  multi   space "), "multi-space");
    }

    #[test]
    fn mixed_separators_collapse_to_one_dash() {
        assert_eq!(slug("Release -- Notes / v2"), "release-notes-v2");
    }

    #[test]
    fn underscores_become_dashes() {
        assert_eq!(slug("release_notes"), "release-notes");
    }

    #[test]
    fn non_ascii_letters_are_separators() {
        assert_eq!(slug("Café Crème"), "caf-cr-me");
    }

    #[test]
    fn only_separators_yield_empty() {
        assert_eq!(slug("!!!  ---"), "");
        assert_eq!(slug(""), "");
    }

    #[test]
    fn idempotent() {
        for input in [
            "SE Handover!",
            "  multi   space ",
            "Blog Post",
            "--already-slugged--",
            "Tech Doc (v2.1)",
            "",
        ] {
            let once = slug(input);
            assert_eq!(slug(&once), once, "slug not idempotent for {input:?}");
        }
    }
}
