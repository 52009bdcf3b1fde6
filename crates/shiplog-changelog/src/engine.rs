use chrono::NaiveDate;

use crate::error::ChangelogError;

pub const CONVENTION_URL: &str = "http://keepachangelog.com/en/1.0.0/";

const DEFAULT_TEMPLATE: &str = "# Changelog
All notable changes to this project will be documented in this file.

The format is based on [Keep a Changelog](http://keepachangelog.com/en/1.0.0/)
and this project adheres to [Semantic Versioning](http://semver.org/spec/v2.0.0.html).

## Unreleased
";

/// The default changelog a release run leaves behind when no changelog
/// exists yet.
#[must_use]
pub fn new_changelog() -> &'static str {
    DEFAULT_TEMPLATE
}

/// The outcome of cutting a release from a changelog document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRelease {
    /// The rewritten document, ready to be persisted.
    pub text: String,
    /// The released section body, reused as the published release body.
    pub notes: String,
    /// True when the document had no dated section before this run.
    pub first_release: bool,
}

/// Byte span of the Unreleased section: from the start of its heading
/// line up to (not including) the next `## ` heading line, or to the
/// end of the document.
struct UnreleasedSpan {
    start: usize,
    end: usize,
}

/// Cuts a release from `text`: the Unreleased section becomes a dated
/// `## <tag> - <date>` section, a fresh empty `## [Unreleased]` block
/// is inserted above it, and the `[Unreleased]:` compare-link chain is
/// rewritten.
///
/// The transformation is a pure function of its inputs. It is not
/// idempotent on its own output by design: the rewritten document has
/// an empty Unreleased section, so running it again fails with
/// [`ChangelogError::EmptyUnreleasedSection`] until new changes are
/// documented.
///
/// # Errors
///
/// Returns [`ChangelogError::NoUnreleasedSection`] if no `## Unreleased`
/// heading exists, [`ChangelogError::EmptyUnreleasedSection`] if the
/// section has no `### ` category heading, and
/// [`ChangelogError::MissingUnreleasedLink`] if this is not the first
/// release and the document has no `[Unreleased]:` link-reference line.
pub fn apply_release(
    text: &str,
    new_tag: &str,
    old_tag: &str,
    repo_link: &str,
    date: NaiveDate,
) -> Result<AppliedRelease, ChangelogError> {
    let span = find_unreleased_span(text).ok_or(ChangelogError::NoUnreleasedSection)?;
    let section = &text[span.start..span.end];
    let first_release = span.end == text.len();

    if !section.lines().any(|line| line.starts_with("### ")) {
        return Err(ChangelogError::EmptyUnreleasedSection);
    }
    if !first_release && !has_unreleased_link(text) {
        return Err(ChangelogError::MissingUnreleasedLink);
    }

    let link_label = if first_release {
        new_tag.to_string()
    } else {
        format!("[{new_tag}]")
    };

    let body = section_body(section);
    let changed_text = format!("## {link_label} - {date}\n{body}");
    let changed_text = changed_text.trim();

    let changed_link = if first_release {
        String::new()
    } else {
        format!("{link_label}: {repo_link}/compare/{old_tag}...{new_tag}")
    };
    let unreleased_link = format!("[Unreleased]: {repo_link}/compare/{new_tag}...HEAD");

    let mut new_text = String::with_capacity(text.len() + changed_text.len() + 128);
    new_text.push_str(&text[..span.start]);
    new_text.push_str("## [Unreleased]\n\n");
    new_text.push_str(changed_text);
    new_text.push_str("\n\n");
    new_text.push_str(&text[span.end..]);

    if first_release {
        new_text.push_str(&unreleased_link);
        new_text.push('\n');
    } else {
        new_text = rewrite_unreleased_link(&new_text, &unreleased_link, &changed_link)?;
    }

    let notes = if changed_link.is_empty() {
        body.trim().to_string()
    } else {
        format!("{}\n\n{changed_link}", body.trim())
    };

    Ok(AppliedRelease {
        text: new_text,
        notes,
        first_release,
    })
}

fn is_unreleased_heading(line: &str) -> bool {
    line.strip_prefix("## ")
        .is_some_and(|rest| rest.starts_with("Unreleased") || rest.starts_with("[Unreleased]"))
}

fn find_unreleased_span(text: &str) -> Option<UnreleasedSpan> {
    let mut start = None;
    let mut pos = 0;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        match start {
            None => {
                if is_unreleased_heading(content) {
                    start = Some(pos);
                }
            }
            Some(start) => {
                // A `### ` category line does not start a new section;
                // the prefix check requires "## " followed by a space.
                if content.starts_with("## ") {
                    return Some(UnreleasedSpan { start, end: pos });
                }
            }
        }
        pos += line.len();
    }

    start.map(|start| UnreleasedSpan {
        start,
        end: text.len(),
    })
}

/// The section with its heading line removed.
fn section_body(section: &str) -> &str {
    match section.find('\n') {
        Some(newline) => &section[newline + 1..],
        None => "",
    }
}

fn has_unreleased_link(text: &str) -> bool {
    text.lines().any(|line| line.starts_with("[Unreleased]:"))
}

/// Replaces the first `[Unreleased]:` line with the new unreleased link
/// followed by the compare link for the version just cut.
fn rewrite_unreleased_link(
    text: &str,
    unreleased_link: &str,
    changed_link: &str,
) -> Result<String, ChangelogError> {
    let mut pos = 0;
    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        if content.starts_with("[Unreleased]:") {
            let mut rewritten = String::with_capacity(text.len() + changed_link.len() + 64);
            rewritten.push_str(&text[..pos]);
            rewritten.push_str(unreleased_link);
            rewritten.push('\n');
            rewritten.push_str(changed_link);
            rewritten.push_str(&line[content.len()..]);
            rewritten.push_str(&text[pos + line.len()..]);
            return Ok(rewritten);
        }
        pos += line.len();
    }

    // Validated before rewriting; only reachable if the inserted
    // section swallowed the link line, which a `## ` heading cannot do.
    Err(ChangelogError::MissingUnreleasedLink)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
    }

    const REPO: &str = "https://github.com/owner/repo";

    #[test]
    fn first_release_round_trip() {
        let doc = "## Unreleased\n### Added\n- x\n";

        let applied = apply_release(doc, "v1.0.0", "v0.0.0", REPO, date()).expect("apply");

        assert!(applied.first_release);
        assert!(applied.text.contains("## [Unreleased]\n"));
        assert!(applied.text.contains("## v1.0.0 - 2024-01-01\n### Added\n- x"));
        assert!(
            applied
                .text
                .ends_with("[Unreleased]: https://github.com/owner/repo/compare/v1.0.0...HEAD\n")
        );
        assert_eq!(applied.notes, "### Added\n- x");
    }

    #[test]
    fn subsequent_release_rewrites_link_chain() {
        let doc = "# Changelog\n\n\
            ## [Unreleased]\n\n### Fixed\n- y\n\n\
            ## [v1.0.0] - 2023-06-01\n\n### Added\n- x\n\n\
            [Unreleased]: https://github.com/owner/repo/compare/v1.0.0...HEAD\n\
            [v1.0.0]: https://github.com/owner/repo/releases/tag/v1.0.0\n";

        let applied = apply_release(doc, "v1.1.0", "v1.0.0", REPO, date()).expect("apply");

        assert!(!applied.first_release);
        assert!(applied.text.contains("## [v1.1.0] - 2024-01-01\n\n### Fixed\n- y"));
        assert!(applied.text.contains(
            "[Unreleased]: https://github.com/owner/repo/compare/v1.1.0...HEAD\n\
             [v1.1.0]: https://github.com/owner/repo/compare/v1.0.0...v1.1.0\n"
        ));
        // The stale unreleased link is gone.
        assert!(!applied.text.contains("compare/v1.0.0...HEAD"));
        assert_eq!(
            applied.notes,
            "### Fixed\n- y\n\n[v1.1.0]: https://github.com/owner/repo/compare/v1.0.0...v1.1.0"
        );
    }

    #[test]
    fn fresh_unreleased_section_precedes_released_one() {
        let doc = "# Changelog\n\n## Unreleased\n\n### Added\n- x\n";

        let applied = apply_release(doc, "v1.0.0", "v0.0.0", REPO, date()).expect("apply");

        let unreleased = applied.text.find("## [Unreleased]").expect("unreleased heading");
        let released = applied.text.find("## v1.0.0").expect("released heading");
        assert!(unreleased < released);
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let doc = "# Changelog\n\n## Unreleased\n\n### Changed\n- z\n";

        let first = apply_release(doc, "v2.0.0", "v1.0.0", REPO, date()).expect("apply");
        let second = apply_release(doc, "v2.0.0", "v1.0.0", REPO, date()).expect("apply");

        assert_eq!(first, second);
    }

    #[test]
    fn rerunning_on_own_output_fails() {
        let doc = "## Unreleased\n### Added\n- x\n";
        let applied = apply_release(doc, "v1.0.0", "v0.0.0", REPO, date()).expect("apply");

        let rerun = apply_release(&applied.text, "v1.1.0", "v1.0.0", REPO, date());
        assert!(matches!(rerun, Err(ChangelogError::EmptyUnreleasedSection)));
    }

    #[test]
    fn missing_unreleased_heading() {
        let doc = "# Changelog\n\n## [1.0.0] - 2023-01-01\n\n### Added\n- x\n";
        let result = apply_release(doc, "v1.1.0", "v1.0.0", REPO, date());
        assert!(matches!(result, Err(ChangelogError::NoUnreleasedSection)));
    }

    #[test]
    fn unreleased_section_without_categories() {
        let doc = "# Changelog\n\n## Unreleased\n\nnothing here yet\n";
        let result = apply_release(doc, "v1.0.0", "v0.0.0", REPO, date());
        assert!(matches!(result, Err(ChangelogError::EmptyUnreleasedSection)));
    }

    #[test]
    fn subsequent_release_requires_link_line() {
        let doc = "## Unreleased\n### Fixed\n- y\n\n## [1.0.0] - 2023-01-01\n\n### Added\n- x\n";
        let result = apply_release(doc, "v1.1.0", "v1.0.0", REPO, date());
        assert!(matches!(result, Err(ChangelogError::MissingUnreleasedLink)));
    }

    #[test]
    fn bracketed_unreleased_heading_is_accepted() {
        let doc = "## [Unreleased]\n### Added\n- x\n";
        let applied = apply_release(doc, "v1.0.0", "v0.0.0", REPO, date()).expect("apply");
        assert!(applied.first_release);
    }

    #[test]
    fn category_heading_never_terminates_the_section() {
        // A `###` line before any later `##` heading must stay inside
        // the Unreleased span.
        let doc = "## Unreleased\n### Added\n- x\n### Fixed\n- y\n\n\
            ## [1.0.0] - 2023-01-01\n\n### Added\n- z\n\n\
            [Unreleased]: https://github.com/owner/repo/compare/v1.0.0...HEAD\n";

        let applied = apply_release(doc, "v1.1.0", "v1.0.0", REPO, date()).expect("apply");
        assert!(applied.notes.starts_with("### Added\n- x\n### Fixed\n- y"));
    }

    #[test]
    fn preserves_document_prefix() {
        let doc = "# Changelog\nAll notable changes.\n\n## Unreleased\n### Added\n- x\n";
        let applied = apply_release(doc, "v1.0.0", "v0.0.0", REPO, date()).expect("apply");
        assert!(applied.text.starts_with("# Changelog\nAll notable changes.\n\n## [Unreleased]\n"));
    }

    #[test]
    fn default_template_is_releasable_once_populated() {
        let doc = format!("{}### Added\n- something\n", new_changelog());
        let applied = apply_release(&doc, "v0.1.0", "v0.0.0", REPO, date()).expect("apply");
        assert!(applied.first_release);
        assert_eq!(applied.notes, "### Added\n- something");
    }

    #[test]
    fn default_template_alone_has_nothing_to_release() {
        let result = apply_release(new_changelog(), "v0.1.0", "v0.0.0", REPO, date());
        assert!(matches!(result, Err(ChangelogError::EmptyUnreleasedSection)));
    }
}
