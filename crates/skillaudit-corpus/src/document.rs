//! Skill document parsing
//!
//! A skill document is markdown with an optional leading metadata block of
//! flat `key: value` lines:
//!
//! ```text
//! ---
//! name: code-reviewer
//! description: Reviews code for best practices and security.
//! ---
//!
//! ## What I do
//! ...
//! ```

use skillaudit_types::{Degradation, Metadata, SectionLabel, SkillDocument};
use std::collections::BTreeMap;
use std::path::Path;

/// Line opening and closing the metadata block
const METADATA_MARKER: &str = "---";
/// Fenced code block delimiter
const FENCE: &str = "```";

enum MetadataBlock<'a> {
    Absent,
    Unterminated,
    Present {
        /// (1-based line number, line text)
        lines: Vec<(usize, &'a str)>,
        body: &'a str,
    },
}

/// Parse the raw text of one document
///
/// Never fails: structural problems come back as degradations and the
/// affected fields stay empty.
pub fn parse_document(id: &str, path: &Path, raw: String) -> (SkillDocument, Vec<Degradation>) {
    let mut degradations = Vec::new();

    let (metadata, sections) = {
        let (metadata, body) = match split_metadata(&raw) {
            MetadataBlock::Present { lines, body } => {
                (parse_metadata(&lines, &mut degradations), body)
            }
            MetadataBlock::Absent => {
                degradations.push(Degradation::MissingMetadata);
                (Metadata::default(), raw.as_str())
            }
            MetadataBlock::Unterminated => {
                degradations.push(Degradation::UnterminatedMetadata);
                (Metadata::default(), raw.as_str())
            }
        };
        (metadata, extract_sections(body))
    };

    for section in SectionLabel::EXPECTED {
        if !sections.contains_key(&section) {
            degradations.push(Degradation::MissingSection { section });
        }
    }

    let mut document = SkillDocument::new(id, path, raw);
    document.metadata = metadata;
    document.sections = sections;

    (document, degradations)
}

fn split_metadata(content: &str) -> MetadataBlock<'_> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return MetadataBlock::Absent;
    };
    if first.trim() != METADATA_MARKER {
        return MetadataBlock::Absent;
    }

    let mut offset = first.len();
    let mut block = Vec::new();

    for (index, line) in lines.enumerate() {
        if line.trim() == METADATA_MARKER {
            return MetadataBlock::Present {
                lines: block,
                body: &content[offset + line.len()..],
            };
        }
        block.push((index + 2, line.trim_end_matches(|c: char| c == '\r' || c == '\n')));
        offset += line.len();
    }

    MetadataBlock::Unterminated
}

fn parse_metadata(lines: &[(usize, &str)], degradations: &mut Vec<Degradation>) -> Metadata {
    let mut metadata = Metadata::default();

    for &(line, text) in lines {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match trimmed.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() => {
                metadata.insert(key.trim(), value.trim());
            }
            _ => degradations.push(Degradation::MalformedMetadataLine {
                line,
                text: trimmed.to_string(),
            }),
        }
    }

    metadata
}


/// Title of a markdown ATX heading line, if the line is one
fn heading_title(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }

    let rest = &trimmed[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let title = rest.trim().trim_end_matches('#').trim();
    (!title.is_empty()).then_some(title)
}

/// Split a body into recognized sections
///
/// A section spans from its heading line up to the next recognized heading
/// (or end of text). Unrecognized headings do not end a section. When a
/// label repeats, the first occurrence is kept.
fn extract_sections(body: &str) -> BTreeMap<SectionLabel, String> {
    let mut sections = BTreeMap::new();
    let mut open: Option<(SectionLabel, usize)> = None;
    let mut in_fence = false;
    let mut offset = 0;

    for line in body.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        if line.trim_start().starts_with(FENCE) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        let Some(label) = heading_title(line).and_then(SectionLabel::from_heading) else {
            continue;
        };

        if let Some((previous, from)) = open.take() {
            close_section(&mut sections, previous, &body[from..start]);
        }
        open = Some((label, start));
    }

    if let Some((previous, from)) = open {
        close_section(&mut sections, previous, &body[from..]);
    }

    sections
}

fn close_section(sections: &mut BTreeMap<SectionLabel, String>, label: SectionLabel, text: &str) {
    sections
        .entry(label)
        .or_insert_with(|| text.trim_end().to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(raw: &str) -> (SkillDocument, Vec<Degradation>) {
        parse_document("test-skill", Path::new("skills/test-skill/SKILL.md"), raw.to_string())
    }

    #[test]
    fn test_parse_full_document() {
        let content = r#"---
name: code-reviewer
description: "Reviews code for best practices and security."
license: MIT
audience: developers
---

# Code Reviewer

## What I do
Review code.

## When to use me
Before merging.

## Prerequisites
A diff.

## Steps
1. Read the diff
2. Comment
"#;

        let (document, degradations) = parse(content);
        assert!(degradations.is_empty(), "{:?}", degradations);
        assert_eq!(document.metadata.name, "code-reviewer");
        assert_eq!(
            document.metadata.description,
            "\"Reviews code for best practices and security.\""
        );
        assert_eq!(document.metadata.license, "MIT");
        assert_eq!(document.metadata.get("audience"), Some("developers"));
        assert_eq!(
            document.section(SectionLabel::Capabilities),
            "## What I do\nReview code."
        );
        assert_eq!(
            document.section(SectionLabel::UseCases),
            "## When to use me\nBefore merging."
        );
        assert_eq!(
            document.section(SectionLabel::Steps),
            "## Steps\n1. Read the diff\n2. Comment"
        );
        assert_eq!(document.raw, content);
    }

    #[test]
    fn test_missing_metadata_and_sections_degrade() {
        let (document, degradations) = parse("Just some prose.\n# Title\n");

        assert!(document.metadata.is_empty());
        assert!(document.sections.is_empty());
        assert_eq!(document.section(SectionLabel::Steps), "");
        assert_eq!(
            degradations,
            vec![
                Degradation::MissingMetadata,
                Degradation::MissingSection {
                    section: SectionLabel::Capabilities
                },
                Degradation::MissingSection {
                    section: SectionLabel::UseCases
                },
                Degradation::MissingSection {
                    section: SectionLabel::Steps
                },
            ]
        );
    }

    #[test]
    fn test_unterminated_metadata_is_body() {
        let (document, degradations) = parse("---\nname: broken\n## Steps\nrun\n");

        assert!(document.metadata.is_empty());
        assert!(degradations.contains(&Degradation::UnterminatedMetadata));
        assert_eq!(document.section(SectionLabel::Steps), "## Steps\nrun");
    }

    #[test]
    fn test_malformed_metadata_line_is_reported() {
        let (document, degradations) = parse("---\nname: ok\njust words\n---\n");

        assert_eq!(document.metadata.name, "ok");
        assert!(degradations.contains(&Degradation::MalformedMetadataLine {
            line: 3,
            text: "just words".to_string()
        }));
    }

    #[test]
    fn test_metadata_values_are_kept_verbatim() {
        let (document, _) = parse("---\nname: 'linter'\ndescription: a: b \"c\"\n---\n");

        assert_eq!(document.metadata.name, "'linter'");
        assert_eq!(document.metadata.description, "a: b \"c\"");
    }

    #[test]
    fn test_headings_inside_fences_are_ignored() {
        let content = "## Steps\n```bash\n# Steps\n## What I do\n```\ndone\n";
        let (document, _) = parse(content);

        assert_eq!(document.section(SectionLabel::Capabilities), "");
        assert_eq!(
            document.section(SectionLabel::Steps),
            "## Steps\n```bash\n# Steps\n## What I do\n```\ndone"
        );
    }

    #[test]
    fn test_unrecognized_heading_does_not_end_section() {
        let content = "## What I do\nLint.\n### Details\nMore.\n## Steps\nGo.";
        let (document, _) = parse(content);

        assert_eq!(
            document.section(SectionLabel::Capabilities),
            "## What I do\nLint.\n### Details\nMore."
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let content = "## Steps\nfirst\n## Steps\nsecond\n";
        let (document, _) = parse(content);
        assert_eq!(document.section(SectionLabel::Steps), "## Steps\nfirst");
    }

    #[test]
    fn test_heading_title() {
        assert_eq!(heading_title("## What I do"), Some("What I do"));
        assert_eq!(heading_title("### Steps ###"), Some("Steps"));
        assert_eq!(heading_title("#hashtag"), None);
        assert_eq!(heading_title("####### too deep"), None);
        assert_eq!(heading_title("plain"), None);
    }
}
