//! Reading a URL index back into extraction targets

use crate::model::{LinkTarget, SectionedDocument, DEFAULT_SECTION};
use crate::{DocsiftError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// `- [label](url)`
static ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- \[(.+)\]\((\S+)\)\s*$").expect("hardcoded list item regex"));

const TOC_HEADING: &str = "Table of Contents";

/// Parses URL index markdown into extraction targets
///
/// Grammar, line by line:
/// - `## Name` opens a section (`## Table of Contents` is ignored)
/// - `- [label](url)` with an `http` URL adds a target to the current section
/// - anything else is skipped
///
/// Targets before any section heading belong to `General`. A URL listed twice
/// in the same section yields one target.
///
/// # Examples
///
/// ```
/// use docsift::extract::parse_link_list;
///
/// let targets = parse_link_list("## A\n- [x](http://e/1)\n- [y](http://e/1)\n");
/// assert_eq!(targets.len(), 1);
/// assert_eq!(targets[0].section, "A");
/// ```
pub fn parse_link_list(markdown: &str) -> Vec<LinkTarget> {
    let mut doc: SectionedDocument<LinkTarget> = SectionedDocument::new();
    let mut section = DEFAULT_SECTION.to_string();

    for line in markdown.lines() {
        if let Some(name) = line.strip_prefix("## ") {
            let name = name.trim();
            if !name.is_empty() && name != TOC_HEADING {
                section = name.to_string();
            }
            continue;
        }

        let Some(caps) = ITEM_RE.captures(line.trim_end()) else {
            continue;
        };
        let url = &caps[2];
        if !url.starts_with("http") {
            continue;
        }

        let target = LinkTarget {
            section: section.clone(),
            label: caps[1].trim().to_string(),
            url: url.to_string(),
        };
        if !doc.push_unique(&section, target) {
            tracing::debug!("Duplicate link in section '{}'", section);
        }
    }

    doc.sections()
        .flat_map(|s| s.items.iter().cloned())
        .collect()
}

/// Reads and parses a URL index file
///
/// # Errors
///
/// * `DocsiftError::MissingLinkList` - The file does not exist
/// * `DocsiftError::Io` - The file exists but could not be read
pub fn read_link_list(path: &Path) -> Result<Vec<LinkTarget>> {
    if !path.exists() {
        return Err(DocsiftError::MissingLinkList(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let targets = parse_link_list(&content);
    tracing::info!("Loaded {} targets from {}", targets.len(), path.display());
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_duplicate_link_in_section() {
        let targets = parse_link_list("## A\n- [x](http://e/1)\n- [y](http://e/1)\n");
        assert_eq!(targets.len(), 1);
        assert_eq!(
            targets[0],
            LinkTarget {
                section: "A".to_string(),
                label: "x".to_string(),
                url: "http://e/1".to_string(),
            }
        );
    }

    #[test]
    fn test_parses_generated_index() {
        let index = "# Docs - URL Index\n\nGenerated: 2025-01-01 10:00\n\n## Table of Contents\n\n- [Guides](#guides) (2)\n- [Reference / Classes](#reference-/-classes) (1)\n\n**Total: 3 items**\n\n---\n\n## Guides\n\n- [Triggers](https://example.com/guides/triggers)\n- [Menus [beta]](https://example.com/guides/menus)\n\n## Reference / Classes\n\n- [CalendarApp](https://example.com/reference/calendar-app)\n";
        let targets = parse_link_list(index);

        let summary: Vec<_> = targets
            .iter()
            .map(|t| (t.section.as_str(), t.label.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Guides", "Triggers"),
                ("Guides", "Menus [beta]"),
                ("Reference / Classes", "CalendarApp"),
            ]
        );
    }

    #[test]
    fn test_default_section_and_ignored_lines() {
        let targets = parse_link_list(
            "- [Early](https://example.com/early)\nsome prose\n- [Anchor](#top)\n- [Rel](/relative)\n* [Star](https://example.com/star)\n",
        );
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].section, "General");
        assert_eq!(targets[0].url, "https://example.com/early");
    }

    #[test]
    fn test_same_url_in_two_sections_is_kept() {
        let targets = parse_link_list("## A\n- [x](http://e/1)\n## B\n- [x](http://e/1)\n");
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn test_read_missing_link_list() {
        let result = read_link_list(Path::new("/nonexistent/docs_urls.md"));
        assert!(matches!(result, Err(DocsiftError::MissingLinkList(_))));
    }

    #[test]
    fn test_read_link_list_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"## Guides\n- [One](https://example.com/one)\n").unwrap();
        file.flush().unwrap();

        let targets = read_link_list(file.path()).unwrap();
        assert_eq!(targets.len(), 1);
    }
}
