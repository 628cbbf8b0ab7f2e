//! Markdown document assembly
//!
//! Both the URL index and the content document share one layout: title,
//! generation timestamp, table of contents with per-section counts, the
//! total, then every section with its items in insertion order.

use crate::model::SectionedDocument;
use crate::output::traits::DocumentItem;
use chrono::NaiveDateTime;

/// Timestamp format of the `Generated:` line
pub const GENERATED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders a sectioned document to markdown
///
/// # Arguments
///
/// * `doc` - The sections and their items
/// * `title` - Document title, e.g. `Google Apps Script - URL Index`
/// * `generated_at` - Local time written on the `Generated:` line
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use docsift::{assemble, LinkEntry, SectionedDocument};
///
/// let mut doc = SectionedDocument::new();
/// doc.push("Guides", LinkEntry::new("Triggers", "https://example.com/triggers"));
///
/// let at = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap().and_hms_opt(9, 30, 0).unwrap();
/// let markdown = assemble(&doc, "Docs - URL Index", &at);
/// assert!(markdown.starts_with("# Docs - URL Index\n\nGenerated: 2025-01-02 09:30\n\n"));
/// assert!(markdown.contains("- [Guides](#guides) (1)\n"));
/// ```
pub fn assemble<T: DocumentItem>(
    doc: &SectionedDocument<T>,
    title: &str,
    generated_at: &NaiveDateTime,
) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", title));
    md.push_str(&format!(
        "Generated: {}\n\n",
        generated_at.format(GENERATED_FORMAT)
    ));

    // Table of contents
    md.push_str("## Table of Contents\n\n");
    for section in doc.sections() {
        md.push_str(&format!(
            "- [{}](#{}) ({})\n",
            section.name,
            anchor(&section.name),
            section.items.len()
        ));
    }
    md.push_str(&format!("\n**Total: {} items**\n\n", doc.len()));
    md.push_str("---\n\n");

    for section in doc.sections() {
        md.push_str(&format!("## {}\n\n", section.name));
        for item in &section.items {
            item.render(&mut md);
        }
        md.push_str(T::section_trailer());
    }

    md
}

/// In-page anchor for a section name: lower-cased, spaces to hyphens
pub fn anchor(section: &str) -> String {
    section.to_lowercase().replace(' ', "-")
}
