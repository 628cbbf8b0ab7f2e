//! Data model for harvested links and extracted pages
//!
//! # Components
//!
//! - `LinkEntry`: a labelled absolute URL collected by the harvester
//! - `LinkTarget`: one entry of a URL index file, the extractor's work item
//! - `PageRecord`: the extracted markdown of one visited page
//! - `SectionedDocument`: insertion-ordered section map shared by both stages

mod sectioned;

pub use sectioned::{Section, SectionKey, SectionedDocument};

/// Section name used before any heading has been seen
pub const DEFAULT_SECTION: &str = "General";

/// A harvested hyperlink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Display label (anchor text, aria-label, or the URL itself)
    pub label: String,

    /// Absolute URL
    pub url: String,
}

impl LinkEntry {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

impl SectionKey for LinkEntry {
    fn key(&self) -> &str {
        &self.url
    }
}

/// A link read back from a URL index, tagged with the section it was listed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub section: String,
    pub label: String,
    pub url: String,
}

impl SectionKey for LinkTarget {
    fn key(&self) -> &str {
        &self.url
    }
}

/// Extracted content of a single page
///
/// Records are created once after a successful fetch and conversion and are
/// never modified afterwards. Pages that fail are not represented at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub name: String,
    pub url: String,
    pub content: String,
}

impl SectionKey for PageRecord {
    fn key(&self) -> &str {
        &self.url
    }
}
