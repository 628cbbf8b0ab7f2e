//! DOM helpers shared by the link harvester and the content extractor
//!
//! This module handles:
//! - Locating the main-content container of a rendered page
//! - Excluding navigation, sidebar and TOC elements from it
//! - Splitting reference pages into their items
//! - Pulling normalized, inline-aware and verbatim text out of subtrees

mod container;
mod items;
mod profile;
pub mod text;

pub use container::{ContainerRules, ContentScope};
pub use items::ItemRules;
pub use profile::{ExtractionProfile, ItemProfile};

/// Returns the heading level (1-6) of an element name, if it is a heading
pub fn heading_level(name: &str) -> Option<usize> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}
