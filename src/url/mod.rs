//! URL handling module for docsift
//!
//! This module resolves link hrefs against the page they appear on and
//! filters the results against a source's allow-list.

mod matcher;
mod resolve;

pub use matcher::LinkFilter;
pub use resolve::resolve_href;
