//! Output module for generating the URL index and content documents
//!
//! This module handles:
//! - Rendering sectioned documents to markdown
//! - Writing documents into the output directory

mod markdown;
mod traits;

pub use markdown::{anchor, assemble, GENERATED_FORMAT};
pub use traits::DocumentItem;

use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a rendered document, creating the parent directory if needed
///
/// # Arguments
///
/// * `path` - Destination file; an existing file is overwritten
/// * `markdown` - The rendered document
pub fn write_document(path: &Path, markdown: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!(
        "Saved {} ({:.1} KB)",
        path.display(),
        markdown.len() as f64 / 1024.0
    );
    Ok(())
}
