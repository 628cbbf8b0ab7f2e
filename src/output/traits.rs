//! Rendering interface for items of an output document

use crate::model::{LinkEntry, PageRecord};

/// An item that can be rendered under a section of an output document
pub trait DocumentItem {
    /// Appends the markdown for this item
    fn render(&self, out: &mut String);

    /// Text appended once after the last item of every section
    fn section_trailer() -> &'static str {
        ""
    }
}

impl DocumentItem for LinkEntry {
    fn render(&self, out: &mut String) {
        out.push_str(&format!("- [{}]({})\n", self.label, self.url));
    }

    fn section_trailer() -> &'static str {
        "\n"
    }
}

impl DocumentItem for PageRecord {
    fn render(&self, out: &mut String) {
        out.push_str(&format!("### {}\n\n", self.name));
        out.push_str(&self.content);
        out.push_str("\n\n---\n\n");
    }
}
