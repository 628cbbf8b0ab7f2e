//! Insertion-ordered mapping from section name to items
//!
//! Sections and the items within them keep the order in which they were
//! first added. Nothing is ever re-sorted.

use std::collections::HashMap;

/// Items that carry a dedup key within a section
pub trait SectionKey {
    fn key(&self) -> &str;
}

/// A named, ordered group of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<T> {
    pub name: String,
    pub items: Vec<T>,
}

#[derive(Debug, Clone)]
pub struct SectionedDocument<T> {
    sections: Vec<Section<T>>,
    index: HashMap<String, usize>,
}

impl<T> SectionedDocument<T> {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns the section with the given name, creating it at the end if missing
    pub fn ensure_section(&mut self, name: &str) -> &mut Section<T> {
        let idx = match self.index.get(name) {
            Some(idx) => *idx,
            None => {
                self.sections.push(Section {
                    name: name.to_string(),
                    items: Vec::new(),
                });
                let idx = self.sections.len() - 1;
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.sections[idx]
    }

    /// Appends an item to a section unconditionally
    pub fn push(&mut self, section: &str, item: T) {
        self.ensure_section(section).items.push(item);
    }

    pub fn get(&self, section: &str) -> Option<&[T]> {
        self.index
            .get(section)
            .map(|idx| self.sections[*idx].items.as_slice())
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section<T>> {
        self.sections.iter()
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Total number of items across all sections
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops sections that never received an item
    pub fn prune_empty(&mut self) {
        self.sections.retain(|s| !s.items.is_empty());
        self.index = self
            .sections
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.name.clone(), idx))
            .collect();
    }
}

impl<T: SectionKey> SectionedDocument<T> {
    /// Appends an item unless the section already holds one with the same key
    ///
    /// Returns `true` if the item was added.
    pub fn push_unique(&mut self, section: &str, item: T) -> bool {
        let target = self.ensure_section(section);
        if target.items.iter().any(|existing| existing.key() == item.key()) {
            return false;
        }
        target.items.push(item);
        true
    }

    /// Folds another document into this one
    ///
    /// New sections are appended after existing ones; items already present
    /// in the same section (by key) are skipped.
    pub fn merge(&mut self, other: SectionedDocument<T>) {
        for section in other.sections {
            self.ensure_section(&section.name);
            for item in section.items {
                self.push_unique(&section.name, item);
            }
        }
    }
}

impl<T> Default for SectionedDocument<T> {
    fn default() -> Self {
        Self::new()
    }
}
