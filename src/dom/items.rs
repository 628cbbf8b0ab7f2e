//! Reference pages that list many items on one page

use crate::dom::container::parse_selector;
use crate::dom::profile::ItemProfile;
use crate::dom::text;
use crate::ConfigError;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, HashSet};

/// Section of items whose id has no lowercase prefix
const OTHER_SECTION: &str = "Other";

/// Compiled form of an `ItemProfile`
#[derive(Debug, Clone)]
pub struct ItemRules {
    item: Selector,
    content: Selector,
    sub_header: Selector,
    text: Selector,
    text_group: Selector,
    code: Selector,
    see_also: Selector,
    heading: Selector,
    pre: Selector,
    noise: Selector,
    stop_label: String,
    prefixes: BTreeMap<String, String>,
}

impl ItemRules {
    pub fn compile(profile: &ItemProfile) -> Result<Self, ConfigError> {
        Ok(Self {
            item: parse_selector(&profile.selector)?,
            content: parse_selector(&profile.content)?,
            sub_header: parse_selector(&profile.sub_header)?,
            text: parse_selector(&profile.text)?,
            text_group: parse_selector(&profile.text_group)?,
            code: parse_selector(&profile.code)?,
            see_also: parse_selector(&profile.see_also)?,
            heading: parse_selector("h1, h2, h3")?,
            pre: parse_selector("pre")?,
            noise: parse_selector("script, style")?,
            stop_label: text::normalize_whitespace(&profile.stop_label).to_lowercase(),
            prefixes: profile.prefixes.clone(),
        })
    }

    /// Every item element carrying a non-empty `id`, in document order
    pub fn items<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document
            .select(&self.item)
            .filter(|item| item.value().id().is_some_and(|id| !id.is_empty()))
            .collect()
    }

    /// The item element with the given `id`
    pub fn find<'a>(&self, document: &'a Html, id: &str) -> Option<ElementRef<'a>> {
        document
            .select(&self.item)
            .find(|item| item.value().id() == Some(id))
    }

    /// Section of an item id: `fun_ta.sma` -> `Functions`, `foo_x` -> `FOO`, `x` -> `Other`
    pub fn section_for(&self, id: &str) -> String {
        let prefix_len = id
            .chars()
            .take_while(char::is_ascii_lowercase)
            .count();
        if prefix_len == 0 || !id[prefix_len..].starts_with('_') {
            return OTHER_SECTION.to_string();
        }

        let prefix = &id[..prefix_len];
        self.prefixes
            .get(prefix)
            .cloned()
            .unwrap_or_else(|| prefix.to_uppercase())
    }

    /// Text of the item's first `h1`-`h3`, else its id
    pub fn item_name(&self, item: ElementRef) -> String {
        let id = item.value().id().unwrap_or_default();
        item.select(&self.heading)
            .next()
            .map(|heading| text::plain_text(heading, &HashSet::new()))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| id.to_string())
    }

    /// Markdown body of one item
    ///
    /// Sub-headers become bold lines, text and argument groups become
    /// paragraphs, code becomes fenced blocks. The body ends at the
    /// stop-label sub-header ("See also"), and see-also link lists are
    /// dropped wherever they appear.
    pub fn item_markdown(&self, item: ElementRef, code_language: Option<&str>) -> String {
        let root = item.select(&self.content).next().unwrap_or(item);
        let excluded: HashSet<NodeId> = root
            .select(&self.noise)
            .chain(root.select(&self.see_also))
            .map(|element| element.id())
            .collect();

        let mut blocks = Vec::new();
        self.emit(root, &excluded, code_language.unwrap_or_default(), &mut blocks);

        if blocks.is_empty() {
            return text::plain_text(root, &excluded);
        }

        let joined = blocks.join("\n\n").replace('\u{a0}', " ");
        text::collapse_blank_lines(&joined).trim().to_string()
    }

    /// Returns `false` once the stop label has been reached
    fn emit(
        &self,
        element: ElementRef,
        excluded: &HashSet<NodeId>,
        lang: &str,
        blocks: &mut Vec<String>,
    ) -> bool {
        for child in element.children().filter_map(ElementRef::wrap) {
            if excluded.contains(&child.id()) {
                continue;
            }

            if self.sub_header.matches(&child) {
                let label = text::plain_text(child, excluded);
                if label.to_lowercase() == self.stop_label {
                    return false;
                }
                if !label.is_empty() {
                    blocks.push(format!("**{}**", label));
                }
            } else if child.value().name() == "pre" || self.code.matches(&child) {
                push_code(child, excluded, lang, blocks);
            } else if self.text.matches(&child) || self.text_group.matches(&child) {
                let paragraph = text::inline_text(child, excluded);
                if !paragraph.is_empty() {
                    blocks.push(paragraph);
                }
                for pre in child.select(&self.pre) {
                    if !excluded.contains(&pre.id()) {
                        push_code(pre, excluded, lang, blocks);
                    }
                }
            } else if !self.emit(child, excluded, lang, blocks) {
                return false;
            }
        }
        true
    }
}

fn push_code(element: ElementRef, excluded: &HashSet<NodeId>, lang: &str, blocks: &mut Vec<String>) {
    let code = text::code_text(element, excluded);
    if !code.trim().is_empty() {
        blocks.push(format!("```{}\n{}\n```", lang, code));
    }
}
