//! Link collection from a cleaned content scope

use crate::dom::{heading_level, ContainerRules, ContentScope, ItemRules};
use crate::harvest::sections::{path_section, SectionRule, SectionTracker};
use crate::model::{LinkEntry, SectionedDocument};
use crate::url::{resolve_href, LinkFilter};
use scraper::Html;
use url::Url;

/// Parses rendered HTML and collects its main-content links by section
///
/// The document is parsed and dropped inside this call so the (non-`Send`)
/// tree never lives across an await point of the caller.
pub fn links_from_html(
    html: &str,
    page_url: &Url,
    rules: &ContainerRules,
    filter: &LinkFilter,
    rule: &SectionRule,
) -> SectionedDocument<LinkEntry> {
    let document = Html::parse_document(html);
    if let SectionRule::ItemIdPrefix(items) = rule {
        return collect_items(&document, page_url, items);
    }
    let scope = rules.scope(&document);
    collect_links(&scope, page_url, filter, rule)
}

/// Lists every reference item of a page as `{page_url}#{id}`
///
/// Items are read from the whole document, so the container rules and the
/// allow-list do not apply; the section is derived from the item id.
pub fn collect_items(document: &Html, page_url: &Url, items: &ItemRules) -> SectionedDocument<LinkEntry> {
    let mut doc = SectionedDocument::new();

    for item in items.items(document) {
        let Some(id) = item.value().id() else {
            continue;
        };
        let mut url = page_url.clone();
        url.set_fragment(Some(id));

        doc.push_unique(
            &items.section_for(id),
            LinkEntry::new(items.item_name(item), url.as_str()),
        );
    }

    doc
}

/// Walks a content scope in document order and groups its anchors into sections
///
/// Headings advance the section state machine (for `SectionRule::Headings`);
/// each anchor is resolved against `page_url`, checked against the allow-list
/// and appended to the current section unless that section already holds the
/// same URL.
pub fn collect_links(
    scope: &ContentScope,
    page_url: &Url,
    filter: &LinkFilter,
    rule: &SectionRule,
) -> SectionedDocument<LinkEntry> {
    let mut doc = SectionedDocument::new();
    let mut tracker = SectionTracker::new();

    for element in scope.elements() {
        let name = element.value().name();

        if let Some(level) = heading_level(name) {
            if matches!(rule, SectionRule::Headings)
                && tracker.on_heading(level, &scope.plain_text(element))
            {
                doc.ensure_section(&tracker.current());
            }
            continue;
        }

        if name != "a" {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let url = match resolve_href(href, page_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::trace!("Skipping link '{}': {}", href, e);
                continue;
            }
        };

        if !filter.allows(&url) {
            continue;
        }

        let section = match rule {
            SectionRule::Headings => tracker.current(),
            SectionRule::PathSegment { base_path } => path_section(&url, base_path),
            SectionRule::ItemIdPrefix(items) => items.section_for(url.fragment().unwrap_or_default()),
        };

        let label = link_label(&scope.plain_text(element), element.value().attr("aria-label"), &url);
        doc.push_unique(&section, LinkEntry::new(label, url.as_str()));
    }

    doc
}

/// Anchor text, else the `aria-label`, else the URL itself
fn link_label(text: &str, aria_label: Option<&str>, url: &Url) -> String {
    if !text.is_empty() {
        return text.to_string();
    }
    match aria_label.map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => url.to_string(),
    }
}
