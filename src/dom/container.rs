//! Main-content container location and navigation exclusion

use crate::dom::profile::ExtractionProfile;
use crate::dom::text;
use crate::ConfigError;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Elements that never carry readable content
const ALWAYS_EXCLUDED: &[&str] = &["script", "style", "noscript", "template"];

/// Compiled form of an `ExtractionProfile`
#[derive(Debug, Clone)]
pub struct ContainerRules {
    main: Vec<Selector>,
    exclude: Vec<Selector>,
    sidebar_labels: Vec<String>,
}

impl ContainerRules {
    /// Parses every selector in the profile
    ///
    /// # Returns
    ///
    /// * `Ok(ContainerRules)` - All selectors are valid
    /// * `Err(ConfigError::InvalidSelector)` - The first selector that failed to parse
    pub fn compile(profile: &ExtractionProfile) -> Result<Self, ConfigError> {
        let main = profile
            .main
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>, _>>()?;

        let exclude = ALWAYS_EXCLUDED
            .iter()
            .copied()
            .chain(profile.exclude.iter().map(String::as_str))
            .map(parse_selector)
            .collect::<Result<Vec<_>, _>>()?;

        let sidebar_labels = profile
            .sidebar_labels
            .iter()
            .map(|label| text::normalize_whitespace(label).to_lowercase())
            .filter(|label| !label.is_empty())
            .collect();

        Ok(Self {
            main,
            exclude,
            sidebar_labels,
        })
    }

    /// Finds the main container of a document and marks its navigation noise
    pub fn scope<'a>(&self, document: &'a Html) -> ContentScope<'a> {
        let root = self.locate_container(document);
        let excluded = self.excluded_nodes(root);
        ContentScope { root, excluded }
    }

    /// First element matching the prioritized main selectors, else `<body>`, else the root
    fn locate_container<'a>(&self, document: &'a Html) -> ElementRef<'a> {
        for selector in &self.main {
            if let Some(found) = document.select(selector).next() {
                return found;
            }
        }

        tracing::debug!("No main-content selector matched, falling back to body");
        Selector::parse("body")
            .ok()
            .and_then(|body| document.select(&body).next())
            .unwrap_or_else(|| document.root_element())
    }

    fn excluded_nodes(&self, root: ElementRef) -> HashSet<NodeId> {
        let mut excluded = HashSet::new();

        for selector in &self.exclude {
            for element in root.select(selector) {
                if element.id() != root.id() {
                    excluded.insert(element.id());
                }
            }
        }

        if !self.sidebar_labels.is_empty() {
            for node in root.descendants().skip(1) {
                let Some(element) = ElementRef::wrap(node) else {
                    continue;
                };
                let label = text::plain_text(element, &excluded).to_lowercase();
                if self.sidebar_labels.contains(&label) {
                    excluded.insert(element.id());
                }
            }
        }

        excluded
    }
}

pub(super) fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// A main-content subtree with its excluded descendants
///
/// The underlying document is never mutated; exclusion is a set of node ids
/// that every walk and text function skips.
#[derive(Debug, Clone)]
pub struct ContentScope<'a> {
    root: ElementRef<'a>,
    excluded: HashSet<NodeId>,
}

impl<'a> ContentScope<'a> {
    pub fn root(&self) -> ElementRef<'a> {
        self.root
    }

    pub fn is_excluded(&self, element: ElementRef) -> bool {
        self.excluded.contains(&element.id())
    }

    /// Non-excluded element children of `element`, in document order
    pub fn child_elements(&self, element: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| !self.is_excluded(*child))
            .collect()
    }

    /// Every non-excluded element below the root in document (pre-)order
    pub fn elements(&self) -> Vec<ElementRef<'a>> {
        fn walk<'a>(scope: &ContentScope<'a>, element: ElementRef<'a>, out: &mut Vec<ElementRef<'a>>) {
            for child in scope.child_elements(element) {
                out.push(child);
                walk(scope, child, out);
            }
        }

        let mut out = Vec::new();
        walk(self, self.root, &mut out);
        out
    }

    /// Whitespace-normalized text of an element within this scope
    pub fn plain_text(&self, element: ElementRef) -> String {
        text::plain_text(element, &self.excluded)
    }

    /// Spacing-aware readable text of a block element within this scope
    pub fn inline_text(&self, element: ElementRef) -> String {
        text::inline_text(element, &self.excluded)
    }

    /// Verbatim code block text within this scope
    pub fn code_text(&self, element: ElementRef) -> String {
        text::code_text(element, &self.excluded)
    }

    /// Serialized HTML of the container with excluded subtrees left out
    ///
    /// Works on a copy of the tree; the scope's own document is untouched.
    pub fn filtered_html(&self) -> String {
        let mut tree = self.root.tree().clone();
        for id in &self.excluded {
            if let Some(mut node) = tree.get_mut(*id) {
                node.detach();
            }
        }

        tree.get(self.root.id())
            .and_then(ElementRef::wrap)
            .map(|root| root.html())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ContainerRules {
        ContainerRules::compile(&ExtractionProfile::devsite()).unwrap()
    }

    #[test]
    fn test_prefers_first_matching_selector() {
        let html = Html::parse_document(
            r#"<html><body><main><p>main text</p></main>
               <div class="devsite-article-body"><p>article body</p></div></body></html>"#,
        );
        let rules = rules();
        let scope = rules.scope(&html);
        assert_eq!(scope.plain_text(scope.root()), "article body");
    }

    #[test]
    fn test_falls_back_to_body() {
        let html = Html::parse_document("<html><body><div>Only text</div></body></html>");
        let rules = rules();
        let scope = rules.scope(&html);
        assert_eq!(scope.root().value().name(), "body");
        assert_eq!(scope.plain_text(scope.root()), "Only text");
    }

    #[test]
    fn test_excludes_navigation_selectors() {
        let html = Html::parse_document(
            r#"<html><body><article>
                 <div class="devsite-toc">Contents Intro</div>
                 <nav>Home</nav>
                 <p>Intro</p>
               </article></body></html>"#,
        );
        let rules = rules();
        let scope = rules.scope(&html);
        assert_eq!(scope.plain_text(scope.root()), "Intro");
    }

    #[test]
    fn test_excludes_sidebar_labels_case_insensitively() {
        let html = Html::parse_document(
            r#"<html><body><article>
                 <div><span>On This Page</span></div>
                 <p>Body text</p>
               </article></body></html>"#,
        );
        let rules = rules();
        let scope = rules.scope(&html);
        assert_eq!(scope.plain_text(scope.root()), "Body text");
    }

    #[test]
    fn test_label_match_is_exact() {
        let html = Html::parse_document(
            r#"<html><body><article><p>Read on this page carefully</p></article></body></html>"#,
        );
        let rules = rules();
        let scope = rules.scope(&html);
        assert_eq!(
            scope.plain_text(scope.root()),
            "Read on this page carefully"
        );
    }

    #[test]
    fn test_scripts_are_excluded() {
        let html = Html::parse_document(
            "<html><body><article><script>var x = 1;</script><p>Visible</p></article></body></html>",
        );
        let rules = rules();
        let scope = rules.scope(&html);
        assert_eq!(scope.plain_text(scope.root()), "Visible");
    }

    #[test]
    fn test_elements_skip_excluded_subtrees() {
        let html = Html::parse_document(
            r#"<html><body><article><nav><a href="/x">x</a></nav><p><a href="/y">y</a></p></article></body></html>"#,
        );
        let rules = rules();
        let scope = rules.scope(&html);
        let names: Vec<_> = scope.elements().iter().map(|e| e.value().name()).collect();
        assert_eq!(names, vec!["p", "a"]);
    }

    #[test]
    fn test_filtered_html_drops_excluded_subtrees() {
        let html = Html::parse_document(
            r#"<html><body><article class="doc"><nav>Menu</nav><p>A &amp; B<br>C</p></article></body></html>"#,
        );
        let rules = rules();
        let scope = rules.scope(&html);
        assert_eq!(
            scope.filtered_html(),
            r#"<article class="doc"><p>A &amp; B<br>C</p></article>"#
        );
        assert!(html.root_element().html().contains("<nav>Menu</nav>"));
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let profile = ExtractionProfile {
            main: vec!["[[".to_string()],
            ..ExtractionProfile::devsite()
        };
        let result = ContainerRules::compile(&profile);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidSelector { .. })
        ));
    }
}
