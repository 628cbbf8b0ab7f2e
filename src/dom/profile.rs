use serde::Deserialize;
use std::collections::BTreeMap;

/// Selector tables describing where a site keeps its readable content
///
/// Every field may be overridden from the `[source.profile]` table of the
/// configuration file; missing fields fall back to the DevSite preset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractionProfile {
    /// Main-content selectors, tried in order; the first match wins
    pub main: Vec<String>,

    /// Navigation, sidebar, TOC and breadcrumb selectors excluded from the container
    pub exclude: Vec<String>,

    /// Element texts that mark sidebar widgets (compared case-insensitively)
    pub sidebar_labels: Vec<String>,
}

impl ExtractionProfile {
    /// Layout used by Google DevSite documentation
    pub fn devsite() -> Self {
        Self {
            main: to_strings(&[
                ".devsite-article-body",
                ".devsite-article",
                "article",
                "main",
            ]),
            exclude: to_strings(&[
                "nav",
                "aside",
                ".devsite-article-nav",
                ".devsite-article-nav-right",
                ".devsite-article-nav-left",
                ".devsite-article-navigation",
                ".devsite-on-this-page",
                ".devsite-toc",
                ".devsite-book-nav",
                ".devsite-side-nav",
                ".devsite-nav",
                ".devsite-breadcrumbs",
                ".devsite-article-meta",
                ".devsite-article-actions",
                ".devsite-article-footer",
                ".devsite-article-recommendations",
                ".devsite-feedback",
            ]),
            sidebar_labels: to_strings(&["on this page", "en esta página"]),
        }
    }
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        Self::devsite()
    }
}

/// Selectors for reference pages that list many items on one page
///
/// Each item is an element with an `id`; the id's lowercase prefix before the
/// first underscore picks its section (`fun_ta.sma` -> `Functions`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ItemProfile {
    /// One element per reference item
    pub selector: String,

    /// Item body inside the item element; the whole item when absent
    pub content: String,

    pub sub_header: String,
    pub text: String,
    pub text_group: String,
    pub code: String,

    /// Link lists removed from the item body
    pub see_also: String,

    /// Sub-header text (case-insensitive) at which the item body ends
    pub stop_label: String,

    /// Id prefix -> section name; unknown prefixes are upper-cased
    pub prefixes: BTreeMap<String, String>,
}

impl ItemProfile {
    /// Layout of the TradingView Pine Script reference
    pub fn tradingview() -> Self {
        let prefixes = [
            ("an", "Annotations"),
            ("const", "Constants"),
            ("fun", "Functions"),
            ("kw", "Keywords"),
            ("op", "Operators"),
            ("type", "Types"),
            ("var", "Variables"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            selector: "div.tv-pine-reference-item".to_string(),
            content: ".tv-pine-reference-item__content".to_string(),
            sub_header: ".tv-pine-reference-item__sub-header".to_string(),
            text: ".tv-pine-reference-item__text".to_string(),
            text_group: ".tv-pine-reference-item__text-group".to_string(),
            code: ".tv-pine-reference-item__code".to_string(),
            see_also: ".tv-pine-reference-item__see-also".to_string(),
            stop_label: "see also".to_string(),
            prefixes,
        }
    }
}

impl Default for ItemProfile {
    fn default() -> Self {
        Self::tradingview()
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
