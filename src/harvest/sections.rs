//! Section naming for harvested links

use crate::dom::ItemRules;
use crate::model::DEFAULT_SECTION;
use url::Url;

/// How a harvested link is assigned to a section
#[derive(Debug, Clone, Default)]
pub enum SectionRule {
    /// Section comes from the nearest preceding heading on the page
    #[default]
    Headings,

    /// Section comes from the first path segment below `base_path`,
    /// e.g. `/docs/error-messages/x` with base `/docs/` -> `Error Messages`
    PathSegment { base_path: String },

    /// The page is a reference listing: every item becomes a `page#id` link
    /// whose section comes from the id prefix
    ItemIdPrefix(ItemRules),
}

/// Heading state machine used by the `Headings` rule
///
/// State is `{top, sub}`:
/// - `h1`/`h2` set `top` and clear `sub`
/// - `h3`..`h6` set `sub`
///
/// The current label is `"{top} / {sub}"`, or whichever of the two is set,
/// or `General` before any heading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionTracker {
    top: Option<String>,
    sub: Option<String>,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a heading transition; empty headings leave the state untouched
    ///
    /// Returns `true` if the state changed.
    pub fn on_heading(&mut self, level: usize, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        match level {
            1 | 2 => {
                self.top = Some(text.to_string());
                self.sub = None;
            }
            _ => self.sub = Some(text.to_string()),
        }
        true
    }

    pub fn current(&self) -> String {
        match (&self.top, &self.sub) {
            (Some(top), Some(sub)) => format!("{} / {}", top, sub),
            (Some(top), None) => top.clone(),
            (None, Some(sub)) => sub.clone(),
            (None, None) => DEFAULT_SECTION.to_string(),
        }
    }
}

/// Derives a section name from a URL's path below `base_path`
///
/// # Examples
///
/// ```
/// use docsift::harvest::path_section;
/// use url::Url;
///
/// let url = Url::parse("https://www.tradingview.com/pine-script-docs/error-messages/").unwrap();
/// assert_eq!(path_section(&url, "/pine-script-docs/"), "Error Messages");
/// ```
pub fn path_section(url: &Url, base_path: &str) -> String {
    let path = url.path();
    let remainder = match path.find(base_path) {
        Some(idx) => &path[idx + base_path.len()..],
        None => return DEFAULT_SECTION.to_string(),
    };

    match remainder.trim_matches('/').split('/').next() {
        Some(segment) if !segment.is_empty() => title_case(&segment.replace(['-', '_'], " ")),
        _ => DEFAULT_SECTION.to_string(),
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
