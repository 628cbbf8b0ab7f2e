use url::Url;

/// Allow-list that restricts harvesting to the target documentation area
///
/// Two kinds of pattern are supported:
/// 1. URL prefix: any pattern containing `://`, e.g.
///    `"https://developers.google.com/apps-script"`, matches URLs starting with it
/// 2. Path fragment: any other pattern, e.g. `"/pine-script-docs/"`, matches
///    URLs whose path contains it
///
/// An empty filter admits every URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFilter {
    patterns: Vec<String>,
}

impl LinkFilter {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Checks a resolved URL against the allow-list
    ///
    /// # Examples
    ///
    /// ```
    /// use docsift::url::LinkFilter;
    /// use url::Url;
    ///
    /// let filter = LinkFilter::new(vec!["/pine-script-docs/".to_string()]);
    /// let docs = Url::parse("https://www.tradingview.com/pine-script-docs/language/").unwrap();
    /// let chart = Url::parse("https://www.tradingview.com/chart/").unwrap();
    /// assert!(filter.allows(&docs));
    /// assert!(!filter.allows(&chart));
    /// ```
    pub fn allows(&self, url: &Url) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        self.patterns.iter().any(|pattern| matches_pattern(pattern, url))
    }
}

fn matches_pattern(pattern: &str, url: &Url) -> bool {
    if pattern.contains("://") {
        url.as_str().starts_with(pattern)
    } else {
        url.path().contains(pattern)
    }
}
