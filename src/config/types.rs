use crate::dom::{ExtractionProfile, ItemProfile, ItemRules};
use crate::extract::{CleanerProfile, ContentMode};
use crate::harvest::SectionRule;
use crate::url::LinkFilter;
use crate::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for docsift
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Documentation sources, processed in file order
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceConfig>,
}

impl Config {
    /// Looks up a source by name
    pub fn source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name == name)
    }
}

/// Which page renderer to drive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderEngine {
    /// Headless Chrome, for client-side rendered documentation
    #[default]
    Chrome,

    /// Plain HTTP GET, for static pages
    Http,
}

/// Page rendering and pacing configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserConfig {
    pub engine: RenderEngine,

    /// Run Chrome without a visible window
    pub headless: bool,

    /// Keep Chrome's sandbox enabled (disable inside containers)
    pub sandbox: bool,

    /// Upper bound for a single navigation (milliseconds)
    pub navigation_timeout_ms: u64,

    /// Fixed cooldown after the DOM settles, for client-side rendering (milliseconds)
    pub settle_ms: u64,

    /// Fixed pause after every page visit (milliseconds)
    pub page_delay_ms: u64,

    /// User agent for the HTTP engine
    pub user_agent: Option<String>,
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            engine: RenderEngine::Chrome,
            headless: true,
            sandbox: true,
            navigation_timeout_ms: 90_000,
            settle_ms: 2_000,
            page_delay_ms: 500,
            user_agent: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory receiving `<source>_urls.md` and `<source>_content.md`
    pub directory: PathBuf,
}

impl OutputConfig {
    /// Path of the URL index written by the harvester for a source
    pub fn urls_path(&self, source: &str) -> PathBuf {
        self.directory.join(format!("{}_urls.md", source))
    }

    /// Path of the consolidated content document for a source
    pub fn content_path(&self, source: &str) -> PathBuf {
        self.directory.join(format!("{}_content.md", source))
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./output"),
        }
    }
}

/// Section naming scheme as written in the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionRuleKind {
    #[default]
    Headings,
    PathSegment,
    ItemIdPrefix,
}

/// One documentation source
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceConfig {
    /// Identifier used in output file names
    pub name: String,

    /// Human-readable title used in document headers
    pub title: String,

    /// Pages the harvester starts from
    pub seeds: Vec<String>,

    /// Allow-list of URL prefixes or path fragments; empty admits everything
    #[serde(default)]
    pub allow: Vec<String>,

    #[serde(default)]
    pub section_rule: SectionRuleKind,

    /// Base path for the `path-segment` rule, e.g. `/pine-script-docs/`
    #[serde(default)]
    pub section_base_path: Option<String>,

    #[serde(default)]
    pub content_mode: ContentMode,

    /// Info string for fenced code blocks, e.g. `pine`
    #[serde(default)]
    pub code_language: Option<String>,

    #[serde(default)]
    pub profile: ExtractionProfile,

    #[serde(default)]
    pub cleaner: CleanerProfile,

    /// Item layout for `item-id-prefix` sections and `items` content
    #[serde(default)]
    pub items: ItemProfile,
}

impl SourceConfig {
    /// Builds the harvester's section rule, compiling item selectors if needed
    pub fn section_rule(&self) -> Result<SectionRule, ConfigError> {
        Ok(match self.section_rule {
            SectionRuleKind::Headings => SectionRule::Headings,
            SectionRuleKind::PathSegment => SectionRule::PathSegment {
                base_path: self
                    .section_base_path
                    .clone()
                    .unwrap_or_else(|| "/".to_string()),
            },
            SectionRuleKind::ItemIdPrefix => SectionRule::ItemIdPrefix(ItemRules::compile(&self.items)?),
        })
    }

    pub fn link_filter(&self) -> LinkFilter {
        LinkFilter::new(self.allow.clone())
    }
}
