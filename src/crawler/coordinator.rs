//! Pipeline coordinator - per-source orchestration logic
//!
//! For every configured source this module:
//! - Harvests the seed pages and writes the URL index
//! - Reads the URL index back and extracts every listed page
//! - Writes the consolidated content document
//!
//! Each stage opens its own renderer and releases it when the stage ends.
//! A source that fails is reported in its summary and the remaining sources
//! still run; only a browser that cannot be launched stops the whole run.

use crate::config::{Config, SourceConfig};
use crate::crawler::open_renderer;
use crate::dom::{ContainerRules, ItemRules};
use crate::extract::{read_link_list, Extractor};
use crate::harvest::Harvester;
use crate::model::{LinkEntry, PageRecord, SectionedDocument};
use crate::output::{assemble, write_document};
use crate::{ConfigError, DocsiftError, Result};
use chrono::Local;
use std::path::PathBuf;

/// Which pipeline stages to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    /// Harvest, then extract
    #[default]
    All,

    /// Harvest and write the URL index only
    UrlsOnly,

    /// Extract from an existing URL index only
    ContentOnly,
}

impl Stage {
    pub fn harvests(&self) -> bool {
        matches!(self, Stage::All | Stage::UrlsOnly)
    }

    pub fn extracts(&self) -> bool {
        matches!(self, Stage::All | Stage::ContentOnly)
    }
}

/// Outcome of one source run
#[derive(Debug, Default)]
pub struct SourceSummary {
    pub name: String,

    /// Links found by the harvest stage (if it ran)
    pub links: Option<usize>,

    /// Pages written to the content document (if the extraction stage ran)
    pub pages: Option<usize>,

    /// URL index written by this run; `None` when nothing was harvested
    pub urls_path: Option<PathBuf>,
    pub content_path: Option<PathBuf>,

    /// Error that ended this source's run early
    pub error: Option<DocsiftError>,
}

impl SourceSummary {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Main pipeline coordinator structure
pub struct Coordinator {
    config: Config,
    stage: Stage,
}

impl Coordinator {
    pub fn new(config: Config, stage: Stage) -> Self {
        Self { config, stage }
    }

    /// Runs the selected stages for every source, or for the named one
    ///
    /// Per-source failures (a missing URL index, an unwritable output file)
    /// are stored in that source's `SourceSummary::error`.
    ///
    /// # Errors
    ///
    /// * `DocsiftError::Config` - `only` names no configured source
    /// * `DocsiftError::BrowserLaunch` - The renderer could not be opened
    pub async fn run(&self, only: Option<&str>) -> Result<Vec<SourceSummary>> {
        let sources: Vec<&SourceConfig> = match only {
            Some(name) => {
                let source = self.config.source(name).ok_or_else(|| {
                    ConfigError::Validation(format!("Unknown source '{}'", name))
                })?;
                vec![source]
            }
            None => self.config.sources.iter().collect(),
        };

        let mut summaries = Vec::with_capacity(sources.len());
        for source in sources {
            let mut summary = SourceSummary {
                name: source.name.clone(),
                ..SourceSummary::default()
            };

            match self.run_source(source, &mut summary).await {
                Ok(()) => {}
                Err(e @ DocsiftError::BrowserLaunch(_)) => return Err(e),
                Err(e) => {
                    tracing::error!("Source '{}' failed: {}", source.name, e);
                    summary.error = Some(e);
                }
            }
            summaries.push(summary);
        }
        Ok(summaries)
    }

    /// Runs the selected stages for one source, filling in `summary` as it goes
    pub async fn run_source(&self, source: &SourceConfig, summary: &mut SourceSummary) -> Result<()> {
        tracing::info!("Processing source '{}' ({})", source.name, source.title);

        if self.stage.harvests() {
            let links = self.harvest_source(source).await?;
            let path = self.config.output.urls_path(&source.name);
            summary.links = Some(links.len());

            if links.is_empty() {
                tracing::warn!(
                    "No links harvested for '{}'; keeping the existing {}",
                    source.name,
                    path.display()
                );
            } else {
                let title = format!("{} - URL Index", source.title);
                write_document(&path, &assemble(&links, &title, &Local::now().naive_local()))?;
                summary.urls_path = Some(path);
            }
        }

        if self.stage.extracts() {
            let pages = self.extract_source(source).await?;
            let path = self.config.output.content_path(&source.name);
            let title = format!("{} - Content", source.title);
            write_document(&path, &assemble(&pages, &title, &Local::now().naive_local()))?;

            summary.pages = Some(pages.len());
            summary.content_path = Some(path);
        }

        Ok(())
    }

    /// Harvests the seeds of a source with a renderer scoped to this call
    pub async fn harvest_source(&self, source: &SourceConfig) -> Result<SectionedDocument<LinkEntry>> {
        let rules = ContainerRules::compile(&source.profile)?;
        let mut renderer = open_renderer(&self.config.browser).await?;

        let links = Harvester::new(
            renderer.as_mut(),
            rules,
            source.link_filter(),
            source.section_rule()?,
        )
        .with_pacing(self.config.browser.page_delay())
        .harvest(&source.seeds)
        .await;

        tracing::info!(
            "Harvested {} links in {} sections for '{}'",
            links.len(),
            links.section_count(),
            source.name
        );
        Ok(links)
    }

    /// Extracts every page listed in the source's URL index
    ///
    /// The index is always read back from disk, so a content-only run works
    /// from the file of an earlier harvest.
    pub async fn extract_source(&self, source: &SourceConfig) -> Result<SectionedDocument<PageRecord>> {
        let targets = read_link_list(&self.config.output.urls_path(&source.name))?;
        let rules = ContainerRules::compile(&source.profile)?;
        let mut renderer = open_renderer(&self.config.browser).await?;

        let pages = Extractor::new(renderer.as_mut(), rules)
            .with_mode(source.content_mode)
            .with_items(ItemRules::compile(&source.items)?)
            .with_cleaner(&source.cleaner, source.code_language.as_deref())
            .with_pacing(self.config.browser.page_delay())
            .extract(&targets)
            .await;

        Ok(pages)
    }
}

/// Runs the pipeline for a loaded configuration
///
/// # Example
///
/// ```no_run
/// use docsift::config::load_config;
/// use docsift::crawler::{run_pipeline, Stage};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("docsift.toml"))?;
/// let summaries = run_pipeline(config, Stage::All, None).await?;
/// println!("{} sources processed", summaries.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_pipeline(
    config: Config,
    stage: Stage,
    only: Option<&str>,
) -> Result<Vec<SourceSummary>> {
    Coordinator::new(config, stage).run(only).await
}
