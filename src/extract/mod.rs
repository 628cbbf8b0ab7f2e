//! Content extraction from harvested pages
//!
//! This module handles:
//! - Parsing a URL index back into extraction targets
//! - Rendering every target and isolating its main content
//! - Converting the content to markdown (structured walk, generic converter,
//!   or per-item extraction for reference pages)
//! - Cleaning converter output of navigation leftovers

mod cleaner;
mod link_list;
mod markdown;

pub use cleaner::{CleanerProfile, MarkdownCleaner};
pub use link_list::{parse_link_list, read_link_list};
pub use markdown::structured_markdown;

use crate::crawler::{truncate_message, PageRenderer};
use crate::dom::{ContainerRules, ItemRules};
use crate::model::{LinkTarget, PageRecord, SectionedDocument};
use crate::{DocsiftError, Result};
use scraper::Html;
use serde::Deserialize;
use std::time::Duration;

/// How the cleaned container is turned into markdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentMode {
    /// Element-by-element walk producing headings, lists, code and paragraphs
    #[default]
    Structured,

    /// Generic HTML-to-markdown conversion followed by `MarkdownCleaner`
    Converted,

    /// Targets are `page#id` items of a reference page; each item is
    /// extracted on its own and the page is rendered once per run of items
    Items,
}

/// Converts one rendered page according to the content mode
///
/// # Errors
///
/// * `DocsiftError::Conversion` - The generic converter rejected the HTML
pub fn page_markdown(
    html: &str,
    url: &str,
    rules: &ContainerRules,
    mode: ContentMode,
    cleaner: &MarkdownCleaner,
    code_language: Option<&str>,
) -> Result<String> {
    let document = Html::parse_document(html);
    let scope = rules.scope(&document);

    match mode {
        ContentMode::Structured | ContentMode::Items => Ok(structured_markdown(&scope, code_language)),
        ContentMode::Converted => {
            let converted =
                htmd::convert(&scope.filtered_html()).map_err(|e| DocsiftError::Conversion {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(cleaner.clean(&converted))
        }
    }
}

/// Extracts the listed items of one rendered reference page
///
/// Returns one result per target, in order. A target whose fragment names no
/// item on the page yields `DocsiftError::Conversion`.
pub fn item_records(
    html: &str,
    items: &ItemRules,
    targets: &[&LinkTarget],
    code_language: Option<&str>,
) -> Vec<Result<PageRecord>> {
    let document = Html::parse_document(html);

    targets
        .iter()
        .map(|target| {
            let id = item_id(&target.url);
            let item = items.find(&document, id).ok_or_else(|| DocsiftError::Conversion {
                url: target.url.clone(),
                message: format!("no item with id '{}' on the page", id),
            })?;

            Ok(PageRecord {
                name: target.label.clone(),
                url: target.url.clone(),
                content: items.item_markdown(item, code_language),
            })
        })
        .collect()
}

/// Page part of a target URL (everything before `#`)
fn page_url(url: &str) -> &str {
    url.split_once('#').map_or(url, |(page, _)| page)
}

/// Fragment of a target URL, the item id
fn item_id(url: &str) -> &str {
    url.split_once('#').map_or("", |(_, id)| id)
}

/// Visits extraction targets and builds the sectioned content document
pub struct Extractor<'r> {
    renderer: &'r mut dyn PageRenderer,
    rules: ContainerRules,
    items: Option<ItemRules>,
    mode: ContentMode,
    cleaner: MarkdownCleaner,
    code_language: Option<String>,
    pacing: Duration,
}

impl<'r> Extractor<'r> {
    pub fn new(renderer: &'r mut dyn PageRenderer, rules: ContainerRules) -> Self {
        Self {
            renderer,
            rules,
            items: None,
            mode: ContentMode::default(),
            cleaner: MarkdownCleaner::new(&CleanerProfile::default(), None),
            code_language: None,
            pacing: Duration::ZERO,
        }
    }

    pub fn with_mode(mut self, mode: ContentMode) -> Self {
        self.mode = mode;
        self
    }

    /// Item rules used by `ContentMode::Items`
    pub fn with_items(mut self, items: ItemRules) -> Self {
        self.items = Some(items);
        self
    }

    /// Sets the cleaner profile and the info string for fenced code blocks
    pub fn with_cleaner(mut self, profile: &CleanerProfile, code_language: Option<&str>) -> Self {
        self.cleaner = MarkdownCleaner::new(profile, code_language);
        self.code_language = code_language.map(str::to_string);
        self
    }

    /// Fixed pause after every page, successful or not
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Extracts every target in order
    ///
    /// Failed pages are logged with a shortened message and omitted; the
    /// remaining targets are still processed. Records keep the target's
    /// section and the order of the input.
    pub async fn extract(&mut self, targets: &[LinkTarget]) -> SectionedDocument<PageRecord> {
        let mut progress = Progress::new(targets.len());

        for batch in self.batches(targets) {
            let results = self.extract_batch(&batch).await;
            for (target, result) in batch.iter().zip(results) {
                progress.record(target, result);
            }

            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        tracing::info!(
            "Extracted {} pages in {} sections ({} failed)",
            progress.doc.len(),
            progress.doc.section_count(),
            progress.failed
        );
        progress.doc
    }

    /// Targets rendered together: consecutive items of one page in
    /// `Items` mode, otherwise one target per render
    fn batches<'t>(&self, targets: &'t [LinkTarget]) -> Vec<Vec<&'t LinkTarget>> {
        let mut batches: Vec<Vec<&LinkTarget>> = Vec::new();
        for target in targets {
            let same_page = self.mode == ContentMode::Items
                && batches
                    .last()
                    .and_then(|batch| batch.first())
                    .is_some_and(|first| page_url(&first.url) == page_url(&target.url));

            if same_page {
                if let Some(batch) = batches.last_mut() {
                    batch.push(target);
                    continue;
                }
            }
            batches.push(vec![target]);
        }
        batches
    }

    async fn extract_batch(&mut self, batch: &[&LinkTarget]) -> Vec<Result<PageRecord>> {
        let Some(first) = batch.first() else {
            return Vec::new();
        };

        if self.mode != ContentMode::Items {
            return vec![self.extract_page(first).await];
        }

        let Some(items) = &self.items else {
            return batch
                .iter()
                .map(|target| {
                    Err(DocsiftError::Conversion {
                        url: target.url.clone(),
                        message: "no item rules configured".to_string(),
                    })
                })
                .collect();
        };

        let page = page_url(&first.url);
        tracing::info!("Rendering {} for {} items", page, batch.len());
        match self.renderer.render(page).await {
            Ok(html) => item_records(&html, items, batch, self.code_language.as_deref()),
            Err(e) => {
                let message = e.to_string();
                batch
                    .iter()
                    .map(|target| {
                        Err(DocsiftError::Render {
                            url: target.url.clone(),
                            message: message.clone(),
                        })
                    })
                    .collect()
            }
        }
    }

    async fn extract_page(&mut self, target: &LinkTarget) -> Result<PageRecord> {
        let html = self.renderer.render(&target.url).await?;
        let content = page_markdown(
            &html,
            &target.url,
            &self.rules,
            self.mode,
            &self.cleaner,
            self.code_language.as_deref(),
        )?;

        Ok(PageRecord {
            name: target.label.clone(),
            url: target.url.clone(),
            content,
        })
    }
}

/// Running tally of one extraction run
struct Progress {
    doc: SectionedDocument<PageRecord>,
    total: usize,
    done: usize,
    failed: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            doc: SectionedDocument::new(),
            total,
            done: 0,
            failed: 0,
        }
    }

    fn record(&mut self, target: &LinkTarget, result: Result<PageRecord>) {
        self.done += 1;
        match result {
            Ok(record) => {
                tracing::info!(
                    "[{}/{}] {} ({} chars)",
                    self.done,
                    self.total,
                    target.label,
                    record.content.len()
                );
                self.doc.push_unique(&target.section, record);
            }
            Err(e) => {
                self.failed += 1;
                tracing::warn!(
                    "[{}/{}] Failed {}: {}",
                    self.done,
                    self.total,
                    target.url,
                    truncate_message(&e.to_string(), 100)
                );
            }
        }
    }
}
