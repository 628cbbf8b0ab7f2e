//! Link harvesting from documentation index pages
//!
//! This module handles:
//! - Rendering each seed page through a `PageRenderer`
//! - Collecting main-content links grouped by section
//! - Merging per-seed results into one deduplicated URL index

mod links;
mod sections;

pub use links::{collect_items, collect_links, links_from_html};
pub use sections::{path_section, SectionRule, SectionTracker};

use crate::crawler::{truncate_message, PageRenderer};
use crate::dom::ContainerRules;
use crate::model::{LinkEntry, SectionedDocument};
use crate::url::LinkFilter;
use std::time::Duration;
use url::Url;

/// Visits seed pages and builds the sectioned URL index of a source
pub struct Harvester<'r> {
    renderer: &'r mut dyn PageRenderer,
    rules: ContainerRules,
    filter: LinkFilter,
    section_rule: SectionRule,
    pacing: Duration,
}

impl<'r> Harvester<'r> {
    pub fn new(
        renderer: &'r mut dyn PageRenderer,
        rules: ContainerRules,
        filter: LinkFilter,
        section_rule: SectionRule,
    ) -> Self {
        Self {
            renderer,
            rules,
            filter,
            section_rule,
            pacing: Duration::ZERO,
        }
    }

    /// Fixed pause after every seed visit
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Harvests every seed in order
    ///
    /// A seed that fails to render or has an unparsable URL is logged and
    /// skipped. Per-seed results are merged in seed order with per-section
    /// URL deduplication, and sections left without links are removed.
    pub async fn harvest(&mut self, seeds: &[String]) -> SectionedDocument<LinkEntry> {
        let mut aggregate = SectionedDocument::new();

        for (i, seed) in seeds.iter().enumerate() {
            tracing::info!("Harvesting links from seed {}/{}: {}", i + 1, seeds.len(), seed);

            match self.harvest_seed(seed).await {
                Ok(found) => {
                    tracing::info!(
                        "Found {} links in {} sections on {}",
                        found.len(),
                        found.section_count(),
                        seed
                    );
                    aggregate.merge(found);
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping seed {}: {}",
                        seed,
                        truncate_message(&e.to_string(), 100)
                    );
                }
            }

            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        aggregate.prune_empty();
        aggregate
    }

    async fn harvest_seed(&mut self, seed: &str) -> crate::Result<SectionedDocument<LinkEntry>> {
        let page_url = Url::parse(seed)?;
        let html = self.renderer.render(seed).await?;
        Ok(links_from_html(
            &html,
            &page_url,
            &self.rules,
            &self.filter,
            &self.section_rule,
        ))
    }
}
