//! In-memory renderer for unit tests

use crate::crawler::PageRenderer;
use crate::{DocsiftError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Serves fixed HTML per URL; unknown URLs fail like an HTTP 404
#[derive(Debug, Default)]
pub struct StaticRenderer {
    pages: HashMap<String, String>,
    visits: usize,
}

impl StaticRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn visits(&self) -> usize {
        self.visits
    }
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    async fn render(&mut self, url: &str) -> Result<String> {
        self.visits += 1;
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| DocsiftError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}
