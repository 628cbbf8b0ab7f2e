//! Page rendering seam and the plain HTTP renderer
//!
//! This module handles:
//! - The `PageRenderer` trait shared by the harvester and the extractor
//! - Building the HTTP client with the configured user agent and timeout
//! - Fetching static pages and classifying failures

use crate::config::BrowserConfig;
use crate::{DocsiftError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Default user agent when the configuration does not set one
pub const DEFAULT_USER_AGENT: &str = concat!("docsift/", env!("CARGO_PKG_VERSION"));

/// Produces the rendered HTML of a page
///
/// Implementations are used sequentially by one pipeline stage; a failure is
/// scoped to the page that caused it and the renderer stays usable.
#[async_trait]
pub trait PageRenderer: Send {
    /// Navigates to `url` and returns the page HTML once it has settled
    async fn render(&mut self, url: &str) -> Result<String>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The rendering configuration (user agent and navigation timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use docsift::config::BrowserConfig;
/// use docsift::crawler::build_http_client;
///
/// let client = build_http_client(&BrowserConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &BrowserConfig) -> std::result::Result<Client, reqwest::Error> {
    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    Client::builder()
        .user_agent(user_agent)
        .timeout(config.navigation_timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renderer for static documentation pages
///
/// Returns the response body as served; no script execution takes place.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(config: &BrowserConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&mut self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocsiftError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| classify_error(url, e))
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> DocsiftError {
    if error.is_timeout() {
        DocsiftError::Timeout {
            url: url.to_string(),
        }
    } else {
        DocsiftError::Reqwest(error)
    }
}
