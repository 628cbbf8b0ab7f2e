//! Crawler module for page rendering and pipeline coordination
//!
//! This module contains the network-facing side of docsift, including:
//! - The `PageRenderer` seam with headless Chrome and plain HTTP implementations
//! - Sequencing harvest and extraction for every configured source

mod browser;
mod coordinator;
mod fetcher;

#[cfg(test)]
pub(crate) mod testing;

pub use browser::ChromeRenderer;
pub use coordinator::{run_pipeline, Coordinator, SourceSummary, Stage};
pub use fetcher::{build_http_client, HttpRenderer, PageRenderer, DEFAULT_USER_AGENT};

use crate::config::{BrowserConfig, RenderEngine};
use crate::Result;

/// Opens the renderer selected by the configuration
///
/// The returned renderer owns its browser process (if any); dropping it
/// releases the process.
///
/// # Errors
///
/// * `DocsiftError::BrowserLaunch` - Chrome could not be started
/// * `DocsiftError::Reqwest` - The HTTP client could not be built
pub async fn open_renderer(config: &BrowserConfig) -> Result<Box<dyn PageRenderer>> {
    match config.engine {
        RenderEngine::Chrome => Ok(Box::new(ChromeRenderer::launch(config).await?)),
        RenderEngine::Http => Ok(Box::new(HttpRenderer::new(config)?)),
    }
}

/// Shortens an error message for a log line, appending `...` when cut
///
/// Cuts on a character boundary.
///
/// # Examples
///
/// ```
/// use docsift::crawler::truncate_message;
///
/// assert_eq!(truncate_message("short", 100), "short");
/// assert_eq!(truncate_message("abcdef", 3), "abc...");
/// ```
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &message[..idx]),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_message_respects_char_boundaries() {
        let message = "página ".repeat(30);
        let truncated = truncate_message(&message, 100);
        assert_eq!(truncated.chars().count(), 103);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_message_exact_length() {
        assert_eq!(truncate_message("abc", 3), "abc");
    }

    #[tokio::test]
    async fn test_open_http_renderer() {
        let config = BrowserConfig {
            engine: RenderEngine::Http,
            ..BrowserConfig::default()
        };
        assert!(open_renderer(&config).await.is_ok());
    }
}
