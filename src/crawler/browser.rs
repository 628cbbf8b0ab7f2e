//! Headless Chrome renderer for client-side rendered documentation

use crate::config::BrowserConfig;
use crate::crawler::fetcher::PageRenderer;
use crate::{DocsiftError, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};

/// One browser process with a single reusable tab
///
/// The Chrome process is shut down when the renderer is dropped.
pub struct ChromeRenderer {
    // Owns the process; the tab is only valid while it lives
    _browser: Browser,
    tab: Arc<Tab>,
    navigation: NavigationSlot,
    navigation_timeout: Duration,
    settle: Duration,
}

impl ChromeRenderer {
    /// Launches Chrome and opens the working tab
    ///
    /// Launching blocks for a while, so it runs on the blocking pool.
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let config = config.clone();
        tokio::task::spawn_blocking(move || Self::launch_blocking(&config)).await?
    }

    fn launch_blocking(config: &BrowserConfig) -> Result<Self> {
        let options = LaunchOptions {
            headless: config.headless,
            sandbox: config.sandbox,
            idle_browser_timeout: config.navigation_timeout() * 2,
            ..Default::default()
        };

        let browser = Browser::new(options).map_err(|e| DocsiftError::BrowserLaunch(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| DocsiftError::BrowserLaunch(format!("failed to open tab: {}", e)))?;
        tab.set_default_timeout(config.navigation_timeout());

        if let Some(agent) = &config.user_agent {
            tab.set_user_agent(agent, None, None)
                .map_err(|e| DocsiftError::BrowserLaunch(format!("failed to set user agent: {}", e)))?;
        }

        tracing::info!(headless = config.headless, "Launched Chrome");

        Ok(Self {
            _browser: browser,
            tab,
            navigation: NavigationSlot::default(),
            navigation_timeout: config.navigation_timeout(),
            settle: config.settle(),
        })
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn render(&mut self, url: &str) -> Result<String> {
        let tab = Arc::clone(&self.tab);
        let target = url.to_string();

        let outcome = self
            .navigation
            .run(self.navigation_timeout, move || {
                tab.navigate_to(&target)?;
                tab.wait_until_navigated()?;
                Ok(())
            })
            .await;

        match outcome {
            None => {
                return Err(DocsiftError::Timeout {
                    url: url.to_string(),
                })
            }
            Some(joined) => joined?.map_err(|e| render_error(url, e))?,
        }

        // Client-side rendering keeps filling the DOM after the load event
        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }

        let tab = Arc::clone(&self.tab);
        tokio::task::spawn_blocking(move || tab.get_content())
            .await?
            .map_err(|e| render_error(url, e))
    }
}

/// Keeps navigations on the tab strictly one at a time
///
/// A navigation that outlives its time limit cannot be cancelled on the
/// blocking pool. It is kept here and the next navigation waits for it.
#[derive(Debug, Default)]
struct NavigationSlot {
    in_flight: Option<JoinHandle<anyhow::Result<()>>>,
}

impl NavigationSlot {
    /// Runs `job` on the blocking pool; `None` when `limit` elapsed first
    async fn run<F>(&mut self, limit: Duration, job: F) -> Option<std::result::Result<anyhow::Result<()>, JoinError>>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        if let Some(previous) = self.in_flight.take() {
            tracing::debug!("Waiting for a timed-out navigation to finish");
            if let Err(e) = previous.await {
                tracing::debug!("Timed-out navigation ended abnormally: {}", e);
            }
        }

        let mut handle = tokio::task::spawn_blocking(job);
        match tokio::time::timeout(limit, &mut handle).await {
            Ok(joined) => Some(joined),
            Err(_) => {
                self.in_flight = Some(handle);
                None
            }
        }
    }
}

fn render_error(url: &str, error: anyhow::Error) -> DocsiftError {
    let message = error.to_string();
    if message.to_lowercase().contains("timed out") {
        DocsiftError::Timeout {
            url: url.to_string(),
        }
    } else {
        DocsiftError::Render {
            url: url.to_string(),
            message,
        }
    }
}
