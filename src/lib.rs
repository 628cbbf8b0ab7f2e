//! docsift: documentation site harvester
//!
//! This crate crawls documentation sites, harvests their links into a sectioned
//! URL index, then visits every indexed page and consolidates its readable text
//! into a single markdown document.

pub mod config;
pub mod crawler;
pub mod dom;
pub mod extract;
pub mod harvest;
pub mod model;
pub mod output;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for docsift operations
#[derive(Debug, Error)]
pub enum DocsiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("Render error for {url}: {message}")]
    Render { url: String, message: String },

    #[error("Navigation timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTML conversion error for {url}: {message}")]
    Conversion { url: String, message: String },

    #[error("Link list not found: {}", .0.display())]
    MissingLinkList(PathBuf),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Unsupported link scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Fragment-only link: {0}")]
    FragmentOnly(String),

    #[error("Empty link")]
    Empty,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for docsift operations
pub type Result<T> = std::result::Result<T, DocsiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{LinkEntry, LinkTarget, PageRecord, SectionedDocument};
pub use output::assemble;
