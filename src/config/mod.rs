//! Configuration module for docsift
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use docsift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docsift.toml")).unwrap();
//! for source in &config.sources {
//!     println!("{}: {} seeds", source.name, source.seeds.len());
//! }
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, OutputConfig, RenderEngine, SectionRuleKind, SourceConfig,
};

// Re-export parser functions
pub use parser::{config_fingerprint, load_config, load_config_with_hash, parse_config};
