use crate::config::types::{BrowserConfig, Config, OutputConfig, SectionRuleKind, SourceConfig};
use crate::dom::{ContainerRules, ItemRules};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_browser_config(&config.browser)?;
    validate_output_config(&config.output)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates rendering and pacing configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.navigation_timeout_ms < 1_000 {
        return Err(ConfigError::Validation(format!(
            "navigation_timeout_ms must be >= 1000ms, got {}ms",
            config.navigation_timeout_ms
        )));
    }

    if let Some(agent) = &config.user_agent {
        if agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user_agent cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates every source and the uniqueness of their names
fn validate_sources(sources: &[SourceConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for source in sources {
        validate_source(source)?;
        if !seen.insert(source.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate source name '{}'",
                source.name
            )));
        }
    }
    Ok(())
}

fn validate_source(source: &SourceConfig) -> Result<(), ConfigError> {
    validate_source_name(&source.name)?;

    if source.title.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "Source '{}' must have a title",
            source.name
        )));
    }

    if source.seeds.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Source '{}' must have at least one seed URL",
            source.name
        )));
    }

    for seed in &source.seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use http or https",
                seed
            )));
        }
    }

    if source.allow.iter().any(|pattern| pattern.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "Source '{}' has an empty allow pattern",
            source.name
        )));
    }

    if source.section_rule == SectionRuleKind::PathSegment {
        match source.section_base_path.as_deref() {
            Some(base) if base.starts_with('/') => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "Source '{}' uses section-rule = \"path-segment\" and needs a section-base-path starting with '/'",
                    source.name
                )));
            }
        }
    }

    if source.profile.main.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Source '{}' must list at least one main-content selector",
            source.name
        )));
    }

    // Surfaces selector syntax errors at load time rather than mid-crawl
    ContainerRules::compile(&source.profile)?;
    ItemRules::compile(&source.items)?;

    Ok(())
}

/// Source names end up in file names: alphanumerics, hyphens and underscores only
fn validate_source_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "source name cannot be empty".to_string(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "source name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            name
        )));
    }

    Ok(())
}
