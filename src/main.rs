//! docsift main entry point
//!
//! This is the command-line interface for the docsift documentation harvester.

use anyhow::{bail, Context};
use clap::Parser;
use docsift::config::{load_config_with_hash, Config, RenderEngine};
use docsift::crawler::{run_pipeline, SourceSummary, Stage};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// docsift: documentation site harvester
///
/// docsift renders documentation index pages, collects their links into a
/// sectioned URL index, then visits every indexed page and consolidates its
/// readable text into a single markdown document per source.
#[derive(Parser, Debug)]
#[command(name = "docsift")]
#[command(version)]
#[command(about = "Harvest documentation sites into consolidated markdown", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Only process the source with this name
    #[arg(short, long, value_name = "NAME")]
    source: Option<String>,

    /// Harvest links and write the URL index only
    #[arg(long, conflicts_with = "content_only")]
    urls_only: bool,

    /// Extract content from an existing URL index only
    #[arg(long, conflicts_with = "urls_only")]
    content_only: bool,

    /// Validate config and show what would be processed without rendering anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn stage(&self) -> Stage {
        if self.urls_only {
            Stage::UrlsOnly
        } else if self.content_only {
            Stage::ContentOnly
        } else {
            Stage::All
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(name) = &cli.source {
        if config.source(name).is_none() {
            bail!("no source named '{}' in {}", name, cli.config.display());
        }
    }

    if cli.dry_run {
        handle_dry_run(&config, cli.source.as_deref(), cli.stage());
        return Ok(());
    }

    let summaries = run_pipeline(config, cli.stage(), cli.source.as_deref())
        .await
        .context("pipeline failed")?;
    report(&summaries);

    let failed = summaries.iter().filter(|s| !s.is_ok()).count();
    if failed > 0 {
        bail!("{} of {} sources failed", failed, summaries.len());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docsift=info,warn"),
            1 => EnvFilter::new("docsift=debug,info"),
            2 => EnvFilter::new("docsift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what each stage would do
fn handle_dry_run(config: &Config, only: Option<&str>, stage: Stage) {
    println!("=== docsift Dry Run ===\n");

    println!("Renderer:");
    match config.browser.engine {
        RenderEngine::Chrome => println!(
            "  Engine: chrome (headless: {}, sandbox: {})",
            config.browser.headless, config.browser.sandbox
        ),
        RenderEngine::Http => println!("  Engine: http"),
    }
    println!("  Navigation timeout: {}ms", config.browser.navigation_timeout_ms);
    println!("  Settle time: {}ms", config.browser.settle_ms);
    println!("  Page delay: {}ms", config.browser.page_delay_ms);

    println!("\nOutput directory: {}", config.output.directory.display());
    println!("Stage: {:?}", stage);

    let sources = config
        .sources
        .iter()
        .filter(|s| only.map_or(true, |name| s.name == name));

    for source in sources {
        println!("\nSource '{}' ({}):", source.name, source.title);
        println!("  Seeds ({}):", source.seeds.len());
        for seed in &source.seeds {
            println!("    * {}", seed);
        }
        if source.allow.is_empty() {
            println!("  Allow: every link");
        } else {
            println!("  Allow: {}", source.allow.join(", "));
        }
        println!("  Section rule: {:?}", source.section_rule);
        println!("  Content mode: {:?}", source.content_mode);
        if stage.harvests() {
            println!("  URL index -> {}", config.output.urls_path(&source.name).display());
        }
        if stage.extracts() {
            println!("  Content   -> {}", config.output.content_path(&source.name).display());
        }
    }

    println!("\n✓ Configuration is valid");
}

fn report(summaries: &[SourceSummary]) {
    for summary in summaries {
        match (summary.links, &summary.urls_path) {
            (Some(links), Some(path)) => {
                tracing::info!("'{}': {} links -> {}", summary.name, links, path.display())
            }
            (Some(_), None) => tracing::warn!("'{}': no links harvested, index left as is", summary.name),
            _ => {}
        }
        if let (Some(pages), Some(path)) = (summary.pages, &summary.content_path) {
            tracing::info!("'{}': {} pages -> {}", summary.name, pages, path.display());
        }
        if let Some(error) = &summary.error {
            tracing::error!("'{}': {}", summary.name, error);
        }
    }
}
