//! Pagewise main entry point
//!
//! This is the command-line interface: scrape one URL, download its linked
//! files, map its internal links, and ask an LLM about its text.

use anyhow::Context;
use clap::Parser;
use pagewise::config::{load_config_with_hash, validate, Config};
use pagewise::extract::ReadableTextExtractor;
use pagewise::llm::{LlmClient, LlmSettings, Provider};
use pagewise::output::{generate_markdown_report, print_report, save_sitemap, RunSummary};
use pagewise::Scraper;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Pagewise: scrape a page and ask an LLM about it
///
/// Pagewise extracts the readable text of a web page, downloads the
/// documents and media it links to, crawls its internal links into a
/// sitemap, and sends the text with your prompt to an LLM.
#[derive(Parser, Debug)]
#[command(name = "pagewise")]
#[command(version)]
#[command(about = "Scrape a page, download its files, map its site, and ask an LLM about it", long_about = None)]
struct Cli {
    /// The URL to scrape
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// What to ask the LLM about the page
    #[arg(short, long)]
    prompt: Option<String>,

    /// Depth to crawl for the sitemap (0 = only the page itself)
    #[arg(long, value_name = "N")]
    sitemap_depth: Option<u32>,

    /// LLM provider
    #[arg(long, value_enum)]
    provider: Option<Provider>,

    /// Model name (defaults to the provider's default)
    #[arg(long)]
    model: Option<String>,

    /// Directory for downloaded files
    #[arg(long, value_name = "DIR")]
    download_dir: Option<String>,

    /// Where to write the sitemap JSON
    #[arg(long, value_name = "FILE")]
    sitemap_path: Option<String>,

    /// Also write a markdown report to this file
    #[arg(long, value_name = "FILE")]
    report: Option<String>,

    /// Scrape only; do not call the LLM
    #[arg(long)]
    skip_llm: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // API keys may live in a .env file
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let (config, config_hash) = load_configuration(cli.config.as_deref())?;
    let config = apply_overrides(config, &cli);
    validate(&config).context("Invalid settings")?;

    handle_scrape(&cli, config, config_hash).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagewise=info,warn"),
            1 => EnvFilter::new("pagewise=debug,info"),
            2 => EnvFilter::new("pagewise=trace,debug"),
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

/// Loads the configuration file if one was given, otherwise the defaults
fn load_configuration(path: Option<&Path>) -> anyhow::Result<(Config, Option<String>)> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok((Config::default(), None));
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok((config, Some(hash)))
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Command-line flags take precedence over the configuration file
fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(depth) = cli.sitemap_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(dir) = &cli.download_dir {
        config.download.directory = dir.clone();
    }
    if let Some(path) = &cli.sitemap_path {
        config.output.sitemap_path = path.clone();
    }
    if let Some(path) = &cli.report {
        config.output.report_path = Some(path.clone());
    }
    if let Some(provider) = cli.provider {
        config.llm.provider = provider;
    }
    if let Some(model) = &cli.model {
        config.llm.model = Some(model.clone());
    }
    if let Some(prompt) = &cli.prompt {
        config.llm.prompt = prompt.clone();
    }
    config
}

/// Handles the scrape, the LLM call, and the reports
async fn handle_scrape(
    cli: &Cli,
    config: Config,
    config_hash: Option<String>,
) -> anyhow::Result<()> {
    let mut summary = RunSummary::new(cli.url.as_str());
    summary.config_hash = config_hash;

    let sitemap_path = PathBuf::from(&config.output.sitemap_path);
    let report_path = config.output.report_path.clone().map(PathBuf::from);
    let llm_config = config.llm.clone();

    let scraper = Scraper::new(config).context("Failed to set up HTTP client")?;
    let extractor = ReadableTextExtractor::new(scraper.fetcher().clone());

    tracing::info!(
        "Scraping website & generating sitemap (depth {})",
        scraper.config().crawler.max_depth
    );
    let result = scraper.scrape(&cli.url, &extractor).await;
    summary.record_scrape(&result);

    match (&result.text, cli.skip_llm) {
        (Some(_), true) => tracing::info!("Skipping LLM extraction (--skip-llm)"),
        (Some(text), false) => {
            // An LLM failure still leaves the scrape results to report.
            match ask_llm(&llm_config, text).await {
                Ok((model, answer)) => {
                    summary.model = Some(model);
                    summary.extraction = Some(answer);
                }
                Err(e) => tracing::error!("LLM extraction failed: {:#}", e),
            }
        }
        (None, _) => tracing::warn!("No text to send to the LLM"),
    }

    summary.finish();
    print_report(&summary);

    if !result.sitemap.is_empty() {
        if let Err(e) = save_sitemap(&result.sitemap, &sitemap_path) {
            tracing::error!("Error saving sitemap to {}: {}", sitemap_path.display(), e);
        }
    }

    if let Some(path) = report_path {
        generate_markdown_report(&summary, &path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    Ok(())
}

/// Sends the page text to the configured provider
///
/// Returns a label for the model used and its answer.
async fn ask_llm(
    config: &pagewise::config::LlmConfig,
    text: &str,
) -> anyhow::Result<(String, String)> {
    let client = LlmClient::new(LlmSettings::from_config(config)?)?;
    let answer = client.extract(text, &config.prompt).await?;

    let settings = client.settings();
    Ok((format!("{} ({})", settings.provider, settings.model), answer))
}
