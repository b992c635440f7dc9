//! Pagewise: scrape a page, pull its files, map its site, and ask an LLM about it
//!
//! This crate implements the concurrent crawl-and-download engine behind the
//! `pagewise` command: a bounded-depth internal-link crawler that produces a
//! sitemap, a concurrent downloader for linked documents and media, and the
//! glue that hands the page's readable text to a language model.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod llm;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Pagewise operations
#[derive(Debug, Error)]
pub enum PagewiseError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Download error: {0}")]
    Download(#[from] crawler::DownloadError),

    #[error("Content extraction error: {0}")]
    Extract(#[from] extract::ExtractError),

    #[error("LLM error: {0}")]
    Llm(#[from] llm::LlmError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::BranchState,
        to: state::BranchState,
    },

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

    #[error("Invalid file extension: {0}")]
    InvalidExtension(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing network authority in URL: {0}")]
    MissingAuthority(String),
}

/// Result type alias for Pagewise operations
pub type Result<T> = std::result::Result<T, PagewiseError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{scan_and_download, DownloadOutcome, DownloadReport, ScrapeResult, Scraper, Sitemap};
pub use state::BranchState;
pub use crate::url::{normalize_crawl_url, ExtensionSet, NetworkAuthority};
