//! Crawler module for page fetching, file downloads and sitemap generation
//!
//! This module contains the core crawl-and-download engine:
//! - HTTP fetching with per-request timeouts ([`Fetcher`])
//! - Anchor extraction ([`extract_links`])
//! - Streaming file downloads ([`download`])
//! - Bounded-depth internal crawling ([`SitemapBuilder`])
//! - Concurrent download of a page's linked files ([`scan_and_download`])
//!
//! [`Scraper::scrape`] ties them together for one URL.

mod downloader;
mod fetcher;
mod orchestrator;
mod parser;
mod sitemap;

pub use downloader::{
    download, filename_from_content_disposition, filename_from_url, sanitize_filename,
    DownloadError, DownloadOutcome, CHUNK_SIZE,
};
pub use fetcher::{build_http_client, FetchError, FetchResponse, Fetcher};
pub use orchestrator::{find_download_targets, scan_and_download, DownloadReport};
pub use parser::{extract_links, page_title};
pub use sitemap::{CrawlTally, Sitemap, SitemapBuilder};

use crate::config::Config;
use crate::extract::ContentExtractor;
use crate::url::{is_http, ExtensionSet};
use crate::PagewiseError;
use std::path::PathBuf;
use url::Url;

/// Everything one scrape produced
///
/// Each part is independently best-effort: a page whose text could not be
/// extracted may still have a sitemap and downloads, and vice versa.
#[derive(Debug, Default)]
pub struct ScrapeResult {
    /// Readable text of the page, if extraction succeeded
    pub text: Option<String>,
    pub downloads: DownloadReport,
    pub sitemap: Sitemap,
    pub crawl: CrawlTally,
}

impl ScrapeResult {
    /// True when nothing at all was found
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.downloads.is_empty() && self.sitemap.is_empty()
    }
}

/// Runs scrapes with one shared HTTP client
#[derive(Debug, Clone)]
pub struct Scraper {
    config: Config,
    fetcher: Fetcher,
    extensions: ExtensionSet,
}

impl Scraper {
    /// Creates a scraper from a validated configuration
    pub fn new(config: Config) -> Result<Self, PagewiseError> {
        let fetcher = Fetcher::new(&config.crawler)?;
        let extensions = ExtensionSet::new(&config.download.extensions);

        Ok(Self {
            config,
            fetcher,
            extensions,
        })
    }

    /// The fetcher shared by every part of a scrape
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scrapes `url`: extracts its text, downloads its linked files and
    /// crawls its internal links
    ///
    /// Never fails. Every part that cannot be produced is left empty and the
    /// reason is logged.
    pub async fn scrape<E>(&self, url: &str, extractor: &E) -> ScrapeResult
    where
        E: ContentExtractor + ?Sized,
    {
        let mut result = ScrapeResult::default();

        match Url::parse(url) {
            Ok(page_url) if is_http(&page_url) => {
                tracing::info!("Scraping content from: {}", page_url);
                result.text = match extractor.extract(&page_url).await {
                    Ok(text) => Some(text),
                    Err(e) => {
                        tracing::warn!("Content extraction failed for {}: {}", page_url, e);
                        None
                    }
                };

                let target_dir = PathBuf::from(&self.config.download.directory);
                result.downloads =
                    scan_and_download(&self.fetcher, &page_url, &target_dir, &self.extensions)
                        .await;
            }
            Ok(page_url) => {
                tracing::warn!("Not scraping {}: only http and https are supported", page_url);
            }
            Err(e) => {
                tracing::warn!("Not scraping {}: {}", url, e);
            }
        }

        let builder = SitemapBuilder::new(self.fetcher.clone(), self.config.crawler.max_depth)
            .skip_files(self.extensions.clone());
        let (sitemap, crawl) = builder.generate_with_tally(url).await;
        result.sitemap = sitemap;
        result.crawl = crawl;

        result
    }
}
