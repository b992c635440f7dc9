//! Run summary types
//!
//! A [`RunSummary`] is the flattened record of one `pagewise` run, shared by
//! the terminal report and the markdown report.

use crate::crawler::{CrawlTally, DownloadOutcome, ScrapeResult};
use chrono::{DateTime, Utc};

/// A download that did not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDownload {
    pub url: String,
    pub reason: String,
}

/// Summary of one scrape run
#[derive(Debug, Clone)]
pub struct RunSummary {
    // Run metadata
    pub url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub config_hash: Option<String>,

    // Page text
    pub text_chars: Option<usize>,

    // LLM extraction
    pub model: Option<String>,
    pub extraction: Option<String>,

    // Downloads
    pub downloaded_files: Vec<String>,
    pub failed_downloads: Vec<FailedDownload>,

    // Sitemap
    pub sitemap: Vec<String>,
    pub crawl: CrawlTally,
}

impl RunSummary {
    /// Creates an empty summary for a run starting now
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            started_at: Utc::now(),
            finished_at: None,
            config_hash: None,
            text_chars: None,
            model: None,
            extraction: None,
            downloaded_files: Vec::new(),
            failed_downloads: Vec::new(),
            sitemap: Vec::new(),
            crawl: CrawlTally::default(),
        }
    }

    /// Copies the scrape's text size, download outcomes and sitemap
    pub fn record_scrape(&mut self, result: &ScrapeResult) {
        self.text_chars = result.text.as_ref().map(|t| t.chars().count());

        for outcome in result.downloads.outcomes() {
            match outcome {
                DownloadOutcome::Success { path, .. } => {
                    self.downloaded_files.push(path.display().to_string());
                }
                DownloadOutcome::Failure { url, error } => {
                    self.failed_downloads.push(FailedDownload {
                        url: url.to_string(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        self.sitemap = result.sitemap.urls().to_vec();
        self.crawl = result.crawl;
    }

    /// Marks the run as finished now
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn downloads_attempted(&self) -> usize {
        self.downloaded_files.len() + self.failed_downloads.len()
    }

    /// Seconds between start and finish, if finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Share of attempted downloads that succeeded, as a percentage
    pub fn download_success_rate(&self) -> f64 {
        let attempted = self.downloads_attempted();
        if attempted == 0 {
            return 0.0;
        }
        (self.downloaded_files.len() as f64 / attempted as f64) * 100.0
    }
}
