//! Download orchestrator
//!
//! Scans one page for links to target files and downloads all of them at
//! once. There is no concurrency cap: every qualifying link is attempted
//! simultaneously, and one failed download never cancels the others.

use crate::crawler::downloader::{download, DownloadOutcome};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_links;
use crate::url::{is_http, ExtensionSet};
use futures::future::join_all;
use reqwest::StatusCode;
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Every download attempted for one page, in link order
#[derive(Debug, Default)]
pub struct DownloadReport {
    outcomes: Vec<DownloadOutcome>,
}

impl DownloadReport {
    pub fn new(outcomes: Vec<DownloadOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[DownloadOutcome] {
        &self.outcomes
    }

    /// Number of downloads attempted
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.successful()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Files written by the successful downloads
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(DownloadOutcome::path)
    }
}

/// Fetches `page_url`, finds links to target files, and downloads them all
///
/// A page that cannot be fetched, answers with anything but 200, or is not
/// HTML yields an empty report.
pub async fn scan_and_download(
    fetcher: &Fetcher,
    page_url: &Url,
    target_dir: &Path,
    extensions: &ExtensionSet,
) -> DownloadReport {
    tracing::info!("Looking for downloadable files on: {}", page_url);

    let response = match fetcher.fetch(page_url).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Error fetching page for file download analysis: {}", e);
            return DownloadReport::default();
        }
    };

    if response.status() != StatusCode::OK || !response.is_html() {
        tracing::warn!(
            "Not scanning {} for files (status {}, content type {})",
            page_url,
            response.status().as_u16(),
            response.content_type().unwrap_or("none")
        );
        return DownloadReport::default();
    }

    let base_url = response.url().clone();
    let html = match response.text().await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!("Error reading page for file download analysis: {}", e);
            return DownloadReport::default();
        }
    };

    let targets = find_download_targets(&html, &base_url, extensions);
    if targets.is_empty() {
        tracing::info!("No links matching target file extensions found.");
        return DownloadReport::default();
    }

    tracing::info!("Starting download of {} files...", targets.len());
    let outcomes = join_all(
        targets
            .iter()
            .map(|target| download(fetcher, target, target_dir)),
    )
    .await;

    let report = DownloadReport::new(outcomes);
    tracing::info!(
        "Downloads completed: {} successful, {} failed.",
        report.successful(),
        report.failed()
    );
    report
}

/// Links on the page whose path extension is a target and whose scheme is
/// http(s)
///
/// The same URL linked twice is one target.
pub fn find_download_targets(html: &str, base_url: &Url, extensions: &ExtensionSet) -> Vec<Url> {
    let mut seen = HashSet::new();

    extract_links(html, base_url)
        .into_iter()
        .filter(|link| extensions.matches(link))
        .filter(|link| {
            if is_http(link) {
                tracing::debug!("Found potential file link: {}", link);
                true
            } else {
                tracing::debug!("Skipping non-http(s) link: {}", link);
                false
            }
        })
        .filter(|link| seen.insert(link.clone()))
        .collect()
}
