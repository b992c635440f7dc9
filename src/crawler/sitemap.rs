//! Internal crawler - bounded-depth sitemap generation
//!
//! Each crawl branch handles one URL at one depth:
//!
//! ```text
//! Pending --(too deep | already claimed)--> Skipped
//! Pending --> Fetching --(not HTML)--> Done
//!             Fetching --> Parsing --> Done
//!             Fetching | Parsing --(error)--> Failed
//! ```
//!
//! Children of a branch run concurrently and are joined before the branch
//! returns, so a run finishes only when every branch it spawned has. The
//! shared [`VisitedSet`] is claimed before a URL is fetched; a URL is crawled
//! at most once per run even across link cycles.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_links;
use crate::state::{BranchState, VisitedSet};
use crate::url::{
    is_fragment_only, normalize_crawl_url, normalize_parsed, ExtensionSet, NetworkAuthority,
};
use crate::PagewiseError;
use futures::future::{join_all, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::Mutex;
use url::Url;

/// Sorted, deduplicated list of internal URLs found by one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sitemap {
    urls: Vec<String>,
}

impl Sitemap {
    /// Builds a sitemap, sorting and deduplicating the URLs
    pub fn new<I>(urls: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let urls: BTreeSet<String> = urls.into_iter().collect();
        Self {
            urls: urls.into_iter().collect(),
        }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.binary_search_by(|u| u.as_str().cmp(url)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// How many branches of a run ended in each terminal state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlTally {
    pub done: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl CrawlTally {
    fn record(&mut self, state: BranchState) {
        if !state.is_terminal() {
            tracing::warn!("Branch ended in non-terminal state {}", state);
            return;
        }
        match state {
            BranchState::Done => self.done += 1,
            BranchState::Skipped => self.skipped += 1,
            _ => self.failed += 1,
        }
    }

    /// Branches that claimed a URL (done + failed)
    pub fn visited(&self) -> u64 {
        self.done + self.failed
    }
}

/// Generates sitemaps by crawling links internal to the seed URL
#[derive(Debug, Clone)]
pub struct SitemapBuilder {
    fetcher: Fetcher,
    max_depth: u32,
    file_extensions: ExtensionSet,
}

impl SitemapBuilder {
    /// Creates a builder crawling at most `max_depth` hops from the seed
    ///
    /// Depth 0 visits only the seed itself.
    pub fn new(fetcher: Fetcher, max_depth: u32) -> Self {
        Self {
            fetcher,
            max_depth,
            file_extensions: ExtensionSet::default(),
        }
    }

    /// Leaves links to files with these extensions out of the crawl
    ///
    /// Such links are downloads rather than pages; they are neither claimed
    /// nor listed in the sitemap.
    pub fn skip_files(mut self, extensions: ExtensionSet) -> Self {
        self.file_extensions = extensions;
        self
    }

    /// Crawls from `seed` and returns every internal URL visited, sorted
    ///
    /// An invalid seed (unparsable, not http(s), or without a host) yields an
    /// empty sitemap.
    pub async fn generate_sitemap(&self, seed: &str) -> Sitemap {
        self.generate_with_tally(seed).await.0
    }

    /// Same as [`generate_sitemap`](Self::generate_sitemap), also returning
    /// the per-state branch counts
    pub async fn generate_with_tally(&self, seed: &str) -> (Sitemap, CrawlTally) {
        let seed_url = match normalize_crawl_url(seed) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Invalid start URL for sitemap generation: {} ({})", seed, e);
                return (Sitemap::default(), CrawlTally::default());
            }
        };
        let Some(authority) = NetworkAuthority::from_url(&seed_url) else {
            tracing::warn!("Invalid start URL for sitemap generation: {}", seed);
            return (Sitemap::default(), CrawlTally::default());
        };

        tracing::info!(
            "Generating sitemap starting from: {} (max depth: {})",
            seed_url,
            self.max_depth
        );

        let run = CrawlRun {
            fetcher: &self.fetcher,
            authority,
            max_depth: self.max_depth,
            file_extensions: &self.file_extensions,
            visited: VisitedSet::new(),
            tally: Mutex::new(CrawlTally::default()),
        };

        let found = run.crawl_branch(seed_url, 0).await;
        let tally = run.tally();

        debug_assert_eq!(found.len(), run.visited.len());
        tracing::info!(
            "Sitemap generation complete. Found {} unique internal URLs.",
            found.len()
        );

        (Sitemap::new(found), tally)
    }
}

/// State of one sitemap run, shared by all of its branches
struct CrawlRun<'a> {
    fetcher: &'a Fetcher,
    authority: NetworkAuthority,
    max_depth: u32,
    file_extensions: &'a ExtensionSet,
    visited: VisitedSet,
    tally: Mutex<CrawlTally>,
}

impl CrawlRun<'_> {
    /// Runs one branch; never fails
    ///
    /// Returns the branch's URL (if it claimed it) plus everything its
    /// children found.
    fn crawl_branch(&self, url: Url, depth: u32) -> BoxFuture<'_, BTreeSet<String>> {
        async move {
            let mut state = BranchState::Pending;
            let mut found = BTreeSet::new();

            if depth > self.max_depth || !self.visited.claim(url.as_str()) {
                state = BranchState::Skipped;
                tracing::trace!("Skipping {} at depth {}", url, depth);
                self.record(state);
                return found;
            }

            found.insert(url.to_string());

            match self.visit(&url, depth, &mut state).await {
                Ok(children) => found.extend(children),
                Err(e) => {
                    tracing::warn!("Error crawling {}: {}", url, e);
                    if state.can_transition_to(BranchState::Failed) {
                        state = BranchState::Failed;
                    }
                }
            }

            self.record(state);
            found
        }
        .boxed()
    }

    async fn visit(
        &self,
        url: &Url,
        depth: u32,
        state: &mut BranchState,
    ) -> Result<BTreeSet<String>, PagewiseError> {
        state.advance(BranchState::Fetching)?;
        tracing::debug!("Crawling (depth {}): {}", depth, url);

        let response = self.fetcher.fetch(url).await?;
        if !response.is_html() {
            tracing::debug!(
                "Skipping non-HTML page: {} ({})",
                url,
                response.content_type().unwrap_or("no content type")
            );
            state.advance(BranchState::Done)?;
            return Ok(BTreeSet::new());
        }

        let page_url = response.url().clone();
        let html = response.text().await?;
        state.advance(BranchState::Parsing)?;

        let children = self.internal_links(&html, &page_url);
        tracing::trace!("{} yields {} new internal links", url, children.len());

        let results = join_all(
            children
                .into_iter()
                .map(|child| self.crawl_branch(child, depth + 1)),
        )
        .await;

        state.advance(BranchState::Done)?;
        Ok(results.into_iter().flatten().collect())
    }

    /// Links on the page worth a branch: same authority, not fragment-only,
    /// not a skipped file, normalized, not yet visited, first occurrence on
    /// the page
    fn internal_links(&self, html: &str, page_url: &Url) -> Vec<Url> {
        let mut seen = HashSet::new();

        extract_links(html, page_url)
            .into_iter()
            .filter(|link| self.authority.contains(link))
            .filter(|link| !is_fragment_only(link, page_url))
            .filter(|link| !self.file_extensions.matches(link))
            .filter_map(|link| normalize_parsed(&link).ok())
            .filter(|link| !self.visited.contains(link.as_str()))
            .filter(|link| seen.insert(link.to_string()))
            .collect()
    }

    fn record(&self, state: BranchState) {
        self.tally
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .record(state);
    }

    fn tally(&self) -> CrawlTally {
        *self
            .tally
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
