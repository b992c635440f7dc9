//! Visited-set shared by all branches of one sitemap run

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// URLs already claimed by some crawl branch
///
/// Branches run concurrently, so membership check and insertion happen under
/// one lock acquisition in [`VisitedSet::claim`]. The lock is never held
/// across an `.await`.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for the calling branch
    ///
    /// Returns true if the URL was not yet visited. Exactly one caller wins
    /// for any given URL.
    pub fn claim(&self, url: &str) -> bool {
        self.lock().insert(url.to_string())
    }

    /// Returns true if some branch already claimed `url`
    ///
    /// Only a hint for filtering; a later [`claim`](Self::claim) is still
    /// required before crawling.
    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // A panic while holding the lock cannot leave the set half-updated.
        self.urls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
