//! Terminal report
//!
//! Prints what the run produced and warns about each part that came out
//! empty. An entirely empty run is reported, not treated as an error.

use crate::output::summary::RunSummary;

/// Which parts of a run produced something
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPresence {
    pub text: bool,
    pub extraction: bool,
    pub downloads: bool,
    pub sitemap: bool,
}

impl RunPresence {
    pub fn of(summary: &RunSummary) -> Self {
        Self {
            text: summary.text_chars.is_some(),
            extraction: summary.extraction.is_some(),
            downloads: summary.downloads_attempted() > 0,
            sitemap: !summary.sitemap.is_empty(),
        }
    }

    /// True when the run found nothing at all
    pub fn is_empty(&self) -> bool {
        !(self.text || self.downloads || self.sitemap)
    }
}

/// Prints the run report to stdout
///
/// Empty parts are logged as warnings.
pub fn print_report(summary: &RunSummary) {
    let presence = RunPresence::of(summary);

    println!("=== Pagewise Report ===\n");
    println!("URL: {}", summary.url);
    if let Some(duration) = summary.duration_seconds() {
        println!("Duration: {}s", duration);
    }
    println!();

    if let Some(extraction) = &summary.extraction {
        match &summary.model {
            Some(model) => println!("Extracted Information ({}):", model),
            None => println!("Extracted Information:"),
        }
        println!("{}", extraction.trim());
        println!();
    } else if let Some(chars) = summary.text_chars {
        println!("Page text: {} characters (no LLM extraction)", chars);
        println!();
    } else {
        tracing::warn!("No content was scraped from the page");
    }

    if presence.downloads {
        println!("Downloads:");
        println!(
            "  {} successful, {} failed ({:.1}% success)",
            summary.downloaded_files.len(),
            summary.failed_downloads.len(),
            summary.download_success_rate()
        );
        for file in &summary.downloaded_files {
            println!("  + {}", file);
        }
        for failed in &summary.failed_downloads {
            println!("  - {} ({})", failed.url, failed.reason);
        }
        println!();
    } else {
        tracing::warn!("No matching files were found to download");
    }

    if presence.sitemap {
        println!("Sitemap: {} internal URLs", summary.sitemap.len());
        println!(
            "  Crawled: {}, failed: {}, skipped: {}",
            summary.crawl.done, summary.crawl.failed, summary.crawl.skipped
        );
    } else {
        tracing::warn!("Sitemap is empty");
    }

    if presence.is_empty() {
        println!("\nNothing was found at {}", summary.url);
    }
}
