//! Markdown report generation
//!
//! This module renders a [`RunSummary`] as a markdown document: run
//! metadata, the LLM extraction, the download tally and the sitemap.

use crate::output::summary::RunSummary;
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Sitemap entries listed before the report truncates
const MAX_SITEMAP_ENTRIES: usize = 200;

/// Writes the markdown report for a run
///
/// # Arguments
///
/// * `summary` - The run summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_report(summary: &RunSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Report written to {}", output_path.display());
    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_report(summary: &RunSummary) -> String {
    let mut md = String::new();

    md.push_str("# Pagewise Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **URL**: {}\n", summary.url));
    md.push_str(&format!(
        "- **Started**: {}\n",
        summary.started_at.to_rfc3339()
    ));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = summary.duration_seconds() {
        md.push_str(&format!("- **Duration**: {} seconds\n", duration));
    }
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Extraction
    md.push_str("## Extraction\n\n");
    match summary.text_chars {
        Some(chars) => md.push_str(&format!("Page text: {} characters.\n\n", chars)),
        None => md.push_str("No text could be extracted from the page.\n\n"),
    }
    if let Some(extraction) = &summary.extraction {
        if let Some(model) = &summary.model {
            md.push_str(&format!("Answer from {}:\n\n", model));
        }
        md.push_str(extraction.trim());
        md.push_str("\n\n");
    }

    // Downloads
    md.push_str("## Downloads\n\n");
    md.push_str("| Result | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!(
        "| Successful | {} |\n",
        summary.downloaded_files.len()
    ));
    md.push_str(&format!("| Failed | {} |\n\n", summary.failed_downloads.len()));

    if !summary.downloaded_files.is_empty() {
        for file in &summary.downloaded_files {
            md.push_str(&format!("- {}\n", file));
        }
        md.push('\n');
    }

    if !summary.failed_downloads.is_empty() {
        md.push_str("### Failed Downloads\n\n");
        md.push_str("| URL | Reason |\n");
        md.push_str("|-----|--------|\n");
        for failed in &summary.failed_downloads {
            md.push_str(&format!("| {} | {} |\n", failed.url, failed.reason));
        }
        md.push('\n');
    }

    // Sitemap
    md.push_str("## Sitemap\n\n");
    md.push_str(&format!(
        "{} internal URLs ({} crawled, {} failed, {} skipped).\n\n",
        summary.sitemap.len(),
        summary.crawl.done,
        summary.crawl.failed,
        summary.crawl.skipped
    ));
    for url in summary.sitemap.iter().take(MAX_SITEMAP_ENTRIES) {
        md.push_str(&format!("- {}\n", url));
    }
    if summary.sitemap.len() > MAX_SITEMAP_ENTRIES {
        md.push_str(&format!(
            "\n... and {} more\n",
            summary.sitemap.len() - MAX_SITEMAP_ENTRIES
        ));
    }

    md
}
