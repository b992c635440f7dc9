//! Output module for run reports and the sitemap file
//!
//! This module handles:
//! - Persisting the sitemap as a JSON array
//! - Printing the run report to the terminal
//! - Writing an optional markdown report

mod markdown;
mod sitemap;
pub mod stats;
mod summary;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use sitemap::{format_sitemap, load_sitemap, save_sitemap};
pub use stats::{print_report, RunPresence};
pub use summary::{FailedDownload, RunSummary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
