//! Sitemap persistence
//!
//! The sitemap file is a JSON array of URL strings, UTF-8, indented with
//! four spaces. It is serialized in memory and written with a single call.

use crate::crawler::Sitemap;
use crate::output::OutputResult;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::Path;

/// Writes the sitemap to `path`, replacing any existing file
pub fn save_sitemap(sitemap: &Sitemap, path: &Path) -> OutputResult<()> {
    let json = format_sitemap(sitemap)?;
    std::fs::write(path, json)?;

    tracing::info!("Sitemap saved to {}", path.display());
    Ok(())
}

/// Reads a sitemap written by [`save_sitemap`]
pub fn load_sitemap(path: &Path) -> OutputResult<Sitemap> {
    let content = std::fs::read_to_string(path)?;
    let urls: Vec<String> = serde_json::from_str(&content)?;
    Ok(Sitemap::new(urls))
}

/// Serializes the sitemap with four-space indentation
pub fn format_sitemap(sitemap: &Sitemap) -> OutputResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    sitemap.serialize(&mut serializer)?;
    Ok(buf)
}
