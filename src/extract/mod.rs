//! Content extraction
//!
//! Turning a page into readable text is a capability the scrape consumes
//! through [`ContentExtractor`]. The built-in [`ReadableTextExtractor`]
//! renders the page's prose blocks as light markdown:
//!
//! - `h1`..`h6` become `#` headings
//! - `p` becomes a paragraph, `li` a `- ` bullet, `blockquote` a `> ` quote
//! - `pre` becomes a fenced block
//!
//! Anything inside `script`, `style`, `noscript`, `nav`, `header`, `footer`
//! or `aside` is left out.

use crate::crawler::{page_title, FetchError, Fetcher};
use async_trait::async_trait;
use scraper::{ElementRef, Html};
use thiserror::Error;
use url::Url;

/// Errors from content extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Not an HTML page: {url} ({content_type})")]
    NotHtml { url: String, content_type: String },

    #[error("No readable content found on {0}")]
    Empty(String),
}

/// Produces the readable text of a page
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Extracts the text of the page at `url`
    ///
    /// An empty result is an error, never `Ok("")`.
    async fn extract(&self, url: &Url) -> Result<String, ExtractError>;
}

/// Fetches a page and renders its prose as markdown
#[derive(Debug, Clone)]
pub struct ReadableTextExtractor {
    fetcher: Fetcher,
}

impl ReadableTextExtractor {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ContentExtractor for ReadableTextExtractor {
    async fn extract(&self, url: &Url) -> Result<String, ExtractError> {
        let response = self.fetcher.fetch(url).await?;
        if !response.is_html() {
            return Err(ExtractError::NotHtml {
                url: url.to_string(),
                content_type: response.content_type().unwrap_or("none").to_string(),
            });
        }

        let html = response.text().await?;
        let text = readable_text(&html);
        if text.is_empty() {
            return Err(ExtractError::Empty(url.to_string()));
        }

        tracing::debug!("Extracted {} characters from {}", text.len(), url);
        Ok(text)
    }
}

const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "svg", "template",
];

/// Renders an HTML document as light markdown
///
/// Falls back to the whitespace-collapsed body text when the page has no
/// recognizable blocks. Returns an empty string for a page without text.
pub fn readable_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let mut blocks = Vec::new();
    collect_blocks(root, &mut blocks);

    if blocks.is_empty() {
        let mut words = Vec::new();
        collect_words(root, &mut words);
        return words.join(" ");
    }

    let has_h1 = blocks.iter().any(|b| b.starts_with("# "));
    if !has_h1 {
        if let Some(title) = page_title(html) {
            blocks.insert(0, format!("# {}", title));
        }
    }

    blocks.join("\n\n")
}

fn collect_blocks(element: ElementRef<'_>, out: &mut Vec<String>) {
    let tag = element.value().name();
    if SKIPPED_TAGS.contains(&tag) || tag == "head" {
        return;
    }

    let block = match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = tag[1..].parse::<usize>().unwrap_or(1);
            inline_text(element).map(|t| format!("{} {}", "#".repeat(level), t))
        }
        "p" => inline_text(element),
        "li" => inline_text(element).map(|t| format!("- {}", t)),
        "blockquote" => inline_text(element).map(|t| format!("> {}", t)),
        "pre" => {
            let text: String = element.text().collect();
            let text = text.trim_matches('\n').trim_end();
            if text.trim().is_empty() {
                None
            } else {
                Some(format!("```\n{}\n```", text))
            }
        }
        _ => {
            for child in element.children().filter_map(ElementRef::wrap) {
                collect_blocks(child, out);
            }
            return;
        }
    };

    // Blocks are rendered whole; nested blocks are not visited again.
    if let Some(block) = block {
        out.push(block);
    }
}

/// Whitespace-collapsed text of an element, skipping noise descendants
fn inline_text(element: ElementRef<'_>) -> Option<String> {
    let mut words = Vec::new();
    collect_words(element, &mut words);
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn collect_words<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    let tag = element.value().name();
    if SKIPPED_TAGS.contains(&tag) || tag == "head" {
        return;
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            collect_words(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.extend(text.split_whitespace());
        }
    }
}
