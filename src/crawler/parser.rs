//! HTML parser for extracting links and metadata
//!
//! Link extraction looks at `<a href="...">` elements only. Resolution is
//! done against the page's URL; anything the `url` crate cannot resolve is
//! dropped without complaint. Filtering by scheme, authority or extension is
//! left to the callers.

use scraper::{Html, Selector};
use url::Url;

/// Extracts all anchor targets from an HTML document
///
/// Returns absolute URLs in document order. Duplicates are kept; callers
/// deduplicate through the visited-set or the extension filter.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The base URL for resolving relative links
///
/// # Example
///
/// ```
/// use pagewise::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/about">About</a><a href="report.pdf">Report</a>"#;
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let links = extract_links(html, &base);
/// assert_eq!(links[0].as_str(), "https://example.com/about");
/// assert_eq!(links[1].as_str(), "https://example.com/docs/report.pdf");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Extracts the page title (from the `<title>` tag)
pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the href cannot be resolved.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    base_url.join(href.trim()).ok()
}
