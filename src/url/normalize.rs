use crate::UrlError;
use url::Url;

/// Normalizes a URL into its crawl key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than http and https
/// 3. Reject URLs without a host
/// 4. Remove the query string
/// 5. Remove the fragment
///
/// Host lowercasing, default-port elision and dot-segment removal are done by
/// the `url` parser itself, so the result is `scheme://authority/path`.
/// Two links that normalize to the same string are the same crawl node.
///
/// # Examples
///
/// ```
/// use pagewise::url::normalize_crawl_url;
///
/// let url = normalize_crawl_url("https://EXAMPLE.com:443/a/../docs?page=2#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_crawl_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(&url)
}

/// Same as [`normalize_crawl_url`] for an already parsed URL
pub fn normalize_parsed(url: &Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingAuthority(url.to_string()));
    }

    let mut normalized = url.clone();
    normalized.set_query(None);
    normalized.set_fragment(None);
    Ok(normalized)
}

/// Returns true if `link` only points at a fragment of `page`
///
/// `<a href="#top">` on `https://example.com/docs` resolves to
/// `https://example.com/docs#top`; such links never name a new page.
pub fn is_fragment_only(link: &Url, page: &Url) -> bool {
    if link.fragment().is_none() {
        return false;
    }

    let mut link = link.clone();
    let mut page = page.clone();
    link.set_fragment(None);
    page.set_fragment(None);
    link == page
}
