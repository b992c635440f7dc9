//! URL handling for the crawler and downloader
//!
//! - [`normalize_crawl_url`] turns a link into its crawl key
//!   (`scheme://authority/path`)
//! - [`NetworkAuthority`] decides whether a link is internal to the seed
//! - [`ExtensionSet`] decides whether a link is a download target

mod domain;
mod matcher;
mod normalize;

pub use domain::NetworkAuthority;
pub use matcher::{path_extension, ExtensionSet};
pub use normalize::{is_fragment_only, normalize_crawl_url, normalize_parsed};

use url::Url;

/// Returns true for http and https URLs, the only schemes ever fetched
pub fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
