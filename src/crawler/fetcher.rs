//! HTTP fetcher implementation
//!
//! This module handles every HTTP request the crawler makes:
//! - Building the shared HTTP client with the configured user agent
//! - Single-attempt GET requests with a per-request timeout
//! - Redirect following (reqwest's limited policy)
//! - Error classification into [`FetchError`]
//!
//! There is no retry logic. A failed fetch is reported once and the caller
//! decides whether it aborts one link or a whole operation.

use crate::config::CrawlerConfig;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// A failed fetch, always tagged with the URL that was requested
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

impl FetchError {
    /// Classifies a reqwest error raised while sending a request
    fn from_send(url: &Url, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                message: error.to_string(),
            }
        } else {
            Self::Transport { url, source: error }
        }
    }

    /// Classifies a reqwest error raised while reading a response body
    pub(crate) fn from_body(url: &Url, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Body { url, source: error }
        }
    }

    /// The URL the failed request was for
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Status { url, .. }
            | Self::Transport { url, .. }
            | Self::Body { url, .. } => url,
        }
    }

    /// The HTTP status, if the server answered with a non-success one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Per-request timeouts are applied by [`Fetcher`]; the client only carries
/// the connect timeout.
///
/// # Example
///
/// ```no_run
/// use pagewise::config::CrawlerConfig;
/// use pagewise::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(Duration::from_secs(config.request_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// The single HTTP fetch primitive shared by the crawler and downloader
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    page_timeout: Duration,
    download_timeout: Duration,
}

impl Fetcher {
    /// Creates a fetcher from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            page_timeout: Duration::from_secs(config.request_timeout_secs),
            download_timeout: Duration::from_secs(config.download_timeout_secs),
        })
    }

    /// Timeout applied to page fetches
    pub fn page_timeout(&self) -> Duration {
        self.page_timeout
    }

    /// Fetches a page with the page timeout
    pub async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        self.fetch_with_timeout(url, self.page_timeout).await
    }

    /// Fetches a file with the (longer) download timeout
    pub async fn fetch_download(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        self.fetch_with_timeout(url, self.download_timeout).await
    }

    /// Issues one GET request
    ///
    /// # Returns
    ///
    /// * `Ok(FetchResponse)` - A 2xx response whose body has not been read yet
    /// * `Err(FetchError)` - Timeout, connection failure, non-2xx status, or
    ///   other transport failure
    pub async fn fetch_with_timeout(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_send(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(FetchResponse {
            requested: url.clone(),
            response,
        })
    }
}

/// A successful response with its body still unread
#[derive(Debug)]
pub struct FetchResponse {
    requested: Url,
    response: Response,
}

impl FetchResponse {
    /// The final URL after redirects
    pub fn url(&self) -> &Url {
        self.response.url()
    }

    /// The URL originally requested
    pub fn requested_url(&self) -> &Url {
        &self.requested
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    /// A header value, if present and valid ASCII
    pub fn header(&self, name: &str) -> Option<&str> {
        self.response.headers().get(name)?.to_str().ok()
    }

    /// The Content-Type header value, if any
    pub fn content_type(&self) -> Option<&str> {
        self.response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Returns true if the response declares an HTML body
    pub fn is_html(&self) -> bool {
        self.content_type()
            .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
            .unwrap_or(false)
    }

    /// Reads the whole body as decoded text
    pub async fn text(self) -> Result<String, FetchError> {
        let requested = self.requested;
        self.response
            .text()
            .await
            .map_err(|e| FetchError::from_body(&requested, e))
    }

    /// Gives up the wrapper for chunked reads of the body
    pub fn into_inner(self) -> Response {
        self.response
    }
}
