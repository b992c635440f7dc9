//! File downloader
//!
//! Downloads one linked file into the target directory:
//! - The file name comes from the last URL path segment, or is synthesized
//!   when the path ends in `/`
//! - A `Content-Disposition` filename, once headers arrive, replaces it
//! - The body is streamed to disk through an 8 KiB buffer
//!
//! The body goes to a hidden `.part` file next to the target and is renamed
//! into place once complete. Two URLs that derive the same file name
//! overwrite each other; the last writer to finish wins. A failed download
//! only removes its own `.part` file, never a file another download wrote.

use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::url::path_extension;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

/// Size of the write buffer used while streaming a body to disk
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Prefix of synthesized file names
const FALLBACK_PREFIX: &str = "downloaded_file_";

/// Suffix of in-progress files
const PARTIAL_SUFFIX: &str = ".part";

/// Why a single download failed
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Unexpected status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl DownloadError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result of one download attempt
#[derive(Debug)]
pub enum DownloadOutcome {
    /// The body was written completely
    Success {
        url: Url,
        path: PathBuf,
        bytes: u64,
    },

    /// Nothing usable was written
    Failure { url: Url, error: DownloadError },
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The URL this attempt was for
    pub fn url(&self) -> &Url {
        match self {
            Self::Success { url, .. } | Self::Failure { url, .. } => url,
        }
    }

    /// Where the file was written, for successful attempts
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Success { path, .. } => Some(path),
            Self::Failure { .. } => None,
        }
    }
}

/// Downloads `url` into `target_dir`
///
/// Never returns an error: every failure (network, status, filesystem) is
/// reported as [`DownloadOutcome::Failure`] and logged.
pub async fn download(fetcher: &Fetcher, url: &Url, target_dir: &Path) -> DownloadOutcome {
    match try_download(fetcher, url, target_dir).await {
        Ok((path, bytes)) => {
            tracing::info!("Downloaded {} ({} bytes) -> {}", url, bytes, path.display());
            DownloadOutcome::Success {
                url: url.clone(),
                path,
                bytes,
            }
        }
        Err(error) => {
            tracing::warn!("Download failed for {}: {}", url, error);
            DownloadOutcome::Failure {
                url: url.clone(),
                error,
            }
        }
    }
}

async fn try_download(
    fetcher: &Fetcher,
    url: &Url,
    target_dir: &Path,
) -> Result<(PathBuf, u64), DownloadError> {
    // create_dir_all succeeds when the directory already exists, including
    // when a sibling download created it a moment ago.
    tokio::fs::create_dir_all(target_dir)
        .await
        .map_err(|e| DownloadError::io(target_dir, e))?;

    let mut filename = filename_from_url(url);
    tracing::debug!(
        "Attempting download: {} -> {}",
        url,
        target_dir.join(&filename).display()
    );

    let response = fetcher.fetch_download(url).await?;
    if response.status() != StatusCode::OK {
        return Err(DownloadError::UnexpectedStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    if let Some(header_name) = response
        .header(CONTENT_DISPOSITION.as_str())
        .and_then(filename_from_content_disposition)
    {
        tracing::debug!("Using filename from header: {}", header_name);
        filename = header_name;
    }

    let path = target_dir.join(&filename);
    let partial = target_dir.join(partial_filename(&filename));

    let bytes = match stream_to_file(response.into_inner(), url, &partial).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
    };

    if let Err(e) = tokio::fs::rename(&partial, &path).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(DownloadError::io(&path, e));
    }
    Ok((path, bytes))
}

/// Hidden name unique to one attempt, e.g. `.report.pdf.1f2e3d4c.part`
fn partial_filename(filename: &str) -> String {
    format!(
        ".{}.{}{}",
        filename,
        hex::encode(rand::random::<[u8; 4]>()),
        PARTIAL_SUFFIX
    )
}

async fn stream_to_file(
    mut response: reqwest::Response,
    url: &Url,
    path: &Path,
) -> Result<u64, DownloadError> {
    let file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let mut written = 0u64;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| FetchError::from_body(url, e))?
    {
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    Ok(written)
}

/// Derives the provisional file name from the URL path
///
/// The last path segment is used as-is (after sanitizing). A path ending in
/// `/` gets `downloaded_file_<8 hex chars>` plus any extension the path has.
pub fn filename_from_url(url: &Url) -> String {
    let last_segment = url
        .path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or("");

    if let Some(name) = sanitize_filename(last_segment) {
        return name;
    }

    let extension = path_extension(url.path())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();
    format!(
        "{}{}{}",
        FALLBACK_PREFIX,
        hex::encode(rand::random::<[u8; 4]>()),
        extension
    )
}

/// Extracts a file name from a `Content-Disposition` header value
///
/// Handles `filename=name.pdf`, `filename="name.pdf"` and
/// `filename='name.pdf'`. Returns None when the header has no usable name.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let start = header.to_ascii_lowercase().find("filename=")? + "filename=".len();
    let value = header[start..].trim_start_matches(|c: char| c == '"' || c == '\'');
    let end = value
        .find(|c: char| matches!(c, '"' | '\'' | ';' | '\n'))
        .unwrap_or(value.len());
    sanitize_filename(&value[..end])
}

/// Replaces path separators and rejects names that cannot be a file
pub fn sanitize_filename(name: &str) -> Option<String> {
    let name = name.trim().replace('/', "_").replace('\\', "_");
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name)
    }
}
