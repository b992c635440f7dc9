use crate::llm::Provider;
use serde::Deserialize;

/// File extensions downloaded when the config does not name its own
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "pdf", "jpg", "jpeg", "png", "gif", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "rar",
];

/// Prompt sent to the model when none is given
pub const DEFAULT_PROMPT: &str = "Extract the main content and summarize it.";

/// Main configuration structure for Pagewise
///
/// Every section is optional; a missing file or section falls back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum hop distance from the seed URL for sitemap generation
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Timeout for page fetches (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Timeout for a whole file download (seconds)
    #[serde(rename = "download-timeout-secs")]
    pub download_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            request_timeout_secs: 10,
            download_timeout_secs: 300,
            user_agent: format!("pagewise/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Download configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Directory downloaded files are written into
    pub directory: String,

    /// Extensions (without the dot) that mark a link as a download target
    pub extensions: Vec<String>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: "downloads".to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON sitemap file
    #[serde(rename = "sitemap-path")]
    pub sitemap_path: String,

    /// Path of the markdown run report, if one should be written
    #[serde(rename = "report-path")]
    pub report_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sitemap_path: "sitemap.json".to_string(),
            report_path: None,
        }
    }
}

/// Language model configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Which backend answers the prompt
    pub provider: Provider,

    /// Model name; each provider has its own default
    pub model: Option<String>,

    /// Instruction sent along with the page text
    pub prompt: String,

    /// Override for the provider's API endpoint
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            model: None,
            prompt: DEFAULT_PROMPT.to_string(),
            base_url: None,
        }
    }
}
