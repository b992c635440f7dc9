//! LLM backends
//!
//! The page text and the user's prompt are sent to one of several
//! interchangeable providers. All of them receive the same message:
//!
//! ```text
//! {prompt}
//!
//! Here is the content:
//!
//! {content}
//! ```
//!
//! Gemini has its own API; Groq and OpenAI share the chat-completions wire
//! format; Ollama talks to a local server and needs no key.

mod gemini;
mod ollama;
mod openai;

use crate::config::LlmConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on one completion request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Environment variable overriding the Ollama server address
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

/// Port Ollama listens on when `OLLAMA_HOST` names none
const OLLAMA_DEFAULT_PORT: u16 = 11434;

/// Errors from an LLM backend
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{provider} API key not found; set {env_var}")]
    MissingApiKey {
        provider: Provider,
        env_var: &'static str,
    },

    #[error("Request to {provider} failed: {source}")]
    Http {
        provider: Provider,
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}: {body}")]
    Api {
        provider: Provider,
        status: u16,
        body: String,
    },

    #[error("{provider} returned no text")]
    EmptyResponse { provider: Provider },
}

/// The supported LLM providers
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    Groq,
    Ollama,
    #[value(name = "openai")]
    OpenAi,
}

impl Provider {
    /// Environment variable holding the API key, if the provider needs one
    pub fn env_key(&self) -> Option<&'static str> {
        match self {
            Provider::Gemini => Some("GEMINI_API_KEY"),
            Provider::Groq => Some("GROQ_API_KEY"),
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Ollama => None,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-pro",
            Provider::Groq => "llama3-8b-8192",
            Provider::OpenAi => "gpt-3.5-turbo",
            Provider::Ollama => "llama3",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Gemini => "https://generativelanguage.googleapis.com",
            Provider::Groq => "https://api.groq.com/openai",
            Provider::OpenAi => "https://api.openai.com",
            Provider::Ollama => "http://localhost:11434",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Groq => "groq",
            Provider::Ollama => "ollama",
            Provider::OpenAi => "openai",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything needed to talk to one provider
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: Provider,
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
}

impl LlmSettings {
    /// Resolves settings from the configuration and the environment
    ///
    /// The model and base URL fall back to the provider's defaults; Ollama's
    /// address may also come from `OLLAMA_HOST`. The API key is read from
    /// the provider's `<PROVIDER>_API_KEY` variable.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let provider = config.provider;

        let api_key = match provider.env_key() {
            Some(env_var) => match std::env::var(env_var) {
                Ok(key) if !key.trim().is_empty() => Some(key),
                _ => return Err(LlmError::MissingApiKey { provider, env_var }),
            },
            None => None,
        };

        let base_url = config
            .base_url
            .clone()
            .or_else(|| match provider {
                Provider::Ollama => std::env::var(OLLAMA_HOST_ENV)
                    .ok()
                    .filter(|host| !host.trim().is_empty())
                    .map(|host| ollama_base_url(&host)),
                _ => None,
            })
            .unwrap_or_else(|| provider.default_base_url().to_string());

        Ok(Self {
            provider,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| provider.default_model().to_string()),
            base_url,
            api_key,
        })
    }

    /// `base_url` joined with `path`, without doubling the slash
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn require_key(&self) -> Result<&str, LlmError> {
        self.api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey {
                provider: self.provider,
                env_var: self.provider.env_key().unwrap_or("API_KEY"),
            })
    }
}

/// Turns an `OLLAMA_HOST` value into a base URL
///
/// Ollama accepts a bare `host[:port]` such as `0.0.0.0:11434`. Without a
/// scheme, `http://` is assumed and a missing port becomes 11434. A value
/// with a scheme is used as given.
pub fn ollama_base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        return host.to_string();
    }

    let authority = host.split('/').next().unwrap_or(host);
    let has_port = match authority.rfind(']') {
        // [::1]:11434
        Some(bracket) => authority[bracket..].contains(':'),
        None => authority.contains(':'),
    };

    if has_port {
        format!("http://{}", host)
    } else {
        let path = &host[authority.len()..];
        format!("http://{}:{}{}", authority, OLLAMA_DEFAULT_PORT, path)
    }
}

/// Builds the message every provider receives
pub fn full_prompt(prompt: &str, content: &str) -> String {
    format!("{}\n\nHere is the content:\n\n{}", prompt, content)
}

/// Client for the configured provider
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    settings: LlmSettings,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| LlmError::Http {
                provider: settings.provider,
                source,
            })?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    /// Asks the model to apply `prompt` to `content`
    pub async fn extract(&self, content: &str, prompt: &str) -> Result<String, LlmError> {
        let message = full_prompt(prompt, content);
        tracing::info!(
            "Sending {} characters to {} ({})",
            message.len(),
            self.settings.provider,
            self.settings.model
        );

        let text = match self.settings.provider {
            Provider::Gemini => gemini::generate(&self.client, &self.settings, &message).await?,
            Provider::Groq | Provider::OpenAi => {
                openai::chat(&self.client, &self.settings, &message).await?
            }
            Provider::Ollama => ollama::chat(&self.client, &self.settings, &message).await?,
        };

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse {
                provider: self.settings.provider,
            });
        }
        Ok(text)
    }
}

/// Sends a JSON request and decodes the JSON answer, mapping failures
async fn post_json<Req, Resp>(
    request: reqwest::RequestBuilder,
    provider: Provider,
    body: &Req,
) -> Result<Resp, LlmError>
where
    Req: Serialize + ?Sized,
    Resp: for<'de> Deserialize<'de>,
{
    let http_error = |source| LlmError::Http { provider, source };

    let response = request.json(body).send().await.map_err(http_error)?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LlmError::Api {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    response.json::<Resp>().await.map_err(http_error)
}
