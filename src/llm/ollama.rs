//! Ollama `/api/chat`, non-streaming

use super::{post_json, LlmError, LlmSettings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OllamaMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: Option<OllamaResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    #[serde(default)]
    content: String,
}

pub(super) async fn chat(
    client: &reqwest::Client,
    settings: &LlmSettings,
    message: &str,
) -> Result<String, LlmError> {
    let request = client.post(settings.endpoint("/api/chat"));
    let response: OllamaResponse = post_json(
        request,
        settings.provider,
        &OllamaRequest {
            model: &settings.model,
            messages: vec![OllamaMessage {
                role: "user",
                content: message,
            }],
            stream: false,
        },
    )
    .await?;

    response
        .message
        .map(|m| m.content)
        .ok_or(LlmError::EmptyResponse {
            provider: settings.provider,
        })
}
