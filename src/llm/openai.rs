//! Chat-completions wire format, shared by OpenAI and Groq

use super::{post_json, LlmError, LlmSettings, Provider};
use serde::{Deserialize, Serialize};

pub(super) const SYSTEM_MESSAGE: &str =
    "You are a helpful assistant designed to extract information from text.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Sends one user message; OpenAI also gets the extraction system message
pub(super) async fn chat(
    client: &reqwest::Client,
    settings: &LlmSettings,
    message: &str,
) -> Result<String, LlmError> {
    let api_key = settings.require_key()?;

    let mut messages = Vec::with_capacity(2);
    if settings.provider == Provider::OpenAi {
        messages.push(ChatMessage {
            role: "system",
            content: SYSTEM_MESSAGE,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: message,
    });

    let request = client
        .post(settings.endpoint("/v1/chat/completions"))
        .bearer_auth(api_key);
    let response: ChatResponse = post_json(
        request,
        settings.provider,
        &ChatRequest {
            model: &settings.model,
            messages,
        },
    )
    .await?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(LlmError::EmptyResponse {
            provider: settings.provider,
        })
}
