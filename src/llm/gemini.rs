//! Gemini `generateContent` API

use super::{post_json, LlmError, LlmSettings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

/// Generates text for one prompt; the first candidate's parts are joined
pub(super) async fn generate(
    client: &reqwest::Client,
    settings: &LlmSettings,
    message: &str,
) -> Result<String, LlmError> {
    let api_key = settings.require_key()?;
    let url = settings.endpoint(&format!(
        "/v1beta/models/{}:generateContent",
        settings.model
    ));

    let request = client.post(url).header("x-goog-api-key", api_key);
    let response: GeminiResponse = post_json(
        request,
        settings.provider,
        &GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: message }],
            }],
        },
    )
    .await?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<String>()
        })
        .ok_or(LlmError::EmptyResponse {
            provider: settings.provider,
        })
}
