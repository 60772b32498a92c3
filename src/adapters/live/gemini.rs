//! Live adapters for the Gemini `generateContent` API.
//!
//! One HTTP client backs both the chat and the captioning ports; they only
//! differ in how the request `contents` are assembled.

use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{truncate_body, GuruError};
use crate::ports::chat_model::{ChatFuture, ChatModel, ChatReply, ChatRequest, Role};
use crate::ports::image_captioner::{CaptionFuture, CaptionReply, CaptionRequest, ImageCaptioner};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Shared Gemini HTTP client.
#[derive(Clone)]
struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key }
    }

    /// POST a `generateContent` body and return the concatenated reply text.
    async fn generate_text(&self, model: &str, body: &Value) -> Result<String, GuruError> {
        let url = format!("{GEMINI_API_BASE}/{model}:generateContent");
        tracing::debug!(%url, "calling Gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(GuruError::Api { status: status.as_u16(), message: response_text });
        }

        extract_text(&response_text)
    }
}

/// Live Gemini chat model.
pub struct GeminiChat {
    inner: GeminiClient,
}

impl GeminiChat {
    /// Create a new Gemini chat model with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { inner: GeminiClient::new(api_key) }
    }
}

impl ChatModel for GeminiChat {
    fn send(&self, request: &ChatRequest) -> ChatFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let body = chat_body(&request);
            let text = self.inner.generate_text(&request.model, &body).await?;
            Ok(ChatReply { text })
        })
    }
}

/// Live Gemini image captioner.
pub struct GeminiCaptioner {
    inner: GeminiClient,
}

impl GeminiCaptioner {
    /// Create a new Gemini captioner with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { inner: GeminiClient::new(api_key) }
    }
}

impl ImageCaptioner for GeminiCaptioner {
    fn caption(&self, request: &CaptionRequest) -> CaptionFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let body = caption_body(&request);
            let text = self.inner.generate_text(&request.model, &body).await?;
            Ok(CaptionReply { text })
        })
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Model => "model",
    }
}

fn chat_body(request: &ChatRequest) -> Value {
    let mut contents: Vec<Value> = request
        .history
        .iter()
        .map(|m| json!({ "role": wire_role(m.role), "parts": [{ "text": m.text }] }))
        .collect();
    contents.push(json!({ "role": "user", "parts": [{ "text": request.message }] }));
    json!({ "contents": contents })
}

fn caption_body(request: &CaptionRequest) -> Value {
    let data = base64::engine::general_purpose::STANDARD.encode(&request.image);
    let mut parts = vec![json!({
        "inlineData": { "mimeType": request.mime_type, "data": data }
    })];
    if let Some(ref prompt) = request.prompt {
        parts.push(json!({ "text": prompt }));
    }
    json!({ "contents": [{ "role": "user", "parts": parts }] })
}

/// Pull the text out of a `generateContent` response body.
fn extract_text(response_text: &str) -> Result<String, GuruError> {
    let parsed: GeminiResponse = serde_json::from_str(response_text)
        .map_err(|e| GuruError::bad_response(format!("Failed to parse response: {e}")))?;

    if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GuruError::bad_response(format!("Prompt blocked: {reason}")));
    }

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        return Err(GuruError::bad_response(format!(
            "No candidates in response. Body: {}",
            truncate_body(response_text)
        )));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(GuruError::bad_response(format!("Empty reply (finish reason: {reason})")));
    }

    Ok(text)
}

// --- Gemini API response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}
