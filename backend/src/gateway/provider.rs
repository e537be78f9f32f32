//! Language model clients.
//!
//! [`LlmClient`] is the seam between the gateway and the provider API; the
//! production implementation talks to Gemini `generateContent`, tests plug in
//! scripted clients.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Safety categories sent with every request, all at `BLOCK_MEDIUM_AND_ABOVE`.
pub const SAFETY_CATEGORIES: [&str; 2] = ["HARM_CATEGORY_HARASSMENT", "HARM_CATEGORY_HATE_SPEECH"];
pub const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key configured for the model provider")]
    MissingApiKey,
    #[error("request to model provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model provider response has no text: {0}")]
    EmptyResponse(String),
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the raw text produced by the model.
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, ProviderError>;
    fn provider_name(&self) -> &'static str;
}

pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ProviderError::MissingApiKey)?;
        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        })
    }

    fn request_body(request: &CompletionRequest<'_>) -> Value {
        let safety: Vec<Value> = SAFETY_CATEGORIES
            .iter()
            .map(|category| json!({ "category": category, "threshold": SAFETY_THRESHOLD }))
            .collect();

        json!({
            "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_output_tokens,
            },
            "safetySettings": safety,
        })
    }

    /// Concatenates the text parts of the first candidate.
    fn response_text(body: &Value) -> Option<String> {
        let parts = body.pointer("/candidates/0/content/parts")?.as_array()?;
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(request))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = resp.json().await?;
        Self::response_text(&body).ok_or_else(|| {
            let reason = body
                .pointer("/candidates/0/finishReason")
                .or_else(|| body.pointer("/promptFeedback/blockReason"))
                .and_then(Value::as_str)
                .unwrap_or("no candidates");
            ProviderError::EmptyResponse(reason.to_string())
        })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
