//! Gemini image backend.
//!
//! Talks to the `generateContent` endpoint of the Generative Language API.
//! Reference images travel as `inline_data` parts ahead of the text prompt;
//! the first `inlineData` part of the first candidate is the result.
//!
//! # Examples
//!
//! ```rust,no_run
//! use spriteforge::generation::{GeminiBackend, GeminiConfig, GenerationClient};
//! use spriteforge::types::SpriteConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), spriteforge::ForgeError> {
//! let backend = GeminiBackend::new(GeminiConfig::new("api-key"))?;
//! let client = GenerationClient::new(Arc::new(backend));
//! let sprite = client.generate_base(&SpriteConfig::default()).await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use spriteforge_raster::{EncodedImage, PNG_MIME};

use super::backend::{BackendReply, ImageBackend, ImageRequest};
use crate::error::ForgeError;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for the Gemini backend.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Base URL (defaults to [`DEFAULT_BASE_URL`]).
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ── Request / response shapes ─────────────────────────────────

/// Build the JSON body for `generateContent`.
pub fn build_generate_request(request: &ImageRequest) -> Value {
    let mut parts: Vec<Value> = request
        .references
        .iter()
        .map(|image| {
            json!({
                "inline_data": {
                    "mime_type": image.mime_type(),
                    "data": image.to_base64(),
                }
            })
        })
        .collect();
    parts.push(json!({ "text": request.prompt }));

    json!({ "contents": [{ "parts": parts }] })
}

/// Interpret a `generateContent` response body.
///
/// # Errors
///
/// [`ForgeError::ImageDecode`] if the image part is not valid base64.
pub fn parse_generate_response(body: &Value) -> Result<BackendReply, ForgeError> {
    let Some(parts) = body
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
    else {
        return Ok(BackendReply::NoContent);
    };

    let inline = parts
        .iter()
        .find_map(|part| part.get("inlineData").or_else(|| part.get("inline_data")));
    let Some(inline) = inline else {
        return Ok(BackendReply::NoImage);
    };

    let Some(data) = inline.get("data").and_then(Value::as_str) else {
        return Ok(BackendReply::NoImage);
    };
    let mime_type = inline
        .get("mimeType")
        .or_else(|| inline.get("mime_type"))
        .and_then(Value::as_str)
        .unwrap_or(PNG_MIME);

    Ok(BackendReply::Image(EncodedImage::from_base64(mime_type, data)?))
}

/// Extract an error message from a Gemini error response body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Map an HTTP error status to a generation error.
fn map_http_error(status: reqwest::StatusCode, body: &str) -> ForgeError {
    let message = extract_error_message(body);
    match status.as_u16() {
        401 | 403 => ForgeError::Generation(format!("Gemini authentication failed: {message}")),
        429 => ForgeError::Generation(format!("Gemini rate limited: {message}")),
        code => ForgeError::Generation(format!("Gemini HTTP {code}: {message}")),
    }
}

// ── Backend ───────────────────────────────────────────────────

/// [`ImageBackend`] over the Gemini REST API.
pub struct GeminiBackend {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl GeminiBackend {
    /// # Errors
    ///
    /// [`ForgeError::Config`] if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, ForgeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ForgeError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ImageBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &ImageRequest) -> Result<BackendReply, ForgeError> {
        let url = self.endpoint(&request.model);
        let body = build_generate_request(request);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ForgeError::Generation(format!(
                        "Gemini request timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else {
                    ForgeError::Generation(format!("Gemini request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "gemini request rejected");
            return Err(map_http_error(status, &body_text));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ForgeError::Generation(format!("Gemini response unreadable: {e}")))?;
        parse_generate_response(&payload)
    }
}
