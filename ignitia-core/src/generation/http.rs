//! HTTP backend speaking the Gemini `generateContent` REST shape.

use super::client::GenerationBackend;
use super::request::{GenerationRequest, GenerationResponse, OutputFormat};
use crate::config::GenerationConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::fmt;

/// Default API base URL for the generation service.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Maximum error-body length echoed into a `Service` error message.
const MAX_ERROR_BODY: usize = 2048;

/// Generation backend that calls the Gemini REST API with reqwest.
///
/// For structured requests, the response schema is forwarded as the
/// service's `responseSchema` generation constraint with
/// `responseMimeType: application/json`, so the model is asked to answer
/// in the declared shape rather than free text.
pub struct HttpBackend {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBackend")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpBackend {
    /// Create a backend with a fresh reqwest client and the default API URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the backend at a different API base URL.
    ///
    /// Useful for proxies, self-hosted gateways, and test servers.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a custom reqwest client (proxies, TLS settings, shared pools).
    #[must_use]
    pub fn with_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }
}

#[async_trait]
impl GenerationBackend for HttpBackend {
    async fn generate(
        &self,
        request: &GenerationRequest,
        config: &GenerationConfig,
    ) -> Result<GenerationResponse, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            config.model
        );
        let body = request_body(request, config);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.text().await {
                Ok(text) => truncate(&text, MAX_ERROR_BODY),
                Err(_) => "<unreadable error body>".to_string(),
            };
            return Err(GenerationError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(format!("invalid response body: {e}")))?;
        let text = extract_text(&payload)?;

        match &request.format {
            OutputFormat::Text => Ok(GenerationResponse::Text(text)),
            OutputFormat::Json { .. } => serde_json::from_str(&text)
                .map(GenerationResponse::Json)
                .map_err(|e| {
                    GenerationError::Malformed(format!("response is not valid JSON: {e}"))
                }),
        }
    }
}

/// Build the `generateContent` request body.
fn request_body(request: &GenerationRequest, config: &GenerationConfig) -> Value {
    let mut generation_config = config.generation_config_json();
    if let OutputFormat::Json { response_schema } = &request.format {
        generation_config["responseMimeType"] = json!("application/json");
        generation_config["responseSchema"] = response_schema.clone();
    }

    let mut body = json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt }],
        }],
        "generationConfig": generation_config,
    });
    if let Some(system) = &request.system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
    }
    body
}

/// Concatenate the text parts of the first candidate.
fn extract_text(payload: &Value) -> Result<String, GenerationError> {
    let parts = payload
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.pointer("/content/parts"))
        .and_then(Value::as_array)
        .ok_or(GenerationError::NoContent)?;

    let mut text = String::new();
    for part in parts {
        if let Some(chunk) = part.get("text").and_then(Value::as_str) {
            text.push_str(chunk);
        }
    }
    if text.is_empty() {
        return Err(GenerationError::NoContent);
    }
    Ok(text)
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
