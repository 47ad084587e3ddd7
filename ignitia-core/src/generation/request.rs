//! Generation request and response types.

use serde_json::Value;

/// Requested output shape for a generation call.
#[derive(Debug, Clone)]
pub enum OutputFormat {
    /// Plain text; the service answers free-form.
    Text,
    /// Structured JSON conforming to the given response schema
    /// (as produced by [`crate::schema::Schema::response_format`]).
    Json { response_schema: Value },
}

/// A single request to the generation service.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GenerationRequest {
    /// Rendered prompt text
    pub prompt: String,

    /// Optional system instruction sent alongside the prompt
    pub system_instruction: Option<String>,

    /// Requested output shape
    pub format: OutputFormat,
}

impl GenerationRequest {
    /// Create a plain-text request.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
            format: OutputFormat::Text,
        }
    }

    /// Create a structured request constrained to `response_schema`.
    pub fn structured(prompt: impl Into<String>, response_schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
            format: OutputFormat::Json { response_schema },
        }
    }

    /// Attach a system instruction.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system_instruction = Some(system.into());
        self
    }
}

/// A successful response from the generation service.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResponse {
    /// Free-form text (for [`OutputFormat::Text`] requests)
    Text(String),
    /// Parsed structured value (for [`OutputFormat::Json`] requests);
    /// not yet validated against the output schema
    Json(Value),
}

impl GenerationResponse {
    /// The text content, if this is a text response.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            GenerationResponse::Text(s) => Some(s),
            GenerationResponse::Json(_) => None,
        }
    }

    /// The structured value, if this is a JSON response.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            GenerationResponse::Json(v) => Some(v),
            GenerationResponse::Text(_) => None,
        }
    }
}
