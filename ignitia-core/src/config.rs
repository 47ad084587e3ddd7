use serde_json::Value;

/// The Gemini model used for all generation flows unless overridden.
pub const MODEL: &str = "gemini-2.0-flash";

/// Top-level configuration for Ignitia's generation pipeline.
///
/// Contains only cross-flow configuration. Flow-specific data (schemas,
/// prompt templates) belongs to the individual flow definitions, not here.
/// Initialize once at process start and pass explicitly into flow and
/// client constructors - there is no ambient singleton.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct IgnitiaConfig {
    /// Configuration for the generation client (shared across all flows)
    pub generation: GenerationConfig,
}

/// Configuration for the structured generation client.
///
/// Deliberately carries no timeout or retry settings: a flow invocation
/// performs exactly one outbound attempt, and timeout/retry policy belongs
/// to the caller (typically via a cancellation token).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GenerationConfig {
    /// Model identifier sent to the generation service
    ///
    /// Default: [`MODEL`]
    pub model: String,

    /// Maximum output tokens per request
    ///
    /// Default: 2048
    pub max_tokens: u32,

    /// Temperature for generation (0.0 - 1.0)
    ///
    /// Lower values make output more deterministic.
    /// Default: 0.7
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: MODEL.to_string(),
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

impl GenerationConfig {
    /// Set the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the maximum output tokens per request.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the temperature for generation (0.0 - 1.0).
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Render the generation settings as the service's `generationConfig`
    /// JSON object (without any response-format constraint).
    pub(crate) fn generation_config_json(&self) -> Value {
        serde_json::json!({
            "temperature": self.temperature,
            "maxOutputTokens": self.max_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_constant() {
        assert_eq!(MODEL, "gemini-2.0-flash");
    }

    #[test]
    fn test_default_ignitia_config() {
        let config = IgnitiaConfig::default();
        assert_eq!(config.generation.model, MODEL);
        assert_eq!(config.generation.max_tokens, 2048);
    }

    #[test]
    fn test_default_generation_config() {
        let config = GenerationConfig::default();
        assert_eq!(config.model, MODEL);
        assert_eq!(config.max_tokens, 2048);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_builder_methods() {
        let config = GenerationConfig::default()
            .with_model("gemini-2.0-pro")
            .with_max_tokens(512)
            .with_temperature(0.0);
        assert_eq!(config.model, "gemini-2.0-pro");
        assert_eq!(config.max_tokens, 512);
        assert!(config.temperature.abs() < f32::EPSILON);
    }

    #[test]
    fn test_generation_config_json() {
        let json = GenerationConfig::default()
            .with_max_tokens(128)
            .generation_config_json();
        assert_eq!(json["maxOutputTokens"], 128);
        assert!(json.get("responseMimeType").is_none());
    }
}
