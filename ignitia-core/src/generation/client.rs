//! Generation client and backend trait.

use super::request::{GenerationRequest, GenerationResponse};
use crate::config::GenerationConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Transport for generation requests.
///
/// Implementations perform exactly one outbound call per `generate`
/// invocation. They must not retry internally: retry policy, if any,
/// belongs to the caller of the flow.
#[async_trait]
pub trait GenerationBackend: Send + Sync + fmt::Debug {
    /// Perform one request/response round-trip.
    async fn generate(
        &self,
        request: &GenerationRequest,
        config: &GenerationConfig,
    ) -> Result<GenerationResponse, GenerationError>;
}

/// Client wrapping a [`GenerationBackend`] with shared configuration.
///
/// Stateless between calls and safe to share across concurrent flow
/// invocations. The client imposes no timeout of its own; callers that
/// need a deadline should cancel via
/// [`generate_with_cancellation`](Self::generate_with_cancellation).
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    config: GenerationConfig,
}

impl fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationClient")
            .field("backend", &self.backend)
            .field("config", &self.config)
            .finish()
    }
}

impl GenerationClient {
    /// Create a client from a backend and configuration.
    pub fn new(backend: impl GenerationBackend + 'static, config: GenerationConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
        }
    }

    /// Create a client from an already-shared backend.
    ///
    /// Useful when the caller wants to keep a handle to the backend, e.g.
    /// to inspect a mock after the fact.
    pub fn from_arc(backend: Arc<dyn GenerationBackend>, config: GenerationConfig) -> Self {
        Self { backend, config }
    }

    /// Get a reference to the generation configuration.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Perform a single generation attempt.
    ///
    /// Exactly one outbound call; no retries, no internal timeout.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        log::debug!(
            "generation request: {} prompt chars, structured: {}",
            request.prompt.chars().count(),
            matches!(request.format, super::OutputFormat::Json { .. })
        );
        self.backend.generate(&request, &self.config).await
    }

    /// Perform a single generation attempt, racing it against cancellation.
    ///
    /// Returns [`GenerationError::Cancelled`] if the token fires before the
    /// service responds; the outbound call is dropped (aborted) at that
    /// point.
    pub async fn generate_with_cancellation(
        &self,
        request: GenerationRequest,
        cancellation_token: &CancellationToken,
    ) -> Result<GenerationResponse, GenerationError> {
        if cancellation_token.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }

        tokio::select! {
            result = self.generate(request) => result,
            _ = cancellation_token.cancelled() => Err(GenerationError::Cancelled),
        }
    }
}
