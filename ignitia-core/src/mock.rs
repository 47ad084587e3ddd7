//! Mock generation backend for offline, deterministic tests.
//!
//! Scripts a queue of replies and records every request it receives, so
//! tests can assert both on what a flow produced and on what (if anything)
//! actually reached the generation service - including "the backend was
//! never called" for input-validation failures.
//!
//! # Example
//!
//! ```
//! use ignitia_core::{GenerationClient, GenerationConfig, GenerationRequest, MockBackend};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backend = Arc::new(MockBackend::new().with_json(json!({ "ok": true })));
//! let client = GenerationClient::from_arc(backend.clone(), GenerationConfig::default());
//!
//! let response = client
//!     .generate(GenerationRequest::structured("prompt", json!({})))
//!     .await
//!     .unwrap();
//! assert_eq!(response.as_json().unwrap()["ok"], true);
//! assert_eq!(backend.call_count(), 1);
//! # }
//! ```

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::generation::{GenerationBackend, GenerationRequest, GenerationResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Generation backend that replays a scripted queue of replies.
#[derive(Debug, Default)]
pub struct MockBackend {
    /// Replies consumed front-to-back, one per call
    replies: Mutex<VecDeque<Result<GenerationResponse, GenerationError>>>,

    /// Number of `generate` calls received
    calls: AtomicUsize,

    /// Every request received, in order
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockBackend {
    /// Create a mock with an empty reply queue.
    ///
    /// A call against an empty queue returns a
    /// [`GenerationError::Other`] describing the exhaustion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a structured JSON reply.
    #[must_use]
    pub fn with_json(self, value: Value) -> Self {
        self.push(Ok(GenerationResponse::Json(value)));
        self
    }

    /// Queue a plain-text reply.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(Ok(GenerationResponse::Text(text.into())));
        self
    }

    /// Queue an error reply.
    #[must_use]
    pub fn with_error(self, error: GenerationError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, reply: Result<GenerationResponse, GenerationError>) {
        match self.replies.lock() {
            Ok(mut replies) => replies.push_back(reply),
            Err(poisoned) => poisoned.into_inner().push_back(reply),
        }
    }

    /// Number of `generate` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Check whether every scripted reply has been consumed.
    pub fn is_exhausted(&self) -> bool {
        match self.replies.lock() {
            Ok(replies) => replies.is_empty(),
            Err(poisoned) => poisoned.into_inner().is_empty(),
        }
    }

    /// Snapshot of every request received, in order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(
        &self,
        request: &GenerationRequest,
        _config: &GenerationConfig,
    ) -> Result<GenerationResponse, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.requests.lock() {
            Ok(mut requests) => requests.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }

        let reply = match self.replies.lock() {
            Ok(mut replies) => replies.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        reply.unwrap_or_else(|| {
            Err(GenerationError::Other(
                "mock backend exhausted: no scripted reply left".to_string(),
            ))
        })
    }
}
