//! Structured generation client.
//!
//! One outbound request/response round-trip to an external generation
//! service per flow invocation, with:
//!
//! - Structured output: the flow's output schema is forwarded as a
//!   generation constraint so the service answers in the declared shape
//! - A single attempt per call: no internal retries and no internal
//!   timeout - both are caller policy
//! - Cooperative cancellation via `CancellationToken`
//!
//! The outbound transport lives behind the [`GenerationBackend`] trait;
//! [`HttpBackend`] speaks the Gemini `generateContent` REST shape, and
//! [`crate::mock::MockBackend`] replays scripted responses for offline
//! tests.
//!
//! # Example
//!
//! ```no_run
//! use ignitia_core::{GenerationClient, GenerationConfig, GenerationRequest, HttpBackend};
//!
//! # async fn example() -> Result<(), ignitia_core::GenerationError> {
//! let backend = HttpBackend::new("api-key");
//! let client = GenerationClient::new(backend, GenerationConfig::default());
//!
//! let request = GenerationRequest::text("Say hello to a new Ignitia learner.");
//! let response = client.generate(request).await?;
//! println!("{}", response.as_text().unwrap_or(""));
//! # Ok(())
//! # }
//! ```

mod client;
mod http;
mod request;

pub use client::{GenerationBackend, GenerationClient};
pub use http::HttpBackend;
pub use request::{GenerationRequest, GenerationResponse, OutputFormat};
