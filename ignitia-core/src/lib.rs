//! # Ignitia Core
//!
//! Schema-validated prompt flows for the Ignitia learning platform.
//!
//! This crate implements the structured generation pipeline behind
//! Ignitia's AI features: skill assessment, personalized learning paths,
//! and the support agent. A [`Flow`] pairs a named input schema, an output
//! contract, and a prompt template; invocation validates raw input,
//! renders the prompt, makes one round-trip to the generation service, and
//! re-validates the structured result against the output schema before
//! surfacing it.
//!
//! ## Architecture
//!
//! - **Schema-first**: the same [`Schema`] type validates caller input and
//!   verifies generated output, and is forwarded to the service as a
//!   structured-output constraint
//! - **Fail-closed**: a flow never returns data violating its output
//!   contract; it returns [`FlowError::ContractViolation`] instead
//! - **Caller-owned policy**: one outbound attempt per invocation - no
//!   internal retries or timeouts; cancellation via `CancellationToken`
//! - **Stateless flows**: defined once at startup, invoked concurrently,
//!   no state shared between invocations
//!
//! ## Example
//!
//! ```no_run
//! use ignitia_core::flows::learning_path::{LearningPathFlow, LearningPathInput};
//! use ignitia_core::{GenerationClient, GenerationConfig, HttpBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = HttpBackend::new("api-key");
//! let client = GenerationClient::new(backend, GenerationConfig::default());
//! let flow = LearningPathFlow::new()?;
//!
//! let path = flow
//!     .invoke(&client, &LearningPathInput {
//!         skill_profile: "5 years backend Node.js experience".into(),
//!         learning_goals: "become a cloud architect".into(),
//!         preferred_learning_style: None,
//!     })
//!     .await?;
//!
//! for module in &path.learning_path {
//!     println!("{} ({} flashcards)", module.title, module.flashcards.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod flow;
pub mod flows;
pub mod form;
pub mod generation;
pub mod mock;
pub mod schema;
pub mod template;

// Re-export public API
pub use config::{GenerationConfig, IgnitiaConfig, MODEL};
pub use error::{
    FieldViolation, FlowError, GenerationError, IgnitiaError, TemplateError, ValidationError,
};
pub use flow::{Flow, FlowBuilder, FlowOutcome, FlowOutput, OutputContract};
pub use generation::{
    GenerationBackend, GenerationClient, GenerationRequest, GenerationResponse, HttpBackend,
    OutputFormat,
};
pub use mock::MockBackend;
pub use schema::{Field, FieldType, Schema};
pub use template::PromptTemplate;
