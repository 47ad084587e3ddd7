use std::fmt;
use thiserror::Error;

/// Top-level error type for the ignitia library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IgnitiaError {
    /// Error from a flow invocation
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    /// Error from the generation client
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors that can occur when defining or invoking a flow
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlowError {
    /// Caller input failed validation against the flow's input schema.
    ///
    /// The generation step is never reached when this is returned.
    #[error("Invalid input: {0}")]
    InputInvalid(ValidationError),

    /// The outbound generation call failed (transport, service error, or
    /// an unparseable response).
    #[error("Generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),

    /// The generation call succeeded but its output violates the flow's
    /// declared output schema. The malformed data is never surfaced.
    #[error("Output of flow `{flow}` violates its contract: {violations}")]
    ContractViolation {
        flow: String,
        violations: ValidationError,
    },

    /// The flow's prompt template failed to compile (definition time).
    #[error("Template error in flow `{flow}`: {source}")]
    Template {
        flow: String,
        #[source]
        source: TemplateError,
    },

    /// The flow definition is incomplete or inconsistent.
    #[error("Invalid flow definition: {0}")]
    InvalidDefinition(String),
}

impl FlowError {
    /// Check if this error is user-correctable (bad form input rather than
    /// a service or programming problem).
    pub fn is_user_error(&self) -> bool {
        matches!(self, FlowError::InputInvalid(_))
    }

    /// Check if this error is plausibly transient (a retry may succeed).
    ///
    /// Contract violations are deliberately not transient: they indicate a
    /// defect in the prompt, schema, or service, not a flaky network.
    pub fn is_transient(&self) -> bool {
        matches!(self, FlowError::GenerationFailed(e) if e.is_transient())
    }

    /// A message suitable for showing to the end user.
    ///
    /// Validation errors surface their field-level reasons; generation
    /// failures suggest a retry; contract violations never leak internal
    /// schema details.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::InputInvalid(violations) => violations.to_string(),
            FlowError::GenerationFailed(e) => format!("AI generation failed: {e}"),
            FlowError::ContractViolation { .. } => {
                "The generated result did not match the expected format. Please try again."
                    .to_string()
            }
            FlowError::Template { .. } | FlowError::InvalidDefinition(_) => {
                "An internal error occurred.".to_string()
            }
        }
    }
}

/// Errors that can occur in the structured generation client
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    /// Network/transport failure reaching the generation service
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service returned an error response
    #[error("Service error (status {status}): {message}")]
    Service { status: u16, message: String },

    /// The response did not parse as the requested structured shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// No content in response
    #[error("No content in response")]
    NoContent,

    /// Request was cancelled by the caller
    #[error("Request cancelled")]
    Cancelled,

    /// Other backend error
    #[error("{0}")]
    Other(String),
}

impl GenerationError {
    /// Check if this error is plausibly transient.
    ///
    /// Returns `true` for transport failures and for service-side 429/5xx
    /// responses. The client never retries internally; this is a hint for
    /// the caller's own retry policy.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::Transport(_) => true,
            GenerationError::Service { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Check if the request was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GenerationError::Cancelled)
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Path to the offending field, e.g. `responses[1].answer`
    pub path: String,
    /// Human-readable reason, e.g. `string shorter than minimum length 10`
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Validation failure carrying every field that failed, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Convenience constructor for a single violation.
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation::new(path, message)],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.violations {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors that can occur while compiling a prompt template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TemplateError {
    /// A `{{` was never closed by `}}`
    #[error("Unclosed placeholder starting at byte {0}")]
    UnclosedPlaceholder(usize),

    /// A block tag was opened but never closed
    #[error("Unclosed block `{{{{#{0}}}}}`")]
    UnclosedBlock(String),

    /// A closing tag appeared without a matching open
    #[error("Unexpected closing tag `{{{{/{0}}}}}`")]
    UnexpectedClose(String),

    /// `{{else}}` appeared outside an `{{#if}}` block
    #[error("`{{{{else}}}}` outside of an `{{{{#if}}}}` block")]
    MisplacedElse,

    /// A tag body was empty or malformed
    #[error("Malformed tag `{0}`")]
    MalformedTag(String),
}
