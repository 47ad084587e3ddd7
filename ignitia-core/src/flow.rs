//! Flow orchestration.
//!
//! A [`Flow`] is a named, immutable triple of input schema, output
//! contract, and prompt template. Invocation composes the pipeline:
//!
//! 1. validate raw input against the input schema
//! 2. render the prompt template with the validated input
//! 3. one round-trip to the generation service
//! 4. re-validate the structured result against the output schema
//!
//! The one non-trivial invariant lives in step 4: **a flow never returns
//! data violating its declared output contract** - it returns
//! [`FlowError::ContractViolation`] instead. A failed re-validation fails
//! immediately; there is no automatic second generation attempt.
//!
//! Flows hold no per-invocation state and are safe to invoke concurrently.
//! Define them once at process start and pass them (and the client)
//! explicitly; there is no ambient flow registry.

use crate::error::{FlowError, ValidationError};
use crate::generation::{GenerationClient, GenerationRequest, GenerationResponse};
use crate::schema::Schema;
use crate::template::PromptTemplate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Declared output contract of a flow.
#[derive(Debug, Clone)]
pub enum OutputContract {
    /// Structured output validated against a schema
    Structured(Schema),
    /// Free-form text, no schema
    Text,
}

/// Result of a successful flow invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutput {
    /// Structured value; guaranteed to satisfy the flow's output schema
    Structured(Value),
    /// Free-form text (for [`OutputContract::Text`] flows)
    Text(String),
}

impl FlowOutput {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            FlowOutput::Structured(v) => Some(v),
            FlowOutput::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FlowOutput::Text(s) => Some(s),
            FlowOutput::Structured(_) => None,
        }
    }
}

/// A named, immutable input -> output generation operation.
pub struct Flow {
    name: String,
    input: Schema,
    output: OutputContract,
    template: PromptTemplate,
    system_instruction: Option<String>,
}

impl std::fmt::Debug for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flow")
            .field("name", &self.name)
            .field("input", &self.input.name())
            .field(
                "output",
                &match &self.output {
                    OutputContract::Structured(schema) => schema.name(),
                    OutputContract::Text => "<text>",
                },
            )
            .finish()
    }
}

impl Flow {
    /// Start defining a flow.
    pub fn builder(name: impl Into<String>) -> FlowBuilder {
        FlowBuilder {
            name: name.into(),
            input: None,
            output: None,
            template_source: None,
            system_instruction: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_schema(&self) -> &Schema {
        &self.input
    }

    pub fn output_contract(&self) -> &OutputContract {
        &self.output
    }

    /// Invoke the flow against raw, untyped input.
    pub async fn invoke(
        &self,
        client: &GenerationClient,
        input: &Value,
    ) -> Result<FlowOutput, FlowError> {
        let request = self.prepare(input)?;
        let response = client.generate(request).await?;
        self.check_output(response)
    }

    /// Invoke the flow, honoring the caller's cancellation token during the
    /// outbound generation call.
    pub async fn invoke_with_cancellation(
        &self,
        client: &GenerationClient,
        input: &Value,
        cancellation_token: &CancellationToken,
    ) -> Result<FlowOutput, FlowError> {
        let request = self.prepare(input)?;
        let response = client
            .generate_with_cancellation(request, cancellation_token)
            .await?;
        self.check_output(response)
    }

    /// Invoke the flow and deserialize the structured result.
    ///
    /// The value is schema-validated first; a result that validates but
    /// does not deserialize into `T` is still a contract violation (the
    /// typed view and the schema have drifted apart).
    pub async fn invoke_typed<T: DeserializeOwned>(
        &self,
        client: &GenerationClient,
        input: &Value,
    ) -> Result<T, FlowError> {
        let output = self.invoke(client, input).await?;
        self.deserialize(output)
    }

    /// Typed invocation with cancellation support.
    pub async fn invoke_typed_with_cancellation<T: DeserializeOwned>(
        &self,
        client: &GenerationClient,
        input: &Value,
        cancellation_token: &CancellationToken,
    ) -> Result<T, FlowError> {
        let output = self
            .invoke_with_cancellation(client, input, cancellation_token)
            .await?;
        self.deserialize(output)
    }

    /// Steps 1-2: validate input and render the prompt.
    fn prepare(&self, input: &Value) -> Result<GenerationRequest, FlowError> {
        self.input
            .validate(input)
            .map_err(FlowError::InputInvalid)?;

        let prompt = self.template.render(input);
        log::debug!("flow `{}`: rendered {} prompt chars", self.name, prompt.len());

        let mut request = match &self.output {
            OutputContract::Structured(schema) => {
                GenerationRequest::structured(prompt, schema.response_format())
            }
            OutputContract::Text => GenerationRequest::text(prompt),
        };
        if let Some(system) = &self.system_instruction {
            request = request.with_system(system.clone());
        }
        Ok(request)
    }

    /// Step 4: re-validate the raw result against the output contract.
    fn check_output(&self, response: GenerationResponse) -> Result<FlowOutput, FlowError> {
        match (&self.output, response) {
            (OutputContract::Structured(schema), GenerationResponse::Json(value)) => {
                schema
                    .validate(&value)
                    .map_err(|violations| FlowError::ContractViolation {
                        flow: self.name.clone(),
                        violations,
                    })?;
                Ok(FlowOutput::Structured(value))
            }
            (OutputContract::Text, GenerationResponse::Text(text)) => Ok(FlowOutput::Text(text)),
            (OutputContract::Structured(_), GenerationResponse::Text(_)) => {
                Err(FlowError::ContractViolation {
                    flow: self.name.clone(),
                    violations: ValidationError::single(
                        "",
                        "expected structured output, got plain text",
                    ),
                })
            }
            (OutputContract::Text, GenerationResponse::Json(_)) => {
                Err(FlowError::ContractViolation {
                    flow: self.name.clone(),
                    violations: ValidationError::single(
                        "",
                        "expected plain text, got structured output",
                    ),
                })
            }
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, output: FlowOutput) -> Result<T, FlowError> {
        let value = match output {
            FlowOutput::Structured(value) => value,
            FlowOutput::Text(text) => Value::String(text),
        };
        serde_json::from_value(value).map_err(|e| FlowError::ContractViolation {
            flow: self.name.clone(),
            violations: ValidationError::single("", format!("typed view mismatch: {e}")),
        })
    }
}

/// Builder for [`Flow`].
#[derive(Debug)]
pub struct FlowBuilder {
    name: String,
    input: Option<Schema>,
    output: Option<OutputContract>,
    template_source: Option<String>,
    system_instruction: Option<String>,
}

impl FlowBuilder {
    /// Set the input schema.
    #[must_use]
    pub fn input(mut self, schema: Schema) -> Self {
        self.input = Some(schema);
        self
    }

    /// Declare structured output validated against `schema`.
    #[must_use]
    pub fn structured_output(mut self, schema: Schema) -> Self {
        self.output = Some(OutputContract::Structured(schema));
        self
    }

    /// Declare free-form text output.
    #[must_use]
    pub fn text_output(mut self) -> Self {
        self.output = Some(OutputContract::Text);
        self
    }

    /// Set the prompt template source.
    #[must_use]
    pub fn prompt(mut self, template_source: impl Into<String>) -> Self {
        self.template_source = Some(template_source.into());
        self
    }

    /// Set an optional system instruction.
    #[must_use]
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system_instruction = Some(system.into());
        self
    }

    /// Finish the definition, compiling the prompt template.
    pub fn build(self) -> Result<Flow, FlowError> {
        let input = self
            .input
            .ok_or_else(|| FlowError::InvalidDefinition("missing input schema".to_string()))?;
        let output = self
            .output
            .ok_or_else(|| FlowError::InvalidDefinition("missing output contract".to_string()))?;
        let source = self
            .template_source
            .ok_or_else(|| FlowError::InvalidDefinition("missing prompt template".to_string()))?;
        let template = PromptTemplate::parse(&source).map_err(|source| FlowError::Template {
            flow: self.name.clone(),
            source,
        })?;
        Ok(Flow {
            name: self.name,
            input,
            output,
            template,
            system_instruction: self.system_instruction,
        })
    }
}

/// Tagged outcome surfaced to upstream callers (e.g. a form handler).
///
/// Either the typed output, or a single human-readable failure message with
/// no partial output. Contract violations never leak schema internals into
/// the message.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome<T> {
    Success(T),
    Failure { message: String },
}

impl<T> FlowOutcome<T> {
    /// Collapse a flow result into a user-facing outcome.
    pub fn from_result(result: Result<T, FlowError>) -> Self {
        match result {
            Ok(output) => FlowOutcome::Success(output),
            Err(error) => {
                log::warn!("flow invocation failed: {error}");
                FlowOutcome::Failure {
                    message: error.user_message(),
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FlowOutcome::Success(_))
    }
}
