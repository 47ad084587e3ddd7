//! Support agent flow.
//!
//! Free-text in, free-text out: answers user questions about the platform,
//! their learning path, and technical issues. Uses [`crate::flow::OutputContract::Text`],
//! so no output schema is applied.

use crate::error::FlowError;
use crate::flow::Flow;
use crate::generation::GenerationClient;
use crate::schema::{FieldType, Schema};
use serde_json::json;
use tokio_util::sync::CancellationToken;

const PROMPT: &str = "\
You are a friendly and helpful support agent for the Ignitia learning platform. Your goal is to assist users by answering their questions about the platform, their learning path, and any technical issues they might encounter.

Here is the user's query:
\"{{{query}}}\"

Please provide a clear, concise, and helpful response. If you don't know the answer, admit it and suggest where the user might find more information.
";

/// Input schema: a single non-empty query string.
pub fn input_schema() -> Schema {
    Schema::new("askSupportAgentInput").field(
        "query",
        FieldType::string_min(1),
        "The user's support question.",
    )
}

/// The support agent flow. Define once, invoke many times.
#[derive(Debug)]
pub struct SupportAgentFlow {
    flow: Flow,
}

impl SupportAgentFlow {
    pub fn new() -> Result<Self, FlowError> {
        let flow = Flow::builder("askSupportAgent")
            .input(input_schema())
            .text_output()
            .prompt(PROMPT)
            .build()?;
        Ok(Self { flow })
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    /// Answer a support query.
    pub async fn invoke(
        &self,
        client: &GenerationClient,
        query: &str,
    ) -> Result<String, FlowError> {
        let output = self.flow.invoke(client, &json!({ "query": query })).await?;
        Ok(output.as_text().unwrap_or_default().to_string())
    }

    /// Like [`invoke`](Self::invoke), honoring a cancellation token.
    pub async fn invoke_with_cancellation(
        &self,
        client: &GenerationClient,
        query: &str,
        cancellation_token: &CancellationToken,
    ) -> Result<String, FlowError> {
        let output = self
            .flow
            .invoke_with_cancellation(client, &json!({ "query": query }), cancellation_token)
            .await?;
        Ok(output.as_text().unwrap_or_default().to_string())
    }
}
