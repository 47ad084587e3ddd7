//! Skill assessment flow.
//!
//! Takes a test name plus the user's ordered question/answer responses and
//! produces a [`SkillProfile`]: a bounded overall score with categorized
//! strengths, weaknesses, and recommendations. The score bound and list
//! shapes are enforced purely through the flow's output schema - there is
//! no separate scoring logic in this crate.

use super::MIN_DETAIL_LEN;
use crate::error::FlowError;
use crate::flow::Flow;
use crate::generation::GenerationClient;
use crate::schema::{FieldType, Schema};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

const PROMPT: &str = "\
You are an AI-powered skill assessment tool. Your task is to evaluate the user's responses to a skill assessment test and generate a personalized skill profile.

Test Name: {{{testName}}}

Responses:
{{#each responses}}
Question: {{{question}}}
Answer: {{{answer}}}
{{/each}}

Based on the responses, generate a skill profile with the following information:
- Overall Score: A numerical score representing the overall competency level.
- Strengths: A list of identified strengths based on the responses.
- Weaknesses: A list of identified weaknesses based on the responses.
- Recommendations: Personalized recommendations for improvement.

Ensure the skill profile is accurate, insightful, and actionable for the user.
";

/// One question/answer pair from a completed test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question: String,
    pub answer: String,
}

/// Input to the assessment flow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessSkillsInput {
    /// Name of the skill assessment test
    pub test_name: String,
    /// Ordered question/answer pairs; each answer must be at least
    /// [`MIN_DETAIL_LEN`] characters after trimming
    pub responses: Vec<QuestionResponse>,
}

/// The generated skill profile. Never mutated: a new assessment produces
/// a new profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProfile {
    /// Overall competency score in `[0, 100]`
    pub overall_score: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Wire shape of the flow output: the profile nested under `skillProfile`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssessSkillsOutput {
    skill_profile: SkillProfile,
}

/// Input schema for the assessment flow.
pub fn input_schema() -> Schema {
    let response = Schema::new("questionResponse")
        .field(
            "question",
            FieldType::string(),
            "The question asked in the test.",
        )
        .field(
            "answer",
            FieldType::string_min(MIN_DETAIL_LEN),
            "The user provided answer to the question.",
        );
    Schema::new("assessSkillsInput")
        .field(
            "testName",
            FieldType::string(),
            "The name of the skill assessment test.",
        )
        .field(
            "responses",
            FieldType::list_min(FieldType::object(response), 1),
            "An array of questions and answers from the skill assessment test.",
        )
}

/// Output schema for the assessment flow.
pub fn output_schema() -> Schema {
    let profile = Schema::new("skillProfile")
        .field(
            "overallScore",
            FieldType::number_range(0.0, 100.0),
            "The overall score of the skill assessment.",
        )
        .field(
            "strengths",
            FieldType::list(FieldType::string()),
            "The strengths identified in the assessment.",
        )
        .field(
            "weaknesses",
            FieldType::list(FieldType::string()),
            "The weaknesses identified in the assessment.",
        )
        .field(
            "recommendations",
            FieldType::list(FieldType::string()),
            "Personalized recommendations for improvement.",
        );
    Schema::new("assessSkillsOutput").field(
        "skillProfile",
        FieldType::object(profile),
        "The generated skill profile based on the test responses.",
    )
}

/// The skill assessment flow. Define once, invoke many times.
#[derive(Debug)]
pub struct AssessSkillsFlow {
    flow: Flow,
}

impl AssessSkillsFlow {
    pub fn new() -> Result<Self, FlowError> {
        let flow = Flow::builder("assessSkills")
            .input(input_schema())
            .structured_output(output_schema())
            .prompt(PROMPT)
            .build()?;
        Ok(Self { flow })
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    /// Assess a completed test into a skill profile.
    pub async fn invoke(
        &self,
        client: &GenerationClient,
        input: &AssessSkillsInput,
    ) -> Result<SkillProfile, FlowError> {
        let raw = to_raw(input)?;
        let output: AssessSkillsOutput = self.flow.invoke_typed(client, &raw).await?;
        Ok(output.skill_profile)
    }

    /// Like [`invoke`](Self::invoke), honoring a cancellation token.
    pub async fn invoke_with_cancellation(
        &self,
        client: &GenerationClient,
        input: &AssessSkillsInput,
        cancellation_token: &CancellationToken,
    ) -> Result<SkillProfile, FlowError> {
        let raw = to_raw(input)?;
        let output: AssessSkillsOutput = self
            .flow
            .invoke_typed_with_cancellation(client, &raw, cancellation_token)
            .await?;
        Ok(output.skill_profile)
    }
}

fn to_raw(input: &AssessSkillsInput) -> Result<serde_json::Value, FlowError> {
    serde_json::to_value(input)
        .map_err(|e| FlowError::InvalidDefinition(format!("unserializable input: {e}")))
}
