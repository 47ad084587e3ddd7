//! Personalized learning path flow.
//!
//! Turns a free-text skill profile and learning goals (plus an optional
//! learning-style preference) into an ordered list of learning modules -
//! each with resources, a hands-on exercise, and a small flashcard set -
//! and a list of mini-project ideas.

use super::MIN_DETAIL_LEN;
use crate::error::FlowError;
use crate::flow::Flow;
use crate::generation::GenerationClient;
use crate::schema::{FieldType, Schema};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Flashcard count bounds per module, from the product contract.
pub const MIN_FLASHCARDS: usize = 3;
pub const MAX_FLASHCARDS: usize = 5;

const PROMPT: &str = "\
You are an expert learning path generator. Given a user's skill profile and learning goals, you generate a personalized learning path structured into modules.

Each module must contain:
1.  A clear title.
2.  A list of specific, actionable learning resources (e.g., course names, tutorial links, book chapters).
3.  A single, practical, hands-on exercise with a title, description, and step-by-step instructions. This should be a \"visual hands\" style task.
4.  A small set of 3-5 flashcards with a question and a concise answer for reviewing key concepts.

Also, provide a separate list of bigger mini-project ideas.

Skill Profile: {{{skillProfile}}}
Learning Goals: {{{learningGoals}}}
Preferred Learning Style: {{#if preferredLearningStyle}}{{{preferredLearningStyle}}}{{else}}No specific preference{{/if}}
";

/// Input to the learning path flow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathInput {
    /// Summary of the user's skills, experience and qualifications
    pub skill_profile: String,
    /// The user's learning goals and aspirations
    pub learning_goals: String,
    /// Optional learning-style preference (visual, auditory, kinesthetic, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_learning_style: Option<String>,
}

/// A single flashcard: question on the front, answer on the back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

/// A practical exercise closing out a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandsOnExercise {
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
}

/// One module of the generated path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningModule {
    pub title: String,
    pub resources: Vec<String>,
    pub hands_on_exercise: HandsOnExercise,
    pub flashcards: Vec<Flashcard>,
}

/// The generated learning path: ordered modules plus mini-project ideas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    pub learning_path: Vec<LearningModule>,
    pub mini_project_ideas: Vec<String>,
}

/// Input schema for the learning path flow.
pub fn input_schema() -> Schema {
    Schema::new("learningPathInput")
        .field(
            "skillProfile",
            FieldType::string_min(MIN_DETAIL_LEN),
            "A summary of the user skills, experience and qualifications.",
        )
        .field(
            "learningGoals",
            FieldType::string_min(MIN_DETAIL_LEN),
            "The user learning goals and aspirations.",
        )
        .optional_field(
            "preferredLearningStyle",
            FieldType::string(),
            "Optional preferences for learning style, such as visual, auditory, or kinesthetic.",
        )
}

/// Output schema for the learning path flow.
pub fn output_schema() -> Schema {
    let flashcard = Schema::new("flashcard")
        .field(
            "question",
            FieldType::string(),
            "The front of the flashcard, containing a question or term.",
        )
        .field(
            "answer",
            FieldType::string(),
            "The back of the flashcard, containing the answer or definition.",
        );
    let exercise = Schema::new("handsOnExercise")
        .field("title", FieldType::string(), "Title for the hands-on exercise.")
        .field(
            "description",
            FieldType::string(),
            "A brief description of the exercise and what to do.",
        )
        .field(
            "steps",
            FieldType::list(FieldType::string()),
            "A list of steps to complete the exercise.",
        );
    let module = Schema::new("learningModule")
        .field(
            "title",
            FieldType::string(),
            "A concise title for the learning module.",
        )
        .field(
            "resources",
            FieldType::list(FieldType::string()),
            "A list of specific learning resources (courses, articles, videos).",
        )
        .field(
            "handsOnExercise",
            FieldType::object(exercise),
            "A practical, hands-on exercise to apply the knowledge from the module.",
        )
        .field(
            "flashcards",
            FieldType::list_bounded(
                FieldType::object(flashcard),
                MIN_FLASHCARDS,
                MAX_FLASHCARDS,
            ),
            "A set of flashcards for key concepts in the module.",
        );
    Schema::new("learningPathOutput")
        .field(
            "learningPath",
            FieldType::list_min(FieldType::object(module), 1),
            "A list of recommended learning modules.",
        )
        .field(
            "miniProjectIdeas",
            FieldType::list_min(FieldType::string(), 1),
            "A list of mini-project ideas to apply the skills.",
        )
}

/// The learning path flow. Define once, invoke many times.
#[derive(Debug)]
pub struct LearningPathFlow {
    flow: Flow,
}

impl LearningPathFlow {
    pub fn new() -> Result<Self, FlowError> {
        let flow = Flow::builder("generateLearningPath")
            .input(input_schema())
            .structured_output(output_schema())
            .prompt(PROMPT)
            .build()?;
        Ok(Self { flow })
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    /// Generate a learning path for the given profile and goals.
    pub async fn invoke(
        &self,
        client: &GenerationClient,
        input: &LearningPathInput,
    ) -> Result<LearningPath, FlowError> {
        let raw = to_raw(input)?;
        self.flow.invoke_typed(client, &raw).await
    }

    /// Like [`invoke`](Self::invoke), honoring a cancellation token.
    pub async fn invoke_with_cancellation(
        &self,
        client: &GenerationClient,
        input: &LearningPathInput,
        cancellation_token: &CancellationToken,
    ) -> Result<LearningPath, FlowError> {
        let raw = to_raw(input)?;
        self.flow
            .invoke_typed_with_cancellation(client, &raw, cancellation_token)
            .await
    }
}

fn to_raw(input: &LearningPathInput) -> Result<serde_json::Value, FlowError> {
    serde_json::to_value(input)
        .map_err(|e| FlowError::InvalidDefinition(format!("unserializable input: {e}")))
}
