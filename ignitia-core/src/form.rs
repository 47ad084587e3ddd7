//! Decoding of string-keyed form submissions into flow inputs.
//!
//! Upstream callers submit flows as HTML form data: every value is a
//! string, and list-valued fields arrive as one serialized-JSON field
//! (`questions`) plus indexed per-item fields (`answer-0`, `answer-1`, ...).
//! Decoding is purely structural; content rules (minimum lengths and so
//! on) are enforced by the flow's input schema, so a decoded-but-too-short
//! answer still surfaces as `InputInvalid` with a field-level message.

use crate::error::ValidationError;
use crate::flows::assessment::{AssessSkillsInput, QuestionResponse};
use crate::flows::learning_path::LearningPathInput;
use std::collections::HashMap;

/// Decode a learning-path form submission.
///
/// Missing fields decode as empty strings (and are then rejected by the
/// input schema's minimum-length rules); an empty or whitespace-only
/// `preferredLearningStyle` decodes as absent, since untouched HTML inputs
/// submit empty strings.
pub fn learning_path_input(form: &HashMap<String, String>) -> LearningPathInput {
    let get = |key: &str| form.get(key).cloned().unwrap_or_default();
    let preferred_learning_style = form
        .get("preferredLearningStyle")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    LearningPathInput {
        skill_profile: get("skillProfile"),
        learning_goals: get("learningGoals"),
        preferred_learning_style,
    }
}

/// Decode a skill-assessment form submission.
///
/// Expects `testName`, a `questions` field holding a JSON string array,
/// and one `answer-{i}` field per question. A missing answer decodes as an
/// empty string, so the schema reports it under `responses[i].answer`.
pub fn assess_skills_input(
    form: &HashMap<String, String>,
) -> Result<AssessSkillsInput, ValidationError> {
    let test_name = form.get("testName").cloned().unwrap_or_default();
    let questions_raw = form
        .get("questions")
        .ok_or_else(|| ValidationError::single("questions", "missing serialized question list"))?;
    let questions: Vec<String> = serde_json::from_str(questions_raw).map_err(|e| {
        ValidationError::single("questions", format!("not a valid JSON string list: {e}"))
    })?;

    let responses = questions
        .into_iter()
        .enumerate()
        .map(|(index, question)| QuestionResponse {
            question,
            answer: form
                .get(&format!("answer-{index}"))
                .cloned()
                .unwrap_or_default(),
        })
        .collect();

    Ok(AssessSkillsInput {
        test_name,
        responses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_learning_path_decodes_fields() {
        let input = learning_path_input(&form(&[
            ("skillProfile", "5 years backend Node.js experience"),
            ("learningGoals", "become a cloud architect"),
            ("preferredLearningStyle", "visual"),
        ]));
        assert_eq!(input.skill_profile, "5 years backend Node.js experience");
        assert_eq!(input.preferred_learning_style.as_deref(), Some("visual"));
    }

    #[test]
    fn test_empty_style_decodes_as_absent() {
        let input = learning_path_input(&form(&[
            ("skillProfile", "profile text here"),
            ("learningGoals", "goal text here"),
            ("preferredLearningStyle", "   "),
        ]));
        assert!(input.preferred_learning_style.is_none());
    }

    #[test]
    fn test_missing_fields_decode_as_empty() {
        let input = learning_path_input(&form(&[]));
        assert_eq!(input.skill_profile, "");
        assert!(input.preferred_learning_style.is_none());
    }

    #[test]
    fn test_assessment_zips_questions_and_answers_in_order() {
        let input = assess_skills_input(&form(&[
            ("testName", "JavaScript Fundamentals"),
            ("questions", r#"["A?","B?"]"#),
            ("answer-0", "first detailed answer"),
            ("answer-1", "second detailed answer"),
        ]))
        .unwrap();
        assert_eq!(input.test_name, "JavaScript Fundamentals");
        assert_eq!(input.responses.len(), 2);
        assert_eq!(input.responses[0].question, "A?");
        assert_eq!(input.responses[0].answer, "first detailed answer");
        assert_eq!(input.responses[1].question, "B?");
        assert_eq!(input.responses[1].answer, "second detailed answer");
    }

    #[test]
    fn test_missing_answer_decodes_as_empty_string() {
        let input = assess_skills_input(&form(&[
            ("testName", "JS"),
            ("questions", r#"["A?","B?"]"#),
            ("answer-0", "a fine detailed answer"),
        ]))
        .unwrap();
        assert_eq!(input.responses[1].answer, "");
    }

    #[test]
    fn test_missing_questions_field_is_a_violation() {
        let err = assess_skills_input(&form(&[("testName", "JS")])).unwrap_err();
        assert_eq!(err.violations[0].path, "questions");
    }

    #[test]
    fn test_unparseable_questions_field_is_a_violation() {
        let err = assess_skills_input(&form(&[
            ("testName", "JS"),
            ("questions", "not json"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("questions"));
    }
}
