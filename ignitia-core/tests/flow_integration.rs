//! End-to-end flow tests against the mock backend.
//!
//! Exercises the full pipeline - form decoding, input validation, prompt
//! rendering, generation, output re-validation - without network access.

mod common;

use common::{client_with, learning_path_json, skill_profile_json};
use ignitia_core::flows::assessment::{AssessSkillsFlow, AssessSkillsInput, QuestionResponse};
use ignitia_core::flows::learning_path::{LearningPathFlow, LearningPathInput};
use ignitia_core::flows::support::SupportAgentFlow;
use ignitia_core::{form, FlowError, FlowOutcome, GenerationError, MockBackend, OutputFormat};
use serde_json::json;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

fn learning_path_input() -> LearningPathInput {
    LearningPathInput {
        skill_profile: "5 years backend Node.js experience".into(),
        learning_goals: "become a cloud architect".into(),
        preferred_learning_style: None,
    }
}

fn assessment_input() -> AssessSkillsInput {
    AssessSkillsInput {
        test_name: "JavaScript Fundamentals".into(),
        responses: vec![
            QuestionResponse {
                question: "What is the difference between `let`, `const`, and `var`?".into(),
                answer: "let and const are block scoped, var is function scoped.".into(),
            },
            QuestionResponse {
                question: "Explain the concept of closures in JavaScript.".into(),
                answer: "A closure captures variables from its defining scope.".into(),
            },
        ],
    }
}

#[tokio::test]
async fn learning_path_scenario_returns_modules_and_ideas() {
    let (client, backend) = client_with(MockBackend::new().with_json(learning_path_json(4)));
    let flow = LearningPathFlow::new().unwrap();

    let path = flow.invoke(&client, &learning_path_input()).await.unwrap();

    assert!(!path.learning_path.is_empty());
    assert!(!path.mini_project_ideas.is_empty());
    for module in &path.learning_path {
        assert!((3..=5).contains(&module.flashcards.len()));
    }
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn learning_path_prompt_carries_inputs_and_fallback() {
    let (client, backend) = client_with(MockBackend::new().with_json(learning_path_json(3)));
    let flow = LearningPathFlow::new().unwrap();

    flow.invoke(&client, &learning_path_input()).await.unwrap();

    let request = &backend.requests()[0];
    assert!(request.prompt.contains("5 years backend Node.js experience"));
    assert!(request.prompt.contains("become a cloud architect"));
    // Absent optional style renders the declared fallback.
    assert!(request.prompt.contains("No specific preference"));
    // Structured output was requested with the flow's schema.
    assert!(matches!(request.format, OutputFormat::Json { .. }));
}

#[tokio::test]
async fn short_input_is_rejected_before_generation() {
    let (client, backend) = client_with(MockBackend::new().with_json(learning_path_json(3)));
    let flow = LearningPathFlow::new().unwrap();

    let input = LearningPathInput {
        skill_profile: "js".into(),
        learning_goals: "go".into(),
        preferred_learning_style: None,
    };
    let err = flow.invoke(&client, &input).await.unwrap_err();

    match err {
        FlowError::InputInvalid(violations) => {
            assert_eq!(violations.violations.len(), 2);
        }
        other => panic!("expected InputInvalid, got {other:?}"),
    }
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn successful_output_satisfies_output_schema_roundtrip() {
    let (client, _) = client_with(MockBackend::new().with_json(learning_path_json(5)));
    let flow = LearningPathFlow::new().unwrap();

    let output = flow
        .flow()
        .invoke(
            &client,
            &serde_json::to_value(learning_path_input()).unwrap(),
        )
        .await
        .unwrap();

    // Round-trip: re-validating the returned value succeeds.
    let value = output.as_json().unwrap();
    assert!(ignitia_core::flows::learning_path::output_schema()
        .validate(value)
        .is_ok());
}

#[tokio::test]
async fn malformed_generation_output_is_a_contract_violation() {
    // Module with too few flashcards: parses as JSON but fails the schema.
    let (client, backend) = client_with(MockBackend::new().with_json(learning_path_json(2)));
    let flow = LearningPathFlow::new().unwrap();

    let err = flow
        .invoke(&client, &learning_path_input())
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::ContractViolation { .. }));
    // Fail immediately: no automatic second generation attempt.
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn empty_path_is_a_contract_violation() {
    let (client, _) = client_with(
        MockBackend::new().with_json(json!({ "learningPath": [], "miniProjectIdeas": [] })),
    );
    let flow = LearningPathFlow::new().unwrap();

    let err = flow
        .invoke(&client, &learning_path_input())
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::ContractViolation { .. }));
}

#[tokio::test]
async fn assessment_produces_bounded_profile() {
    let (client, backend) = client_with(MockBackend::new().with_json(skill_profile_json(72.0)));
    let flow = AssessSkillsFlow::new().unwrap();

    let profile = flow.invoke(&client, &assessment_input()).await.unwrap();
    assert!((0.0..=100.0).contains(&profile.overall_score));
    assert!(!profile.strengths.is_empty());

    // Prompt preserves response order.
    let prompt = &backend.requests()[0].prompt;
    let first = prompt.find("`let`, `const`, and `var`").unwrap();
    let second = prompt.find("closures").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn two_char_answer_is_rejected_citing_minimum_length() {
    let (client, backend) = client_with(MockBackend::new().with_json(skill_profile_json(50.0)));
    let flow = AssessSkillsFlow::new().unwrap();

    let mut input = assessment_input();
    input.responses[0].answer = "ok".into();
    let err = flow.invoke(&client, &input).await.unwrap_err();

    match err {
        FlowError::InputInvalid(violations) => {
            assert_eq!(violations.violations[0].path, "responses[0].answer");
            assert!(violations.violations[0]
                .message
                .contains("minimum length 10"));
        }
        other => panic!("expected InputInvalid, got {other:?}"),
    }
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn out_of_range_score_is_a_contract_violation() {
    let (client, _) = client_with(MockBackend::new().with_json(skill_profile_json(120.0)));
    let flow = AssessSkillsFlow::new().unwrap();

    let err = flow
        .invoke(&client, &assessment_input())
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::ContractViolation { .. }));
}

#[tokio::test]
async fn support_flow_round_trips_text() {
    let (client, backend) = client_with(
        MockBackend::new().with_text("You can retake an assessment from your profile page."),
    );
    let flow = SupportAgentFlow::new().unwrap();

    let answer = flow
        .invoke(&client, "How do I retake an assessment?")
        .await
        .unwrap();
    assert!(answer.contains("retake"));

    let request = &backend.requests()[0];
    assert!(request.prompt.contains("How do I retake an assessment?"));
    assert!(matches!(request.format, OutputFormat::Text));
}

#[tokio::test]
async fn cancellation_aborts_before_generation_result() {
    let (client, _) = client_with(MockBackend::new().with_json(skill_profile_json(50.0)));
    let flow = AssessSkillsFlow::new().unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let err = flow
        .invoke_with_cancellation(&client, &assessment_input(), &token)
        .await
        .unwrap_err();
    assert!(
        matches!(&err, FlowError::GenerationFailed(e) if e.is_cancelled()),
        "expected cancelled generation, got {err:?}"
    );
}

#[tokio::test]
async fn form_submission_end_to_end() {
    let form_data: HashMap<String, String> = [
        ("testName", "JavaScript Fundamentals"),
        ("questions", r#"["What are closures?","What is the event loop?"]"#),
        ("answer-0", "A closure captures variables from its defining scope."),
        ("answer-1", "The event loop schedules callbacks between tasks."),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let input = form::assess_skills_input(&form_data).unwrap();
    let (client, _) = client_with(MockBackend::new().with_json(skill_profile_json(64.0)));
    let flow = AssessSkillsFlow::new().unwrap();

    let outcome = FlowOutcome::from_result(flow.invoke(&client, &input).await);
    assert!(outcome.is_success());
}

#[tokio::test]
async fn transient_service_error_surfaces_as_retryable_failure() {
    let (client, backend) = client_with(MockBackend::new().with_error(GenerationError::Service {
        status: 503,
        message: "model overloaded".into(),
    }));
    let flow = LearningPathFlow::new().unwrap();

    let err = flow
        .invoke(&client, &learning_path_input())
        .await
        .unwrap_err();
    assert!(err.is_transient());
    // Exactly one attempt; retrying is the caller's decision.
    assert_eq!(backend.call_count(), 1);

    let outcome: FlowOutcome<()> = FlowOutcome::from_result(Err(err));
    match outcome {
        FlowOutcome::Failure { message } => assert!(message.contains("AI generation failed")),
        FlowOutcome::Success(_) => panic!("expected failure"),
    }
}

#[tokio::test]
async fn concurrent_invocations_share_one_flow() {
    let (client, backend) = client_with(
        MockBackend::new()
            .with_json(skill_profile_json(10.0))
            .with_json(skill_profile_json(90.0)),
    );
    let flow = std::sync::Arc::new(AssessSkillsFlow::new().unwrap());

    let input = assessment_input();
    let (a, b) = tokio::join!(
        flow.invoke(&client, &input),
        flow.invoke(&client, &input),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    // Both invocations completed independently against the same flow.
    let mut scores = [a.overall_score, b.overall_score];
    scores.sort_by(f64::total_cmp);
    assert_eq!(scores, [10.0, 90.0]);
    assert_eq!(backend.call_count(), 2);
}
