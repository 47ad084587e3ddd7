//! Shared test utilities for integration tests

// Allow unused code - each test file includes this module separately,
// so not all functions are used in every compilation unit.
#![allow(dead_code)]

use ignitia_core::{GenerationClient, GenerationConfig, MockBackend};
use serde_json::{json, Value};
use std::sync::Arc;

/// Build a client around a shared mock backend, keeping the handle so
/// tests can assert on call counts and recorded requests afterwards.
pub fn client_with(backend: MockBackend) -> (GenerationClient, Arc<MockBackend>) {
    let backend = Arc::new(backend);
    let client = GenerationClient::from_arc(backend.clone(), GenerationConfig::default());
    (client, backend)
}

/// A well-formed learning path output with one module and `cards`
/// flashcards.
pub fn learning_path_json(cards: usize) -> Value {
    json!({
        "learningPath": [{
            "title": "Cloud Foundations",
            "resources": ["AWS Cloud Practitioner Essentials", "Designing Data-Intensive Applications, ch. 1"],
            "handsOnExercise": {
                "title": "Deploy a static site",
                "description": "Put a small site behind a CDN.",
                "steps": ["Create a bucket", "Upload the site", "Configure the CDN"],
            },
            "flashcards": (0..cards)
                .map(|i| json!({ "question": format!("Concept {i}?"), "answer": format!("Definition {i}") }))
                .collect::<Vec<_>>(),
        }],
        "miniProjectIdeas": ["Build a serverless URL shortener"],
    })
}

/// A well-formed assessment output with the given score.
pub fn skill_profile_json(score: f64) -> Value {
    json!({
        "skillProfile": {
            "overallScore": score,
            "strengths": ["solid grasp of closures", "understands the event loop"],
            "weaknesses": ["promise error handling"],
            "recommendations": ["practice async error propagation"],
        }
    })
}
