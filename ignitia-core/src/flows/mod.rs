//! The concrete Ignitia flows.
//!
//! Each flow pairs a named input schema, an output contract, and a prompt
//! template into a stateless, concurrently-invocable operation:
//!
//! - [`assessment`]: score a completed skill test into a
//!   [`assessment::SkillProfile`]
//! - [`learning_path`]: turn a skill profile and goals into a structured
//!   [`learning_path::LearningPath`]
//! - [`support`]: free-text support agent for platform questions
//!
//! Flows are defined once at startup (`*Flow::new()`) and invoked against
//! a shared [`crate::GenerationClient`].

pub mod assessment;
pub mod learning_path;
pub mod support;

/// Minimum informative length for free-text inputs (answers, profile and
/// goal descriptions), measured in characters after trimming.
pub const MIN_DETAIL_LEN: usize = 10;
