//! Command-line argument definitions.

use clap::{Parser, Subcommand};

/// Ignitia generation flows from the command line.
#[derive(Debug, Parser)]
#[command(name = "ignitia", version, about = "Invoke Ignitia's AI flows")]
pub struct Args {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Model identifier to use
    #[arg(long)]
    pub model: Option<String>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a personalized learning path
    Path {
        /// Summary of your skills and experience (at least 10 characters)
        #[arg(long)]
        skill_profile: String,

        /// Your learning goals (at least 10 characters)
        #[arg(long)]
        learning_goals: String,

        /// Optional learning-style preference (visual, auditory, ...)
        #[arg(long)]
        learning_style: Option<String>,
    },

    /// Assess a completed skill test into a skill profile
    Assess {
        /// Name of the test
        #[arg(long)]
        test_name: String,

        /// Test question; repeat once per question, paired with --answer
        #[arg(long = "question")]
        questions: Vec<String>,

        /// Answer to the corresponding question; repeat once per question
        #[arg(long = "answer")]
        answers: Vec<String>,
    },

    /// Ask the support agent a question
    Support {
        /// The question to ask
        query: String,
    },
}

impl Args {
    /// Structural checks that clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if let Command::Assess {
            questions, answers, ..
        } = &self.command
        {
            if questions.is_empty() {
                return Err("provide at least one --question/--answer pair".to_string());
            }
            if questions.len() != answers.len() {
                return Err(format!(
                    "got {} questions but {} answers",
                    questions.len(),
                    answers.len()
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_assess_requires_matching_pairs() {
        let args = parse(&[
            "ignitia",
            "--api-key",
            "k",
            "assess",
            "--test-name",
            "JS",
            "--question",
            "What are closures?",
        ]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_assess_with_pairs_validates() {
        let args = parse(&[
            "ignitia",
            "--api-key",
            "k",
            "assess",
            "--test-name",
            "JS",
            "--question",
            "What are closures?",
            "--answer",
            "Functions capturing their defining scope.",
        ]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_path_parses() {
        let args = parse(&[
            "ignitia",
            "--api-key",
            "k",
            "path",
            "--skill-profile",
            "5 years backend Node.js experience",
            "--learning-goals",
            "become a cloud architect",
        ]);
        assert!(args.validate().is_ok());
        assert!(matches!(args.command, Command::Path { .. }));
    }
}
