//! ignitia CLI - invoke Ignitia's generation flows from the terminal.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::Command;
use ignitia_core::flows::assessment::{AssessSkillsFlow, AssessSkillsInput, QuestionResponse};
use ignitia_core::flows::learning_path::{LearningPathFlow, LearningPathInput};
use ignitia_core::flows::support::SupportAgentFlow;
use ignitia_core::{FlowError, GenerationClient, GenerationConfig, HttpBackend};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    if let Err(e) = args.validate() {
        bail!("{}", e);
    }

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut config = GenerationConfig::default();
    if let Some(model) = &args.model {
        config = config.with_model(model.clone());
    }
    let client = GenerationClient::new(HttpBackend::new(args.api_key.clone()), config);

    // First Ctrl+C cancels the in-flight generation call; a second one
    // force-exits.
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        let mut interrupts = 0u8;
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            interrupts += 1;
            if interrupts == 1 {
                eprintln!("\nInterrupt received - cancelling...");
                signal_token.cancel();
            } else {
                std::process::exit(130);
            }
        }
    });

    run(&args.command, &client, &token).await
}

async fn run(command: &Command, client: &GenerationClient, token: &CancellationToken) -> Result<()> {
    match command {
        Command::Path {
            skill_profile,
            learning_goals,
            learning_style,
        } => {
            let input = LearningPathInput {
                skill_profile: skill_profile.clone(),
                learning_goals: learning_goals.clone(),
                preferred_learning_style: learning_style.clone(),
            };
            let flow = LearningPathFlow::new().context("Failed to define learning path flow")?;
            let path = unwrap_flow(flow.invoke_with_cancellation(client, &input, token).await)?;
            println!("{}", serde_json::to_string_pretty(&path)?);
        }
        Command::Assess {
            test_name,
            questions,
            answers,
        } => {
            let responses = questions
                .iter()
                .zip(answers)
                .map(|(question, answer)| QuestionResponse {
                    question: question.clone(),
                    answer: answer.clone(),
                })
                .collect();
            let input = AssessSkillsInput {
                test_name: test_name.clone(),
                responses,
            };
            let flow = AssessSkillsFlow::new().context("Failed to define assessment flow")?;
            let profile = unwrap_flow(flow.invoke_with_cancellation(client, &input, token).await)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Command::Support { query } => {
            let flow = SupportAgentFlow::new().context("Failed to define support flow")?;
            let answer = unwrap_flow(flow.invoke_with_cancellation(client, query, token).await)?;
            println!("{answer}");
        }
    }
    Ok(())
}

/// Map flow failures to the user-facing message, keeping the full error
/// chain in the log.
fn unwrap_flow<T>(result: Result<T, FlowError>) -> Result<T> {
    result.map_err(|e| {
        log::debug!("flow failed: {e:?}");
        anyhow::anyhow!("{}", e.user_message())
    })
}
