use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use varsity_core::{
    ConversationOrchestrator, Credentials, DomainConfig, ModelConfig, Transcript,
};
use varsity_interaction::{GoogleSearchAdapter, OpenAIApiAgent};

/// The main entry point for the Varsity readline REPL application.
///
/// Sets up a rustyline-based chat loop that:
/// 1. Loads and validates backend credentials before any call is made
/// 2. Wires the OpenAI agent and Google search adapter into the orchestrator
/// 3. Holds the conversation transcript across turns
/// 4. Awaits each turn to completion before reading the next line
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // ===== Backend Initialization =====
    let credentials = Credentials::load().context("failed to load credentials")?;
    let model_config = ModelConfig::from_env();
    let domain = DomainConfig::default();

    let model = Arc::new(OpenAIApiAgent::new(
        credentials.openai_api_key.clone(),
        model_config.model.clone(),
    ));
    let search = Arc::new(GoogleSearchAdapter::new(
        credentials.google_api_key.clone(),
        credentials.google_cse_id.clone(),
    ));
    let orchestrator = ConversationOrchestrator::new(model, search, domain.clone());

    // ===== REPL Setup =====
    let mut rl = DefaultEditor::new()?;

    println!("{}", format!("=== {} ===", domain.title).bright_magenta().bold());
    println!(
        "{}",
        format!(
            "Ask a question about {}, or type 'quit' to exit.",
            domain.institution
        )
        .bright_black()
    );
    println!();

    // Session transcript, owned here and rewritten one turn at a time.
    let mut transcript = Transcript::new();

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                // One turn in flight at a time; a failed turn leaves the
                // transcript at its pre-turn state.
                match orchestrator.handle_turn(trimmed, transcript.clone()).await {
                    Ok((reply, updated)) => {
                        transcript = updated;
                        for reply_line in reply.lines() {
                            println!("{}", reply_line.bright_blue());
                        }
                        println!();
                    }
                    Err(err) => {
                        eprintln!("{}", format!("Error: {err}").red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}
