//! Interactive terminal chat.
//!
//! Lines starting with `/` are commands; anything else is a question for the
//! session. Ctrl-C while a question is in flight abandons that question;
//! Ctrl-C at the prompt exits.

use super::output::Output;
use crate::session::ChatSession;
use crate::types::{AppError, CortexModel, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    SetModel(CortexModel),
    ListModels,
    SetHistory(bool),
    Reset,
    Transcript,
    Help,
    Quit,
    Empty,
    /// Unrecognised command or bad argument, with a message for the user
    Invalid(String),
}

/// Interpret one line of input.
pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    if !line.starts_with('/') {
        return ReplCommand::Ask(line.to_string());
    }

    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let arg = parts.next();

    match (command, arg) {
        ("/model", Some(name)) => match name.parse() {
            Ok(model) => ReplCommand::SetModel(model),
            Err(e) => ReplCommand::Invalid(e.to_string()),
        },
        ("/model", None) => ReplCommand::Invalid("Usage: /model <name>".to_string()),
        ("/models", _) => ReplCommand::ListModels,
        ("/history", Some("on")) => ReplCommand::SetHistory(true),
        ("/history", Some("off")) => ReplCommand::SetHistory(false),
        ("/history", _) => ReplCommand::Invalid("Usage: /history on|off".to_string()),
        ("/reset", _) => ReplCommand::Reset,
        ("/transcript", _) => ReplCommand::Transcript,
        ("/help", _) => ReplCommand::Help,
        ("/quit" | "/exit", _) => ReplCommand::Quit,
        (other, _) => ReplCommand::Invalid(format!(
            "Unknown command {}. Type /help for a list of commands",
            other
        )),
    }
}

/// Run the chat loop until `/quit`, end of input or Ctrl-C at the prompt.
pub async fn run(session: &mut ChatSession, output: &Output) -> Result<()> {
    output.banner();
    print_settings(session, output);
    output.hint("Type /help for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        output.prompt();

        let line = tokio::select! {
            line = lines.next_line() => line
                .map_err(|e| AppError::Internal(format!("Failed to read input: {}", e)))?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            output.newline();
            break;
        };

        match parse_command(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Ask(question) => {
                output.you_asked(&question);
                output.thinking();
                let outcome = session
                    .ask_until(&question, async {
                        let _ = tokio::signal::ctrl_c().await;
                    })
                    .await?;
                output.turn(&outcome.turn);
            }
            ReplCommand::SetModel(model) => {
                session.set_model(model);
                output.success(&format!("Model set to {}", model));
            }
            ReplCommand::ListModels => {
                let current = session.settings().model;
                for model in CortexModel::ALL {
                    let marker = if model == current { " (selected)" } else { "" };
                    output.list_item(&format!("{}{}", model, marker));
                }
            }
            ReplCommand::SetHistory(remember) => {
                session.set_remember_history(remember);
                output.success(if remember {
                    "Chat history will be remembered"
                } else {
                    "Chat history will be ignored"
                });
            }
            ReplCommand::Reset => {
                session.reset();
                output.success("Started over");
            }
            ReplCommand::Transcript => {
                if session.history().is_empty() {
                    output.info("No messages yet");
                }
                for turn in session.history().turns() {
                    output.turn(turn);
                }
            }
            ReplCommand::Help => print_help(output),
            ReplCommand::Quit => break,
            ReplCommand::Invalid(message) => output.warning(&message),
        }
    }

    Ok(())
}

fn print_settings(session: &ChatSession, output: &Output) {
    let settings = session.settings();
    output.kv("Model", settings.model.as_str());
    output.kv(
        "Remember chat history",
        if settings.remember_history { "yes" } else { "no" },
    );
}

fn print_help(output: &Output) {
    output.header("Commands");
    output.table_header(&["Command", "Description"]);
    output.table_row(&["/model <name>", "Select the completion model"]);
    output.table_row(&["/models", "List available models"]);
    output.table_row(&["/history on|off", "Remember chat history"]);
    output.table_row(&["/reset", "Start over"]);
    output.table_row(&["/transcript", "Show the conversation"]);
    output.table_row(&["/quit", "Exit"]);
}
