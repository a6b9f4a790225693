//! Interactive chat loop
//!
//! Runs a readline-based conversation against the configured completion
//! provider. Each turn appends the user message to the active session,
//! sends the full conversation, appends the assistant reply (or a
//! synthetic error message when the provider fails), and renders the reply
//! through the response parser.

use crate::config::Config;
use crate::error::{ParleyError, Result};
use crate::providers::{conversation_turns, create_client, CompletionClient};
use crate::response_parser::ResponseParser;
use crate::session::persistence::{BlobStore, SledBlobStore};
use crate::session::{ChatMessage, SessionStore};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Slash commands available inside the chat loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Show command help
    Help,
    /// Leave the chat loop
    Quit,
    /// Create and switch to a fresh session
    New,
    /// List stored sessions
    Sessions,
    /// Switch to the session with the given id prefix
    Switch(String),
    /// Rename the active session
    Rename(String),
    /// Delete the active session
    Delete,
}

/// Parse a `/command` line, if it is one
///
/// Returns None for ordinary chat input. Unknown slash commands map to
/// `Help` so a typo shows the command list instead of being sent to the
/// provider.
pub fn parse_special_command(line: &str) -> Option<SpecialCommand> {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or("").trim();

    let parsed = match command {
        "/help" => SpecialCommand::Help,
        "/quit" | "/exit" => SpecialCommand::Quit,
        "/new" => SpecialCommand::New,
        "/sessions" => SpecialCommand::Sessions,
        "/switch" => SpecialCommand::Switch(rest.to_string()),
        "/rename" => SpecialCommand::Rename(rest.to_string()),
        "/delete" => SpecialCommand::Delete,
        _ => SpecialCommand::Help,
    };
    Some(parsed)
}

fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  /new              start a fresh session");
    println!("  /sessions         list stored sessions");
    println!("  /switch <id>      switch to a session by id prefix");
    println!("  /rename <title>   rename the active session");
    println!("  /delete           delete the active session");
    println!("  /help             show this help");
    println!("  /quit             leave the chat");
}

/// Start the interactive chat loop
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `provider_name` - Optional override for the configured provider
/// * `session_prefix` - Optional session id prefix to resume instead of
///   the most recent session
pub async fn run_chat(
    mut config: Config,
    provider_name: Option<String>,
    session_prefix: Option<String>,
) -> Result<()> {
    if let Some(name) = provider_name {
        config.provider.provider_type = name;
    }
    let client = create_client(&config.provider)?;

    let db_path = config.storage.resolve_path()?;
    tracing::info!("Opening session database at {}", db_path.display());
    let mut store = SessionStore::open(SledBlobStore::new(&db_path)?);

    if let Some(prefix) = session_prefix {
        let id = store
            .find_by_prefix(&prefix)
            .map(|s| s.id)
            .ok_or_else(|| ParleyError::SessionNotFound(prefix.clone()))?;
        store.select(id);
    }

    let parser = ResponseParser::new()?;

    if let Some(session) = store.selected_session() {
        println!(
            "{} {} ({})",
            "Session:".bold(),
            session.title,
            session.short_id().cyan()
        );
    }
    println!("Type {} for commands, {} to leave.\n", "/help".cyan(), "/quit".cyan());

    let mut rl = DefaultEditor::new()
        .map_err(|e| ParleyError::Config(format!("Failed to initialize readline: {}", e)))?;

    loop {
        let readline = rl.readline("you> ");
        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Bye.");
                break;
            }
            Err(e) => {
                tracing::error!("Readline error: {}", e);
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(trimmed);

        if let Some(command) = parse_special_command(trimmed) {
            match command {
                SpecialCommand::Quit => {
                    println!("Bye.");
                    break;
                }
                SpecialCommand::Help => print_help(),
                SpecialCommand::New => {
                    store.create_new_chat();
                    if let Some(session) = store.selected_session() {
                        println!(
                            "{} {} ({})",
                            "Started".green(),
                            session.title,
                            session.short_id().cyan()
                        );
                    }
                }
                SpecialCommand::Sessions => {
                    for session in store.sessions() {
                        let marker = if store.selected_session().map(|s| s.id)
                            == Some(session.id)
                        {
                            "*"
                        } else {
                            " "
                        };
                        println!(
                            "{} {}  {}  ({} messages)",
                            marker,
                            session.short_id().cyan(),
                            session.title,
                            session.messages.len()
                        );
                    }
                }
                SpecialCommand::Switch(prefix) => {
                    match store.find_by_prefix(&prefix).map(|s| (s.id, s.title.clone())) {
                        Some((id, title)) => {
                            store.select(id);
                            println!("{} {}", "Switched to".green(), title);
                        }
                        None => println!("{} no session matches '{}'", "Error:".red(), prefix),
                    }
                }
                SpecialCommand::Rename(title) => {
                    if let Some(id) = store.selected_session().map(|s| s.id) {
                        store.update_chat_title(id, &title);
                        if let Some(session) = store.selected_session() {
                            println!("{} {}", "Renamed to".green(), session.title);
                        }
                    }
                }
                SpecialCommand::Delete => {
                    if let Some(id) = store.selected_session().map(|s| s.id) {
                        store.delete_chat(id);
                        if let Some(session) = store.selected_session() {
                            println!(
                                "{} now on {} ({})",
                                "Deleted;".yellow(),
                                session.title,
                                session.short_id().cyan()
                            );
                        }
                    }
                }
            }
            continue;
        }

        submit_turn(&mut store, client.as_ref(), &parser, trimmed).await;
    }

    Ok(())
}

/// One conversation turn: persist the user message, call the provider,
/// persist the reply, render it
///
/// Provider failure is not fatal: the error text is recorded as the
/// assistant message and the conversation continues.
pub async fn submit_turn<S: BlobStore>(
    store: &mut SessionStore<S>,
    client: &dyn CompletionClient,
    parser: &ResponseParser,
    input: &str,
) {
    let Some(session_id) = store.selected_session().map(|s| s.id) else {
        tracing::warn!("No active session; dropping input");
        return;
    };

    store.add_message(session_id, ChatMessage::user(input));

    let turns = store
        .selected_session()
        .map(conversation_turns)
        .unwrap_or_default();

    println!("{}", "thinking...".dimmed());
    let content = match client.send_message(&turns).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Provider call failed: {}", e);
            format!("Error: {}", e)
        }
    };

    store.add_message(session_id, ChatMessage::assistant(content.clone()));
    render_reply(parser, &content);
}

/// Render an assistant reply: prose first, then each code segment with
/// its explanation and a language caption
fn render_reply(parser: &ResponseParser, content: &str) {
    let segments = parser.parse(content);

    if segments.is_empty() {
        println!("{}\n", content.trim());
        return;
    }

    let plain = parser.plain_text(content).trim();
    if !plain.is_empty() {
        println!("{}", plain);
    }

    for segment in &segments {
        if !segment.explanation.is_empty() && segment.explanation != plain {
            println!("{}", segment.explanation);
        }
        println!("{}", format!("--- {} ---", segment.language).cyan().bold());
        println!("{}", segment.code);
    }
    println!();
}
