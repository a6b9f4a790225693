//! Session management commands
//!
//! List, create, rename, and delete stored chat sessions from the
//! command line.

use crate::cli::SessionCommand;
use crate::config::Config;
use crate::error::{ParleyError, Result};
use crate::session::persistence::SledBlobStore;
use crate::session::SessionStore;
use colored::Colorize;
use prettytable::{format, Table};
use uuid::Uuid;

/// Handle `parley sessions` subcommands
pub fn run_sessions(config: &Config, command: SessionCommand) -> Result<()> {
    let db_path = config.storage.resolve_path()?;
    let mut store = SessionStore::open(SledBlobStore::new(&db_path)?);

    match command {
        SessionCommand::List => {
            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "ID".bold(),
                "Title".bold(),
                "Messages".bold(),
                "Created".bold()
            ]);

            for session in store.sessions() {
                let title = truncate_title(&session.title, 40);
                let created = session.created_at.format("%Y-%m-%d %H:%M").to_string();

                table.add_row(prettytable::row![
                    session.short_id().cyan(),
                    title,
                    session.messages.len(),
                    created
                ]);
            }

            println!("\nChat Sessions:");
            table.printstd();
            println!();
            println!(
                "Use {} to resume a session.",
                "parley chat --session <ID>".cyan()
            );
            println!();
        }
        SessionCommand::New { title } => {
            let id = store.create_new_chat();
            if let Some(title) = title {
                store.update_chat_title(id, &title);
            }
            let session = store
                .sessions()
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| ParleyError::SessionNotFound(id.to_string()))?;
            println!(
                "{} {} ({})",
                "Created".green(),
                session.title,
                session.short_id().cyan()
            );
        }
        SessionCommand::Rename { id, title } => {
            let id = resolve_prefix(&store, &id)?;
            store.update_chat_title(id, &title);
            println!("{} session {}", "Renamed".green(), id.to_string()[..8].cyan());
        }
        SessionCommand::Delete { id } => {
            let id = resolve_prefix(&store, &id)?;
            store.delete_chat(id);
            println!("{}", format!("Deleted session {}", &id.to_string()[..8]).green());
        }
    }

    Ok(())
}

/// Shorten a title for table display
///
/// Truncation counts characters, not bytes: titles are arbitrary UTF-8
/// and slicing at a byte offset could land inside a multi-byte character.
fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() > max_chars {
        let head: String = title.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}

/// Resolve an id prefix to a unique session id
///
/// # Errors
///
/// Returns `ParleyError::SessionNotFound` when the prefix matches no
/// session or more than one.
fn resolve_prefix<S: crate::session::persistence::BlobStore>(
    store: &SessionStore<S>,
    prefix: &str,
) -> Result<Uuid> {
    store
        .find_by_prefix(prefix)
        .map(|s| s.id)
        .ok_or_else(|| ParleyError::SessionNotFound(prefix.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::session::persistence::MemoryBlobStore;

    #[test]
    fn test_truncate_title_short_titles_unchanged() {
        assert_eq!(truncate_title("Trip Plan", 40), "Trip Plan");
        assert_eq!(truncate_title("", 40), "");
    }

    #[test]
    fn test_truncate_title_long_ascii() {
        let long = "x".repeat(50);
        let truncated = truncate_title(&long, 40);
        assert_eq!(truncated.chars().count(), 40);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_title_multibyte_does_not_split_characters() {
        // 50 two-byte characters: 100 bytes, so any byte-offset slice in
        // the middle would panic.
        let accented = "é".repeat(50);
        let truncated = truncate_title(&accented, 40);
        assert_eq!(truncated, format!("{}...", "é".repeat(37)));
    }

    #[test]
    fn test_truncate_title_multibyte_within_limit_unchanged() {
        let accented = "é".repeat(30);
        assert_eq!(truncate_title(&accented, 40), accented);
    }

    #[test]
    fn test_list_renders_session_with_multibyte_title() {
        let tmp = tempfile::TempDir::new().expect("Failed to create temp dir");
        let db_path = tmp.path().join("sessions");

        {
            let mut store = SessionStore::open(
                SledBlobStore::new(&db_path).expect("Failed to open blob store"),
            );
            let id = store.sessions()[0].id;
            store.update_chat_title(id, &"é".repeat(30));
        }

        let config = Config {
            storage: StorageConfig {
                path: Some(db_path),
            },
            ..Default::default()
        };
        // Only meaningful when the env override is absent.
        if std::env::var(crate::config::STORAGE_PATH_ENV).is_err() {
            run_sessions(&config, SessionCommand::List).expect("list should not fail");
        }
    }

    #[test]
    fn test_resolve_prefix_unique_match() {
        let mut store = SessionStore::open(MemoryBlobStore::new());
        let id = store.create_new_chat();

        let resolved = resolve_prefix(&store, &id.to_string()[..8]).unwrap();
        assert_eq!(resolved, id);
    }

    #[test]
    fn test_resolve_prefix_empty_errors() {
        let store = SessionStore::open(MemoryBlobStore::new());
        assert_eq!(store.sessions().len(), 1);
        let err = resolve_prefix(&store, "").unwrap_err();
        assert!(err.to_string().contains("Session not found"));
    }

    #[test]
    fn test_resolve_prefix_no_match_errors() {
        let store = SessionStore::open(MemoryBlobStore::new());
        let err = resolve_prefix(&store, "ffffffff").unwrap_err();
        assert!(err.to_string().contains("Session not found"));
    }
}
