//! Command-line interface definition for Parley
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the interactive chat loop and session
//! management.

use clap::{Parser, Subcommand};

/// Parley - chat client for LLM HTTP endpoints
///
/// Keeps conversation history in named local sessions and forwards user
/// text to a configured completion provider.
#[derive(Parser, Debug, Clone)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the session database path
    #[arg(long, env = "PARLEY_SESSIONS_DB")]
    pub storage_path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Parley
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive chat loop
    Chat {
        /// Override the provider from config (openai, ollama)
        #[arg(short, long)]
        provider: Option<String>,

        /// Resume a specific session by id prefix instead of the most
        /// recent one
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Manage chat sessions
    Sessions {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List stored sessions
    List,

    /// Create a new session
    New {
        /// Optional title (defaults to "New Chat <n>")
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Rename a session
    Rename {
        /// Session id prefix
        id: String,

        /// New title
        title: String,
    },

    /// Delete a session
    Delete {
        /// Session id prefix
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
