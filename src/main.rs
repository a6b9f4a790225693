//! Parley - chat client CLI
//!
#![doc = "Parley - chat client CLI"]
#![doc = "Main entry point for the Parley chat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parley::cli::{Cli, Commands};
use parley::commands;
use parley::config::{Config, STORAGE_PATH_ENV};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // If the user supplied a storage path on the CLI (or via env), mirror
    // it into PARLEY_SESSIONS_DB so the storage resolver picks it up.
    if let Some(db_path) = &cli.storage_path {
        std::env::set_var(STORAGE_PATH_ENV, db_path);
        tracing::info!("Using session DB override from CLI: {}", db_path);
    }

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { provider, session } => {
            tracing::info!("Starting interactive chat mode");
            if let Some(p) = &provider {
                tracing::debug!("Using provider override: {}", p);
            }
            if let Some(s) = &session {
                tracing::debug!("Resuming session: {}", s);
            }

            commands::chat::run_chat(config, provider, session).await?;
            Ok(())
        }
        Commands::Sessions { command } => {
            tracing::info!("Starting session management command");
            commands::sessions::run_sessions(&config, command)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("parley=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
