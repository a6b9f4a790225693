//! Chat completion providers
//!
//! Provider abstraction and implementations for the third-party endpoints
//! the client forwards conversations to.

pub mod base;
pub mod ollama;
pub mod openai;

pub use base::{conversation_turns, ChatTurn, CompletionClient};
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use crate::config::ProviderConfig;
use crate::error::{ParleyError, Result};

/// Create a completion client from the configured provider type
///
/// # Errors
///
/// Returns `ParleyError::Config` for an unknown provider type, or a
/// provider error if client initialization fails.
///
/// # Examples
///
/// ```
/// use parley::config::ProviderConfig;
/// use parley::providers::create_client;
///
/// let client = create_client(&ProviderConfig::default()).unwrap();
/// assert_eq!(client.name(), "openai");
/// ```
pub fn create_client(config: &ProviderConfig) -> Result<Box<dyn CompletionClient>> {
    match config.provider_type.as_str() {
        "openai" => Ok(Box::new(OpenAiClient::new(config.openai.clone())?)),
        "ollama" => Ok(Box::new(OllamaClient::new(config.ollama.clone())?)),
        other => Err(ParleyError::Config(format!("Unknown provider type '{}'", other)).into()),
    }
}
