//! Ollama provider implementation
//!
//! Connects to a local or remote Ollama server's `/api/chat` endpoint for
//! non-streaming completions.

use crate::config::OllamaConfig;
use crate::error::{ParleyError, Result};
use crate::providers::{ChatTurn, CompletionClient};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama completion client
#[derive(Debug)]
pub struct OllamaClient {
    client: Client,
    config: OllamaConfig,
}

/// Request body for Ollama's /api/chat
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    stream: bool,
}

/// Response body from /api/chat
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaChatMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaChatMessage {
    #[serde(default)]
    content: String,
}

impl OllamaClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Provider` if HTTP client initialization fails.
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent("parley/0.1.0")
            .build()
            .map_err(|e| ParleyError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    async fn send_message(&self, turns: &[ChatTurn]) -> Result<String> {
        let url = format!("{}/api/chat", self.config.host);
        let request = OllamaChatRequest {
            model: &self.config.model,
            messages: turns,
            stream: false,
        };

        tracing::debug!(turns = turns.len(), model = %self.config.model, "Sending Ollama chat request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Ollama request failed: {}", e);
                ParleyError::Provider(format!("Failed to connect to Ollama server: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(ParleyError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let chat: OllamaChatResponse = response.json().await.map_err(|e| {
            ParleyError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        Ok(chat.message.content)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
