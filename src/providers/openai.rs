//! OpenAI-compatible provider implementation
//!
//! Talks to any endpoint that speaks the `/chat/completions` request and
//! response shape, authenticated with a bearer key read from the
//! environment.

use crate::config::OpenAiConfig;
use crate::error::{ParleyError, Result};
use crate::providers::{ChatTurn, CompletionClient};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible completion client
///
/// # Examples
///
/// ```no_run
/// use parley::config::OpenAiConfig;
/// use parley::providers::{ChatTurn, CompletionClient, OpenAiClient};
///
/// # async fn example() -> parley::error::Result<()> {
/// let client = OpenAiClient::new(OpenAiConfig::default())?;
/// let reply = client.send_message(&[ChatTurn::user("Hello!")]).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

/// Request body for /chat/completions
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    stream: bool,
}

/// Response body from /chat/completions
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Provider` if HTTP client initialization fails.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent("parley/0.1.0")
            .build()
            .map_err(|e| ParleyError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized OpenAI-compatible provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Option<String> {
        std::env::var(&self.config.api_key_env).ok()
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn send_message(&self, turns: &[ChatTurn]) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.api_base);
        let request = CompletionRequest {
            model: &self.config.model,
            messages: turns,
            stream: false,
        };

        tracing::debug!(turns = turns.len(), model = %self.config.model, "Sending completion request");

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = self.api_key() {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!("Completion request failed: {}", e);
            ParleyError::Provider(format!("Failed to reach completion endpoint: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Completion endpoint returned {}: {}", status, error_text);
            return Err(ParleyError::Provider(format!(
                "Completion endpoint returned {}: {}",
                status, error_text
            ))
            .into());
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            ParleyError::Provider(format!("Failed to parse completion response: {}", e))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ParleyError::Provider("Completion response contained no message".to_string())
            })?;

        Ok(content)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
