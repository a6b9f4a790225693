//! Configuration management for Parley
//!
//! This module handles loading, parsing, and validating configuration
//! from YAML files and environment variables.

use crate::error::{ParleyError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the session database path
pub const STORAGE_PATH_ENV: &str = "PARLEY_SESSIONS_DB";

/// Main configuration structure for Parley
///
/// Holds everything the chat client needs: which completion provider to
/// talk to and where the session database lives.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Provider configuration (OpenAI-compatible, Ollama)
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Session storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Provider configuration
///
/// Specifies which completion provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use ("openai" or "ollama")
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// OpenAI-compatible endpoint configuration
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

fn default_provider_type() -> String {
    "openai".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            openai: OpenAiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// OpenAI-compatible provider configuration
///
/// Works against any endpoint that speaks the `/chat/completions` shape.
/// The API key is read from the environment variable named by
/// `api_key_env`, never stored in the config file itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Base URL of the API (e.g. `https://api.openai.com/v1`)
    #[serde(default = "default_openai_api_base")]
    pub api_base: String,

    /// Model to request
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_openai_key_env")]
    pub api_key_env: String,
}

fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: default_openai_api_base(),
            model: default_openai_model(),
            api_key_env: default_openai_key_env(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Path to the session database directory
    ///
    /// When unset, a platform data directory is used
    /// (e.g. `~/.local/share/parley/sessions` on Linux).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the session database path
    ///
    /// Resolution order: `PARLEY_SESSIONS_DB` environment variable, then
    /// the configured path, then the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Config` if no platform data directory can be
    /// determined and nothing else is configured.
    pub fn resolve_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var(STORAGE_PATH_ENV) {
            return Ok(PathBuf::from(env_path));
        }

        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        let dirs = directories::ProjectDirs::from("", "", "parley").ok_or_else(|| {
            ParleyError::Config("Could not determine a platform data directory".to_string())
        })?;
        Ok(dirs.data_dir().join("sessions"))
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// A missing file is not an error: defaults are used so the client
    /// works out of the box against a local Ollama or an env-keyed
    /// OpenAI-compatible endpoint.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ParleyError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: Config = serde_yaml::from_str(&contents)?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Config` for an unknown provider type or
    /// empty provider settings.
    pub fn validate(&self) -> Result<()> {
        match self.provider.provider_type.as_str() {
            "openai" => {
                if self.provider.openai.api_base.is_empty() {
                    return Err(
                        ParleyError::Config("openai.api_base must not be empty".to_string()).into(),
                    );
                }
                if self.provider.openai.model.is_empty() {
                    return Err(
                        ParleyError::Config("openai.model must not be empty".to_string()).into(),
                    );
                }
            }
            "ollama" => {
                if self.provider.ollama.host.is_empty() {
                    return Err(
                        ParleyError::Config("ollama.host must not be empty".to_string()).into(),
                    );
                }
                if self.provider.ollama.model.is_empty() {
                    return Err(
                        ParleyError::Config("ollama.model must not be empty".to_string()).into(),
                    );
                }
            }
            other => {
                return Err(ParleyError::Config(format!(
                    "Unknown provider type '{}' (expected 'openai' or 'ollama')",
                    other
                ))
                .into());
            }
        }

        Ok(())
    }
}
