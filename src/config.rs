/// Configuration module for docqa.
///
/// Handles loading, validating, and providing default configuration values.
/// The API key itself never lives in the file; only the name of the
/// environment variable that holds it.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::RagError;

pub const DEFAULT_CONFIG_PATH: &str = "docqa.json";

// ── Default value functions ──────────────────────────────────────────

fn default_api_base_url() -> String {
    "https://api.mistral.ai".to_string()
}

fn default_api_key_env() -> String {
    "MISTRAL_API_KEY".to_string()
}

fn default_embedding_model() -> String {
    "mistral-embed".to_string()
}

fn default_answer_model() -> String {
    "mistral-small-latest".to_string()
}

fn default_chat_model() -> String {
    "mistral-large-latest".to_string()
}

fn default_document_path() -> String {
    "AI_greenhouse_gas.txt".to_string()
}

fn default_chunk_size() -> usize {
    512
}

fn default_top_k() -> usize {
    2
}

// ── Config struct ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Model used to answer context-augmented prompts.
    #[serde(default = "default_answer_model")]
    pub answer_model: String,

    /// Model driving the interactive conversation and tool selection.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_document_path")]
    pub document_path: String,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Per-request timeout for the remote service, in seconds. Absent
    /// means requests wait as long as the service takes.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
            embedding_model: default_embedding_model(),
            answer_model: default_answer_model(),
            chat_model: default_chat_model(),
            document_path: default_document_path(),
            chunk_size: default_chunk_size(),
            top_k: default_top_k(),
            request_timeout_secs: None,
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// If `config_path` is empty, defaults to [`DEFAULT_CONFIG_PATH`].
    /// If the file does not exist, returns a default config and generates a
    /// template file when the default path was used.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = if config_path.is_empty() {
            DEFAULT_CONFIG_PATH
        } else {
            config_path
        };

        if !Path::new(path).exists() {
            info!("{path} not found, using defaults");
            let cfg = Self::default();

            if path == DEFAULT_CONFIG_PATH {
                match cfg.save(path) {
                    Ok(()) => info!("Generated config template: {path}"),
                    Err(e) => warn!("Failed to generate config template: {e}"),
                }
            }

            return Ok(cfg);
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {path}"))?;

        let cfg: Config = match serde_json::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid JSON in {path}: {e}");
                warn!("Using default configuration");
                return Ok(Self::default());
            }
        };

        info!("Loaded configuration from {path}");
        Ok(cfg)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("failed to marshal config")?;
        std::fs::write(path, data).with_context(|| format!("failed to write config: {path}"))?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.chunk_size > 0, "chunk_size must be positive");
        anyhow::ensure!(self.top_k > 0, "top_k must be positive");
        anyhow::ensure!(
            self.request_timeout_secs != Some(0),
            "request_timeout_secs must be positive when set"
        );
        anyhow::ensure!(
            !self.api_base_url.is_empty(),
            "api_base_url must not be empty"
        );
        anyhow::ensure!(
            !self.embedding_model.is_empty()
                && !self.answer_model.is_empty()
                && !self.chat_model.is_empty(),
            "model names must not be empty"
        );
        Ok(())
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, RagError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(RagError::Configuration(format!(
                "API key not found. Please set the {} environment variable.",
                self.api_key_env
            ))),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
