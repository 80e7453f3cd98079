//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::APP_NAME;

/// Environment variable holding the upstream credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable selecting the upstream model
pub const MODEL_ENV: &str = "MODEL";

/// Environment variable overriding the listen address
pub const BIND_ENV: &str = "DECK_OUTLINE_BIND";

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Upstream generation service settings
    #[serde(default)]
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Value of Access-Control-Allow-Origin on every response
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (openai)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// API key, usually supplied through OPENAI_API_KEY
    #[serde(default)]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Output token budget for the first attempt
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Output token budget for the compact retry
    #[serde(default = "default_compact_max_output_tokens")]
    pub compact_max_output_tokens: u32,

    /// Retry once in compact mode when the first attempt hits its token budget
    #[serde(default = "default_true")]
    pub retry_on_truncation: bool,

    /// Client-side request timeout in seconds (0 = rely on the host's limits)
    #[serde(default)]
    pub timeout_secs: u64,
}

// Default value functions

fn default_bind() -> String {
    "127.0.0.1:8888".to_string()
}

fn default_allowed_origin() -> String {
    "*".to_string()
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_llm_model() -> String {
    "gpt-5-mini".to_string()
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_output_tokens() -> u32 {
    2000
}

fn default_compact_max_output_tokens() -> u32 {
    1400
}

fn default_true() -> bool {
    true
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            allowed_origin: default_allowed_origin(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            model: default_llm_model(),
            endpoint: default_llm_endpoint(),
            max_output_tokens: default_max_output_tokens(),
            compact_max_output_tokens: default_compact_max_output_tokens(),
            retry_on_truncation: true,
            timeout_secs: 0,
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;

            toml::from_str(&content).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?
        } else {
            tracing::debug!("No config file found, using defaults");
            Self::default()
        };

        settings.apply_overrides(|name| std::env::var(name).ok());
        settings.normalize();

        Ok(settings)
    }

    /// Replace blank model and endpoint values with their defaults.
    pub fn normalize(&mut self) {
        if self.llm.model.trim().is_empty() {
            self.llm.model = default_llm_model();
        } else {
            self.llm.model = self.llm.model.trim().to_string();
        }
        if self.llm.endpoint.trim().is_empty() {
            self.llm.endpoint = default_llm_endpoint();
        }
    }

    /// Apply overrides from the environment. Blank values are ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank(API_KEY_ENV) {
            self.llm.api_key = key.trim().to_string();
        }
        if let Some(model) = non_blank(MODEL_ENV) {
            self.llm.model = model.trim().to_string();
        }
        if let Some(bind) = non_blank(BIND_ENV) {
            self.server.bind = bind.trim().to_string();
        }
    }

    /// Whether an upstream credential is configured
    pub fn has_api_key(&self) -> bool {
        !self.llm.api_key.trim().is_empty()
    }

    /// Copy of the settings that is safe to print
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.has_api_key() {
            copy.llm.api_key = "********".to_string();
        }
        copy
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "neovik", APP_NAME)
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}
