//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{InvoxError, Result};

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
/// Environment variable holding the completion endpoint URL.
pub const ENV_API_BASE: &str = "API_BASE";
/// Environment variable holding the default model.
pub const ENV_MODEL: &str = "MODEL";

/// Default OpenRouter-compatible chat completion endpoint.
pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1/chat/completions";
/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Models offered for selection, in addition to the configured default.
pub const KNOWN_MODELS: [&str; 3] = ["gpt-3.5-turbo", "gpt-4o-mini", "gpt-4o"];

/// Main configuration for invox.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoxConfig {
    /// Completion endpoint configuration.
    pub api: ApiConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Completion endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bearer token. Usually supplied through the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat completion endpoint URL.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Upper bound on generated tokens.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 30,
            max_tokens: 1024,
            temperature: 0.0,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File name used when saving the XML document.
    pub xml_file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            xml_file_name: "invoice.xml".to_string(),
        }
    }
}

impl InvoxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            InvoxError::Config(format!("{}: {}", path.display(), e))
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| InvoxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `OPENROUTER_API_KEY`, `API_BASE` and `MODEL` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Apply environment overrides using the given lookup. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api.api_key = Some(key);
        }
        if let Some(base) = non_empty(ENV_API_BASE) {
            self.api.base_url = base;
        }
        if let Some(model) = non_empty(ENV_MODEL) {
            self.api.model = model;
        }
    }

    /// A copy suitable for display, with the API key masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.api.api_key = copy.api.api_key.as_deref().map(mask_secret);
        copy
    }
}

impl ApiConfig {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Models to offer: the configured one first, then the known set.
    pub fn model_choices(&self) -> Vec<&str> {
        let mut choices = vec![self.model.as_str()];
        choices.extend(KNOWN_MODELS.iter().copied().filter(|m| *m != self.model));
        choices
    }
}

/// Mask a secret, keeping only its last four characters.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
