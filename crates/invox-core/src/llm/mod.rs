//! Chat-completion endpoint access.
//!
//! The pipeline only depends on [`CompletionClient`]; [`HttpCompletionClient`]
//! is the OpenAI/OpenRouter-compatible implementation over HTTPS.

mod client;
pub mod prompt;

pub use client::{extract_completion_text, HttpCompletionClient};
pub use prompt::{build_prompt, SYSTEM_PROMPT};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CompletionError, InvoxError, Result};
use crate::models::config::{mask_secret, ApiConfig};

/// Trait for completion endpoint clients.
#[allow(async_fn_in_trait)]
pub trait CompletionClient {
    /// Send the prompt and return the model's raw reply text.
    async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError>;
}

/// Settings for one completion call, resolved from configuration.
#[derive(Clone)]
pub struct CompletionSettings {
    /// Bearer token.
    pub api_key: String,
    /// Chat completion endpoint URL.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionSettings {
    /// Resolve settings from the API configuration. Fails when no API key is set.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                InvoxError::MissingInput(
                    "no API key provided (pass --api-key or set OPENROUTER_API_KEY)".to_string(),
                )
            })?;

        if config.base_url.trim().is_empty() {
            return Err(InvoxError::Config("API base URL is empty".to_string()));
        }

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: config.base_url.trim().to_string(),
            model: config.model.clone(),
            timeout: config.timeout(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

impl std::fmt::Debug for CompletionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSettings")
            .field("api_key", &mask_secret(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the chat completion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub n: u32,
}

impl ChatRequest {
    /// Build the two-message request for a prompt.
    pub fn new(settings: &CompletionSettings, prompt: &str) -> Self {
        Self {
            model: settings.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            n: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn api_config(key: Option<&str>) -> ApiConfig {
        ApiConfig {
            api_key: key.map(str::to_string),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_settings_require_api_key() {
        assert!(matches!(
            CompletionSettings::from_config(&api_config(None)),
            Err(InvoxError::MissingInput(_))
        ));
        assert!(matches!(
            CompletionSettings::from_config(&api_config(Some("  "))),
            Err(InvoxError::MissingInput(_))
        ));

        let settings = CompletionSettings::from_config(&api_config(Some("sk-abcdef"))).unwrap();
        assert_eq!(settings.api_key, "sk-abcdef");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(!format!("{:?}", settings).contains("sk-abcdef"));
    }

    #[test]
    fn test_request_body_shape() {
        let settings = CompletionSettings::from_config(&api_config(Some("k"))).unwrap();
        let request = ChatRequest::new(&settings, "extract this");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": "extract this" }
                ],
                "temperature": 0.0,
                "max_tokens": 1024,
                "n": 1
            })
        );
    }
}
