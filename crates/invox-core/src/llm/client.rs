//! HTTP completion client using reqwest.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{ChatRequest, CompletionClient, CompletionSettings};
use crate::error::{CompletionError, InvoxError, Result};

/// Completion client for OpenAI/OpenRouter-compatible chat endpoints.
///
/// Sends exactly one request per call. There is no retry: a failed call is
/// reported to the caller as-is.
pub struct HttpCompletionClient {
    http: reqwest::Client,
    settings: CompletionSettings,
}

impl HttpCompletionClient {
    /// Create a client for the given settings.
    pub fn new(settings: CompletionSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("invox/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .map_err(|e| InvoxError::Completion(CompletionError::Transport(e.to_string())))?;

        Ok(Self { http, settings })
    }

    /// Settings this client was built with.
    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    fn map_send_error(&self, err: reqwest::Error) -> CompletionError {
        if err.is_timeout() {
            CompletionError::Timeout(self.settings.timeout)
        } else {
            CompletionError::Transport(err.to_string())
        }
    }
}

impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError> {
        let request = ChatRequest::new(&self.settings, prompt);

        info!(
            "Calling completion endpoint {} with model {}",
            self.settings.base_url, self.settings.model
        );

        let response = self
            .http
            .post(&self.settings.base_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.settings.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            warn!("Completion endpoint returned HTTP {}", status);
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Completion response: {} bytes", body.len());

        let data: Value = serde_json::from_str(&body)
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        Ok(extract_completion_text(&data))
    }
}

/// Pull the reply text out of a completion response body.
///
/// Prefers `choices[0].message.content`, then `choices[0].text`, and
/// otherwise returns the whole body as JSON text.
pub fn extract_completion_text(data: &Value) -> String {
    let choice = data
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first());

    if let Some(choice) = choice {
        if let Some(content) = choice.pointer("/message/content").and_then(Value::as_str) {
            return content.to_string();
        }
        if let Some(text) = choice.get("text").and_then(Value::as_str) {
            return text.to_string();
        }
    }

    debug!("No message content or text in completion response, returning raw body");
    data.to_string()
}
