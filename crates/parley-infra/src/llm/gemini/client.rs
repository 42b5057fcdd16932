//! GeminiGateway -- concrete [`ModelGateway`] implementation for Google Gemini.
//!
//! Sends the whole conversation to `/v1beta/models/{model}:generateContent`
//! on every call, together with the configured system instruction,
//! generation settings and safety settings.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use parley_core::llm::gateway::ModelGateway;
use parley_types::chat::Message;
use parley_types::config::{ModelConfig, SafetySetting};
use parley_types::llm::GatewayError;

use super::types::{
    ErrorEnvelope, GeminiContent, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig,
};

/// Google Gemini model gateway.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// building the request header.
pub struct GeminiGateway {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
    system_instruction: Option<String>,
}

impl GeminiGateway {
    /// Connect timeout for the underlying HTTP client. Overall call duration
    /// is bounded by the caller.
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a gateway for the model described by `config`.
    pub fn new(
        api_key: SecretString,
        config: &ModelConfig,
        system_instruction: Option<String>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Self::CONNECT_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.name.clone(),
            generation_config: GenerationConfig::from(config),
            safety_settings: config.safety_settings.clone(),
            system_instruction,
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn to_request(&self, contents: &[Message]) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: contents.iter().map(GeminiContent::from).collect(),
            system_instruction: self
                .system_instruction
                .as_deref()
                .map(GeminiContent::text),
            generation_config: self.generation_config.clone(),
            safety_settings: self.safety_settings.clone(),
        }
    }
}

/// Map a non-success status and its body to a gateway error.
fn status_error(status: reqwest::StatusCode, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| match e.error.status {
            Some(code) => format!("{code}: {}", e.error.message),
            None => e.error.message,
        })
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        401 | 403 => GatewayError::AuthenticationFailed,
        429 => GatewayError::RateLimited(message),
        _ => GatewayError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

/// Pull the reply text out of a successful response.
fn reply_text(response: GenerateContentResponse) -> Result<String, GatewayError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(match response.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => GatewayError::Blocked(reason),
            None => GatewayError::EmptyResponse,
        });
    };

    let text = candidate
        .content
        .map(|c| c.joined_text())
        .unwrap_or_default();
    if !text.is_empty() {
        return Ok(text);
    }

    match candidate.finish_reason.as_deref() {
        Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
            Err(GatewayError::Blocked(reason.to_string()))
        }
        _ => Err(GatewayError::EmptyResponse),
    }
}

impl ModelGateway for GeminiGateway {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(skip_all, fields(model = %self.model, turns = contents.len()))]
    async fn generate(&self, contents: &[Message]) -> Result<String, GatewayError> {
        let body = self.to_request(contents);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &error_body));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            GatewayError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let text = reply_text(parsed)?;
        debug!(chars = text.len(), "Gemini reply received");
        Ok(text)
    }
}
