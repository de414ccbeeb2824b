//! OpenAI Gateway for chat completions.
//!
//! This module talks to any OpenAI-compatible `/chat/completions` endpoint
//! with a bearer token. Failures are classified so callers can tell a timeout
//! from a provider-reported error from a transport problem.

use crate::error::{Result, VisionQaError};
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::gateways::openai_messages_adapter::adapt_messages_to_openai;
use crate::llm::models::{LlmGatewayResponse, LlmMessage, TokenUsage};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for connecting to OpenAI API.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            base_url: std::env::var("OPENAI_API_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

/// Gateway for OpenAI LLM service.
pub struct OpenAIGateway {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIGateway {
    /// Create a new OpenAI gateway with custom configuration.
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build().map_err(|e| {
            VisionQaError::ConfigError(format!("failed to build HTTP client: {}", e))
        })?;

        if config.api_key.is_empty() {
            warn!("No OpenAI API key configured; requests will be rejected upstream");
        }

        Ok(Self { client, config })
    }

    /// Create gateway with custom API key and base URL.
    pub fn with_api_key_and_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(OpenAIConfig {
            api_key: api_key.into(),
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    fn classify(&self, err: reqwest::Error) -> VisionQaError {
        if err.is_timeout() {
            let bound = self
                .config
                .timeout
                .map(|t| format!("{:.1}s", t.as_secs_f64()))
                .unwrap_or_else(|| "the transport limit".to_string());
            VisionQaError::TimeoutError(format!("no response within {}", bound))
        } else {
            VisionQaError::HttpError(err)
        }
    }
}

/// Build the message for a non-2xx reply, preferring the provider's own
/// `error.message` over the raw body.
fn api_error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string());

    if detail.is_empty() {
        status.to_string()
    } else {
        format!("{} - {}", status, detail)
    }
}

#[async_trait]
impl LlmGateway for OpenAIGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        info!("Delegating to OpenAI for completion");
        debug!("Model: {}, Message count: {}", model, messages.len());

        let openai_messages = adapt_messages_to_openai(messages)?;

        let mut body = serde_json::json!({
            "model": model,
            "messages": openai_messages,
        });

        if let Some(max_tokens) = config.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, "OpenAI returned an error status");
            return Err(VisionQaError::ApiError(api_error_message(status, &error_text)));
        }

        let response_body: Value = response.json().await.map_err(|e| self.classify(e))?;

        let content = response_body["choices"][0]["message"]["content"].as_str().map(String::from);

        let usage = response_body
            .get("usage")
            .and_then(|u| serde_json::from_value::<TokenUsage>(u.clone()).ok());
        if let Some(usage) = usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "OpenAI token usage"
            );
        }

        Ok(LlmGatewayResponse { content, usage })
    }
}
