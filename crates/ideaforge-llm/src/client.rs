//! Chat-completions client for structured JSON inference.
//!
//! Speaks the OpenAI-compatible `/chat/completions` dialect with
//! `response_format: json_object` so answers come back as parseable JSON.
//! The client hands back a raw [`serde_json::Value`] — shape validation
//! belongs to the prompt's caller, which knows what it asked for.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ideaforge_core::AppConfig;

use crate::error::LlmError;
use crate::retry::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const SYSTEM_PROMPT: &str = "You are a helpful assistant that returns concise JSON.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Inference gateway over an OpenAI-compatible endpoint.
///
/// Use [`LlmClient::new`] for production or [`LlmClient::with_base_url`]
/// to point at a mock server in tests. The API key is optional at
/// construction so the rest of the app can run without one; calls made
/// without it fail with [`LlmError::MissingApiKey`] before any HTTP.
pub struct LlmClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl LlmClient {
    /// Creates a client pointed at the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: Option<String>,
        model: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, LlmError> {
        Self::with_base_url(
            api_key,
            model,
            timeout_secs,
            max_retries,
            backoff_base_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        api_key: Option<String>,
        model: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: model.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Builds a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, LlmError> {
        Self::with_base_url(
            config.openai_api_key.clone(),
            &config.llm_model,
            config.request_timeout_secs,
            config.llm_max_retries,
            config.llm_backoff_base_ms,
            &config.llm_base_url,
        )
    }

    /// Sends `prompt` and returns the model's answer as JSON.
    ///
    /// Transient failures (transport, non-2xx, missing content) are retried
    /// with linear back-off; the last error surfaces once retries are
    /// exhausted. An answer that is not valid JSON comes back verbatim as
    /// a [`Value::String`] rather than an error.
    ///
    /// # Errors
    ///
    /// - [`LlmError::MissingApiKey`] when no key is configured; checked
    ///   before any request is made.
    /// - [`LlmError::Status`] / [`LlmError::Http`] /
    ///   [`LlmError::MissingContent`] after retry exhaustion.
    pub async fn infer(&self, prompt: &str) -> Result<Value, LlmError> {
        let Some(api_key) = &self.api_key else {
            return Err(LlmError::MissingApiKey);
        };

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.infer_once(api_key, prompt)
        })
        .await
    }

    async fn infer_once(&self, api_key: &str, prompt: &str) -> Result<Value, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status(status));
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::MissingContent)?;

        match serde_json::from_str(&content) {
            Ok(value) => Ok(value),
            Err(_) => Ok(Value::String(content)),
        }
    }
}
