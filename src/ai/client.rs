//! Multi-provider client for the hosted completion service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use thiserror::Error;

use crate::config::{CompletionConfig, ProviderKind};

use super::types::{ChatMessage, CompletionRequest};

/// Connection timeout for HTTP requests.
///
/// Only the TCP connect is bounded; how long a completion may take is up to
/// the service.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Build an HTTP client with the connect timeout configured.
fn build_http_client() -> Result<Client, AiError> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| AiError::ClientBuild(e.to_string()))
}

/// Errors from completion service calls.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("API key not configured (env: {0})")]
    MissingApiKey(String),
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("API request failed: {0}")]
    RequestFailed(String),
    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("Response contained no reply text")]
    EmptyResponse,
}

/// Map a non-success response to an error.
async fn error_for_status(response: Response) -> AiError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    tracing::warn!(status, body = %text, "Completion service returned error");

    match status {
        401 | 403 => AiError::Authentication(text),
        429 => AiError::RateLimited,
        _ => AiError::Api {
            status,
            message: text,
        },
    }
}

/// Send a request and decode a successful JSON body.
async fn send_json(request: RequestBuilder) -> Result<serde_json::Value, AiError> {
    let response = request
        .send()
        .await
        .map_err(|e| AiError::RequestFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(error_for_status(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| AiError::ParseError(e.to_string()))
}

/// Trait for completion providers.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short provider name for logging.
    fn name(&self) -> &'static str;

    /// Produce the assistant reply for the given request.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError>;
}

/// OpenAI-compatible chat completions provider.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI-compatible provider.
    ///
    /// # Errors
    ///
    /// Returns `AiError::ClientBuild` if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, AiError> {
        Ok(Self {
            client: build_http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn request_body(request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model,
            "messages": request.messages,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(url = %url, model = %request.model, messages = request.messages.len(), "Sending completion request");

        let json = send_json(
            self.client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&Self::request_body(request)),
        )
        .await?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or(AiError::EmptyResponse)
    }
}

/// Anthropic messages API provider.
#[derive(Debug, Clone)]
pub struct ClaudeProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ClaudeProvider {
    /// Create a new Claude provider.
    ///
    /// # Errors
    ///
    /// Returns `AiError::ClientBuild` if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, AiError> {
        Ok(Self {
            client: build_http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn request_body(request: &CompletionRequest) -> serde_json::Value {
        let messages: &[ChatMessage] = request.conversation();
        let mut body = serde_json::json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": messages,
        });
        if let Some(system) = request.system_prompt() {
            body["system"] = serde_json::Value::String(system.to_string());
        }
        body
    }
}

#[async_trait]
impl CompletionProvider for ClaudeProvider {
    fn name(&self) -> &'static str {
        "claude"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
        let url = format!("{}/v1/messages", self.base_url);
        tracing::debug!(url = %url, model = %request.model, messages = request.messages.len(), "Sending completion request");

        let json = send_json(
            self.client
                .post(&url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&Self::request_body(request)),
        )
        .await?;

        json["content"][0]["text"]
            .as_str()
            .map(String::from)
            .ok_or(AiError::EmptyResponse)
    }
}

/// Provider enum for dispatch.
#[derive(Debug, Clone)]
pub enum Provider {
    OpenAi(OpenAiProvider),
    Claude(ClaudeProvider),
}

#[async_trait]
impl CompletionProvider for Provider {
    fn name(&self) -> &'static str {
        match self {
            Self::OpenAi(p) => p.name(),
            Self::Claude(p) => p.name(),
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
        match self {
            Self::OpenAi(p) => p.complete(request).await,
            Self::Claude(p) => p.complete(request).await,
        }
    }
}

/// Configured client for the completion service.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    provider: Provider,
    config: CompletionConfig,
}

impl CompletionClient {
    /// Create client from configuration, reading the API key from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `AiError::MissingApiKey` if the configured environment variable
    /// is unset or empty, and `AiError::ClientBuild` if the HTTP client cannot
    /// be created.
    pub fn from_config(config: CompletionConfig) -> Result<Self, AiError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AiError::MissingApiKey(config.api_key_env.clone()))?;

        Self::with_api_key(config, api_key)
    }

    /// Create client from configuration with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns `AiError::ClientBuild` if the HTTP client cannot be created.
    pub fn with_api_key(config: CompletionConfig, api_key: String) -> Result<Self, AiError> {
        let base_url = config.effective_base_url().to_string();
        let provider = match config.provider {
            ProviderKind::OpenAi => Provider::OpenAi(OpenAiProvider::new(base_url, api_key)?),
            ProviderKind::Claude => Provider::Claude(ClaudeProvider::new(base_url, api_key)?),
        };

        Ok(Self { provider, config })
    }

    /// Get the configured model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the provider kind.
    #[must_use]
    pub fn provider_kind(&self) -> ProviderKind {
        self.config.provider
    }
}

#[async_trait]
impl CompletionProvider for CompletionClient {
    fn name(&self) -> &'static str {
        self.provider.name()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
        self.provider.complete(request).await
    }
}
