//! Configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::chat::HistoryPolicy;

/// Completion API dialect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Claude,
}

impl ProviderKind {
    /// Base URL used when none is configured.
    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Claude => "https://api.anthropic.com",
        }
    }
}

/// Configuration for the completion service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionConfig {
    /// Provider dialect (openai or claude).
    #[serde(default)]
    pub provider: ProviderKind,
    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens in the reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature. Low values favor factual phrasing.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Base URL for the API. Falls back to the provider default.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.2
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl CompletionConfig {
    /// The configured base URL, or the provider default.
    #[must_use]
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            base_url: None,
            api_key_env: default_api_key_env(),
        }
    }
}

/// Where the FAQ knowledge base lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnowledgeConfig {
    #[serde(default = "default_faq_path")]
    pub faq_path: PathBuf,
}

fn default_faq_path() -> PathBuf {
    PathBuf::from("manual_faqs.json")
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            faq_path: default_faq_path(),
        }
    }
}

/// HTTP chat server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whether to enable permissive CORS.
    #[serde(default = "default_cors_permissive")]
    pub cors_permissive: bool,
}

/// Default port for the chat server.
pub const DEFAULT_PORT: u16 = 8501;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_cors_permissive() -> bool {
    true
}

impl ServerConfig {
    /// The bind address as `host:port`.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            cors_permissive: true,
        }
    }
}

/// Top-level assistant configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssistConfig {
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    /// Which transcript turns are sent with each request.
    #[serde(default)]
    pub history: HistoryPolicy,
    #[serde(default)]
    pub server: ServerConfig,
}
