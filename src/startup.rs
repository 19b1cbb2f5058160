//! Fatal startup checks and orchestrator assembly.
//!
//! Everything here runs before the first request is served. Any error is
//! meant to halt the process with its message.

use std::sync::Arc;

use thiserror::Error;

use crate::ai::{AiError, CompletionClient, CompletionProvider};
use crate::chat::{ChatSettings, Orchestrator};
use crate::config::{AssistConfig, ConfigError};
use crate::knowledge::{KnowledgeContext, KnowledgeError};

/// Errors that prevent the assistant from starting.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("API key not found: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("{0}")]
    Knowledge(#[from] KnowledgeError),

    #[error("Failed to initialize completion client: {0}")]
    Client(AiError),
}

impl From<AiError> for StartupError {
    fn from(error: AiError) -> Self {
        match error {
            AiError::MissingApiKey(env) => Self::MissingApiKey(env),
            other => Self::Client(other),
        }
    }
}

/// Check the credential, load the knowledge base, and build the orchestrator.
///
/// The credential is checked first so a missing key is reported even when the
/// FAQ file is also absent.
///
/// # Errors
///
/// Returns `StartupError::MissingApiKey` if the API key variable is unset,
/// and `StartupError::Knowledge` if the FAQ file is missing or malformed.
pub fn bootstrap(config: &AssistConfig) -> Result<Orchestrator, StartupError> {
    let client = CompletionClient::from_config(config.completion.clone())?;
    bootstrap_with_provider(config, Arc::new(client))
}

/// Like [`bootstrap`], with an already constructed provider.
///
/// # Errors
///
/// Returns `StartupError::Knowledge` if the FAQ file is missing or malformed.
pub fn bootstrap_with_provider(
    config: &AssistConfig,
    provider: Arc<dyn CompletionProvider>,
) -> Result<Orchestrator, StartupError> {
    let knowledge = KnowledgeContext::load(&config.knowledge.faq_path)?;
    tracing::info!(
        provider = provider.name(),
        model = %config.completion.model,
        entries = knowledge.entry_count(),
        "Assistant ready"
    );

    Ok(Orchestrator::new(
        Arc::new(knowledge),
        provider,
        ChatSettings::from(config),
    ))
}
