//! One request/response cycle per user message.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use thiserror::Error;

use crate::ai::{render_system_prompt, AiError, ChatMessage, CompletionProvider, CompletionRequest};
use crate::config::AssistConfig;
use crate::knowledge::KnowledgeContext;

use super::history::HistoryPolicy;
use super::session::{Session, SessionState};
use super::turn::Turn;

/// Request parameters applied to every turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub history: HistoryPolicy,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from(&AssistConfig::default())
    }
}

impl From<&AssistConfig> for ChatSettings {
    fn from(config: &AssistConfig) -> Self {
        Self {
            model: config.completion.model.clone(),
            max_tokens: config.completion.max_tokens,
            temperature: config.completion.temperature,
            history: config.history,
        }
    }
}

/// Failure of a single turn. Never fatal to the session.
#[derive(Error, Debug)]
pub enum TurnError {
    #[error(transparent)]
    Service(#[from] AiError),
    #[error("{0}")]
    Unexpected(String),
}

impl TurnError {
    /// Message shown to the user as an alert.
    #[must_use]
    pub fn alert(&self) -> String {
        match self {
            Self::Service(e) => format!("An API error occurred: {e}"),
            Self::Unexpected(e) => format!("An unexpected error occurred: {e}"),
        }
    }
}

/// Result of submitting user input.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Input was blank; nothing was recorded or sent.
    Ignored,
    /// The service replied; `reply` is now the last turn.
    Answered { reply: Turn },
    /// The request failed; `turn` records the error in the transcript.
    Failed { alert: String, turn: Turn },
}

impl SubmitOutcome {
    /// The assistant turn appended by this submission, if any.
    #[must_use]
    pub fn turn(&self) -> Option<&Turn> {
        match self {
            Self::Ignored => None,
            Self::Answered { reply } => Some(reply),
            Self::Failed { turn, .. } => Some(turn),
        }
    }
}

/// Assembles requests from the knowledge context and a session transcript.
///
/// The orchestrator itself is stateless between calls; all conversation state
/// lives in the [`Session`] passed to [`Orchestrator::submit`].
pub struct Orchestrator {
    knowledge: Arc<KnowledgeContext>,
    provider: Arc<dyn CompletionProvider>,
    settings: ChatSettings,
    system_prompt: String,
}

impl Orchestrator {
    /// Create an orchestrator.
    #[must_use]
    pub fn new(
        knowledge: Arc<KnowledgeContext>,
        provider: Arc<dyn CompletionProvider>,
        settings: ChatSettings,
    ) -> Self {
        let system_prompt = render_system_prompt(&knowledge);
        Self {
            knowledge,
            provider,
            settings,
            system_prompt,
        }
    }

    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeContext {
        &self.knowledge
    }

    #[must_use]
    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// The rendered system prompt.
    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Build the outbound request for the session's current transcript.
    #[must_use]
    pub fn build_request(&self, session: &Session) -> CompletionRequest {
        let window = self.settings.history.window(session.transcript().turns());

        let mut messages = Vec::with_capacity(window.len() + 1);
        messages.push(ChatMessage::system(self.system_prompt.clone()));
        messages.extend(window.iter().map(Turn::to_message));

        CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }

    /// Submit user input and record the outcome in the session.
    ///
    /// Blank input is ignored. Otherwise the user turn is appended, the
    /// completion service is called, and exactly one assistant turn is
    /// appended whether the call succeeds or fails. Errors never escape.
    pub async fn submit(&self, session: &mut Session, input: &str) -> SubmitOutcome {
        let Some(request) = self.begin(session, input) else {
            return SubmitOutcome::Ignored;
        };
        let result = self.complete(&request).await;
        self.finish(session, result)
    }

    /// Open a request cycle: append the user turn, mark the session pending,
    /// and return the request to send.
    ///
    /// Returns `None` for blank input, leaving the session untouched. Callers
    /// that run the completion outside the session borrow must pass its
    /// result to [`Orchestrator::finish`].
    pub fn begin(&self, session: &mut Session, input: &str) -> Option<CompletionRequest> {
        if input.trim().is_empty() {
            tracing::debug!(session_id = %session.id(), "Ignoring blank input");
            return None;
        }

        session.append(Turn::user(input));
        session.transition(SessionState::Pending);

        let request = self.build_request(session);
        tracing::info!(
            session_id = %session.id(),
            provider = self.provider.name(),
            messages = request.messages.len(),
            "Requesting completion"
        );
        Some(request)
    }

    /// Call the provider, turning a panic into `TurnError::Unexpected`.
    ///
    /// # Errors
    ///
    /// Returns `TurnError::Service` when the completion service fails and
    /// `TurnError::Unexpected` when the provider panics.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, TurnError> {
        match AssertUnwindSafe(self.provider.complete(request))
            .catch_unwind()
            .await
        {
            Ok(result) => result.map_err(TurnError::from),
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "completion provider panicked".to_string());
                Err(TurnError::Unexpected(message))
            }
        }
    }

    /// Close a request cycle: append the reply or error turn and return the
    /// session to idle.
    pub fn finish(
        &self,
        session: &mut Session,
        result: Result<String, TurnError>,
    ) -> SubmitOutcome {
        let outcome = match result {
            Ok(text) => {
                let reply = Turn::assistant(text);
                session.append(reply.clone());
                SubmitOutcome::Answered { reply }
            }
            Err(e) => {
                tracing::warn!(session_id = %session.id(), error = %e, "Completion failed");
                let turn = Turn::error(&e);
                session.append(turn.clone());
                SubmitOutcome::Failed {
                    alert: e.alert(),
                    turn,
                }
            }
        };

        session.transition(SessionState::Idle);
        outcome
    }

    /// Clear the session transcript.
    pub fn reset(&self, session: &mut Session) {
        session.reset();
    }
}
