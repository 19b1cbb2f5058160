//! Transcript turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ai::{ChatMessage, Role};

/// Whether an assistant turn holds a real reply or failure text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    #[default]
    Reply,
    Error,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub kind: TurnKind,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    fn new(role: Role, content: impl Into<String>, kind: TurnKind) -> Self {
        Self {
            role,
            content: content.into(),
            kind,
            created_at: Utc::now(),
        }
    }

    /// A message typed by the user.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, TurnKind::Reply)
    }

    /// A reply from the completion service.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content, TurnKind::Reply)
    }

    /// An assistant turn recording a failed request.
    #[must_use]
    pub fn error(description: impl std::fmt::Display) -> Self {
        Self::new(Role::Assistant, format!("Error: {description}"), TurnKind::Error)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == TurnKind::Error
    }

    /// The turn as sent to the completion service.
    #[must_use]
    pub fn to_message(&self) -> ChatMessage {
        ChatMessage::new(self.role, self.content.clone())
    }
}
