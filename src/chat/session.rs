//! Per-user conversation session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::turn::Turn;

/// Where a session is in its request cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Waiting for user input.
    #[default]
    Idle,
    /// A completion request is in flight.
    Pending,
}

/// Ordered, append-only list of turns.
///
/// Turns are never edited or removed individually; the only mutations are
/// [`Transcript::push`] and [`Transcript::clear`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// One user's conversation.
///
/// Sessions are owned by whatever serves the user and are passed by `&mut`
/// to the orchestrator, so two sessions never share a transcript.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    id: Uuid,
    transcript: Transcript,
    state: SessionState,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty idle session with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            transcript: Transcript::new(),
            state: SessionState::Idle,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Clear the transcript and return to idle.
    pub fn reset(&mut self) {
        tracing::debug!(session_id = %self.id, turns = self.transcript.len(), "Resetting session");
        self.transcript.clear();
        self.state = SessionState::Idle;
    }

    pub(crate) fn transition(&mut self, new_state: SessionState) {
        tracing::debug!(session_id = %self.id, from = ?self.state, to = ?new_state, "State transition");
        self.state = new_state;
    }

    pub(crate) fn append(&mut self, turn: Turn) {
        self.transcript.push(turn);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
