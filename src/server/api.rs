//! Request and response types for the chat HTTP endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::{Session, SessionState, SubmitOutcome, Turn};

/// Response for GET /api/health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub knowledge_entries: usize,
    pub sessions: usize,
}

/// Response for POST /api/sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

/// Response for GET /api/sessions/{id} and the reset endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub state: SessionState,
    pub turns: Vec<Turn>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id(),
            state: session.state(),
            turns: session.transcript().turns().to_vec(),
        }
    }
}

/// Body of POST /api/sessions/{id}/messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatus {
    /// Blank input; nothing was recorded.
    Ignored,
    /// The service replied.
    Answered,
    /// The request failed and an error turn was recorded.
    Failed,
}

/// Response for POST /api/sessions/{id}/messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub outcome: SubmitStatus,
    /// The assistant turn appended by this submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<Turn>,
    /// Alert text to display when the request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    /// Transcript length after the submission.
    pub transcript_len: usize,
}

impl SubmitResponse {
    #[must_use]
    pub fn new(outcome: SubmitOutcome, transcript_len: usize) -> Self {
        let (status, reply, alert) = match outcome {
            SubmitOutcome::Ignored => (SubmitStatus::Ignored, None, None),
            SubmitOutcome::Answered { reply } => (SubmitStatus::Answered, Some(reply), None),
            SubmitOutcome::Failed { alert, turn } => (SubmitStatus::Failed, Some(turn), Some(alert)),
        };
        Self {
            outcome: status,
            reply,
            alert,
            transcript_len,
        }
    }
}

/// JSON body returned with error statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
