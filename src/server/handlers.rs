//! HTTP handlers for the chat API.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::Html;
use axum::Json;
use futures_util::stream::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::api::{HealthResponse, MessageRequest, SessionCreated, SessionView, SubmitResponse};
use super::error::ApiError;
use super::state::{ChatEvent, SessionStore, DEFAULT_EVENT_CHANNEL_CAPACITY};
use crate::chat::{Orchestrator, SessionState, SubmitOutcome};

/// Minimal chat page.
const INDEX_HTML: &str = include_str!("index.html");

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Request assembly and completion calls.
    pub orchestrator: Arc<Orchestrator>,
    /// Live sessions.
    pub sessions: Arc<SessionStore>,
    /// Sender for broadcasting events to SSE clients.
    pub event_tx: broadcast::Sender<ChatEvent>,
    /// Cancellation token for graceful shutdown.
    pub cancel: CancellationToken,
}

impl AppState {
    /// Create app state with an empty session store.
    #[must_use]
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        let (event_tx, _) = broadcast::channel(DEFAULT_EVENT_CHANNEL_CAPACITY);
        Self {
            orchestrator,
            sessions: Arc::new(SessionStore::new()),
            event_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// Broadcast an event. Having no subscribers is not an error.
    fn publish(&self, event: ChatEvent) {
        let _ = self.event_tx.send(event);
    }
}

/// GET / - Chat page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/health - Service status.
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.orchestrator.settings().model.clone(),
        knowledge_entries: state.orchestrator.knowledge().entry_count(),
        sessions: state.sessions.len().await,
    })
}

/// POST /api/sessions - Start a new session.
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.create().await;
    tracing::info!(session_id = %session_id, "Session created");
    state.publish(ChatEvent::new(
        "session_created",
        session_id,
        serde_json::Value::Null,
    ));

    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

/// GET /api/sessions/{id} - Current transcript.
///
/// The session lock is only held for bookkeeping, never across a completion
/// call, so this answers immediately and reports `pending` mid-request.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or(ApiError::SessionNotFound(id))?;
    let session = session.lock().await;
    Ok(Json(SessionView::from(&*session)))
}

/// DELETE /api/sessions/{id} - End a session and discard its transcript.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.sessions.remove(id).await {
        return Err(ApiError::SessionNotFound(id));
    }
    tracing::info!(session_id = %id, "Session ended");
    state.publish(ChatEvent::new("session_ended", id, serde_json::Value::Null));
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sessions/{id}/messages - Submit user input.
///
/// Rejected with 409 while another request for the same session is in flight.
/// The completion call and the closing append run in a spawned task, so a
/// client that disconnects mid-request still leaves a complete user/assistant
/// pair and an idle session behind.
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or(ApiError::SessionNotFound(id))?;

    let (completion, before) = {
        let mut guard = session.lock().await;
        if guard.state() == SessionState::Pending {
            return Err(ApiError::SessionBusy(id));
        }
        let before = guard.transcript().len();
        match state.orchestrator.begin(&mut guard, &request.content) {
            Some(completion) => (completion, before),
            None => {
                return Ok(Json(SubmitResponse::new(SubmitOutcome::Ignored, before)));
            }
        }
    };

    let cycle = tokio::spawn(async move {
        let result = state.orchestrator.complete(&completion).await;

        let mut guard = session.lock().await;
        let outcome = state.orchestrator.finish(&mut guard, result);
        let appended = guard.transcript().turns().get(before..).unwrap_or_default();
        for turn in appended {
            let data = serde_json::to_value(turn).unwrap_or_default();
            state.publish(ChatEvent::new("turn_appended", id, data));
        }
        SubmitResponse::new(outcome, guard.transcript().len())
    });

    cycle
        .await
        .map(Json)
        .map_err(|e| ApiError::CycleAborted(id, e.to_string()))
}

/// POST /api/sessions/{id}/reset - Clear the transcript.
pub async fn post_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or(ApiError::SessionNotFound(id))?;
    let mut session = session.lock().await;
    if session.state() == SessionState::Pending {
        return Err(ApiError::SessionBusy(id));
    }

    state.orchestrator.reset(&mut session);
    state.publish(ChatEvent::new("session_reset", id, serde_json::Value::Null));

    Ok(Json(SessionView::from(&*session)))
}

/// GET /api/events - SSE stream of chat events.
pub async fn get_events_sse(
    State(state): State<AppState>,
) -> Sse<impl futures_core::Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => {
                let data = serde_json::to_string(&event).ok()?;
                Some(Ok(Event::default().event(&event.event_type).data(data)))
            }
            Err(_) => None, // Skip lagged messages
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
