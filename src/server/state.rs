//! Session storage and event types for the chat server.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::chat::Session;

/// Default capacity for the event broadcast channel.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Event sent to chat clients via SSE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Type of event (`session_created`, `turn_appended`, `session_reset`, `session_ended`).
    pub event_type: String,
    /// Session the event belongs to.
    pub session_id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Event payload.
    pub data: serde_json::Value,
}

impl ChatEvent {
    /// Create a new chat event.
    #[must_use]
    pub fn new(event_type: impl Into<String>, session_id: Uuid, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            session_id,
            timestamp: Utc::now(),
            data,
        }
    }
}

/// Live sessions keyed by id.
///
/// Each session sits behind its own mutex, so one user's in-flight request
/// never blocks another user.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session and return its id.
    pub async fn create(&self) -> Uuid {
        let session = Session::new();
        let id = session.id();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Drop a session and its transcript. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_create_get_remove() {
        let store = SessionStore::new();
        assert!(store.is_empty().await);

        let id = store.create().await;
        assert_eq!(store.len().await, 1);

        let session = store.get(id).await.unwrap();
        assert_eq!(session.lock().await.id(), id);

        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.create().await;
        let b = store.create().await;

        let session_a = store.get(a).await.unwrap();
        let session_b = store.get(b).await.unwrap();

        // Holding one session's lock leaves the other available.
        let _guard = session_a.lock().await;
        assert!(session_b.try_lock().is_ok());
        assert!(session_a.try_lock().is_err());
    }

    #[test]
    fn test_chat_event_creation() {
        let id = Uuid::new_v4();
        let event = ChatEvent::new("turn_appended", id, serde_json::json!({"role": "user"}));

        assert_eq!(event.event_type, "turn_appended");
        assert_eq!(event.session_id, id);
        assert!(event.timestamp <= Utc::now());
        assert_eq!(event.data["role"], "user");
    }
}
