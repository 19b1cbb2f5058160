//! HTTP chat surface.
//!
//! Serves a minimal chat page plus a JSON API over per-user sessions, and an
//! SSE feed of transcript changes.

mod api;
mod error;
mod handlers;
#[allow(clippy::module_inception)]
mod server;
mod state;

pub use api::{
    ErrorResponse, HealthResponse, MessageRequest, SessionCreated, SessionView, SubmitResponse,
    SubmitStatus,
};
pub use error::{ApiError, ServerError};
pub use handlers::AppState;
pub use server::ChatServer;
pub use state::{ChatEvent, SessionStore, DEFAULT_EVENT_CHANNEL_CAPACITY};
