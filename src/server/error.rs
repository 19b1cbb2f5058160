//! Chat server error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use super::api::ErrorResponse;

/// Errors returned by API handlers.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// No session with this id.
    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    /// A request for this session is already in flight.
    #[error("Session {0} is busy with another request")]
    SessionBusy(Uuid),

    /// The request cycle task did not complete.
    #[error("Request for session {0} was aborted: {1}")]
    CycleAborted(Uuid, String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::SessionBusy(_) => StatusCode::CONFLICT,
            Self::CycleAborted(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Errors that stop the server itself.
#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    /// Failed to bind to address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Server error.
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}
