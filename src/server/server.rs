//! Chat HTTP server with axum router and graceful shutdown.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::error::ServerError;
use super::handlers::{
    create_session, delete_session, get_events_sse, get_health, get_session, index, post_message,
    post_reset, AppState,
};
use crate::chat::Orchestrator;
use crate::config::ServerConfig;

/// HTTP server exposing the chat API.
pub struct ChatServer {
    /// Server configuration.
    config: ServerConfig,
    /// Application state shared across handlers.
    state: AppState,
}

impl ChatServer {
    /// Create a new chat server with default configuration.
    #[must_use]
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            config: ServerConfig::default(),
            state: AppState::new(orchestrator),
        }
    }

    /// Set the server configuration (builder pattern).
    #[must_use]
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the configured address as a string.
    #[must_use]
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Shared handler state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the axum router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        let router = Router::new()
            .route("/", get(index))
            .route("/api/health", get(get_health))
            .route("/api/events", get(get_events_sse))
            .route("/api/sessions", post(create_session))
            .route("/api/sessions/:id", get(get_session).delete(delete_session))
            .route("/api/sessions/:id/messages", post(post_message))
            .route("/api/sessions/:id/reset", post(post_reset))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.cors_permissive {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Run the server, binding to the configured address.
    ///
    /// The server runs until the cancellation token in [`AppState`] is
    /// triggered, then shuts down gracefully.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or serve.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::BindError {
                address: addr.clone(),
                source,
            })?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns an error if serving fails.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let cancel = self.state.cancel.clone();
        let app = self.build_router();

        tracing::info!(address = ?listener.local_addr().ok(), "Starting chat server");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel.cancelled().await;
                tracing::info!("Chat server shutting down gracefully");
            })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::ai::{AiError, CompletionProvider, CompletionRequest};
    use crate::chat::ChatSettings;
    use crate::config::DEFAULT_PORT;
    use crate::knowledge::KnowledgeContext;

    struct NullProvider;

    #[async_trait]
    impl CompletionProvider for NullProvider {
        fn name(&self) -> &'static str {
            "null"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<String, AiError> {
            Err(AiError::EmptyResponse)
        }
    }

    fn server() -> ChatServer {
        ChatServer::new(Arc::new(Orchestrator::new(
            Arc::new(KnowledgeContext::default()),
            Arc::new(NullProvider),
            ChatSettings::default(),
        )))
    }

    #[test]
    fn test_chat_server_address() {
        let server = server();
        assert_eq!(server.address(), format!("127.0.0.1:{DEFAULT_PORT}"));
    }

    #[test]
    fn test_chat_server_with_config() {
        let server = server().with_config(ServerConfig {
            port: 8080,
            host: "0.0.0.0".to_string(),
            cors_permissive: false,
        });

        assert_eq!(server.address(), "0.0.0.0:8080");
        assert!(!server.config.cors_permissive);
    }

    #[test]
    fn test_build_router() {
        let _router = server().build_router();
    }

    #[tokio::test]
    async fn test_run_reports_bind_error() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let result = server()
            .with_config(ServerConfig {
                port,
                ..ServerConfig::default()
            })
            .run()
            .await;

        assert!(matches!(result, Err(ServerError::BindError { .. })));
    }
}
