//! Seam to the external real-time calling SDK
//!
//! After `POST /calls/start` succeeds, the session token and agent id are
//! handed to an SDK that owns the live audio connection. Its wire protocol
//! is opaque to the console, so the console only sees [`RealtimeSdk`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while joining a real-time session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The SDK refused the credentials
    #[error("session credentials rejected: {reason}")]
    Rejected {
        /// Reason reported by the SDK
        reason: String,
    },

    /// The SDK could not reach its media endpoint
    #[error("real-time SDK unavailable: {message}")]
    Unavailable {
        /// Error message
        message: String,
    },
}

impl SessionError {
    /// Create a rejected error
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

impl From<SessionError> for dispatch_core::Error {
    fn from(err: SessionError) -> Self {
        Self::Session(err.to_string())
    }
}

/// A joined real-time session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    /// Voice agent the session talks to
    pub agent_id: String,
    /// Call record created for the session, when the service reported one
    pub call_id: Option<String>,
    /// When the SDK accepted the session
    pub connected_at: DateTime<Utc>,
}

/// Narrow capability the console needs from the real-time SDK
#[async_trait]
pub trait RealtimeSdk: Send + Sync {
    /// Join the session identified by `token` with the agent `agent_id`
    async fn connect(&self, token: &str, agent_id: &str) -> SessionResult<SessionHandle>;
}

/// Recording SDK double for tests
#[derive(Debug, Clone, Default)]
pub struct MockRealtimeSdk {
    connections: Arc<Mutex<Vec<(String, String)>>>,
    failure: Option<SessionError>,
}

impl MockRealtimeSdk {
    /// Create an SDK double that accepts every session
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure to refuse every session with `error`
    #[must_use]
    pub fn with_failure(mut self, error: SessionError) -> Self {
        self.failure = Some(error);
        self
    }

    /// `(token, agent_id)` pairs seen so far, in order
    pub fn connections(&self) -> Vec<(String, String)> {
        self.connections.lock().clone()
    }
}

#[async_trait]
impl RealtimeSdk for MockRealtimeSdk {
    async fn connect(&self, token: &str, agent_id: &str) -> SessionResult<SessionHandle> {
        self.connections
            .lock()
            .push((token.to_string(), agent_id.to_string()));

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        info!(agent_id, "mock real-time session connected");
        Ok(SessionHandle {
            agent_id: agent_id.to_string(),
            call_id: None,
            connected_at: Utc::now(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_connections() {
        let sdk = MockRealtimeSdk::new();

        let handle = sdk.connect("tok-1", "agent-1").await.unwrap();
        assert_eq!(handle.agent_id, "agent-1");
        assert_eq!(
            sdk.connections(),
            vec![("tok-1".to_string(), "agent-1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_mock_failure_still_records() {
        let sdk = MockRealtimeSdk::new().with_failure(SessionError::rejected("expired token"));

        let err = sdk.connect("tok-1", "agent-1").await.unwrap_err();
        assert_eq!(err.to_string(), "session credentials rejected: expired token");
        assert_eq!(sdk.connections().len(), 1);

        let core: dispatch_core::Error = err.into();
        assert!(matches!(core, dispatch_core::Error::Session(_)));
    }
}
