// ABOUTME: In-memory registry of live agent sessions and their sequence counters
// ABOUTME: Creates and deletes remote sessions and hands out monotonic sequence ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Session registry
//!
//! Sessions live for the lifetime of the process. The sequence counter of a
//! session only moves through [`SessionRegistry::increment_sequence_id`], one
//! step per outbound message.

use crate::agentforce::AgentBackend;
use crate::errors::{AppError, AppResult, ErrorKind};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// One conversation with the remote agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Backend-assigned identifier
    pub session_id: String,
    /// Locally generated key sent at creation
    pub session_key: String,
    /// Sequence value of the last message sent (0 before the first)
    pub sequence_id: u64,
    /// When the session was created
    pub created_at: DateTime<Utc>,
}

/// Owns every live session
#[derive(Clone)]
pub struct SessionRegistry {
    backend: Arc<dyn AgentBackend>,
    sessions: Arc<DashMap<String, Session>>,
}

impl SessionRegistry {
    /// Create an empty registry backed by `backend`
    #[must_use]
    pub fn new(backend: Arc<dyn AgentBackend>) -> Self {
        Self {
            backend,
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Create a remote session and start tracking it
    ///
    /// # Errors
    ///
    /// Returns `SESSION_ERROR` if the remote exchange fails (or `AUTH_ERROR`
    /// if no token could be obtained). Nothing is stored on failure.
    pub async fn create_session(&self) -> AppResult<Session> {
        let session_key = Uuid::new_v4().to_string();

        let session_id = self
            .backend
            .create_session(&session_key)
            .await
            .map_err(|e| as_session_error(e, "create"))?;

        let session = Session {
            session_id: session_id.clone(),
            session_key,
            sequence_id: 0,
            created_at: Utc::now(),
        };
        self.sessions.insert(session_id.clone(), session.clone());

        info!(session_id = %session_id, "Session created");
        Ok(session)
    }

    /// Look up a session
    #[must_use]
    pub fn get_session(&self, session_id: &str) -> Option<Session> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    /// Advance the sequence counter and return the new value
    ///
    /// # Errors
    ///
    /// Returns `SESSION_ERROR` ("Session not found") for an unknown session
    pub fn increment_sequence_id(&self, session_id: &str) -> AppResult<u64> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(AppError::session_not_found)?;
        entry.sequence_id += 1;
        Ok(entry.sequence_id)
    }

    /// End a session
    ///
    /// Returns `false` for an unknown session. A failed remote delete leaves
    /// the session registered so the caller can retry.
    ///
    /// # Errors
    ///
    /// Returns `SESSION_ERROR` if the remote delete fails
    pub async fn end_session(&self, session_id: &str) -> AppResult<bool> {
        if !self.sessions.contains_key(session_id) {
            return Ok(false);
        }

        self.backend
            .delete_session(session_id)
            .await
            .map_err(|e| as_session_error(e, "end"))?;

        self.sessions.remove(session_id);
        info!(session_id = %session_id, "Session ended");
        Ok(true)
    }

    /// Number of live sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Remote lifecycle failures surface as `SESSION_ERROR`; auth failures keep their kind
fn as_session_error(error: AppError, action: &str) -> AppError {
    warn!("Failed to {} session: {}", action, error);
    match error.kind {
        ErrorKind::AuthError | ErrorKind::SessionError => error,
        _ => AppError::session(error.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agentforce::{AgentReply, ByteStream};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeBackend {
        fail: AtomicBool,
        created: AtomicUsize,
        deleted: AtomicUsize,
    }

    #[async_trait]
    impl AgentBackend for FakeBackend {
        async fn create_session(&self, session_key: &str) -> AppResult<String> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::execution("backend down"));
            }
            assert!(Uuid::parse_str(session_key).is_ok());
            let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("S{n}"))
        }

        async fn delete_session(&self, _session_id: &str) -> AppResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::session("backend down"));
            }
            self.deleted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn send_message(&self, _: &str, _: u64, _: &str) -> AppResult<AgentReply> {
            Err(AppError::message("not used"))
        }

        async fn access_token(&self) -> AppResult<String> {
            Ok("token".into())
        }

        async fn open_message_stream(
            &self,
            _: &str,
            _: &str,
            _: u64,
            _: &str,
        ) -> AppResult<ByteStream> {
            Err(AppError::stream("not used"))
        }
    }

    #[tokio::test]
    async fn test_sequence_starts_at_one_and_increments() {
        let registry = SessionRegistry::new(Arc::new(FakeBackend::default()));
        let session = registry.create_session().await.unwrap();
        assert_eq!(session.sequence_id, 0);

        for expected in 1..=3 {
            assert_eq!(registry.increment_sequence_id(&session.session_id).unwrap(), expected);
        }
        assert_eq!(registry.get_session(&session.session_id).unwrap().sequence_id, 3);
    }

    #[tokio::test]
    async fn test_increment_unknown_session() {
        let registry = SessionRegistry::new(Arc::new(FakeBackend::default()));
        let error = registry.increment_sequence_id("nope").unwrap_err();
        assert_eq!(error.kind, ErrorKind::SessionError);
        assert_eq!(error.message, "Session not found");
    }

    #[tokio::test]
    async fn test_end_unknown_session_returns_false() {
        let backend = Arc::new(FakeBackend::default());
        let registry = SessionRegistry::new(backend.clone());
        assert!(!registry.end_session("nope").await.unwrap());
        assert_eq!(backend.deleted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_end_known_session() {
        let registry = SessionRegistry::new(Arc::new(FakeBackend::default()));
        let session = registry.create_session().await.unwrap();

        assert!(registry.end_session(&session.session_id).await.unwrap());
        assert!(registry.get_session(&session.session_id).is_none());
        assert!(!registry.end_session(&session.session_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_create_keeps_no_state() {
        let backend = Arc::new(FakeBackend::default());
        backend.fail.store(true, Ordering::SeqCst);
        let registry = SessionRegistry::new(backend);

        let error = registry.create_session().await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::SessionError);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_failed_remote_delete_keeps_session() {
        let backend = Arc::new(FakeBackend::default());
        let registry = SessionRegistry::new(backend.clone());
        let session = registry.create_session().await.unwrap();

        backend.fail.store(true, Ordering::SeqCst);
        let error = registry.end_session(&session.session_id).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::SessionError);
        assert!(registry.get_session(&session.session_id).is_some());

        backend.fail.store(false, Ordering::SeqCst);
        assert!(registry.end_session(&session.session_id).await.unwrap());
    }
}
