// ABOUTME: Plain and streaming message delivery to the remote agent
// ABOUTME: Advances session sequence ids and starts streams on the coordinator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Message delivery
//!
//! Every outbound message advances its session's sequence counter exactly
//! once, before any remote call is made.

use crate::agentforce::AgentBackend;
use crate::constants::messages;
use crate::errors::{AppError, AppResult, ErrorKind};
use crate::protocol::{StreamId, StreamMessage};
use crate::session::SessionRegistry;
use crate::streaming::StreamCoordinator;
use std::sync::Arc;
use tracing::{info, warn};

/// Sends messages within registered sessions
#[derive(Clone)]
pub struct MessagingService {
    backend: Arc<dyn AgentBackend>,
    sessions: SessionRegistry,
    streams: StreamCoordinator,
}

impl MessagingService {
    /// Create a service over the given registry and coordinator
    #[must_use]
    pub fn new(
        backend: Arc<dyn AgentBackend>,
        sessions: SessionRegistry,
        streams: StreamCoordinator,
    ) -> Self {
        Self {
            backend,
            sessions,
            streams,
        }
    }

    /// Send a message and return the agent's reply text
    ///
    /// # Errors
    ///
    /// `SESSION_ERROR` for an unknown session, `AUTH_ERROR` when no token is
    /// available, `MESSAGE_ERROR` when the remote call fails
    pub async fn send_message(&self, session_id: &str, message: &str) -> AppResult<String> {
        let sequence_id = self.sessions.increment_sequence_id(session_id)?;

        let reply = self
            .backend
            .send_message(session_id, sequence_id, message)
            .await
            .map_err(|e| {
                warn!(session_id = %session_id, sequence_id, "Message send failed: {}", e);
                match e.kind {
                    ErrorKind::AuthError | ErrorKind::MessageError => e,
                    _ => AppError::message(messages::MESSAGE_SEND_FAILED),
                }
            })?;

        info!(session_id = %session_id, sequence_id, response_id = %reply.response_id, "Message delivered");
        Ok(reply.message)
    }

    /// Start a streaming message and return its stream id
    ///
    /// The bearer token is resolved before the stream is registered. Only
    /// establishing the outbound request runs in the background; the reply is
    /// retrieved with [`Self::get_stream_message`].
    ///
    /// # Errors
    ///
    /// `SESSION_ERROR` for an unknown session, `AUTH_ERROR` when no token is
    /// available
    pub async fn send_message_stream(
        &self,
        session_id: &str,
        message: &str,
    ) -> AppResult<StreamId> {
        let sequence_id = self.sessions.increment_sequence_id(session_id)?;
        let stream_id = StreamId::new(session_id, sequence_id);

        let access_token = self.backend.access_token().await.map_err(|e| {
            warn!(stream_id = %stream_id, "Stream not started: {}", e);
            e
        })?;

        let backend = Arc::clone(&self.backend);
        let session_id = session_id.to_owned();
        let message = message.to_owned();
        self.streams.start(&stream_id, async move {
            backend
                .open_message_stream(&access_token, &session_id, sequence_id, &message)
                .await
        });

        Ok(stream_id)
    }

    /// Next queued event of a stream
    ///
    /// # Errors
    ///
    /// `INVALID_PARAMETERS` for a malformed stream id
    pub fn get_stream_message(&self, stream_id: &str) -> AppResult<StreamMessage> {
        let stream_id = StreamId::parse(stream_id)?;
        Ok(self.streams.get_stream_message(&stream_id))
    }

    /// Cancel a stream
    ///
    /// # Errors
    ///
    /// `INVALID_PARAMETERS` for a malformed stream id
    pub fn cancel_stream(&self, stream_id: &str) -> AppResult<bool> {
        let stream_id = StreamId::parse(stream_id)?;
        Ok(self.streams.cancel(&stream_id))
    }
}
